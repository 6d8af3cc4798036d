use clap::Parser;
use log::{debug, error, warn};

use dcpm_reader::bluetooth::fetch_record;
use dcpm_reader::config::{Cli, ReaderConfig};
use dcpm_reader::decode;
use dcpm_reader::error::AppError;
use dcpm_reader::models::Reading;
use dcpm_reader::utils::now;

async fn read_and_render(config: &ReaderConfig) -> Result<String, AppError> {
    let requested_at = now();

    let raw = fetch_record(config).await?;
    let snapshot = decode(&raw, config.variant)?;
    debug!("Decoded {} record: {:?}", config.variant, snapshot);

    let reading = Reading {
        snapshot,
        requested_at,
        address: config.address.to_string(),
    };

    Ok(config.output.renderer().render(&reading)?)
}

// Single threaded so the local UTC offset can be read
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging, quiet unless asked for
    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Error
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .format_timestamp_secs()
        .init();

    // Load configuration
    let config = match ReaderConfig::new(&cli) {
        Ok(config) => config,
        Err(e) => exit_with(AppError::from(e)),
    };

    match read_and_render(&config).await {
        Ok(output) => println!("{}", output),
        Err(e) => exit_with(e),
    }

    Ok(())
}

/// Log the failure once and exit with status 1
fn exit_with(e: AppError) -> ! {
    if e.is_routine() {
        warn!("Read failed. {}", e);
    } else {
        error!("{}", e);
    }
    std::process::exit(1);
}
