use std::env;
use std::str::FromStr;
use std::time::Duration;

use bluer::Address;
use clap::{ArgGroup, Parser};
use log::debug;

use crate::error::ConfigError;
use crate::models::FirmwareVariant;
use crate::output::OutputMode;
use crate::utils::parse_handle;

/// Value handle of the record characteristic on the DCPM
pub const DEFAULT_CHARACTERISTIC_HANDLE: u16 = 0x15;
pub const MIN_CONNECT_ATTEMPTS: u32 = 2;
const DEFAULT_RETRY_DELAY_SECS: u64 = 10;
const DEFAULT_SCAN_SECS: u64 = 5;
const DEFAULT_READ_TIMEOUT_SECS: u64 = 30;

/// Command line arguments. Anything left out falls back to `DCPM_*` variables.
#[derive(Parser, Debug, Default)]
#[command(name = "dcpm-reader")]
#[command(about = "Reads and outputs Thornwave BT DCPM battery monitor data")]
#[command(group(ArgGroup::new("output").args(["parsable", "human", "json"])))]
pub struct Cli {
    /// BT DCPM BLE address
    #[arg(short = 'b', long = "ble-address")]
    pub ble_address: Option<String>,

    /// Device runs PowermonX firmware (newer than 2.03)
    #[arg(short = 'x', long, conflicts_with = "firmware")]
    pub powermonx: bool,

    /// Firmware record layout: legacy or powermonx
    #[arg(long)]
    pub firmware: Option<FirmwareVariant>,

    /// Bluetooth adapter name, e.g. hci0
    #[arg(long)]
    pub adapter: Option<String>,

    /// Value handle of the record characteristic (hex like 0x15 or decimal)
    #[arg(long, value_parser = parse_handle)]
    pub handle: Option<u16>,

    /// Machine parsable output (default)
    #[arg(short = 'P', long)]
    pub parsable: bool,

    /// Human readable output
    #[arg(short = 'H', long)]
    pub human: bool,

    /// JSON output
    #[arg(short = 'J', long)]
    pub json: bool,

    /// Debug output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn output_mode(&self) -> OutputMode {
        if self.json {
            OutputMode::Json
        } else if self.human {
            OutputMode::Human
        } else {
            OutputMode::Parsable
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReaderConfig {
    pub address: Address,
    pub variant: FirmwareVariant,
    pub adapter: Option<String>,
    pub characteristic_handle: u16,
    pub connect_attempts: u32,
    pub retry_delay: Duration,
    pub scan_duration: Duration,
    pub read_timeout: Duration,
    pub output: OutputMode,
}

impl ReaderConfig {
    pub fn new(cli: &Cli) -> Result<Self, ConfigError> {
        // Load environment variables
        dotenv::dotenv().ok();

        Self::from_lookup(cli, |key| env::var(key).ok())
    }

    /// Build the configuration from CLI arguments, then `lookup` for the rest
    pub fn from_lookup<F>(cli: &Cli, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let address = cli
            .ble_address
            .clone()
            .or_else(|| lookup("DCPM_ADDRESS"))
            .ok_or(ConfigError::MissingAddress)?;
        let address = parse_value::<Address>("DCPM_ADDRESS", address.trim())?;

        let variant = if cli.powermonx {
            FirmwareVariant::PowermonX
        } else if let Some(variant) = cli.firmware {
            variant
        } else {
            match lookup("DCPM_FIRMWARE") {
                Some(value) => parse_value("DCPM_FIRMWARE", &value)?,
                None => FirmwareVariant::default(),
            }
        };

        let characteristic_handle = match (cli.handle, lookup("DCPM_CHARACTERISTIC_HANDLE")) {
            (Some(handle), _) => handle,
            (None, Some(value)) => parse_handle(&value).map_err(|_| ConfigError::InvalidValue {
                key: "DCPM_CHARACTERISTIC_HANDLE".to_string(),
                value,
            })?,
            (None, None) => DEFAULT_CHARACTERISTIC_HANDLE,
        };

        let connect_attempts = lookup_or(&lookup, "DCPM_CONNECT_ATTEMPTS", MIN_CONNECT_ATTEMPTS)?
            .max(MIN_CONNECT_ATTEMPTS);
        let retry_delay = lookup_or(&lookup, "DCPM_RETRY_DELAY_SECS", DEFAULT_RETRY_DELAY_SECS)?;
        let scan_secs = lookup_or(&lookup, "DCPM_SCAN_SECS", DEFAULT_SCAN_SECS)?;
        let read_timeout = lookup_or(&lookup, "DCPM_READ_TIMEOUT_SECS", DEFAULT_READ_TIMEOUT_SECS)?;

        let config = ReaderConfig {
            address,
            variant,
            adapter: cli.adapter.clone().or_else(|| lookup("DCPM_ADAPTER")),
            characteristic_handle,
            connect_attempts,
            retry_delay: Duration::from_secs(retry_delay),
            scan_duration: Duration::from_secs(scan_secs),
            read_timeout: Duration::from_secs(read_timeout),
            output: cli.output_mode(),
        };

        debug!("Loaded configuration: {:?}", config);

        Ok(config)
    }
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn lookup_or<T, F>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) => parse_value(key, &value),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_with(cli: &Cli, vars: &[(&str, &str)]) -> Result<ReaderConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ReaderConfig::from_lookup(cli, |key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_with(&Cli::default(), &[("DCPM_ADDRESS", "c4:64:e3:aa:bb:cc")]).unwrap();
        assert_eq!(config.address.to_string(), "C4:64:E3:AA:BB:CC");
        assert_eq!(config.variant, FirmwareVariant::Legacy);
        assert_eq!(config.characteristic_handle, 0x15);
        assert_eq!(config.connect_attempts, 2);
        assert_eq!(config.retry_delay, Duration::from_secs(10));
        assert_eq!(config.output, OutputMode::Parsable);
        assert_eq!(config.adapter, None);
    }

    #[test]
    fn test_missing_address() {
        let err = config_with(&Cli::default(), &[]).unwrap_err();
        assert_eq!(err, ConfigError::MissingAddress);
    }

    #[test]
    fn test_invalid_address() {
        let err = config_with(&Cli::default(), &[("DCPM_ADDRESS", "not-an-address")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key, .. } if key == "DCPM_ADDRESS"));
    }

    #[test]
    fn test_cli_overrides_environment() {
        let cli = Cli::parse_from([
            "dcpm-reader",
            "-b",
            "11:22:33:44:55:66",
            "-x",
            "--handle",
            "0x20",
            "-J",
        ]);
        let config = config_with(
            &cli,
            &[
                ("DCPM_ADDRESS", "C4:64:E3:AA:BB:CC"),
                ("DCPM_FIRMWARE", "legacy"),
                ("DCPM_CHARACTERISTIC_HANDLE", "0x15"),
            ],
        )
        .unwrap();
        assert_eq!(config.address.to_string(), "11:22:33:44:55:66");
        assert_eq!(config.variant, FirmwareVariant::PowermonX);
        assert_eq!(config.characteristic_handle, 0x20);
        assert_eq!(config.output, OutputMode::Json);
    }

    #[test]
    fn test_environment_values() {
        let config = config_with(
            &Cli::default(),
            &[
                ("DCPM_ADDRESS", "C4:64:E3:AA:BB:CC"),
                ("DCPM_FIRMWARE", "powermonx"),
                ("DCPM_CHARACTERISTIC_HANDLE", "22"),
                ("DCPM_CONNECT_ATTEMPTS", "5"),
                ("DCPM_RETRY_DELAY_SECS", "3"),
                ("DCPM_ADAPTER", "hci1"),
            ],
        )
        .unwrap();
        assert_eq!(config.variant, FirmwareVariant::PowermonX);
        assert_eq!(config.characteristic_handle, 22);
        assert_eq!(config.connect_attempts, 5);
        assert_eq!(config.retry_delay, Duration::from_secs(3));
        assert_eq!(config.adapter.as_deref(), Some("hci1"));
    }

    #[test]
    fn test_connect_attempts_floor() {
        let config = config_with(
            &Cli::default(),
            &[("DCPM_ADDRESS", "C4:64:E3:AA:BB:CC"), ("DCPM_CONNECT_ATTEMPTS", "1")],
        )
        .unwrap();
        assert_eq!(config.connect_attempts, MIN_CONNECT_ATTEMPTS);
    }

    #[test]
    fn test_invalid_firmware() {
        let err = config_with(
            &Cli::default(),
            &[("DCPM_ADDRESS", "C4:64:E3:AA:BB:CC"), ("DCPM_FIRMWARE", "2.04")],
        )
        .unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidValue {
                key: "DCPM_FIRMWARE".to_string(),
                value: "2.04".to_string(),
            }
        );
    }

    #[test]
    fn test_output_flags_are_exclusive() {
        assert!(Cli::try_parse_from(["dcpm-reader", "-H", "-J"]).is_err());
        let cli = Cli::parse_from(["dcpm-reader", "-H"]);
        assert_eq!(cli.output_mode(), OutputMode::Human);
    }
}
