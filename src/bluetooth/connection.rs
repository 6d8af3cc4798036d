/// Connection to the monitor, with the retry policy
use std::future::Future;

use bluer::{Adapter, AdapterEvent, AddressType, Device, DiscoveryFilter, DiscoveryTransport};
use futures_util::StreamExt;
use log::{debug, warn};
use tokio::time::{sleep, timeout, Duration};

use crate::config::ReaderConfig;
use crate::error::ReadError;

/// Run `operation` up to `attempts` times, sleeping `delay` between failures
///
/// The operation receives the 1-based attempt number. Every failure is logged;
/// once all attempts fail the result is `ReadError::ConnectionFailed`.
pub async fn with_retry<T, F, Fut>(
    attempts: u32,
    delay: Duration,
    mut operation: F,
) -> Result<T, ReadError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, ReadError>>,
{
    for attempt in 1..=attempts {
        match operation(attempt).await {
            Ok(value) => return Ok(value),
            Err(e) => warn!("Attempt {}: connection failed: {}", attempt, e),
        }

        if attempt < attempts {
            sleep(delay).await;
        }
    }

    Err(ReadError::ConnectionFailed { attempts })
}

/// Connect to the configured monitor using the configured retry policy
pub async fn connect_with_retry(
    adapter: &Adapter,
    config: &ReaderConfig,
) -> Result<Device, ReadError> {
    with_retry(config.connect_attempts, config.retry_delay, |attempt| async move {
        debug!("Connecting to {} (attempt {})", config.address, attempt);
        timeout(config.read_timeout, connect(adapter, config))
            .await
            .map_err(|_| ReadError::Timeout)?
    })
    .await
}

async fn connect(adapter: &Adapter, config: &ReaderConfig) -> Result<Device, ReadError> {
    if !adapter.device_addresses().await?.contains(&config.address) {
        discover(adapter, config).await?;
    }

    if adapter.device_addresses().await?.contains(&config.address) {
        let device = adapter.device(config.address)?;
        if !device.is_connected().await? {
            device.connect().await?;
        }
        Ok(device)
    } else {
        // Not advertised during the scan; the DCPM uses a random static address
        debug!("{} not seen while scanning, connecting directly", config.address);
        Ok(adapter
            .connect_device(config.address, AddressType::LeRandom)
            .await?)
    }
}

/// Scan for LE devices until the configured address shows up or the scan window ends
async fn discover(adapter: &Adapter, config: &ReaderConfig) -> Result<(), ReadError> {
    let filter = DiscoveryFilter {
        transport: DiscoveryTransport::Le,
        duplicate_data: false,
        ..Default::default()
    };

    // Apply the discovery filter (warn if it fails, but continue)
    if let Err(e) = adapter.set_discovery_filter(filter).await {
        warn!("Failed to set discovery filter: {}", e);
    }

    let mut events = Box::pin(adapter.discover_devices().await?);
    let found = timeout(config.scan_duration, async {
        while let Some(event) = events.next().await {
            debug!("Discovery event: {:?}", event);
            if let AdapterEvent::DeviceAdded(addr) = event {
                if addr == config.address {
                    return true;
                }
            }
        }
        false
    })
    .await
    .unwrap_or(false);

    if !found {
        debug!("{} not found within {:?}", config.address, config.scan_duration);
    }

    Ok(())
}
