/// Reading the raw record characteristic
use bluer::{Device, Session};
use log::{debug, info, warn};
use tokio::time::{sleep, timeout, Duration};

use crate::bluetooth::connection::connect_with_retry;
use crate::config::ReaderConfig;
use crate::error::ReadError;

const SERVICES_RESOLVED_POLL_MS: u64 = 100;

/// Connect to the monitor and read one raw record
///
/// The device is disconnected again before returning, whether the read
/// succeeded or not.
pub async fn fetch_record(config: &ReaderConfig) -> Result<Vec<u8>, ReadError> {
    let session = Session::new().await?;
    let adapter = match &config.adapter {
        Some(name) => session.adapter(name)?,
        None => session.default_adapter().await?,
    };
    debug!("Using Bluetooth adapter {}", adapter.name());

    adapter.set_powered(true).await?;

    let device = connect_with_retry(&adapter, config).await?;
    info!("Connected to {}", config.address);

    let result = timeout(
        config.read_timeout,
        read_characteristic(&device, config.characteristic_handle),
    )
    .await
    .map_err(|_| ReadError::Timeout)
    .and_then(|r| r);

    if let Err(e) = device.disconnect().await {
        warn!("Failed to disconnect from {}: {}", config.address, e);
    }

    result
}

/// Read the characteristic whose value lives at `handle`
async fn read_characteristic(device: &Device, handle: u16) -> Result<Vec<u8>, ReadError> {
    while !device.is_services_resolved().await? {
        sleep(Duration::from_millis(SERVICES_RESOLVED_POLL_MS)).await;
    }

    for service in device.services().await? {
        for characteristic in service.characteristics().await? {
            // BlueZ identifies characteristics by declaration handle, the value follows it
            if characteristic.id().checked_add(1) == Some(handle) {
                let value = characteristic.read().await?;
                debug!(
                    "Read {} bytes from handle {:#06x}: {}",
                    value.len(),
                    handle,
                    hex::encode(&value)
                );
                return Ok(value);
            }
        }
    }

    Err(ReadError::CharacteristicNotFound(handle))
}
