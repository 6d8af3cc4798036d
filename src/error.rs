use thiserror::Error;

use crate::models::FirmwareVariant;

/// Failure to decode a raw record
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("record too short for {variant} layout: expected at least {expected} bytes, got {actual}")]
    Truncated {
        variant: FirmwareVariant,
        expected: usize,
        actual: usize,
    },
}

/// Failure to fetch a raw record from the monitor
#[derive(Error, Debug)]
pub enum ReadError {
    #[error("bluetooth error: {0}")]
    Bluetooth(#[from] bluer::Error),

    #[error("characteristic with handle {0:#06x} not found")]
    CharacteristicNotFound(u16),

    #[error("could not connect after {attempts} attempts")]
    ConnectionFailed { attempts: u32 },

    #[error("timed out reading from device")]
    Timeout,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("no BLE address given, set DCPM_ADDRESS or pass --ble-address")]
    MissingAddress,

    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("time formatting failed: {0}")]
    Time(#[from] time::error::Format),
}

/// Everything that can end a run
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Read(#[from] ReadError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

impl AppError {
    /// An unreachable monitor is routine and only reported with `--verbose`
    pub fn is_routine(&self) -> bool {
        matches!(self, AppError::Read(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DecodeError::Truncated {
            variant: FirmwareVariant::Legacy,
            expected: 52,
            actual: 20,
        };
        assert_eq!(
            err.to_string(),
            "record too short for legacy layout: expected at least 52 bytes, got 20"
        );

        let err = ReadError::CharacteristicNotFound(0x15);
        assert_eq!(err.to_string(), "characteristic with handle 0x0015 not found");

        let err = ReadError::ConnectionFailed { attempts: 2 };
        assert_eq!(err.to_string(), "could not connect after 2 attempts");

        let err = ConfigError::InvalidValue {
            key: "DCPM_FIRMWARE".to_string(),
            value: "2.04".to_string(),
        };
        assert_eq!(err.to_string(), "invalid value for DCPM_FIRMWARE: 2.04");
    }

    #[test]
    fn test_only_read_failures_are_routine() {
        assert!(AppError::from(ReadError::ConnectionFailed { attempts: 2 }).is_routine());
        assert!(AppError::from(ReadError::Timeout).is_routine());
        assert!(!AppError::from(ConfigError::MissingAddress).is_routine());
        let decode = DecodeError::Truncated {
            variant: FirmwareVariant::PowermonX,
            expected: 49,
            actual: 48,
        };
        assert!(!AppError::from(decode).is_routine());
    }
}
