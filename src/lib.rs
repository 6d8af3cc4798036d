//! Read and decode the telemetry record of a Thornwave BT DCPM battery monitor
//!
//! The monitor exposes its state as one GATT characteristic. Two record layouts
//! exist: firmware up to 2.03 ([`FirmwareVariant::Legacy`]) and newer
//! firmware ([`FirmwareVariant::PowermonX`]). The payload does not say which one
//! it is, so the caller picks.
//!
//! ```
//! use dcpm_reader::{decode, FirmwareVariant};
//!
//! let raw = [0u8; 49];
//! let snapshot = decode(&raw, FirmwareVariant::PowermonX).unwrap();
//! assert_eq!(snapshot.uptime_seconds, 0);
//! ```

pub mod bluetooth;
pub mod config;
pub mod decoder;
pub mod error;
pub mod models;
pub mod output;
pub mod utils;

pub use decoder::decode;
pub use error::DecodeError;
pub use models::{BatterySnapshot, FirmwareVariant, Reading};
