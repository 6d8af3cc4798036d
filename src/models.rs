use std::fmt;
use std::str::FromStr;

use time::OffsetDateTime;

/// Record layout generation of the monitor firmware.
///
/// The payload does not say which layout it uses, so this is always chosen
/// by configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FirmwareVariant {
    /// Firmware 2.03 and older
    #[default]
    Legacy,
    /// Firmware newer than 2.03
    PowermonX,
}

impl FirmwareVariant {
    /// Shortest buffer the variant can be decoded from.
    pub const fn min_record_len(self) -> usize {
        match self {
            FirmwareVariant::Legacy => 52,
            FirmwareVariant::PowermonX => 49,
        }
    }
}

impl fmt::Display for FirmwareVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FirmwareVariant::Legacy => write!(f, "legacy"),
            FirmwareVariant::PowermonX => write!(f, "powermonx"),
        }
    }
}

impl FromStr for FirmwareVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "legacy" => Ok(FirmwareVariant::Legacy),
            "powermonx" | "x" => Ok(FirmwareVariant::PowermonX),
            other => Err(format!(
                "unknown firmware variant '{}', expected 'legacy' or 'powermonx'",
                other
            )),
        }
    }
}

/// One decoded and scaled record from the monitor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatterySnapshot {
    /// State of charge in %
    pub percent_charged: f64,
    /// V1 in volts
    pub voltage1: f64,
    /// V2 in volts
    pub voltage2: f64,
    /// Current in amps, zero inside the deadband
    pub current: f64,
    /// Power in watts, zero inside the deadband
    pub power: f64,
    /// Temperature in Celsius
    pub temperature_c: f64,
    /// Cumulative energy in Wh
    pub power_meter_wh: f64,
    /// Cumulative charge in Ah
    pub charge_meter_ah: f64,
    /// Seconds since the monitor started. Always 0 for PowermonX.
    pub uptime_seconds: u32,
    /// Device clock in an undocumented packed format
    pub device_timestamp: u32,
    /// Peak current. Always 0 for PowermonX.
    pub peak_current: f64,
}

/// A snapshot together with where and when it was requested
#[derive(Debug, Clone)]
pub struct Reading {
    pub snapshot: BatterySnapshot,
    pub requested_at: OffsetDateTime,
    pub address: String,
}
