/// Decoding of the raw DCPM telemetry record
use crate::error::DecodeError;
use crate::models::{BatterySnapshot, FirmwareVariant};
use crate::utils::{deadband, round_to};

/// Byte offsets of each field within one record layout
struct Layout {
    charge: usize,
    voltage1: usize,
    voltage2: usize,
    current: usize,
    power: usize,
    temperature: usize,
    power_meter: usize,
    charge_meter: usize,
    uptime: Option<usize>,
    device_timestamp: usize,
    peak_current: Option<usize>,
    /// Zero current and power strictly inside (-1, 1)
    deadband: bool,
}

/// Firmware <= 2.03
///
/// - Bytes 0-2: Unknown
/// - Byte 3: Charge, LSB is a status flag
/// - Bytes 4-23: V1, V2, current, power, temperature (f32 each)
/// - Bytes 24-31: Power meter (i64, Wh * 1000)
/// - Bytes 32-39: Charge meter (i64, Ah * 1000)
/// - Bytes 40-43: Uptime in seconds (u32)
/// - Bytes 44-47: Device time, unknown packing (u32)
/// - Bytes 48-51: Peak current (f32)
const LEGACY: Layout = Layout {
    charge: 3,
    voltage1: 4,
    voltage2: 8,
    current: 12,
    power: 16,
    temperature: 20,
    power_meter: 24,
    charge_meter: 32,
    uptime: Some(40),
    device_timestamp: 44,
    peak_current: Some(48),
    deadband: false,
};

/// Firmware > 2.03
///
/// The field run starts at byte 3, the same place as the legacy record, which
/// makes the charge byte the last of 49.
///
/// - Bytes 0-2: Unknown
/// - Bytes 3-6: Device time, unknown packing (u32)
/// - Bytes 7-10: Unknown
/// - Bytes 11-26: V1, V2, current, power (f32 each)
/// - Bytes 27-34: Charge meter (i64, Ah * 1000)
/// - Bytes 35-42: Power meter (i64, Wh * 1000)
/// - Bytes 43-46: Temperature (f32)
/// - Byte 47: Unknown
/// - Byte 48: Charge, LSB is a status flag
const POWERMON_X: Layout = Layout {
    charge: 48,
    voltage1: 11,
    voltage2: 15,
    current: 19,
    power: 23,
    temperature: 43,
    power_meter: 35,
    charge_meter: 27,
    uptime: None,
    device_timestamp: 3,
    peak_current: None,
    deadband: true,
};

impl Layout {
    fn band(&self, value: f64) -> f64 {
        if self.deadband {
            deadband(value)
        } else {
            value
        }
    }
}

impl FirmwareVariant {
    fn layout(self) -> &'static Layout {
        match self {
            FirmwareVariant::Legacy => &LEGACY,
            FirmwareVariant::PowermonX => &POWERMON_X,
        }
    }
}

/// Decode a raw record read from the monitor
///
/// All multi-byte fields are little-endian. Scaling applied:
/// - Charge: status bit dropped, leaving the percentage
/// - Voltages: 2 decimals
/// - Current: 2 decimals, PowermonX zeroes it inside (-1, 1)
/// - Power: 0 decimals, PowermonX zeroes it inside (-1, 1)
/// - Temperature: 1 decimal
/// - Meters: divided by 1000, 1 decimal
///
/// Bytes past the end of the layout are ignored. Out of range floats are not
/// checked.
pub fn decode(raw: &[u8], variant: FirmwareVariant) -> Result<BatterySnapshot, DecodeError> {
    let expected = variant.min_record_len();
    if raw.len() < expected {
        return Err(DecodeError::Truncated {
            variant,
            expected,
            actual: raw.len(),
        });
    }

    let layout = variant.layout();

    Ok(BatterySnapshot {
        percent_charged: f64::from(raw[layout.charge] >> 1),
        voltage1: round_to(read_f32(raw, layout.voltage1), 2),
        voltage2: round_to(read_f32(raw, layout.voltage2), 2),
        current: layout.band(round_to(read_f32(raw, layout.current), 2)),
        power: layout.band(round_to(read_f32(raw, layout.power), 0)),
        temperature_c: round_to(read_f32(raw, layout.temperature), 1),
        power_meter_wh: round_to(read_i64(raw, layout.power_meter) as f64 / 1000.0, 1),
        charge_meter_ah: round_to(read_i64(raw, layout.charge_meter) as f64 / 1000.0, 1),
        uptime_seconds: layout.uptime.map_or(0, |offset| read_u32(raw, offset)),
        device_timestamp: read_u32(raw, layout.device_timestamp),
        peak_current: layout.peak_current.map_or(0.0, |offset| read_f32(raw, offset)),
    })
}

fn read_u32(raw: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([raw[offset], raw[offset + 1], raw[offset + 2], raw[offset + 3]])
}

fn read_f32(raw: &[u8], offset: usize) -> f64 {
    f64::from(f32::from_bits(read_u32(raw, offset)))
}

fn read_i64(raw: &[u8], offset: usize) -> i64 {
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&raw[offset..offset + 8]);
    i64::from_le_bytes(bytes)
}
