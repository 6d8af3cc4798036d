/// Utility functions for scaling and formatting
use time::macros::format_description;
use time::OffsetDateTime;

/// Round to a fixed number of decimal places
///
/// NaN and infinities pass through unchanged.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Force readings strictly between -1 and 1 to exactly zero
///
/// The monitor reports LSB noise at true zero current and power. Applied after
/// rounding, so it also turns `-0.0` into `0.0`.
pub fn deadband(value: f64) -> f64 {
    if value > -1.0 && value < 1.0 {
        0.0
    } else {
        value
    }
}

/// Request time of the current process, local if the offset is known
pub fn now() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}

/// Format a timestamp as MM/DD/YY HH:MM:SS
pub fn format_datetime(dt: &OffsetDateTime) -> Result<String, time::error::Format> {
    dt.format(format_description!(
        "[month]/[day]/[year repr:last_two] [hour]:[minute]:[second]"
    ))
}

/// Format an uptime as `[N day[s], ]H:MM:SS`
pub fn format_uptime(seconds: u32) -> String {
    let days = seconds / 86_400;
    let rest = seconds % 86_400;
    let clock = format!("{}:{:02}:{:02}", rest / 3600, rest % 3600 / 60, rest % 60);

    match days {
        0 => clock,
        1 => format!("1 day, {}", clock),
        n => format!("{} days, {}", n, clock),
    }
}

/// Parse a GATT handle given as `0x15` or `21`
pub fn parse_handle(s: &str) -> Result<u16, String> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u16::from_str_radix(hex, 16).map_err(|e| e.to_string())
    } else {
        s.parse()
            .map_err(|e: std::num::ParseIntError| e.to_string())
    }
}
