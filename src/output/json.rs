/// Flat JSON output, every value a string
use serde::Serialize;

use crate::error::RenderError;
use crate::models::Reading;
use crate::output::Renderer;
use crate::utils::{format_datetime, format_uptime};

pub struct JsonRenderer;

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct JsonReading {
    date: String,
    #[serde(rename = "GMT")]
    gmt: String,
    address: String,
    charge: String,
    #[serde(rename = "V1")]
    v1: String,
    #[serde(rename = "V2")]
    v2: String,
    current: String,
    watts: String,
    temperature: String,
    power_meter: String,
    charge_meter: String,
    uptime: String,
    device_time: String,
    peak_current: String,
}

impl Renderer for JsonRenderer {
    fn render(&self, reading: &Reading) -> Result<String, RenderError> {
        let s = &reading.snapshot;
        let timestamp = format_datetime(&reading.requested_at)?;
        let (date, clock) = timestamp
            .split_once(' ')
            .unwrap_or((timestamp.as_str(), ""));

        let json = JsonReading {
            date: date.to_string(),
            gmt: clock.to_string(),
            address: reading.address.clone(),
            charge: format!("{:.0}", s.percent_charged),
            v1: format!("{:.2}", s.voltage1),
            v2: format!("{:.2}", s.voltage2),
            current: format!("{:.2}", s.current),
            watts: format!("{:.0}", s.power),
            temperature: format!("{:.1}", s.temperature_c),
            power_meter: format!("{:.1}", s.power_meter_wh),
            charge_meter: format!("{:.1}", s.charge_meter_ah),
            uptime: format_uptime(s.uptime_seconds),
            device_time: s.device_timestamp.to_string(),
            peak_current: format!("{:.2}", s.peak_current),
        };

        Ok(serde_json::to_string(&json)?)
    }
}
