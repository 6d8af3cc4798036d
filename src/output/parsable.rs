/// Single line output for scripts and log files
///
/// Example:
/// `08/05/20 04:34:47 C4:64:E3:AA:BB:CC     80  13.41  12.52  -0.33     -4   24.5   -242.2  -18.0 727181 235497645  50.09`
use crate::error::RenderError;
use crate::models::Reading;
use crate::output::Renderer;
use crate::utils::format_datetime;

pub struct ParsableRenderer;

impl Renderer for ParsableRenderer {
    fn render(&self, reading: &Reading) -> Result<String, RenderError> {
        let s = &reading.snapshot;
        Ok(format!(
            "{} {} {:6.0} {:6.2} {:6.2} {:6.2} {:6.0} {:6.1} {:8.1} {:6.1} {} {} {:6.2}",
            format_datetime(&reading.requested_at)?,
            reading.address,
            s.percent_charged,
            s.voltage1,
            s.voltage2,
            s.current,
            s.power,
            s.temperature_c,
            s.power_meter_wh,
            s.charge_meter_ah,
            s.uptime_seconds,
            s.device_timestamp,
            s.peak_current,
        ))
    }
}
