/// Labelled multi-line output
use crate::error::RenderError;
use crate::models::Reading;
use crate::output::Renderer;
use crate::utils::{format_datetime, format_uptime};

pub struct HumanRenderer;

impl Renderer for HumanRenderer {
    fn render(&self, reading: &Reading) -> Result<String, RenderError> {
        let s = &reading.snapshot;
        let lines = [
            format!("{:<17}{:>20}", "Time:", format_datetime(&reading.requested_at)?),
            format!("{:<17}{:>20}", "Device:", reading.address),
            format!("{:<17}{:>19.0}%", "Pct Charged:", s.percent_charged),
            format!("{:<17}{:>19.2}V", "V1 Volts:", s.voltage1),
            format!("{:<17}{:>19.2}V", "V2 Volts:", s.voltage2),
            format!("{:<17}{:>19.2}A", "Current:", s.current),
            format!("{:<17}{:>19.0}W", "Power:", s.power),
            format!("{:<17}{:>19.1}C", "Temperature:", s.temperature_c),
            format!("{:<17}{:>18.1}Wh", "Power Meter:", s.power_meter_wh),
            format!("{:<17}{:>18.1}Ah", "Charge Meter:", s.charge_meter_ah),
            format!("{:<17}{:>20}", "Uptime:", format_uptime(s.uptime_seconds)),
            format!("{:<17}{:>20}", "Device Time:", s.device_timestamp),
            format!("{:<17}{:>19.1}A", "Peak Current:", s.peak_current),
        ];
        Ok(lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::fixtures;

    #[test]
    fn test_render_human() {
        let text = HumanRenderer.render(&fixtures::reading()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 13);
        assert_eq!(lines[0], "Time:               08/05/20 04:34:47");
        assert_eq!(lines[2], "Pct Charged:                      80%");
        assert_eq!(lines[5], "Current:                       -0.33A");
        assert_eq!(lines[6], "Power:                            -4W");
        assert_eq!(lines[8], "Power Meter:                 -242.2Wh");
        assert_eq!(lines[9], "Charge Meter:                 -18.0Ah");
        assert_eq!(lines[10], "Uptime:               8 days, 9:59:41");
        assert_eq!(lines[11], "Device Time:                235497645");
        assert_eq!(lines[12], "Peak Current:                   50.1A");
        assert!(lines.iter().all(|l| l.len() == 37));
    }
}
