pub mod human;
pub mod json;
pub mod parsable;

use crate::error::RenderError;
use crate::models::Reading;

pub use human::HumanRenderer;
pub use json::JsonRenderer;
pub use parsable::ParsableRenderer;

/// Turns a reading into the text written to stdout
pub trait Renderer {
    fn render(&self, reading: &Reading) -> Result<String, RenderError>;
}

/// Output format selected on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Single line, whitespace separated
    #[default]
    Parsable,
    /// Multi-line labelled text
    Human,
    /// Flat JSON object with string values
    Json,
}

impl OutputMode {
    pub fn renderer(self) -> Box<dyn Renderer> {
        match self {
            OutputMode::Parsable => Box::new(ParsableRenderer),
            OutputMode::Human => Box::new(HumanRenderer),
            OutputMode::Json => Box::new(JsonRenderer),
        }
    }
}


#[cfg(test)]
pub(crate) mod fixtures {
    use time::macros::datetime;

    use crate::models::{BatterySnapshot, Reading};

    /// Values of the second captured legacy record
    pub fn reading() -> Reading {
        Reading {
            snapshot: BatterySnapshot {
                percent_charged: 80.0,
                voltage1: 13.41,
                voltage2: 12.52,
                current: -0.33,
                power: -4.0,
                temperature_c: 24.5,
                power_meter_wh: -242.2,
                charge_meter_ah: -18.0,
                uptime_seconds: 727_181,
                device_timestamp: 235_497_645,
                peak_current: 50.087162017822266,
            },
            requested_at: datetime!(2020-08-05 04:34:47 UTC),
            address: "C4:64:E3:AA:BB:CC".to_string(),
        }
    }
}
