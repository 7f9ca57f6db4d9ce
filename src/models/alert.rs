use std::fmt;

use time::OffsetDateTime;

/// Severity of an air-quality alert, mapped 1:1 onto the color pushed to the
/// light group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertLevel {
    /// CO2 back below the elevated threshold shortly after an alert.
    Green,
    /// CO2 elevated.
    Orange,
    /// CO2 well beyond the elevated range.
    Red,
}

impl AlertLevel {
    /// CIE xy color point pushed to the group for this level.
    pub fn color_point(&self) -> [f64; 2] {
        match self {
            AlertLevel::Green => [0.3, 0.6],
            AlertLevel::Orange => [0.6, 0.39],
            AlertLevel::Red => [0.75, 0.27],
        }
    }
}

impl fmt::Display for AlertLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertLevel::Green => write!(f, "green"),
            AlertLevel::Orange => write!(f, "orange"),
            AlertLevel::Red => write!(f, "red"),
        }
    }
}

/// One CO2 sample. Consumed immediately by the alert policy, never stored.
#[derive(Debug, Clone, Copy)]
pub struct SensorReading {
    pub co2_ppm: f64,
    pub time: OffsetDateTime,
}
