//! CO2 classification and alert debounce.
//!
//! CO2 decays slowly and readings are noisy near a band edge, so raw
//! threshold checks would re-flash the lights on every sampling tick while a
//! room stays elevated. The policy therefore remembers when the last alert
//! fired: an elevated reading re-fires at most once per re-trigger interval,
//! and a recovered reading only triggers a baseline confirmation while the
//! previous alert is still recent.

use time::{Duration, OffsetDateTime};

use crate::models::AlertLevel;

/// Above this the room is considered dangerous.
pub const DANGER_THRESHOLD_PPM: f64 = 1500.0;
/// Above this (and up to the danger threshold) the room is elevated.
pub const ELEVATED_THRESHOLD_PPM: f64 = 800.0;

/// Minimum gap between two fired alerts.
const RE_TRIGGER_INTERVAL: Duration = Duration::seconds(390);
/// A recovery reading confirms the baseline only this soon after an alert.
const CLEAR_CONFIRM_WINDOW: Duration = Duration::minutes(5);

/// Decision state: the instant the last warn/danger alert fired is the only
/// memory the debounce needs.
#[derive(Debug, Default)]
pub struct AlertPolicy {
    last_alert_at: Option<OffsetDateTime>,
}

impl AlertPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify a reading and decide whether an alert action should run.
    ///
    /// Warn/danger decisions update `last_alert_at` and are suppressed while
    /// the previous alert is younger than the re-trigger interval. A clear
    /// confirmation is only emitted while the previous alert is younger than
    /// the confirmation window, and never touches the state. "Within a
    /// window" is strict: a reading at exactly the re-trigger boundary fires
    /// again, one at exactly the confirmation boundary no longer confirms.
    pub fn decide(&mut self, co2_ppm: f64, now: OffsetDateTime) -> Option<AlertLevel> {
        if co2_ppm > DANGER_THRESHOLD_PPM {
            self.fire(now).then_some(AlertLevel::Red)
        } else if co2_ppm > ELEVATED_THRESHOLD_PPM {
            self.fire(now).then_some(AlertLevel::Orange)
        } else if co2_ppm < ELEVATED_THRESHOLD_PPM && self.confirms_clear(now) {
            Some(AlertLevel::Green)
        } else {
            None
        }
    }

    fn fire(&mut self, now: OffsetDateTime) -> bool {
        let suppressed = self
            .last_alert_at
            .is_some_and(|last| now - last < RE_TRIGGER_INTERVAL);
        if !suppressed {
            self.last_alert_at = Some(now);
        }
        !suppressed
    }

    fn confirms_clear(&self, now: OffsetDateTime) -> bool {
        self.last_alert_at
            .is_some_and(|last| now - last < CLEAR_CONFIRM_WINDOW)
    }
}
