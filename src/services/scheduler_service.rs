use std::sync::Arc;
use std::time::Duration;

use time::{OffsetDateTime, UtcOffset};
use tokio::time::MissedTickBehavior;

use crate::configs::Scheduler;
use crate::services::{AlertService, TokenService};

/// Owns the two periodic drivers: the token expiry check for both vendors and
/// the sample-decide-act cycle. The timers are independent and may interleave
/// arbitrarily; they share only the token services and the policy state
/// inside the alert service.
pub struct SchedulerService {
    netatmo_token: Arc<TokenService>,
    hue_token: Arc<TokenService>,
    alert: Arc<AlertService>,
    token_check_interval: Duration,
    sample_interval: Duration,
    utc_offset: UtcOffset,
}

impl SchedulerService {
    pub fn new(
        netatmo_token: Arc<TokenService>,
        hue_token: Arc<TokenService>,
        alert: Arc<AlertService>,
        settings: &Scheduler,
    ) -> Self {
        let utc_offset = UtcOffset::from_hms(settings.utc_offset, 0, 0).unwrap_or_else(|_| {
            tracing::warn!(
                "invalid utc_offset {} in scheduler settings, using UTC",
                settings.utc_offset
            );
            UtcOffset::UTC
        });

        Self {
            netatmo_token,
            hue_token,
            alert,
            token_check_interval: Duration::from_secs(settings.token_check_interval),
            sample_interval: Duration::from_secs(settings.sample_interval),
            utc_offset,
        }
    }

    /// Spawn both timer loops. Each loop runs its cycle inline, so a hung
    /// vendor call stalls only its own loop; the token check can never be
    /// starved by a slow sample cycle.
    pub fn start(self: &Arc<Self>) {
        let scheduler = Arc::clone(self);
        tokio::spawn(async move { scheduler.token_check_loop().await });

        let scheduler = Arc::clone(self);
        tokio::spawn(async move { scheduler.sample_loop().await });
    }

    async fn token_check_loop(&self) {
        let mut ticks = tokio::time::interval(self.token_check_interval);
        ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticks.tick().await;
            let now = OffsetDateTime::now_utc();
            if let Err(e) = self.netatmo_token.ensure_fresh(now).await {
                tracing::warn!("{} token refresh failed: {}", self.netatmo_token.vendor(), e);
            }
            if let Err(e) = self.hue_token.ensure_fresh(now).await {
                tracing::warn!("{} token refresh failed: {}", self.hue_token.vendor(), e);
            }
        }
    }

    async fn sample_loop(&self) {
        let mut ticks = tokio::time::interval(self.sample_interval);
        ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticks.tick().await;
            let now = OffsetDateTime::now_utc().to_offset(self.utc_offset);
            self.alert.run_sample_cycle(now).await;
        }
    }
}
