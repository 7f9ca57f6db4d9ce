use std::env;

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Server {
    pub host: String,
    pub port: u16,
    /// Host part of the OAuth redirect URIs registered with both vendors.
    pub callback_host: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Logger {
    pub level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Netatmo {
    pub api_url: String,
    pub client_id: String,
    pub client_secret: String,
    pub scope: String,
    /// MAC address of the Home Coach to sample.
    pub device_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hue {
    pub api_url: String,
    pub client_id: String,
    pub client_secret: String,
    /// Light group driven during an alert.
    pub group_id: String,
    /// Name of the smart scene restored after an alert.
    pub baseline_scene: String,
    /// Device type announced when registering the application key.
    pub device_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scheduler {
    /// Seconds between token expiry checks.
    pub token_check_interval: u64,
    /// Seconds between sample-decide-act cycles.
    pub sample_interval: u64,
    /// Sampling only acts within [active_start_hour, active_end_hour).
    pub active_start_hour: u8,
    pub active_end_hour: u8,
    /// Offset in hours applied to UTC before evaluating the active window.
    pub utc_offset: i8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub server: Server,
    pub logger: Logger,
    pub netatmo: Netatmo,
    pub hue: Hue,
    pub scheduler: Scheduler,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or("development".into());

        Config::builder()
            .add_source(File::with_name("configs/default"))
            .add_source(File::with_name(&format!("configs/{run_mode}")).required(false))
            .add_source(Environment::default().separator("__"))
            .build()?
            .try_deserialize()
    }
}
