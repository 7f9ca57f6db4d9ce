pub mod settings;

pub use settings::{Hue, Logger, Netatmo, Scheduler, Server, Settings};
