#[derive(Debug, thiserror::Error)]
pub enum SensorError {
    #[error("No sensor credential stored, authorize first")]
    NotAuthorized,

    #[error("Sensor vendor answered with status {status}")]
    Vendor { status: axum::http::StatusCode },

    #[error("No data available for the configured device")]
    NoData,

    #[error("Sensor payload is malformed")]
    Malformed,

    #[error("Sensor request failed: {0}")]
    Network(#[from] reqwest::Error),
}
