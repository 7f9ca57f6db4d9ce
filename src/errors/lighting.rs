#[derive(Debug, thiserror::Error)]
pub enum LightingError {
    #[error("No lighting credential stored, authorize first")]
    NotAuthorized,

    #[error("Device registration rejected with status {status}")]
    Registration { status: axum::http::StatusCode },

    #[error("Scene listing rejected with status {status}")]
    SceneList { status: axum::http::StatusCode },

    #[error("No smart scene named '{name}' found")]
    BaselineSceneMissing { name: String },

    #[error("Group command rejected with status {status}")]
    GroupCommand { status: axum::http::StatusCode },

    #[error("Scene recall rejected with status {status}")]
    SceneRecall { status: axum::http::StatusCode },

    #[error("Lighting payload is malformed")]
    Malformed,

    #[error("Lighting request failed: {0}")]
    Network(#[from] reqwest::Error),
}
