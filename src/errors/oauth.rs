use axum::http::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum OAuthError {
    #[error("Callback is missing the authorization code")]
    MissingCode,

    #[error("Callback state does not match the issued authorize URL")]
    StateMismatch,

    #[error("No credential stored, authorize first")]
    NotAuthorized,

    #[error("Vendor rejected the token request with status {status}")]
    Vendor { status: StatusCode },

    #[error("Token request failed: {0}")]
    Network(#[from] reqwest::Error),
}

impl OAuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            OAuthError::MissingCode => StatusCode::BAD_REQUEST,
            OAuthError::StateMismatch => StatusCode::BAD_REQUEST,
            OAuthError::NotAuthorized => StatusCode::UNAUTHORIZED,
            OAuthError::Vendor { .. } => StatusCode::BAD_GATEWAY,
            OAuthError::Network(_) => StatusCode::BAD_GATEWAY,
        }
    }
}
