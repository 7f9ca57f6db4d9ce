pub mod lighting;
pub mod oauth;
pub mod sensor;

pub use lighting::LightingError;
pub use oauth::OAuthError;
pub use sensor::SensorError;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use uuid::Uuid;

/// Errors a request handler can surface over HTTP.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Authorization error: {0}")]
    OAuthError(#[from] OAuthError),

    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message, error_id) = match self {
            ApiError::OAuthError(e) => (e.status_code(), e.to_string(), None),
            ApiError::InternalError(e) => {
                let error_id = Uuid::new_v4();
                tracing::error!(error_id = ?error_id, "Internal error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    Some(error_id.to_string()),
                )
            }
        };

        let mut error_obj = json!({
            "code": status.as_u16(),
            "message": error_message
        });

        if let Some(error_id) = error_id {
            error_obj["error_id"] = json!(error_id);
        }

        let body = Json(json!({
            "error": error_obj
        }));

        (status, body).into_response()
    }
}
