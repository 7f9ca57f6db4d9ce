use std::sync::Arc;

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::errors::{ApiError, OAuthError};
use crate::services::TokenService;

#[derive(Clone)]
pub struct CallbackState {
    pub netatmo_token: Arc<TokenService>,
    pub hue_token: Arc<TokenService>,
}

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CallbackResponse {
    pub success: bool,
}

pub fn callback_router(state: CallbackState) -> Router {
    Router::new()
        .route("/netatmo_callback", get(netatmo_callback))
        .route("/hue_callback", get(hue_callback))
        .route("/ping", get(ping))
        .with_state(state)
}

pub async fn netatmo_callback(
    State(state): State<CallbackState>,
    Query(query): Query<CallbackQuery>,
) -> Result<Json<CallbackResponse>, ApiError> {
    complete_authorization(&state.netatmo_token, query).await
}

pub async fn hue_callback(
    State(state): State<CallbackState>,
    Query(query): Query<CallbackQuery>,
) -> Result<Json<CallbackResponse>, ApiError> {
    complete_authorization(&state.hue_token, query).await
}

pub async fn ping() -> &'static str {
    "pong"
}

async fn complete_authorization(
    token: &TokenService,
    query: CallbackQuery,
) -> Result<Json<CallbackResponse>, ApiError> {
    let code = query.code.ok_or(OAuthError::MissingCode)?;

    if !token.verify_state(query.state.as_deref()).await {
        return Err(OAuthError::StateMismatch.into());
    }

    // A vendor-side rejection is a valid outcome of the flow, reported in the
    // body rather than mapped to an error status.
    let success = token
        .exchange_code(&code, OffsetDateTime::now_utc())
        .await
        .is_ok();

    Ok(Json(CallbackResponse { success }))
}
