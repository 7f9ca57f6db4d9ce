use std::sync::Arc;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::configs::Settings;
use crate::handles::{CallbackState, callback_router};
use crate::services::token_service::{ClientAuth, OAuthProvider};
use crate::services::{
    AlertService, LightingService, SchedulerService, SensorService, TokenService,
};

pub async fn create_app(settings: &Arc<Settings>) -> Router {
    let callback_base = format!(
        "http://{}:{}",
        settings.server.callback_host, settings.server.port
    );

    let netatmo_token = Arc::new(TokenService::new(OAuthProvider {
        vendor: "netatmo",
        authorize_url: format!("{}/oauth2/authorize", settings.netatmo.api_url),
        token_url: format!("{}/oauth2/token", settings.netatmo.api_url),
        client_id: settings.netatmo.client_id.clone(),
        client_secret: settings.netatmo.client_secret.clone(),
        redirect_uri: format!("{callback_base}/netatmo_callback"),
        scope: Some(settings.netatmo.scope.clone()),
        client_auth: ClientAuth::FormCredentials,
    }));
    let hue_token = Arc::new(TokenService::new(OAuthProvider {
        vendor: "hue",
        authorize_url: format!("{}/v2/oauth2/authorize", settings.hue.api_url),
        token_url: format!("{}/v2/oauth2/token", settings.hue.api_url),
        client_id: settings.hue.client_id.clone(),
        client_secret: settings.hue.client_secret.clone(),
        redirect_uri: format!("{callback_base}/hue_callback"),
        scope: None,
        client_auth: ClientAuth::BasicHeader,
    }));

    let sensor_service = Arc::new(SensorService::new(&settings.netatmo, netatmo_token.clone()));
    let lighting_service = Arc::new(LightingService::new(&settings.hue, hue_token.clone()));
    let alert_service = Arc::new(AlertService::new(
        sensor_service,
        lighting_service,
        &settings.scheduler,
    ));

    let scheduler = Arc::new(SchedulerService::new(
        netatmo_token.clone(),
        hue_token.clone(),
        alert_service,
        &settings.scheduler,
    ));
    scheduler.start();

    tracing::info!(
        "netatmo authorize url: {}",
        netatmo_token.authorize_url().await
    );
    tracing::info!("hue authorize url: {}", hue_token.authorize_url().await);

    callback_router(CallbackState {
        netatmo_token,
        hue_token,
    })
    .layer(TraceLayer::new_for_http())
    .layer(CorsLayer::permissive())
}
