use std::sync::Arc;

use axum::Router;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use aerolume::handles::{CallbackState, callback_router};
use aerolume::services::TokenService;
use aerolume::services::token_service::{ClientAuth, OAuthProvider};

pub struct MockApp {
    pub router: Router,
    pub netatmo_vendor: MockServer,
    pub hue_vendor: MockServer,
    pub netatmo_token: Arc<TokenService>,
    pub hue_token: Arc<TokenService>,
}

impl MockApp {
    pub async fn new() -> Self {
        let netatmo_vendor = MockServer::start().await;
        let hue_vendor = MockServer::start().await;

        let netatmo_token = Arc::new(TokenService::new(OAuthProvider {
            vendor: "netatmo",
            authorize_url: format!("{}/oauth2/authorize", netatmo_vendor.uri()),
            token_url: format!("{}/oauth2/token", netatmo_vendor.uri()),
            client_id: "netatmo-client".to_string(),
            client_secret: "netatmo-secret".to_string(),
            redirect_uri: "http://localhost:3005/netatmo_callback".to_string(),
            scope: Some("read_homecoach".to_string()),
            client_auth: ClientAuth::FormCredentials,
        }));
        let hue_token = Arc::new(TokenService::new(OAuthProvider {
            vendor: "hue",
            authorize_url: format!("{}/v2/oauth2/authorize", hue_vendor.uri()),
            token_url: format!("{}/v2/oauth2/token", hue_vendor.uri()),
            client_id: "hue-client".to_string(),
            client_secret: "hue-secret".to_string(),
            redirect_uri: "http://localhost:3005/hue_callback".to_string(),
            scope: None,
            client_auth: ClientAuth::BasicHeader,
        }));

        let router = callback_router(CallbackState {
            netatmo_token: netatmo_token.clone(),
            hue_token: hue_token.clone(),
        });

        Self {
            router,
            netatmo_vendor,
            hue_vendor,
            netatmo_token,
            hue_token,
        }
    }

    pub async fn mount_token_success(server: &MockServer, token_path: &str) {
        Mock::given(method("POST"))
            .and(path(token_path))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "access-1",
                "refresh_token": "refresh-1",
                "expires_in": 600,
            })))
            .mount(server)
            .await;
    }

    pub async fn mount_token_rejection(server: &MockServer, token_path: &str) {
        Mock::given(method("POST"))
            .and(path(token_path))
            .respond_with(ResponseTemplate::new(400))
            .mount(server)
            .await;
    }

    /// Issue an authorize URL and pull the anti-forgery state out of it, the
    /// way a vendor redirect would echo it back.
    pub async fn pending_state(token: &TokenService) -> String {
        let url = token.authorize_url().await;
        url.split("state=")
            .nth(1)
            .unwrap()
            .split('&')
            .next()
            .unwrap()
            .to_string()
    }
}
