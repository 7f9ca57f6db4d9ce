use std::sync::Arc;

use time::OffsetDateTime;
use tokio::sync::Mutex;

use crate::configs::Scheduler;
use crate::services::{AlertPolicy, LightingService, SensorService};

/// One sample-decide-act cycle: read the sensor, classify, and when the
/// policy fires, drive the lights. Cycles outside the active local-time
/// window do nothing at all.
pub struct AlertService {
    sensor: Arc<SensorService>,
    lighting: Arc<LightingService>,
    policy: Mutex<AlertPolicy>,
    active_start_hour: u8,
    active_end_hour: u8,
}

impl AlertService {
    pub fn new(
        sensor: Arc<SensorService>,
        lighting: Arc<LightingService>,
        settings: &Scheduler,
    ) -> Self {
        Self {
            sensor,
            lighting,
            policy: Mutex::new(AlertPolicy::new()),
            active_start_hour: settings.active_start_hour,
            active_end_hour: settings.active_end_hour,
        }
    }

    /// Runs strictly sequentially: the decision needs the fresh reading and
    /// the action needs the decision. A sensor failure skips the tick without
    /// touching any state.
    pub async fn run_sample_cycle(&self, now: OffsetDateTime) {
        let hour = now.hour();
        if hour < self.active_start_hour || hour >= self.active_end_hour {
            tracing::trace!("outside the active window, skipping sample");
            return;
        }

        let reading = match self.sensor.read_latest().await {
            Ok(reading) => reading,
            Err(e) => {
                tracing::error!("no data from sensor: {}", e);
                return;
            }
        };

        tracing::info!("CO2 level ppm: {}", reading.co2_ppm);

        let decision = self.policy.lock().await.decide(reading.co2_ppm, now);
        if let Some(level) = decision {
            self.lighting.run_alert_sequence(level).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use time::Duration;
    use time::macros::datetime;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::configs::{Hue, Netatmo};
    use crate::services::TokenService;
    use crate::services::token_service::{ClientAuth, OAuthProvider};

    use super::*;

    const GROUP_ACTION_PATH: &str = "/route/api/app-key/groups/1/action";
    const RECALL_PATH: &str = "/route/clip/v2/resource/smart_scene/scene-1";
    const SENSOR_PATH: &str = "/api/gethomecoachsdata";

    fn scheduler_settings() -> Scheduler {
        Scheduler {
            token_check_interval: 15,
            sample_interval: 60,
            active_start_hour: 7,
            active_end_hour: 22,
            utc_offset: 0,
        }
    }

    fn coach_body(co2: f64) -> serde_json::Value {
        serde_json::json!({
            "status": "ok",
            "body": {
                "devices": [{
                    "_id": "70:ee:50:00:00:01",
                    "dashboard_data": {
                        "time_utc": 1709294400,
                        "Temperature": 21.4,
                        "CO2": co2,
                        "Humidity": 42.0,
                        "Noise": 38.0,
                        "Pressure": 1013.2,
                    },
                }],
            },
        })
    }

    async fn authorized_token(server: &MockServer, vendor: &'static str) -> Arc<TokenService> {
        let token = Arc::new(TokenService::new(OAuthProvider {
            vendor,
            authorize_url: format!("{}/oauth2/authorize", server.uri()),
            token_url: format!("{}/oauth2/token", server.uri()),
            client_id: "client".to_string(),
            client_secret: "secret".to_string(),
            redirect_uri: format!("http://localhost:3005/{vendor}_callback"),
            scope: None,
            client_auth: ClientAuth::FormCredentials,
        }));
        token
            .exchange_code("abc", OffsetDateTime::now_utc())
            .await
            .unwrap();
        token
    }

    /// Full stack against one mock vendor backend: sensor, lighting and both
    /// token services all point at `server`.
    async fn alert_service(server: &MockServer) -> AlertService {
        Mock::given(method("POST"))
            .and(path("/oauth2/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "access",
                "refresh_token": "refresh",
                "expires_in": 600,
            })))
            .mount(server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/route/api/0/config"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(server)
            .await;
        Mock::given(method("POST"))
            .and(path("/route/api/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"success": {"username": "app-key"}}
            ])))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/route/clip/v2/resource/smart_scene"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "errors": [],
                "data": [{"id": "scene-1", "metadata": {"name": "Natural Light"}}],
            })))
            .mount(server)
            .await;
        Mock::given(method("PUT"))
            .and(path(GROUP_ACTION_PATH))
            .respond_with(ResponseTemplate::new(200))
            .mount(server)
            .await;
        Mock::given(method("PUT"))
            .and(path(RECALL_PATH))
            .respond_with(ResponseTemplate::new(200))
            .mount(server)
            .await;

        let sensor = Arc::new(SensorService::new(
            &Netatmo {
                api_url: server.uri(),
                client_id: "client".to_string(),
                client_secret: "secret".to_string(),
                scope: "read_homecoach".to_string(),
                device_id: "70:ee:50:00:00:01".to_string(),
            },
            authorized_token(server, "netatmo").await,
        ));
        let lighting = Arc::new(LightingService::new(
            &Hue {
                api_url: server.uri(),
                client_id: "client".to_string(),
                client_secret: "secret".to_string(),
                group_id: "1".to_string(),
                baseline_scene: "Natural Light".to_string(),
                device_type: "test bridge".to_string(),
            },
            authorized_token(server, "hue").await,
        ));

        AlertService::new(sensor, lighting, &scheduler_settings())
    }

    async fn requests_for(server: &MockServer, target: &str) -> usize {
        server
            .received_requests()
            .await
            .unwrap()
            .iter()
            .filter(|request| request.url.path() == target)
            .count()
    }

    #[tokio::test(start_paused = true)]
    async fn danger_alert_fires_once_then_debounces() {
        let server = MockServer::start().await;
        let service = alert_service(&server).await;
        // 1600 ppm at minutes 0 and 1, then 700 ppm at minute 7.
        Mock::given(method("GET"))
            .and(path(SENSOR_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(coach_body(1600.0)))
            .up_to_n_times(2)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(SENSOR_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(coach_body(700.0)))
            .mount(&server)
            .await;

        let t0 = datetime!(2024-03-01 12:00 UTC);

        service.run_sample_cycle(t0).await;
        assert_eq!(requests_for(&server, GROUP_ACTION_PATH).await, 1);
        assert_eq!(requests_for(&server, RECALL_PATH).await, 1);

        // Minute 1: still 1600 ppm, suppressed by the re-trigger interval.
        service.run_sample_cycle(t0 + Duration::minutes(1)).await;
        assert_eq!(requests_for(&server, GROUP_ACTION_PATH).await, 1);
        assert_eq!(requests_for(&server, RECALL_PATH).await, 1);

        // Minute 7: recovered, but past the clear-confirmation window.
        service.run_sample_cycle(t0 + Duration::minutes(7)).await;
        assert_eq!(requests_for(&server, GROUP_ACTION_PATH).await, 1);
        assert_eq!(requests_for(&server, RECALL_PATH).await, 1);
        assert_eq!(requests_for(&server, SENSOR_PATH).await, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn recovery_inside_the_window_confirms_green() {
        let server = MockServer::start().await;
        let service = alert_service(&server).await;
        Mock::given(method("GET"))
            .and(path(SENSOR_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(coach_body(1600.0)))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(SENSOR_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(coach_body(700.0)))
            .mount(&server)
            .await;

        let t0 = datetime!(2024-03-01 12:00 UTC);

        service.run_sample_cycle(t0).await;
        service.run_sample_cycle(t0 + Duration::minutes(4)).await;

        // Red sequence plus the green confirmation.
        assert_eq!(requests_for(&server, GROUP_ACTION_PATH).await, 2);
        assert_eq!(requests_for(&server, RECALL_PATH).await, 2);
    }

    #[tokio::test]
    async fn outside_the_active_window_nothing_runs() {
        let server = MockServer::start().await;
        let service = alert_service(&server).await;
        let sensor_requests_before = requests_for(&server, SENSOR_PATH).await;

        service
            .run_sample_cycle(datetime!(2024-03-01 06:59 UTC))
            .await;
        service
            .run_sample_cycle(datetime!(2024-03-01 22:00 UTC))
            .await;

        assert_eq!(
            requests_for(&server, SENSOR_PATH).await,
            sensor_requests_before
        );
    }

    #[tokio::test]
    async fn window_edges_are_inclusive_start_exclusive_end() {
        let server = MockServer::start().await;
        let service = alert_service(&server).await;
        Mock::given(method("GET"))
            .and(path(SENSOR_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(coach_body(500.0)))
            .mount(&server)
            .await;

        service
            .run_sample_cycle(datetime!(2024-03-01 07:00 UTC))
            .await;
        service
            .run_sample_cycle(datetime!(2024-03-01 21:59 UTC))
            .await;

        assert_eq!(requests_for(&server, SENSOR_PATH).await, 2);
    }

    #[tokio::test]
    async fn sensor_failure_skips_the_tick_without_state_changes() {
        let server = MockServer::start().await;
        let service = alert_service(&server).await;
        Mock::given(method("GET"))
            .and(path(SENSOR_PATH))
            .respond_with(ResponseTemplate::new(500))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(SENSOR_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(coach_body(1600.0)))
            .mount(&server)
            .await;

        let t0 = datetime!(2024-03-01 12:00 UTC);

        // Failed tick: no lighting calls, no debounce state.
        service.run_sample_cycle(t0).await;
        assert_eq!(requests_for(&server, GROUP_ACTION_PATH).await, 0);

        // Next tick alerts immediately; the failure left no alert timestamp.
        service.run_sample_cycle(t0 + Duration::minutes(1)).await;
        assert_eq!(requests_for(&server, GROUP_ACTION_PATH).await, 1);
    }
}
