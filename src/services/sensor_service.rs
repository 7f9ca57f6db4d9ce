use std::sync::Arc;

use reqwest::Client;
use time::OffsetDateTime;

use crate::configs::Netatmo;
use crate::errors::SensorError;
use crate::models::{HomeCoachResponse, SensorReading};
use crate::services::TokenService;

/// Thin reader over the Home Coach data endpoint. Authentication comes from
/// the vendor-A token service; payloads are parsed into typed shapes at this
/// boundary.
pub struct SensorService {
    token: Arc<TokenService>,
    client: Client,
    api_url: String,
    device_id: String,
}

impl SensorService {
    pub fn new(settings: &Netatmo, token: Arc<TokenService>) -> Self {
        Self {
            token,
            client: Client::new(),
            api_url: settings.api_url.clone(),
            device_id: settings.device_id.clone(),
        }
    }

    /// Latest CO2 reading of the configured device.
    pub async fn read_latest(&self) -> Result<SensorReading, SensorError> {
        let bearer = self.token.bearer().await.ok_or(SensorError::NotAuthorized)?;

        let response = self
            .client
            .get(format!("{}/api/gethomecoachsdata", self.api_url))
            .query(&[("device_id", &self.device_id)])
            .bearer_auth(bearer)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SensorError::Vendor { status });
        }

        let data: HomeCoachResponse = response.json().await?;
        if data.status != "ok" {
            return Err(SensorError::NoData);
        }

        let dashboard = data
            .body
            .and_then(|body| body.devices.into_iter().next())
            .and_then(|device| device.dashboard_data)
            .ok_or(SensorError::NoData)?;

        let time = OffsetDateTime::from_unix_timestamp(dashboard.time_utc)
            .map_err(|_| SensorError::Malformed)?;

        Ok(SensorReading {
            co2_ppm: dashboard.co2,
            time,
        })
    }
}
