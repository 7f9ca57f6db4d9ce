use serde::Deserialize;

/// Envelope of `/api/gethomecoachsdata`. `body` is only present when
/// `status` is `"ok"`.
#[derive(Debug, Clone, Deserialize)]
pub struct HomeCoachResponse {
    pub status: String,
    pub body: Option<HomeCoachBody>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HomeCoachBody {
    pub devices: Vec<HomeCoachDevice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HomeCoachDevice {
    /// Device MAC address.
    #[serde(rename = "_id")]
    pub id: String,
    pub station_name: Option<String>,
    pub reachable: Option<bool>,
    /// Latest measurements; absent while the device is unreachable.
    pub dashboard_data: Option<DashboardData>,
}

/// Latest measurement set of one Home Coach.
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardData {
    pub time_utc: i64,
    #[serde(rename = "Temperature")]
    pub temperature: f64,
    #[serde(rename = "CO2")]
    pub co2: f64,
    #[serde(rename = "Humidity")]
    pub humidity: f64,
    #[serde(rename = "Noise")]
    pub noise: f64,
    #[serde(rename = "Pressure")]
    pub pressure: f64,
}
