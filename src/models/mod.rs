mod alert;
mod hue;
mod netatmo;
mod oauth;

pub use alert::{AlertLevel, SensorReading};
pub use hue::{
    BaselineScene, GroupAction, LinkButtonUpdate, Registration, ResourceError, ResourceList,
    SceneMetadata, SmartScene, SmartSceneRecall, SmartSceneRecallAction, WhitelistEntry,
    WhitelistSuccess,
};
pub use netatmo::{DashboardData, HomeCoachBody, HomeCoachDevice, HomeCoachResponse};
pub use oauth::TokenResponse;
