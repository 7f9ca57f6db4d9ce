pub mod alert_policy;
pub mod alert_service;
pub mod lighting_service;
pub mod scheduler_service;
pub mod sensor_service;
pub mod token_service;

pub use alert_policy::*;
pub use alert_service::*;
pub use lighting_service::*;
pub use scheduler_service::*;
pub use sensor_service::*;
pub use token_service::*;
