mod alert_service;
mod device_state_service;
mod ingestion_service;

pub use alert_service::*;
pub use device_state_service::*;
pub use ingestion_service::*;
