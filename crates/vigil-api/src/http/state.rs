use std::sync::Arc;

use crate::domain::{AlertQueryService, DeviceStateService, ReadingIngestionService};

/// Shared state handed to every HTTP handler.
#[derive(Clone)]
pub struct ApiState {
    pub ingestion: Arc<ReadingIngestionService>,
    pub device_state: Arc<DeviceStateService>,
    pub alerts: Arc<AlertQueryService>,
}

impl ApiState {
    pub fn new(
        ingestion: Arc<ReadingIngestionService>,
        device_state: Arc<DeviceStateService>,
        alerts: Arc<AlertQueryService>,
    ) -> Self {
        Self {
            ingestion,
            device_state,
            alerts,
        }
    }
}
