use chrono::{DateTime, Utc};
use common::domain::StoredReading;
use serde::{Deserialize, Serialize};

use crate::domain::{DeviceState, IngestReadingInput, ThresholdOverrides};

/// Body for POST /data and POST /sos. The SOS route ignores the `sos` field
/// and forces the flag on server side.
#[derive(Debug, Clone, Deserialize)]
pub struct IngestReadingRequest {
    pub device_id: String,
    pub display_name: String,
    pub heart_rate: i32,
    #[serde(default)]
    pub oxygen_saturation: Option<i32>,
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub sos: bool,
    #[serde(default)]
    pub captured_at: Option<DateTime<Utc>>,
}

impl From<IngestReadingRequest> for IngestReadingInput {
    fn from(request: IngestReadingRequest) -> Self {
        IngestReadingInput {
            device_id: request.device_id,
            display_name: request.display_name,
            heart_rate: request.heart_rate,
            oxygen_saturation: request.oxygen_saturation,
            lat: request.lat,
            lng: request.lng,
            sos: request.sos,
            captured_at: request.captured_at,
        }
    }
}

/// Query parameters for GET /latest
#[derive(Debug, Default, Deserialize)]
pub struct LatestQuery {
    pub device_id: Option<String>,
}

/// Query parameters for GET /readings/recent
#[derive(Debug, Default, Deserialize)]
pub struct RecentQuery {
    pub device_id: Option<String>,
    pub limit: Option<usize>,
}

/// Query parameters for GET /alerts/{device_id}
#[derive(Debug, Default, Deserialize)]
pub struct AlertsQuery {
    pub low_bpm: Option<i32>,
    pub high_bpm: Option<i32>,
    pub min_spo2: Option<i32>,
    pub limit: Option<usize>,
}

impl AlertsQuery {
    pub fn overrides(&self) -> ThresholdOverrides {
        ThresholdOverrides {
            low_bpm: self.low_bpm,
            high_bpm: self.high_bpm,
            min_spo2: self.min_spo2,
        }
    }
}

/// A stored reading as rendered to clients.
#[derive(Debug, Serialize)]
pub struct ReadingResponse {
    pub reading_id: String,
    pub device_id: String,
    pub display_name: String,
    pub heart_rate: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oxygen_saturation: Option<i32>,
    pub lat: f64,
    pub lng: f64,
    pub sos: bool,
    pub captured_at: DateTime<Utc>,
    pub stored_at: DateTime<Utc>,
}

impl From<StoredReading> for ReadingResponse {
    fn from(reading: StoredReading) -> Self {
        ReadingResponse {
            reading_id: reading.reading_id,
            device_id: reading.device_id,
            display_name: reading.display_name,
            heart_rate: reading.heart_rate,
            oxygen_saturation: reading.oxygen_saturation,
            lat: reading.lat,
            lng: reading.lng,
            sos: reading.sos,
            captured_at: reading.captured_at,
            stored_at: reading.stored_at,
        }
    }
}

/// A reading with its classification.
#[derive(Debug, Serialize)]
pub struct DeviceStateResponse {
    pub reading: ReadingResponse,
    pub status: String,
}

impl From<DeviceState> for DeviceStateResponse {
    fn from(state: DeviceState) -> Self {
        DeviceStateResponse {
            status: state.status.as_str().to_string(),
            reading: state.reading.into(),
        }
    }
}

/// Response for GET /latest. `state` is null when nothing has been ingested.
#[derive(Debug, Serialize)]
pub struct LatestStateResponse {
    pub state: Option<DeviceStateResponse>,
}

/// Response for GET /rescuer/latest-all
#[derive(Debug, Serialize)]
pub struct DeviceStatesResponse {
    pub devices: Vec<DeviceStateResponse>,
    pub total: usize,
}

/// Response for GET /alerts/{device_id}
#[derive(Debug, Serialize)]
pub struct AlertsResponse {
    pub device_id: String,
    pub alerts: Vec<DeviceStateResponse>,
    pub total: usize,
}

/// Response for GET /readings/recent
#[derive(Debug, Serialize)]
pub struct RecentReadingsResponse {
    pub readings: Vec<DeviceStateResponse>,
    pub total: usize,
}

/// Response for GET /health
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}
