use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Journal row for a stored reading, persisted as one JSON line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadingRecord {
    pub reading_id: String,
    pub device_id: String,
    pub display_name: String,
    pub heart_rate: i32,
    pub oxygen_saturation: Option<i32>,
    pub lat: f64,
    pub lng: f64,
    pub sos: bool,
    pub captured_at: DateTime<Utc>,
    pub stored_at: DateTime<Utc>,
    pub sequence: u64,
}
