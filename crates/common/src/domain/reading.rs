use chrono::{DateTime, Utc};

/// A telemetry sample reported by a wearable device, before storage.
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    pub device_id: String,
    pub display_name: String,
    pub heart_rate: i32,
    pub oxygen_saturation: Option<i32>,
    pub lat: f64,
    pub lng: f64,
    pub sos: bool,
    /// Capture time reported by the device. `None` means the device did not
    /// report one and the store stamps its own receive time instead.
    pub captured_at: Option<DateTime<Utc>>,
}

/// A reading accepted into the store, carrying identity and ordering metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredReading {
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
    /// Position in the append order. Breaks ties between readings that share
    /// the same `captured_at`.
    pub sequence: u64,
}

impl StoredReading {
    /// Stamps a reading with an ID, timestamps, and its append position.
    pub fn stamp(reading: Reading, sequence: u64) -> Self {
        let stored_at = Utc::now();
        Self {
            reading_id: xid::new().to_string(),
            device_id: reading.device_id,
            display_name: reading.display_name,
            heart_rate: reading.heart_rate,
            oxygen_saturation: reading.oxygen_saturation,
            lat: reading.lat,
            lng: reading.lng,
            sos: reading.sos,
            captured_at: reading.captured_at.unwrap_or(stored_at),
            stored_at,
            sequence,
        }
    }
}

/// Alert classification of a single reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadingStatus {
    Safe,
    Risk,
    Sos,
}

impl ReadingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReadingStatus::Safe => "safe",
            ReadingStatus::Risk => "risk",
            ReadingStatus::Sos => "sos",
        }
    }
}

/// Vital-sign bounds used by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    /// Heart rates strictly below this are risky.
    pub low_bpm: i32,
    /// Heart rates strictly above this are risky.
    pub high_bpm: i32,
    /// Oxygen saturation strictly below this is risky.
    pub min_spo2: i32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            low_bpm: 60,
            high_bpm: 100,
            min_spo2: 92,
        }
    }
}

/// Classifies a reading. An SOS flag wins over vital signs, vital signs
/// outside the configured bounds mean risk, everything else is safe.
/// Readings without an oxygen saturation are judged on heart rate alone.
pub fn classify(reading: &StoredReading, thresholds: &Thresholds) -> ReadingStatus {
    if reading.sos {
        return ReadingStatus::Sos;
    }
    if reading.heart_rate < thresholds.low_bpm || reading.heart_rate > thresholds.high_bpm {
        return ReadingStatus::Risk;
    }
    if let Some(spo2) = reading.oxygen_saturation {
        if spo2 < thresholds.min_spo2 {
            return ReadingStatus::Risk;
        }
    }
    ReadingStatus::Safe
}

/// Whether a reading should surface as an alert under the given thresholds.
/// Every caller that needs an alert decision goes through this predicate so
/// that classification and alert queries can never disagree.
pub fn is_alert(reading: &StoredReading, thresholds: &Thresholds) -> bool {
    classify(reading, thresholds) != ReadingStatus::Safe
}
