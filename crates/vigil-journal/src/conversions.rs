use common::domain::StoredReading;

use crate::models::ReadingRecord;

/// Convert a stored reading to its journal row
impl From<&StoredReading> for ReadingRecord {
    fn from(reading: &StoredReading) -> Self {
        ReadingRecord {
            reading_id: reading.reading_id.clone(),
            device_id: reading.device_id.clone(),
            display_name: reading.display_name.clone(),
            heart_rate: reading.heart_rate,
            oxygen_saturation: reading.oxygen_saturation,
            lat: reading.lat,
            lng: reading.lng,
            sos: reading.sos,
            captured_at: reading.captured_at,
            stored_at: reading.stored_at,
            sequence: reading.sequence,
        }
    }
}

/// Convert a replayed journal row back to a stored reading
impl From<ReadingRecord> for StoredReading {
    fn from(record: ReadingRecord) -> Self {
        StoredReading {
            reading_id: record.reading_id,
            device_id: record.device_id,
            display_name: record.display_name,
            heart_rate: record.heart_rate,
            oxygen_saturation: record.oxygen_saturation,
            lat: record.lat,
            lng: record.lng,
            sos: record.sos,
            captured_at: record.captured_at,
            stored_at: record.stored_at,
            sequence: record.sequence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_round_trip_preserves_ordering_metadata() {
        let stored = StoredReading {
            reading_id: "r-1".to_string(),
            device_id: "d1".to_string(),
            display_name: "Trail Runner".to_string(),
            heart_rate: 72,
            oxygen_saturation: Some(97),
            lat: 46.5,
            lng: 11.3,
            sos: false,
            captured_at: Utc::now(),
            stored_at: Utc::now(),
            sequence: 42,
        };

        let record: ReadingRecord = (&stored).into();
        let restored: StoredReading = record.into();

        assert_eq!(restored, stored);
    }

    #[test]
    fn test_record_serializes_missing_oxygen_saturation_as_null() {
        let stored = StoredReading {
            reading_id: "r-1".to_string(),
            device_id: "d1".to_string(),
            display_name: "Trail Runner".to_string(),
            heart_rate: 72,
            oxygen_saturation: None,
            lat: 46.5,
            lng: 11.3,
            sos: false,
            captured_at: Utc::now(),
            stored_at: Utc::now(),
            sequence: 0,
        };

        let record: ReadingRecord = (&stored).into();
        let line = serde_json::to_string(&record).unwrap();

        assert!(line.contains("\"oxygen_saturation\":null"));
    }
}
