use std::collections::HashMap;

use crate::domain::{StoredReading, Thresholds, is_alert};

/// Append-ordered collection of stored readings with the query helpers that
/// every store backend shares. Recency is decided by `captured_at`, with the
/// append sequence breaking ties.
#[derive(Debug, Default)]
pub struct ReadingLog {
    readings: Vec<StoredReading>,
}

impl ReadingLog {
    pub fn new() -> Self {
        Self {
            readings: Vec::new(),
        }
    }

    /// Appends a stamped reading. Readings are expected to arrive in sequence
    /// order; queries sort by capture time regardless.
    pub fn push(&mut self, reading: StoredReading) {
        self.readings.push(reading);
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// The sequence the next appended reading should carry.
    pub fn next_sequence(&self) -> u64 {
        self.readings.last().map(|r| r.sequence + 1).unwrap_or(0)
    }

    /// The most recent reading, optionally restricted to one device.
    pub fn most_recent(&self, device_id: Option<&str>) -> Option<StoredReading> {
        self.readings
            .iter()
            .filter(|r| device_id.is_none_or(|id| r.device_id == id))
            .max_by_key(|r| (r.captured_at, r.sequence))
            .cloned()
    }

    /// Up to `limit` readings, newest first, optionally restricted to one
    /// device.
    pub fn recent(&self, device_id: Option<&str>, limit: usize) -> Vec<StoredReading> {
        let mut matches: Vec<StoredReading> = self
            .readings
            .iter()
            .filter(|r| device_id.is_none_or(|id| r.device_id == id))
            .cloned()
            .collect();
        matches.sort_by_key(|r| std::cmp::Reverse((r.captured_at, r.sequence)));
        matches.truncate(limit);
        matches
    }

    /// The most recent reading for every device that has reported at least
    /// once, sorted by device ID for stable output.
    pub fn most_recent_per_device(&self) -> Vec<StoredReading> {
        let mut latest: HashMap<&str, &StoredReading> = HashMap::new();
        for reading in &self.readings {
            match latest.get(reading.device_id.as_str()) {
                Some(current)
                    if (current.captured_at, current.sequence)
                        >= (reading.captured_at, reading.sequence) => {}
                _ => {
                    latest.insert(reading.device_id.as_str(), reading);
                }
            }
        }

        let mut states: Vec<StoredReading> = latest.into_values().cloned().collect();
        states.sort_by(|a, b| a.device_id.cmp(&b.device_id));
        states
    }

    /// Readings for one device that raise an alert under the given
    /// thresholds, newest first, optionally capped at `limit`.
    pub fn matching(
        &self,
        device_id: &str,
        thresholds: &Thresholds,
        limit: Option<usize>,
    ) -> Vec<StoredReading> {
        let mut matches: Vec<StoredReading> = self
            .readings
            .iter()
            .filter(|r| r.device_id == device_id && is_alert(r, thresholds))
            .cloned()
            .collect();
        matches.sort_by_key(|r| std::cmp::Reverse((r.captured_at, r.sequence)));
        if let Some(limit) = limit {
            matches.truncate(limit);
        }
        matches
    }
}
