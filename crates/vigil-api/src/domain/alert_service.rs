use common::domain::{
    DomainResult, FindMatchingInput, ReadingRepository, Thresholds, classify,
};
use garde::Validate;
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::domain::DeviceState;

/// Per-query threshold overrides. Unset fields keep the server defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ThresholdOverrides {
    pub low_bpm: Option<i32>,
    pub high_bpm: Option<i32>,
    pub min_spo2: Option<i32>,
}

impl ThresholdOverrides {
    pub fn apply(&self, base: Thresholds) -> Thresholds {
        Thresholds {
            low_bpm: self.low_bpm.unwrap_or(base.low_bpm),
            high_bpm: self.high_bpm.unwrap_or(base.high_bpm),
            min_spo2: self.min_spo2.unwrap_or(base.min_spo2),
        }
    }
}

/// Input for listing a device's alert readings
#[derive(Debug, Clone, Validate)]
pub struct AlertsQueryInput {
    #[garde(length(min = 1))]
    pub device_id: String,
    #[garde(skip)]
    pub overrides: ThresholdOverrides,
    #[garde(skip)]
    pub limit: Option<usize>,
}

/// Domain service listing the readings that raised alerts
///
/// The store filters with the same predicate the classifier uses, so a
/// reading reported here is exactly one a latest-state query would flag.
/// Alert history is returned in full; repeated alerts from one incident are
/// not collapsed.
///
/// Flow:
/// 1. Validate input fields
/// 2. Resolve effective thresholds from server defaults and overrides
/// 3. Query the store for matching readings
/// 4. Classify each reading for the response
pub struct AlertQueryService {
    reading_repository: Arc<dyn ReadingRepository>,
    thresholds: Thresholds,
}

impl AlertQueryService {
    pub fn new(reading_repository: Arc<dyn ReadingRepository>, thresholds: Thresholds) -> Self {
        Self {
            reading_repository,
            thresholds,
        }
    }

    /// Alert readings for one device, newest first.
    #[instrument(skip(self), fields(device_id = %input.device_id))]
    pub async fn alerts_for(&self, input: AlertsQueryInput) -> DomainResult<Vec<DeviceState>> {
        common::garde::validate_struct(&input)?;

        let thresholds = input.overrides.apply(self.thresholds);
        let readings = self
            .reading_repository
            .find_matching(FindMatchingInput {
                device_id: input.device_id,
                thresholds,
                limit: input.limit,
            })
            .await?;

        debug!(alerts = readings.len(), "listed alert readings");

        Ok(readings
            .into_iter()
            .map(|reading| {
                let status = classify(&reading, &thresholds);
                DeviceState { reading, status }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use common::domain::{
        DomainError, InMemoryReadingStore, MockReadingRepository, Reading, ReadingStatus,
        StoredReading, is_alert,
    };

    fn reading(device_id: &str, heart_rate: i32, sos: bool, minute: u32) -> Reading {
        Reading {
            device_id: device_id.to_string(),
            display_name: format!("Device {device_id}"),
            heart_rate,
            oxygen_saturation: Some(97),
            lat: 46.5,
            lng: 11.3,
            sos,
            captured_at: Some(Utc.with_ymd_and_hms(2026, 3, 1, 8, minute, 0).unwrap()),
        }
    }

    #[tokio::test]
    async fn test_alerts_for_passes_effective_thresholds_to_store() {
        let mut mock_repo = MockReadingRepository::new();
        mock_repo
            .expect_find_matching()
            .withf(|input: &FindMatchingInput| {
                input.device_id == "d1"
                    && input.thresholds.low_bpm == 50
                    && input.thresholds.high_bpm == 100
                    && input.thresholds.min_spo2 == 92
            })
            .times(1)
            .return_once(|_| Ok(vec![]));

        let service = AlertQueryService::new(Arc::new(mock_repo), Thresholds::default());

        service
            .alerts_for(AlertsQueryInput {
                device_id: "d1".to_string(),
                overrides: ThresholdOverrides {
                    low_bpm: Some(50),
                    high_bpm: None,
                    min_spo2: None,
                },
                limit: None,
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_alerts_for_classifies_each_alert() {
        let mut mock_repo = MockReadingRepository::new();
        mock_repo.expect_find_matching().times(1).return_once(|_| {
            Ok(vec![
                StoredReading::stamp(reading("d1", 72, true, 10), 0),
                StoredReading::stamp(reading("d1", 130, false, 5), 1),
            ])
        });

        let service = AlertQueryService::new(Arc::new(mock_repo), Thresholds::default());

        let alerts = service
            .alerts_for(AlertsQueryInput {
                device_id: "d1".to_string(),
                overrides: ThresholdOverrides::default(),
                limit: None,
            })
            .await
            .unwrap();

        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0].status, ReadingStatus::Sos);
        assert_eq!(alerts[1].status, ReadingStatus::Risk);
    }

    #[tokio::test]
    async fn test_alerts_for_rejects_empty_device_id() {
        let mock_repo = MockReadingRepository::new();
        let service = AlertQueryService::new(Arc::new(mock_repo), Thresholds::default());

        let result = service
            .alerts_for(AlertsQueryInput {
                device_id: "".to_string(),
                overrides: ThresholdOverrides::default(),
                limit: None,
            })
            .await;

        assert!(matches!(result, Err(DomainError::ValidationError(_))));
    }

    /// Alert queries and classification share one predicate. Run both against
    /// a real store and check they never disagree.
    #[tokio::test]
    async fn test_alerts_agree_with_classifier_over_real_store() {
        let store = Arc::new(InMemoryReadingStore::new());
        let samples = vec![
            reading("d1", 72, false, 1),
            reading("d1", 59, false, 2),
            reading("d1", 101, false, 3),
            reading("d1", 60, false, 4),
            reading("d1", 100, false, 5),
            reading("d1", 85, true, 6),
        ];
        let mut expected_alerts = 0;
        for sample in samples {
            let stored = store.append(sample).await.unwrap();
            if is_alert(&stored, &Thresholds::default()) {
                expected_alerts += 1;
            }
        }

        let service = AlertQueryService::new(store, Thresholds::default());
        let alerts = service
            .alerts_for(AlertsQueryInput {
                device_id: "d1".to_string(),
                overrides: ThresholdOverrides::default(),
                limit: None,
            })
            .await
            .unwrap();

        assert_eq!(alerts.len(), expected_alerts);
        assert!(alerts.iter().all(|a| a.status != ReadingStatus::Safe));
    }

    #[tokio::test]
    async fn test_overrides_change_which_readings_alert() {
        let store = Arc::new(InMemoryReadingStore::new());
        store.append(reading("d1", 110, false, 1)).await.unwrap();

        let service = AlertQueryService::new(
            Arc::clone(&store) as Arc<dyn ReadingRepository>,
            Thresholds::default(),
        );

        let defaults = service
            .alerts_for(AlertsQueryInput {
                device_id: "d1".to_string(),
                overrides: ThresholdOverrides::default(),
                limit: None,
            })
            .await
            .unwrap();
        assert_eq!(defaults.len(), 1);

        let relaxed = service
            .alerts_for(AlertsQueryInput {
                device_id: "d1".to_string(),
                overrides: ThresholdOverrides {
                    low_bpm: None,
                    high_bpm: Some(120),
                    min_spo2: None,
                },
                limit: None,
            })
            .await
            .unwrap();
        assert!(relaxed.is_empty());
    }
}
