use common::domain::{
    DomainResult, FindMostRecentInput, FindRecentInput, ReadingRepository, ReadingStatus,
    StoredReading, Thresholds, classify,
};
use garde::Validate;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Ceiling on readings returned by a single history query.
pub const MAX_HISTORY_LIMIT: usize = 500;

/// A stored reading together with its classification at query time.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceState {
    pub reading: StoredReading,
    pub status: ReadingStatus,
}

/// Input for the latest-state lookup
#[derive(Debug, Clone, Default, Validate)]
pub struct LatestStateInput {
    /// Restrict the lookup to one device. `None` spans the whole store.
    #[garde(inner(length(min = 1)))]
    pub device_id: Option<String>,
}

/// Input for the recent-readings listing
#[derive(Debug, Clone, Default, Validate)]
pub struct RecentReadingsInput {
    #[garde(inner(length(min = 1)))]
    pub device_id: Option<String>,
    /// `None` falls back to the service's default history limit.
    #[garde(skip)]
    pub limit: Option<usize>,
}

/// Domain service answering "where is everyone right now" queries.
/// Every call queries the store fresh; nothing is cached, so polling
/// monitors always see the latest committed reading.
///
/// Flow (latest):
/// 1. Validate input fields
/// 2. Query the store for the most recent reading
/// 3. Classify it under the configured thresholds
pub struct DeviceStateService {
    reading_repository: Arc<dyn ReadingRepository>,
    thresholds: Thresholds,
    default_history_limit: usize,
}

impl DeviceStateService {
    pub fn new(
        reading_repository: Arc<dyn ReadingRepository>,
        thresholds: Thresholds,
        default_history_limit: usize,
    ) -> Self {
        Self {
            reading_repository,
            thresholds,
            default_history_limit,
        }
    }

    /// Latest classified reading, or `None` when nothing has been ingested
    /// yet for the requested scope.
    #[instrument(skip(self), fields(device_id = ?input.device_id))]
    pub async fn latest(&self, input: LatestStateInput) -> DomainResult<Option<DeviceState>> {
        common::garde::validate_struct(&input)?;

        let reading = self
            .reading_repository
            .find_most_recent(FindMostRecentInput {
                device_id: input.device_id,
            })
            .await?;

        Ok(reading.map(|r| self.to_state(r)))
    }

    /// Latest classified reading for every device that has reported.
    #[instrument(skip(self))]
    pub async fn latest_per_device(&self) -> DomainResult<Vec<DeviceState>> {
        let readings = self.reading_repository.find_most_recent_per_device().await?;

        debug!(devices = readings.len(), "resolved latest state per device");

        Ok(readings.into_iter().map(|r| self.to_state(r)).collect())
    }

    /// Recent classified readings, newest first. The limit falls back to the
    /// service default and is capped at MAX_HISTORY_LIMIT.
    #[instrument(skip(self), fields(device_id = ?input.device_id))]
    pub async fn recent(&self, input: RecentReadingsInput) -> DomainResult<Vec<DeviceState>> {
        common::garde::validate_struct(&input)?;

        let limit = input
            .limit
            .unwrap_or(self.default_history_limit)
            .min(MAX_HISTORY_LIMIT);
        let readings = self
            .reading_repository
            .find_recent(FindRecentInput {
                device_id: input.device_id,
                limit,
            })
            .await?;

        Ok(readings.into_iter().map(|r| self.to_state(r)).collect())
    }

    fn to_state(&self, reading: StoredReading) -> DeviceState {
        let status = classify(&reading, &self.thresholds);
        DeviceState { reading, status }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use common::domain::{DomainError, MockReadingRepository, Reading};

    fn stored(device_id: &str, heart_rate: i32, sos: bool, sequence: u64) -> StoredReading {
        StoredReading::stamp(
            Reading {
                device_id: device_id.to_string(),
                display_name: format!("Device {device_id}"),
                heart_rate,
                oxygen_saturation: Some(97),
                lat: 46.5,
                lng: 11.3,
                sos,
                captured_at: Some(Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap()),
            },
            sequence,
        )
    }

    fn service(mock_repo: MockReadingRepository) -> DeviceStateService {
        DeviceStateService::new(Arc::new(mock_repo), Thresholds::default(), 50)
    }

    #[tokio::test]
    async fn test_latest_classifies_reading() {
        let mut mock_repo = MockReadingRepository::new();
        mock_repo
            .expect_find_most_recent()
            .withf(|input: &FindMostRecentInput| input.device_id.as_deref() == Some("d1"))
            .times(1)
            .return_once(|_| Ok(Some(stored("d1", 130, false, 0))));

        let state = service(mock_repo)
            .latest(LatestStateInput {
                device_id: Some("d1".to_string()),
            })
            .await
            .unwrap()
            .unwrap();

        assert_eq!(state.status, ReadingStatus::Risk);
        assert_eq!(state.reading.heart_rate, 130);
    }

    #[tokio::test]
    async fn test_latest_empty_store_is_none() {
        let mut mock_repo = MockReadingRepository::new();
        mock_repo
            .expect_find_most_recent()
            .times(1)
            .return_once(|_| Ok(None));

        let state = service(mock_repo)
            .latest(LatestStateInput::default())
            .await
            .unwrap();

        assert!(state.is_none());
    }

    #[tokio::test]
    async fn test_latest_rejects_empty_device_id() {
        let mock_repo = MockReadingRepository::new();

        let result = service(mock_repo)
            .latest(LatestStateInput {
                device_id: Some("".to_string()),
            })
            .await;

        assert!(matches!(result, Err(DomainError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_latest_per_device_classifies_each_state() {
        let mut mock_repo = MockReadingRepository::new();
        mock_repo
            .expect_find_most_recent_per_device()
            .times(1)
            .return_once(|| {
                Ok(vec![
                    stored("d1", 72, false, 0),
                    stored("d2", 72, true, 1),
                    stored("d3", 45, false, 2),
                ])
            });

        let states = service(mock_repo).latest_per_device().await.unwrap();

        assert_eq!(states.len(), 3);
        assert_eq!(states[0].status, ReadingStatus::Safe);
        assert_eq!(states[1].status, ReadingStatus::Sos);
        assert_eq!(states[2].status, ReadingStatus::Risk);
    }

    #[tokio::test]
    async fn test_recent_applies_default_limit() {
        let mut mock_repo = MockReadingRepository::new();
        mock_repo
            .expect_find_recent()
            .withf(|input: &FindRecentInput| input.limit == 50)
            .times(1)
            .return_once(|_| Ok(vec![]));

        let states = service(mock_repo)
            .recent(RecentReadingsInput::default())
            .await
            .unwrap();

        assert!(states.is_empty());
    }

    #[tokio::test]
    async fn test_recent_caps_requested_limit() {
        let mut mock_repo = MockReadingRepository::new();
        mock_repo
            .expect_find_recent()
            .withf(|input: &FindRecentInput| input.limit == MAX_HISTORY_LIMIT)
            .times(1)
            .return_once(|_| Ok(vec![]));

        service(mock_repo)
            .recent(RecentReadingsInput {
                device_id: None,
                limit: Some(10_000),
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_store_error_propagates() {
        let mut mock_repo = MockReadingRepository::new();
        mock_repo
            .expect_find_most_recent_per_device()
            .times(1)
            .return_once(|| Err(DomainError::StorageError(anyhow::anyhow!("read failed"))));

        let result = service(mock_repo).latest_per_device().await;

        assert!(matches!(result, Err(DomainError::StorageError(_))));
    }
}
