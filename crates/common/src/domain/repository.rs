use async_trait::async_trait;

use crate::domain::result::DomainResult;
use crate::domain::{Reading, StoredReading, Thresholds};

/// Input for looking up the single most recent reading.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindMostRecentInput {
    /// Restrict the lookup to one device. `None` spans the whole store.
    pub device_id: Option<String>,
}

/// Input for listing recent readings, newest first.
#[derive(Debug, Clone, PartialEq)]
pub struct FindRecentInput {
    pub device_id: Option<String>,
    pub limit: usize,
}

/// Input for listing a device's alert-raising readings.
#[derive(Debug, Clone, PartialEq)]
pub struct FindMatchingInput {
    pub device_id: String,
    pub thresholds: Thresholds,
    pub limit: Option<usize>,
}

/// Repository trait for reading storage operations.
/// Infrastructure layer (e.g., vigil-journal) implements this trait.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ReadingRepository: Send + Sync {
    /// Append a reading to the store and return it in stamped form.
    async fn append(&self, reading: Reading) -> DomainResult<StoredReading>;

    /// Get the most recent reading, or `None` when nothing matches.
    async fn find_most_recent(
        &self,
        input: FindMostRecentInput,
    ) -> DomainResult<Option<StoredReading>>;

    /// List recent readings, newest first.
    async fn find_recent(&self, input: FindRecentInput) -> DomainResult<Vec<StoredReading>>;

    /// Get the most recent reading for every device that has reported.
    async fn find_most_recent_per_device(&self) -> DomainResult<Vec<StoredReading>>;

    /// List readings that raise an alert under the input thresholds.
    async fn find_matching(&self, input: FindMatchingInput) -> DomainResult<Vec<StoredReading>>;
}
