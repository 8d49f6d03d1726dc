use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{
    DomainResult, FindMatchingInput, FindMostRecentInput, FindRecentInput, Reading, ReadingLog,
    ReadingRepository, StoredReading,
};

/// In-memory implementation of ReadingRepository backed by a ReadingLog.
/// Appends take the write lock so stamping and insertion happen atomically;
/// queries only ever see fully appended readings.
pub struct InMemoryReadingStore {
    log: Arc<RwLock<ReadingLog>>,
}

impl InMemoryReadingStore {
    pub fn new() -> Self {
        Self {
            log: Arc::new(RwLock::new(ReadingLog::new())),
        }
    }

    /// Number of readings currently held.
    pub async fn len(&self) -> usize {
        self.log.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.log.read().await.is_empty()
    }
}

impl Default for InMemoryReadingStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReadingRepository for InMemoryReadingStore {
    async fn append(&self, reading: Reading) -> DomainResult<StoredReading> {
        let mut log = self.log.write().await;
        let stored = StoredReading::stamp(reading, log.next_sequence());
        log.push(stored.clone());
        Ok(stored)
    }

    async fn find_most_recent(
        &self,
        input: FindMostRecentInput,
    ) -> DomainResult<Option<StoredReading>> {
        let log = self.log.read().await;
        Ok(log.most_recent(input.device_id.as_deref()))
    }

    async fn find_recent(&self, input: FindRecentInput) -> DomainResult<Vec<StoredReading>> {
        let log = self.log.read().await;
        Ok(log.recent(input.device_id.as_deref(), input.limit))
    }

    async fn find_most_recent_per_device(&self) -> DomainResult<Vec<StoredReading>> {
        let log = self.log.read().await;
        Ok(log.most_recent_per_device())
    }

    async fn find_matching(&self, input: FindMatchingInput) -> DomainResult<Vec<StoredReading>> {
        let log = self.log.read().await;
        Ok(log.matching(&input.device_id, &input.thresholds, input.limit))
    }
}
