use chrono::{DateTime, Utc};
use common::domain::{DomainResult, Reading, ReadingRepository, StoredReading};
use garde::Validate;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Input for ingesting a wearable reading
#[derive(Debug, Clone, Validate)]
pub struct IngestReadingInput {
    #[garde(length(min = 1))]
    pub device_id: String,
    #[garde(length(min = 1))]
    pub display_name: String,
    #[garde(skip)]
    pub heart_rate: i32,
    #[garde(inner(range(min = 0, max = 100)))]
    pub oxygen_saturation: Option<i32>,
    #[garde(range(min = -90.0, max = 90.0))]
    pub lat: f64,
    #[garde(range(min = -180.0, max = 180.0))]
    pub lng: f64,
    #[garde(skip)]
    pub sos: bool,
    #[garde(skip)]
    pub captured_at: Option<DateTime<Utc>>,
}

/// Domain service that validates and appends wearable readings
///
/// Flow:
/// 1. Validate input fields
/// 2. Build the reading (SOS ingests force the flag on)
/// 3. Append to the reading store
pub struct ReadingIngestionService {
    reading_repository: Arc<dyn ReadingRepository>,
}

impl ReadingIngestionService {
    pub fn new(reading_repository: Arc<dyn ReadingRepository>) -> Self {
        Self { reading_repository }
    }

    /// Ingest a routine telemetry reading
    ///
    /// Validation is atomic: a reading with any invalid field is rejected
    /// before the store is touched.
    #[instrument(skip(self), fields(device_id = %input.device_id))]
    pub async fn ingest(&self, input: IngestReadingInput) -> DomainResult<StoredReading> {
        common::garde::validate_struct(&input)?;

        let sos = input.sos;
        self.append(input, sos).await
    }

    /// Ingest an SOS reading. The SOS flag is forced on no matter what the
    /// caller sent, so a panic-button press can never be downgraded.
    #[instrument(skip(self), fields(device_id = %input.device_id))]
    pub async fn ingest_sos(&self, input: IngestReadingInput) -> DomainResult<StoredReading> {
        common::garde::validate_struct(&input)?;

        self.append(input, true).await
    }

    async fn append(&self, input: IngestReadingInput, sos: bool) -> DomainResult<StoredReading> {
        let reading = Reading {
            device_id: input.device_id,
            display_name: input.display_name,
            heart_rate: input.heart_rate,
            oxygen_saturation: input.oxygen_saturation,
            lat: input.lat,
            lng: input.lng,
            sos,
            captured_at: input.captured_at,
        };

        let stored = self.reading_repository.append(reading).await?;

        debug!(
            reading_id = %stored.reading_id,
            sequence = stored.sequence,
            sos = stored.sos,
            "appended reading"
        );

        Ok(stored)
    }
}
