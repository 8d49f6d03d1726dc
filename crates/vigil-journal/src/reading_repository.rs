use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use common::domain::{
    DomainError, DomainResult, FindMatchingInput, FindMostRecentInput, FindRecentInput, Reading,
    ReadingLog, ReadingRepository, StoredReading,
};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, error, warn};

use crate::config::JournalConfig;
use crate::models::ReadingRecord;

/// JSON-lines implementation of ReadingRepository. Every append writes one
/// line and flushes it; opening replays the journal into memory so queries
/// never touch the file.
pub struct JournalReadingRepository {
    path: PathBuf,
    writer: Mutex<BufWriter<File>>,
    log: RwLock<ReadingLog>,
}

impl JournalReadingRepository {
    /// Opens the journal at the configured path, replaying any existing
    /// lines. A torn final line from an interrupted write is truncated away
    /// with a warning; corruption anywhere else fails the open.
    pub fn open(config: &JournalConfig) -> Result<Self> {
        let path = PathBuf::from(&config.path);
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating journal directory {}", parent.display()))?;
            }
        }

        let (log, truncate_to) = Self::replay(&path)?;
        if let Some(valid_len) = truncate_to {
            let file = OpenOptions::new()
                .write(true)
                .open(&path)
                .with_context(|| format!("opening journal {}", path.display()))?;
            file.set_len(valid_len)
                .with_context(|| format!("truncating torn tail of {}", path.display()))?;
        }

        debug!(
            path = %path.display(),
            replayed = log.len(),
            "Opened reading journal"
        );

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("opening journal {}", path.display()))?;

        Ok(Self {
            path,
            writer: Mutex::new(BufWriter::new(file)),
            log: RwLock::new(log),
        })
    }

    /// Replays the journal into a ReadingLog. Returns the log and, when a
    /// torn tail was found, the byte length the file must be truncated to.
    fn replay(path: &Path) -> Result<(ReadingLog, Option<u64>)> {
        let mut log = ReadingLog::new();
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok((log, None)),
            Err(e) => {
                return Err(
                    anyhow::Error::new(e).context(format!("opening journal {}", path.display()))
                );
            }
        };

        let mut reader = BufReader::new(file);
        let mut line = String::new();
        let mut valid_len: u64 = 0;
        let mut line_no: usize = 0;
        loop {
            line.clear();
            let read = reader
                .read_line(&mut line)
                .with_context(|| format!("reading journal {}", path.display()))?;
            if read == 0 {
                return Ok((log, None));
            }
            line_no += 1;

            let trimmed = line.trim();
            if trimmed.is_empty() {
                valid_len += read as u64;
                continue;
            }

            match serde_json::from_str::<ReadingRecord>(trimmed) {
                Ok(record) => {
                    log.push(record.into());
                    valid_len += read as u64;
                }
                Err(e) => {
                    // A bad line is only tolerated as the torn tail of an
                    // interrupted write. That reading was never acknowledged,
                    // so dropping it is safe.
                    let mut rest = String::new();
                    reader
                        .read_to_string(&mut rest)
                        .with_context(|| format!("reading journal {}", path.display()))?;
                    if rest.trim().is_empty() {
                        warn!(
                            path = %path.display(),
                            line = line_no,
                            error = %e,
                            "Dropping torn final journal line"
                        );
                        return Ok((log, Some(valid_len)));
                    }
                    anyhow::bail!(
                        "corrupt journal line {} in {}: {}",
                        line_no,
                        path.display(),
                        e
                    );
                }
            }
        }
    }

    /// Number of readings replayed or appended so far.
    pub async fn len(&self) -> usize {
        self.log.read().await.len()
    }
}

#[async_trait]
impl ReadingRepository for JournalReadingRepository {
    async fn append(&self, reading: Reading) -> DomainResult<StoredReading> {
        // The write lock is held across the file write so that journal line
        // order always matches sequence order.
        let mut log = self.log.write().await;
        let stored = StoredReading::stamp(reading, log.next_sequence());
        let record = ReadingRecord::from(&stored);
        let line = serde_json::to_string(&record).map_err(|e| {
            error!("Failed to serialize journal record: {}", e);
            DomainError::StorageError(e.into())
        })?;

        {
            let mut writer = self.writer.lock().await;
            writer
                .write_all(line.as_bytes())
                .and_then(|_| writer.write_all(b"\n"))
                .and_then(|_| writer.flush())
                .map_err(|e| {
                    error!(path = %self.path.display(), "Failed to append journal line: {}", e);
                    DomainError::StorageError(e.into())
                })?;
        }

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
