use std::io::Write;

use chrono::{TimeZone, Utc};
use common::domain::{
    FindMatchingInput, FindMostRecentInput, FindRecentInput, Reading, ReadingRepository, Thresholds,
};
use tempfile::TempDir;
use vigil_journal::{JournalConfig, JournalReadingRepository};

fn journal_config(dir: &TempDir) -> JournalConfig {
    JournalConfig {
        path: dir
            .path()
            .join("readings.jsonl")
            .to_string_lossy()
            .to_string(),
    }
}

fn reading(device_id: &str, heart_rate: i32, minute: u32) -> Reading {
    Reading {
        device_id: device_id.to_string(),
        display_name: format!("Device {device_id}"),
        heart_rate,
        oxygen_saturation: Some(97),
        lat: 46.5,
        lng: 11.3,
        sos: false,
        captured_at: Some(Utc.with_ymd_and_hms(2026, 3, 1, 8, minute, 0).unwrap()),
    }
}

#[tokio::test]
async fn test_append_then_query_round_trip() {
    // Arrange
    let dir = TempDir::new().unwrap();
    let repo = JournalReadingRepository::open(&journal_config(&dir)).unwrap();

    // Act
    let stored = repo.append(reading("d1", 72, 10)).await.unwrap();
    let found = repo
        .find_most_recent(FindMostRecentInput {
            device_id: Some("d1".to_string()),
        })
        .await
        .unwrap();

    // Assert
    assert_eq!(found, Some(stored));
}

#[tokio::test]
async fn test_reopen_replays_journal_and_continues_sequence() {
    // Arrange
    let dir = TempDir::new().unwrap();
    let config = journal_config(&dir);
    {
        let repo = JournalReadingRepository::open(&config).unwrap();
        repo.append(reading("d1", 70, 10)).await.unwrap();
        repo.append(reading("d2", 95, 20)).await.unwrap();
    }

    // Act
    let repo = JournalReadingRepository::open(&config).unwrap();

    // Assert
    assert_eq!(repo.len().await, 2);
    let stored = repo.append(reading("d1", 75, 30)).await.unwrap();
    assert_eq!(stored.sequence, 2);

    let latest = repo
        .find_most_recent(FindMostRecentInput { device_id: None })
        .await
        .unwrap()
        .unwrap();
    assert_eq!(latest.heart_rate, 75);
}

#[tokio::test]
async fn test_reopen_preserves_capture_time_tie_break() {
    // Arrange: two readings sharing a capture time, appended in order
    let dir = TempDir::new().unwrap();
    let config = journal_config(&dir);
    {
        let repo = JournalReadingRepository::open(&config).unwrap();
        repo.append(reading("d1", 70, 10)).await.unwrap();
        repo.append(reading("d1", 85, 10)).await.unwrap();
    }

    // Act
    let repo = JournalReadingRepository::open(&config).unwrap();
    let latest = repo
        .find_most_recent(FindMostRecentInput {
            device_id: Some("d1".to_string()),
        })
        .await
        .unwrap()
        .unwrap();

    // Assert: the later append still wins after replay
    assert_eq!(latest.heart_rate, 85);
    assert_eq!(latest.sequence, 1);
}

#[tokio::test]
async fn test_torn_final_line_is_dropped_on_open() {
    // Arrange: two good lines, then a write cut off mid-record
    let dir = TempDir::new().unwrap();
    let config = journal_config(&dir);
    {
        let repo = JournalReadingRepository::open(&config).unwrap();
        repo.append(reading("d1", 70, 10)).await.unwrap();
        repo.append(reading("d1", 75, 20)).await.unwrap();
    }
    {
        let mut file = std::fs::OpenOptions::new()
            .append(true)
            .open(&config.path)
            .unwrap();
        file.write_all(b"{\"reading_id\":\"r-torn\",\"device_id\":\"d1\"").unwrap();
    }

    // Act
    let repo = JournalReadingRepository::open(&config).unwrap();

    // Assert: the torn tail is gone and new appends replay cleanly
    assert_eq!(repo.len().await, 2);
    repo.append(reading("d1", 80, 30)).await.unwrap();
    drop(repo);

    let repo = JournalReadingRepository::open(&config).unwrap();
    assert_eq!(repo.len().await, 3);
}

#[tokio::test]
async fn test_interior_corruption_fails_open() {
    // Arrange: a corrupt line with valid data after it
    let dir = TempDir::new().unwrap();
    let config = journal_config(&dir);
    {
        let repo = JournalReadingRepository::open(&config).unwrap();
        repo.append(reading("d1", 70, 10)).await.unwrap();
    }
    let contents = std::fs::read_to_string(&config.path).unwrap();
    let mut lines: Vec<String> = vec!["not json at all".to_string()];
    lines.extend(contents.lines().map(|l| l.to_string()));
    std::fs::write(&config.path, format!("{}\n", lines.join("\n"))).unwrap();

    // Act
    let result = JournalReadingRepository::open(&config);

    // Assert
    assert!(result.is_err());
    let message = format!("{:#}", result.err().unwrap());
    assert!(message.contains("corrupt journal line 1"));
}

#[tokio::test]
async fn test_missing_file_opens_empty_journal() {
    // Arrange
    let dir = TempDir::new().unwrap();
    let config = JournalConfig {
        path: dir
            .path()
            .join("nested/dir/readings.jsonl")
            .to_string_lossy()
            .to_string(),
    };

    // Act
    let repo = JournalReadingRepository::open(&config).unwrap();

    // Assert
    assert_eq!(repo.len().await, 0);
    let found = repo
        .find_most_recent(FindMostRecentInput { device_id: None })
        .await
        .unwrap();
    assert!(found.is_none());
}

#[tokio::test]
async fn test_queries_match_in_memory_semantics() {
    // Arrange
    let dir = TempDir::new().unwrap();
    let repo = JournalReadingRepository::open(&journal_config(&dir)).unwrap();
    repo.append(reading("d1", 72, 10)).await.unwrap();
    repo.append(reading("d1", 130, 20)).await.unwrap();
    repo.append(reading("d2", 95, 30)).await.unwrap();

    // Act / Assert
    let recent = repo
        .find_recent(FindRecentInput {
            device_id: Some("d1".to_string()),
            limit: 10,
        })
        .await
        .unwrap();
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].heart_rate, 130);

    let states = repo.find_most_recent_per_device().await.unwrap();
    assert_eq!(states.len(), 2);

    let alerts = repo
        .find_matching(FindMatchingInput {
            device_id: "d1".to_string(),
            thresholds: Thresholds::default(),
            limit: None,
        })
        .await
        .unwrap();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].heart_rate, 130);
}
