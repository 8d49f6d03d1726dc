use common::domain::Thresholds;
use config::{Config, ConfigError, Environment};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct VigilConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    // HTTP configuration
    /// HTTP server host
    #[serde(default = "default_http_host")]
    pub http_host: String,

    /// HTTP server port
    #[serde(default = "default_http_port")]
    pub http_port: u16,

    // Storage configuration
    /// Reading store backend ("memory" or "journal")
    #[serde(default = "default_store_backend")]
    pub store_backend: String,

    /// Path of the JSON-lines journal when the journal backend is selected
    #[serde(default = "default_journal_path")]
    pub journal_path: String,

    // Classification thresholds
    /// Heart rate below this is classified as risk (bpm)
    #[serde(default = "default_low_bpm")]
    pub low_bpm: i32,

    /// Heart rate above this is classified as risk (bpm)
    #[serde(default = "default_high_bpm")]
    pub high_bpm: i32,

    /// Oxygen saturation below this is classified as risk (percent)
    #[serde(default = "default_min_spo2")]
    pub min_spo2: i32,

    /// How many readings GET /readings/recent returns when no limit is given
    #[serde(default = "default_history_limit")]
    pub default_history_limit: usize,

    // OpenTelemetry configuration
    /// OpenTelemetry OTLP endpoint (gRPC)
    #[serde(default = "default_otel_endpoint")]
    pub otel_endpoint: String,

    /// Enable OpenTelemetry export
    #[serde(default = "default_otel_enabled")]
    pub otel_enabled: bool,

    /// Service name for OpenTelemetry resource
    #[serde(default = "default_otel_service_name")]
    pub otel_service_name: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

// HTTP defaults
fn default_http_host() -> String {
    "0.0.0.0".to_string()
}

fn default_http_port() -> u16 {
    3000
}

// Storage defaults
fn default_store_backend() -> String {
    "memory".to_string()
}

fn default_journal_path() -> String {
    "data/readings.jsonl".to_string()
}

// Threshold defaults
fn default_low_bpm() -> i32 {
    60
}

fn default_high_bpm() -> i32 {
    100
}

fn default_min_spo2() -> i32 {
    92
}

fn default_history_limit() -> usize {
    50
}

// OpenTelemetry defaults
fn default_otel_endpoint() -> String {
    "http://localhost:4317".to_string()
}

fn default_otel_enabled() -> bool {
    false
}

fn default_otel_service_name() -> String {
    "vigil-server".to_string()
}

impl VigilConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(Environment::with_prefix("VIGIL"))
            .build()?
            .try_deserialize()
    }

    pub fn thresholds(&self) -> Thresholds {
        Thresholds {
            low_bpm: self.low_bpm,
            high_bpm: self.high_bpm,
            min_spo2: self.min_spo2,
        }
    }
}
