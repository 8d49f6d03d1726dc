mod config;

use std::sync::Arc;
use std::time::Duration;

use common::domain::{InMemoryReadingStore, ReadingRepository};
use common::telemetry::{TelemetryConfig, TelemetryProviders, init_telemetry, shutdown_telemetry};
use config::VigilConfig;
use tracing::{debug, error, info};
use vigil_api::domain::{AlertQueryService, DeviceStateService, ReadingIngestionService};
use vigil_api::http::{ApiState, HttpServerConfig};
use vigil_api::vigil_api::VigilApi;
use vigil_journal::{JournalConfig, JournalReadingRepository};
use vigil_runner::Runner;

#[tokio::main]
async fn main() {
    // Initialize configuration and tracing
    let config = match VigilConfig::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Initialize telemetry (tracing + OpenTelemetry for traces and logs)
    let telemetry_providers: Option<TelemetryProviders> = match init_telemetry(&TelemetryConfig {
        service_name: config.otel_service_name.clone(),
        otel_endpoint: config.otel_endpoint.clone(),
        otel_enabled: config.otel_enabled,
        log_level: config.log_level.clone(),
    }) {
        Ok(provider) => provider,
        Err(e) => {
            eprintln!("Failed to initialize telemetry: {}", e);
            std::process::exit(1);
        }
    };

    info!(
        store_backend = %config.store_backend,
        http_host = %config.http_host,
        http_port = config.http_port,
        "Starting vigil-server"
    );
    debug!("Configuration: {:?}", config);

    // Initialize the reading store
    let reading_store = match build_reading_store(&config) {
        Ok(store) => store,
        Err(e) => {
            error!("Failed to initialize reading store: {}", e);
            std::process::exit(1);
        }
    };

    // Initialize domain services
    let thresholds = config.thresholds();
    let ingestion_service = Arc::new(ReadingIngestionService::new(reading_store.clone()));
    let device_state_service = Arc::new(DeviceStateService::new(
        reading_store.clone(),
        thresholds,
        config.default_history_limit,
    ));
    let alert_service = Arc::new(AlertQueryService::new(reading_store, thresholds));

    // Initialize application modules
    let vigil_api = VigilApi::new(
        ApiState::new(ingestion_service, device_state_service, alert_service),
        HttpServerConfig {
            host: config.http_host.clone(),
            port: config.http_port,
        },
    );

    // Run the service
    Runner::new()
        .with_named_process("vigil_api", vigil_api.into_runner_process())
        .with_closer(move || async move {
            info!("Running cleanup tasks...");
            // Shutdown telemetry and flush pending traces and logs
            shutdown_telemetry(telemetry_providers);
            info!("Cleanup complete");
            Ok(())
        })
        .with_closer_timeout(Duration::from_secs(10))
        .run()
        .await;
}

fn build_reading_store(config: &VigilConfig) -> anyhow::Result<Arc<dyn ReadingRepository>> {
    match config.store_backend.as_str() {
        "memory" => Ok(Arc::new(InMemoryReadingStore::new())),
        "journal" => {
            let repository = JournalReadingRepository::open(&JournalConfig {
                path: config.journal_path.clone(),
            })?;
            Ok(Arc::new(repository))
        }
        other => anyhow::bail!("unknown store backend {other:?}, expected memory or journal"),
    }
}
