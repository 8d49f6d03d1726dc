use axum::{
    Router,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use super::{handlers, state::ApiState};

/// Create the application router with all routes and middleware
pub fn api_router(state: ApiState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health))
        // Ingestion
        .route("/data", post(handlers::ingest_reading))
        .route("/sos", post(handlers::ingest_sos))
        // Latest state
        .route("/latest", get(handlers::latest_state))
        .route("/rescuer/latest-all", get(handlers::latest_state_per_device))
        // History
        .route("/alerts/:device_id", get(handlers::device_alerts))
        .route("/readings/recent", get(handlers::recent_readings))
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                        .on_response(DefaultOnResponse::new().level(Level::INFO)),
                )
                // Wearables and monitor dashboards call from any origin
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
