use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use crate::domain::{AlertsQueryInput, LatestStateInput, RecentReadingsInput};
use crate::http::dto::{
    AlertsQuery, AlertsResponse, DeviceStatesResponse, HealthResponse, IngestReadingRequest,
    LatestQuery, LatestStateResponse, ReadingResponse, RecentQuery, RecentReadingsResponse,
};
use crate::http::error::ApiResult;
use crate::http::state::ApiState;

/// GET /
pub async fn index() -> &'static str {
    "vigil wearable telemetry service"
}

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// POST /data
#[tracing::instrument(skip(state, body), fields(device_id = %body.device_id))]
pub async fn ingest_reading(
    State(state): State<ApiState>,
    Json(body): Json<IngestReadingRequest>,
) -> ApiResult<(StatusCode, Json<ReadingResponse>)> {
    let stored = state.ingestion.ingest(body.into()).await?;
    Ok((StatusCode::CREATED, Json(stored.into())))
}

/// POST /sos
#[tracing::instrument(skip(state, body), fields(device_id = %body.device_id))]
pub async fn ingest_sos(
    State(state): State<ApiState>,
    Json(body): Json<IngestReadingRequest>,
) -> ApiResult<(StatusCode, Json<ReadingResponse>)> {
    let stored = state.ingestion.ingest_sos(body.into()).await?;
    Ok((StatusCode::CREATED, Json(stored.into())))
}

/// GET /latest
#[tracing::instrument(skip(state))]
pub async fn latest_state(
    State(state): State<ApiState>,
    Query(query): Query<LatestQuery>,
) -> ApiResult<Json<LatestStateResponse>> {
    let latest = state
        .device_state
        .latest(LatestStateInput {
            device_id: query.device_id,
        })
        .await?;

    Ok(Json(LatestStateResponse {
        state: latest.map(Into::into),
    }))
}

/// GET /rescuer/latest-all
#[tracing::instrument(skip(state))]
pub async fn latest_state_per_device(
    State(state): State<ApiState>,
) -> ApiResult<Json<DeviceStatesResponse>> {
    let states = state.device_state.latest_per_device().await?;

    let devices: Vec<_> = states.into_iter().map(Into::into).collect();
    Ok(Json(DeviceStatesResponse {
        total: devices.len(),
        devices,
    }))
}

/// GET /alerts/{device_id}
#[tracing::instrument(skip(state), fields(device_id = %device_id))]
pub async fn device_alerts(
    State(state): State<ApiState>,
    Path(device_id): Path<String>,
    Query(query): Query<AlertsQuery>,
) -> ApiResult<Json<AlertsResponse>> {
    let alerts = state
        .alerts
        .alerts_for(AlertsQueryInput {
            device_id: device_id.clone(),
            overrides: query.overrides(),
            limit: query.limit,
        })
        .await?;

    let alerts: Vec<_> = alerts.into_iter().map(Into::into).collect();
    Ok(Json(AlertsResponse {
        device_id,
        total: alerts.len(),
        alerts,
    }))
}

/// GET /readings/recent
#[tracing::instrument(skip(state))]
pub async fn recent_readings(
    State(state): State<ApiState>,
    Query(query): Query<RecentQuery>,
) -> ApiResult<Json<RecentReadingsResponse>> {
    let readings = state
        .device_state
        .recent(RecentReadingsInput {
            device_id: query.device_id,
            limit: query.limit,
        })
        .await?;

    let readings: Vec<_> = readings.into_iter().map(Into::into).collect();
    Ok(Json(RecentReadingsResponse {
        total: readings.len(),
        readings,
    }))
}
