//! Health check endpoint

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::app::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub services: ServiceHealth,
}

#[derive(Serialize)]
pub struct ServiceHealth {
    pub catalog: String,
    pub llm: String,
    pub weather: String,
}

/// Health check endpoint - public. The catalog is probed for real;
/// the two upstream providers are reported as configured, not called,
/// so the endpoint stays cheap and rate-limit safe.
pub async fn health_check(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<HealthResponse>) {
    let catalog_result = state.catalog.snapshot().await;
    let catalog_status = match &catalog_result {
        Ok(snapshot) if !snapshot.is_empty() => "ok",
        Ok(_) => "empty",
        Err(_) => "error",
    };

    let status = if catalog_status == "ok" {
        "healthy"
    } else {
        "unhealthy"
    };

    let status_code = if status == "unhealthy" {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::OK
    };

    (
        status_code,
        Json(HealthResponse {
            status: status.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            services: ServiceHealth {
                catalog: catalog_status.to_string(),
                llm: "configured".to_string(),
                weather: "configured".to_string(),
            },
        }),
    )
}
