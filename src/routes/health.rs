//! Health check endpoints

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;
use crate::upstream::ProviderKind;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub service: &'static str,
    pub provider: ProviderKind,
    pub model: String,
}

#[derive(Serialize)]
pub struct ReadinessResponse {
    pub status: &'static str,
    pub provider: ProviderKind,
}

/// Plain-text liveness banner served at `/`
pub async fn banner() -> &'static str {
    "Summary gateway running"
}

pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let provider = state.gateway().provider();
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        service: "summary-gateway",
        provider: provider.kind(),
        model: provider.model().to_string(),
    })
}

/// Report whether the upstream provider is reachable
pub async fn upstream_check(
    State(state): State<AppState>,
) -> (StatusCode, Json<ReadinessResponse>) {
    let provider = state.gateway().provider().kind();
    if state.gateway().upstream_ready().await {
        (
            StatusCode::OK,
            Json(ReadinessResponse {
                status: "ready",
                provider,
            }),
        )
    } else {
        tracing::warn!("Upstream provider {} is unavailable", provider);
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ReadinessResponse {
                status: "unavailable",
                provider,
            }),
        )
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(health_check))
        .route("/upstream", get(upstream_check))
}
