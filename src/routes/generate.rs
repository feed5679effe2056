//! Raw Ollama generate passthrough

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::Value;

use crate::error::{AppError, ErrorResponse};
use crate::state::AppState;

/// Create the generate router
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(generate))
}

/// Forward the body to Ollama and return its reply unchanged
async fn generate(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Response {
    let body = match payload {
        Ok(Json(body)) => body,
        Err(rejection) => return AppError::from(rejection).into_response(),
    };

    let base_url = &state.config().ollama_base_url;
    match state.gateway().relay_generate(base_url, &body).await {
        Ok((status, reply)) => {
            let status = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
            (status, Json(reply)).into_response()
        }
        Err(e) => {
            tracing::error!("Error forwarding to Ollama: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Ollama connection failed".to_string(),
                }),
            )
                .into_response()
        }
    }
}
