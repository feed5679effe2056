//! Summarization API routes

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result, INVALID_BODY_MESSAGE};
use crate::state::AppState;

/// Create the summarize router
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(summarize_info).post(summarize))
}

/// Summarize request body
#[derive(Debug, Default, Deserialize)]
pub struct SummarizeRequest {
    /// Report text, typically OCR output from the front-end
    #[serde(default)]
    pub text: Option<String>,
}

/// Summarize response body
#[derive(Debug, Serialize, Deserialize)]
pub struct SummarizeResponse {
    pub content: String,
}

async fn summarize_info() -> &'static str {
    "Summarize API is working (use POST request to submit text)"
}

/// Summarize report text through the configured provider
async fn summarize(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<SummarizeResponse>> {
    let request = parse_request(&headers, &body)?;
    let text = request.text.unwrap_or_default();
    let content = state.gateway().summarize(&text).await?;
    Ok(Json(SummarizeResponse { content }))
}

/// Decode a summarize body.
///
/// A body without a JSON content type, or an empty one, reads as `{}` so it
/// is reported as missing text rather than malformed.
fn parse_request(headers: &HeaderMap, body: &[u8]) -> Result<SummarizeRequest> {
    if !is_json(headers) || body.iter().all(u8::is_ascii_whitespace) {
        return Ok(SummarizeRequest::default());
    }

    serde_json::from_slice(body).map_err(|e| {
        tracing::debug!("Unreadable summarize body: {}", e);
        AppError::Validation(INVALID_BODY_MESSAGE.to_string())
    })
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(|mime| {
            let mime = mime.trim().to_ascii_lowercase();
            mime == "application/json"
                || (mime.starts_with("application/") && mime.ends_with("+json"))
        })
        .unwrap_or(false)
}
