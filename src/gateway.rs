//! Summary Gateway
//!
//! Drives the single outbound call behind every summary request and
//! normalizes whatever comes back into content or an [`AppError`].

use std::sync::Arc;

use reqwest::Client;
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::upstream::{SummaryPrompt, UpstreamProvider, EMPTY_SUMMARY};

/// Message returned when report text is absent or empty
pub const MISSING_TEXT_MESSAGE: &str = "Missing text in request body";

/// Provider-agnostic relay to one upstream inference API.
///
/// Holds no per-request state. The `reqwest::Client` pools connections and
/// is shared by all in-flight requests.
pub struct SummaryGateway {
    client: Client,
    provider: Arc<dyn UpstreamProvider>,
}

impl SummaryGateway {
    pub fn new(provider: Arc<dyn UpstreamProvider>) -> Self {
        Self::with_client(Client::new(), provider)
    }

    pub fn with_client(client: Client, provider: Arc<dyn UpstreamProvider>) -> Self {
        Self { client, provider }
    }

    /// Get the active provider
    pub fn provider(&self) -> &dyn UpstreamProvider {
        self.provider.as_ref()
    }

    /// Summarize report text through the active provider
    pub async fn summarize(&self, text: &str) -> Result<String> {
        if text.is_empty() {
            return Err(AppError::Validation(MISSING_TEXT_MESSAGE.to_string()));
        }

        let kind = self.provider.kind();
        let body = self.provider.build_body(&SummaryPrompt::for_report(text));

        tracing::debug!(
            provider = %kind,
            model = self.provider.model(),
            chars = text.len(),
            "Sending summary request upstream"
        );

        let request = self
            .provider
            .authorize(self.client.post(self.provider.endpoint()))
            .json(&body);

        let response = request
            .send()
            .await
            .map_err(|e| AppError::Transport(format!("{} request failed: {}", kind, e)))?;

        let status = response.status();
        let raw = response
            .text()
            .await
            .map_err(|e| AppError::Transport(format!("failed to read {} reply: {}", kind, e)))?;

        if !status.is_success() {
            tracing::error!(provider = %kind, status = %status, body = %raw, "Upstream API error");
            let message = serde_json::from_str::<Value>(&raw)
                .ok()
                .and_then(|reply| self.provider.extract_error(&reply))
                .unwrap_or_else(|| self.provider.fallback_error().to_string());
            return Err(AppError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        let reply: Value = serde_json::from_str(&raw)
            .map_err(|e| AppError::Transport(format!("failed to decode {} reply: {}", kind, e)))?;

        Ok(self
            .provider
            .extract_content(&reply)
            .unwrap_or_else(|| EMPTY_SUMMARY.to_string()))
    }

    /// Forward a raw generate request to an Ollama instance unchanged.
    ///
    /// Returns the upstream status and JSON body as received.
    pub async fn relay_generate(&self, base_url: &str, body: &Value) -> Result<(u16, Value)> {
        let url = format!("{}/api/generate", base_url.trim_end_matches('/'));

        let response = self.client.post(&url).json(body).send().await?;
        let status = response.status().as_u16();
        let reply: Value = response.json().await?;

        Ok((status, reply))
    }

    /// Check whether the upstream is ready
    pub async fn upstream_ready(&self) -> bool {
        self.provider.is_available(&self.client).await
    }
}
