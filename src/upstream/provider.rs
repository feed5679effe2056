//! Upstream Providers
//!
//! Defines the provider trait and the request/response shapes of each
//! supported inference API.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};
use serde_json::{json, Value};

use super::types::{ProviderKind, SummaryPrompt};
use crate::config::UpstreamConfig;

/// Upstream provider trait
///
/// A provider knows where to send a summary request, how to shape the body,
/// and where the generated text and error message live in the reply. The
/// HTTP exchange itself is driven by [`crate::gateway::SummaryGateway`].
#[async_trait]
pub trait UpstreamProvider: Send + Sync {
    /// Get the provider type
    fn kind(&self) -> ProviderKind;

    /// Model identifier sent upstream
    fn model(&self) -> &str;

    /// Full URL of the summary endpoint
    fn endpoint(&self) -> String;

    /// Attach provider credentials. Unauthenticated providers pass through.
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        request
    }

    /// Build the JSON request body for a prompt
    fn build_body(&self, prompt: &SummaryPrompt) -> Value;

    /// Pull the generated text out of a successful reply
    fn extract_content(&self, body: &Value) -> Option<String>;

    /// Pull an error message out of a failed reply
    fn extract_error(&self, body: &Value) -> Option<String> {
        let error = body.get("error")?;
        error
            .get("message")
            .and_then(Value::as_str)
            .or_else(|| error.as_str())
            .filter(|message| !message.trim().is_empty())
            .map(str::to_string)
    }

    /// Message used when the upstream gives no usable error
    fn fallback_error(&self) -> &'static str;

    /// Check if the upstream is reachable and accepts our credentials
    async fn is_available(&self, client: &Client) -> bool;
}

/// Build the provider selected by the upstream config
pub fn build_provider(config: &UpstreamConfig) -> Arc<dyn UpstreamProvider> {
    match config.provider {
        ProviderKind::Groq => Arc::new(GroqProvider::new(
            &config.base_url,
            config.api_key.clone().unwrap_or_else(|| SecretString::new(String::new())),
            &config.model,
            config.temperature,
        )),
        ProviderKind::Ollama => Arc::new(OllamaProvider::new(
            &config.base_url,
            &config.model,
            config.temperature,
        )),
    }
}

fn trim_base(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}

fn non_empty(text: Option<&str>) -> Option<String> {
    text.filter(|t| !t.is_empty()).map(str::to_string)
}

/// Groq chat completions provider (OpenAI-compatible)
pub struct GroqProvider {
    base_url: String,
    api_key: SecretString,
    model: String,
    temperature: f64,
}

impl GroqProvider {
    pub fn new(base_url: &str, api_key: SecretString, model: &str, temperature: f64) -> Self {
        Self {
            base_url: trim_base(base_url),
            api_key,
            model: model.to_string(),
            temperature,
        }
    }
}

#[async_trait]
impl UpstreamProvider for GroqProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Groq
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        request.bearer_auth(self.api_key.expose_secret())
    }

    fn build_body(&self, prompt: &SummaryPrompt) -> Value {
        json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": prompt.system },
                { "role": "user", "content": prompt.user },
            ],
            "temperature": self.temperature,
        })
    }

    fn extract_content(&self, body: &Value) -> Option<String> {
        non_empty(body.pointer("/choices/0/message/content").and_then(Value::as_str))
    }

    fn fallback_error(&self) -> &'static str {
        "Groq API error"
    }

    async fn is_available(&self, client: &Client) -> bool {
        let request = client.get(format!("{}/models", self.base_url));
        match self.authorize(request).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }
}

/// Ollama generate provider
pub struct OllamaProvider {
    /// Ollama API URL
    base_url: String,
    /// Model name (e.g., "llama3", "mistral")
    model: String,
    temperature: f64,
}

impl OllamaProvider {
    pub fn new(base_url: &str, model: &str, temperature: f64) -> Self {
        Self {
            base_url: trim_base(base_url),
            model: model.to_string(),
            temperature,
        }
    }
}

#[async_trait]
impl UpstreamProvider for OllamaProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Ollama
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/api/generate", self.base_url)
    }

    fn build_body(&self, prompt: &SummaryPrompt) -> Value {
        json!({
            "model": self.model,
            "system": prompt.system,
            "prompt": prompt.user,
            "stream": false,
            "options": { "temperature": self.temperature },
        })
    }

    fn extract_content(&self, body: &Value) -> Option<String> {
        non_empty(body.get("response").and_then(Value::as_str))
    }

    fn fallback_error(&self) -> &'static str {
        "Ollama API error"
    }

    async fn is_available(&self, client: &Client) -> bool {
        let url = format!("{}/api/tags", self.base_url);
        match client.get(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upstream::types::SYSTEM_PROMPT;

    fn groq() -> GroqProvider {
        GroqProvider::new(
            "https://api.groq.com/openai/v1/",
            SecretString::new("gsk_test".to_string()),
            "deepseek-r1-distill-llama-70b",
            0.5,
        )
    }

    fn ollama() -> OllamaProvider {
        OllamaProvider::new("http://localhost:11434", "llama3", 0.5)
    }

    #[test]
    fn test_endpoints() {
        assert_eq!(
            groq().endpoint(),
            "https://api.groq.com/openai/v1/chat/completions"
        );
        assert_eq!(ollama().endpoint(), "http://localhost:11434/api/generate");
    }

    #[test]
    fn test_groq_body_has_system_and_user_messages() {
        let prompt = SummaryPrompt::for_report("Hb 10.2 g/dL");
        let body = groq().build_body(&prompt);

        assert_eq!(body["model"], "deepseek-r1-distill-llama-70b");
        assert_eq!(body["temperature"], 0.5);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], SYSTEM_PROMPT);
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["messages"][1]["content"], prompt.user.as_str());
    }

    #[test]
    fn test_configured_temperature_is_sent_exactly() {
        let mut config = UpstreamConfig::groq("http://localhost:9999", "key");
        config.temperature = 0.2;
        let prompt = SummaryPrompt::for_report("Hb 10.2 g/dL");

        let body = build_provider(&config).build_body(&prompt);
        assert_eq!(body["temperature"].to_string(), "0.2");

        let mut config = UpstreamConfig::ollama("http://localhost:11434");
        config.temperature = 0.2;
        let body = build_provider(&config).build_body(&prompt);
        assert_eq!(body["options"]["temperature"].to_string(), "0.2");
    }

    #[test]
    fn test_ollama_body_is_non_streaming_generate() {
        let prompt = SummaryPrompt::for_report("Hb 10.2 g/dL");
        let body = ollama().build_body(&prompt);

        assert_eq!(body["model"], "llama3");
        assert_eq!(body["system"], SYSTEM_PROMPT);
        assert_eq!(body["prompt"], prompt.user.as_str());
        assert_eq!(body["stream"], false);
        assert!(body.get("messages").is_none());
    }

    #[test]
    fn test_groq_content_extraction() {
        let provider = groq();
        let reply = json!({"choices": [{"message": {"content": "- Mild hypertension noted"}}]});
        assert_eq!(
            provider.extract_content(&reply).as_deref(),
            Some("- Mild hypertension noted")
        );
        assert_eq!(provider.extract_content(&json!({"choices": []})), None);
        assert_eq!(
            provider.extract_content(&json!({"choices": [{"message": {"content": ""}}]})),
            None
        );
        assert_eq!(provider.extract_content(&json!({"response": "wrong shape"})), None);
    }

    #[test]
    fn test_ollama_content_extraction() {
        let provider = ollama();
        assert_eq!(
            provider.extract_content(&json!({"response": "- Normal ECG", "done": true})).as_deref(),
            Some("- Normal ECG")
        );
        assert_eq!(provider.extract_content(&json!({"response": 42})), None);
        assert_eq!(provider.extract_content(&json!({"done": true})), None);
    }

    #[test]
    fn test_error_extraction() {
        let provider = groq();
        assert_eq!(
            provider
                .extract_error(&json!({"error": {"message": "Invalid API Key", "type": "invalid_request_error"}}))
                .as_deref(),
            Some("Invalid API Key")
        );
        assert_eq!(
            provider.extract_error(&json!({"error": "model 'llama3' not found"})).as_deref(),
            Some("model 'llama3' not found")
        );
        assert_eq!(provider.extract_error(&json!({"error": {"code": 500}})), None);
        assert_eq!(provider.extract_error(&json!({"detail": "nope"})), None);
    }

    #[test]
    fn test_build_provider_follows_config() {
        let groq = build_provider(&UpstreamConfig::groq("http://localhost:9999", "key"));
        assert_eq!(groq.kind(), ProviderKind::Groq);
        assert_eq!(groq.fallback_error(), "Groq API error");

        let ollama = build_provider(&UpstreamConfig::ollama("http://localhost:11434"));
        assert_eq!(ollama.kind(), ProviderKind::Ollama);
        assert_eq!(ollama.model(), "llama3");
    }
}
