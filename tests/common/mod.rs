//! Shared helpers for router tests
//!
//! The upstream provider is played by a WireMock server so the whole
//! request/response cycle runs, including serialization and auth headers.

#![allow(dead_code)]

use axum_test::TestServer;
use serde_json::{json, Value};
use wiremock::MockServer;

use summary_gateway::app;
use summary_gateway::config::{Config, UpstreamConfig};
use summary_gateway::state::AppState;

pub const TEST_API_KEY: &str = "gsk_test";

/// Base URL nothing listens on
pub const CLOSED_UPSTREAM: &str = "http://127.0.0.1:1";

pub fn groq_config(base_url: &str) -> Config {
    Config {
        upstream: UpstreamConfig::groq(base_url, TEST_API_KEY),
        enable_generate_passthrough: false,
        ..Config::default()
    }
}

pub fn ollama_config(base_url: &str) -> Config {
    Config {
        upstream: UpstreamConfig::ollama(base_url),
        ollama_base_url: base_url.to_string(),
        enable_generate_passthrough: true,
        ..Config::default()
    }
}

pub fn server(config: Config) -> TestServer {
    TestServer::new(app(AppState::new(config))).unwrap()
}

pub fn groq_server(upstream: &MockServer) -> TestServer {
    server(groq_config(&upstream.uri()))
}

pub fn ollama_server(upstream: &MockServer) -> TestServer {
    server(ollama_config(&upstream.uri()))
}

pub fn chat_completion(content: &str) -> Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "model": "deepseek-r1-distill-llama-70b",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }]
    })
}

pub fn generate_reply(response: &str) -> Value {
    json!({
        "model": "llama3",
        "response": response,
        "done": true
    })
}
