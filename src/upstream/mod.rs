//! Upstream Module
//!
//! Describes the inference APIs the gateway can relay to.
//!
//! Supports two backends:
//! - Groq chat completions (`choices[0].message.content`, bearer token)
//! - Ollama generate (`response`, no authentication)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use summary_gateway::config::UpstreamConfig;
//! use summary_gateway::upstream::{build_provider, SummaryPrompt};
//!
//! let provider = build_provider(&UpstreamConfig::ollama("http://localhost:11434"));
//! let body = provider.build_body(&SummaryPrompt::for_report("Hb 10.2 g/dL"));
//! ```

mod provider;
mod types;

pub use provider::{build_provider, GroqProvider, OllamaProvider, UpstreamProvider};
pub use types::{ProviderKind, SummaryPrompt, EMPTY_SUMMARY, SYSTEM_PROMPT};
