//! Provider Types
//!
//! Types shared by every upstream provider.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// System prompt sent with every summary request
pub const SYSTEM_PROMPT: &str =
    "You are a helpful assistant that explains medical reports to patients in simple bullet points.";

/// Returned as `content` when the upstream answered but produced no text
pub const EMPTY_SUMMARY: &str = "No summary available.";

/// Upstream provider type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Groq-hosted chat completions (bearer token)
    Groq,
    /// Local Ollama generate API (unauthenticated)
    Ollama,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Groq => "groq",
            Self::Ollama => "ollama",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "groq" => Ok(Self::Groq),
            "ollama" => Ok(Self::Ollama),
            other => Err(format!("unknown provider '{}', expected groq or ollama", other)),
        }
    }
}

/// Prompt pair handed to a provider's request builder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryPrompt {
    pub system: String,
    pub user: String,
}

impl SummaryPrompt {
    /// Wrap report text in the summarization instructions
    pub fn for_report(text: &str) -> Self {
        Self {
            system: SYSTEM_PROMPT.to_string(),
            user: format!("Summarize the medical report in short and detail:\n\n{}", text),
        }
    }
}
