//! Configuration management for the Summary Gateway

use secrecy::SecretString;
use serde::Deserialize;
use std::env;
use thiserror::Error;

use crate::upstream::ProviderKind;

pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_GROQ_MODEL: &str = "deepseek-r1-distill-llama-70b";
pub const DEFAULT_OLLAMA_BASE_URL: &str = "http://localhost:11434";
pub const DEFAULT_OLLAMA_MODEL: &str = "llama3";
pub const DEFAULT_TEMPERATURE: f64 = 0.5;

/// Configuration errors
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {var} ({value:?}): {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub cors: CorsConfig,
    pub upstream: UpstreamConfig,
    /// Base URL of the local Ollama instance targeted by `/api/generate`
    pub ollama_base_url: String,
    pub enable_generate_passthrough: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CorsConfig {
    /// Single allowed origin. `None` allows any origin.
    pub allowed_origin: Option<String>,
}

/// Settings for the active upstream provider
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamConfig {
    pub provider: ProviderKind,
    pub base_url: String,
    pub api_key: Option<SecretString>,
    pub model: String,
    pub temperature: f64,
}

impl UpstreamConfig {
    /// Local Ollama with its defaults
    pub fn ollama(base_url: impl Into<String>) -> Self {
        Self {
            provider: ProviderKind::Ollama,
            base_url: base_url.into(),
            api_key: None,
            model: DEFAULT_OLLAMA_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    /// Groq chat completions with its defaults
    pub fn groq(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            provider: ProviderKind::Groq,
            base_url: base_url.into(),
            api_key: Some(SecretString::new(api_key.into())),
            model: DEFAULT_GROQ_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: DEFAULT_PORT,
            },
            cors: CorsConfig::default(),
            upstream: UpstreamConfig::ollama(DEFAULT_OLLAMA_BASE_URL),
            ollama_base_url: DEFAULT_OLLAMA_BASE_URL.to_string(),
            enable_generate_passthrough: true,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Load from the environment, falling back to defaults on any error
    pub fn from_env_or_default() -> Self {
        Self::from_vars_or_default(|key| env::var(key).ok())
    }

    /// Build from a lookup, falling back to the local Ollama defaults.
    ///
    /// A configured Groq key is dropped by the fallback, so that case is
    /// logged at error level.
    pub fn from_vars_or_default<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let has_groq_key = lookup("GROQ_API_KEY").is_some_and(|v| !v.trim().is_empty());
        match Self::from_vars(lookup) {
            Ok(config) => config,
            Err(e) if has_groq_key => {
                tracing::error!(
                    "Invalid config: {}. GROQ_API_KEY is set but ignored; falling back to local Ollama defaults",
                    e
                );
                Config::default()
            }
            Err(e) => {
                tracing::warn!("Failed to load config from env: {}, using defaults", e);
                Config::default()
            }
        }
    }

    /// Build the config from an arbitrary variable lookup.
    ///
    /// Empty values are treated as unset.
    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match var("PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|e| ConfigError::Invalid {
                var: "PORT",
                value: raw.clone(),
                reason: e.to_string(),
            })?,
            None => DEFAULT_PORT,
        };

        let allowed_origin = match var("ALLOWED_ORIGIN") {
            Some(origin) => {
                if axum::http::HeaderValue::from_str(&origin).is_err() {
                    return Err(ConfigError::Invalid {
                        var: "ALLOWED_ORIGIN",
                        value: origin,
                        reason: "not a valid header value".to_string(),
                    });
                }
                Some(origin)
            }
            None => None,
        };

        let api_key = var("GROQ_API_KEY");
        let provider = match var("SUMMARY_PROVIDER") {
            Some(raw) => raw.parse::<ProviderKind>().map_err(|reason| ConfigError::Invalid {
                var: "SUMMARY_PROVIDER",
                value: raw.clone(),
                reason,
            })?,
            None if api_key.is_some() => ProviderKind::Groq,
            None => ProviderKind::Ollama,
        };

        let temperature = match var("SUMMARY_TEMPERATURE") {
            Some(raw) => parse_temperature(&raw)?,
            None => DEFAULT_TEMPERATURE,
        };

        let ollama_base_url = var("OLLAMA_BASE_URL")
            .unwrap_or_else(|| DEFAULT_OLLAMA_BASE_URL.to_string());

        let upstream = match provider {
            ProviderKind::Groq => UpstreamConfig {
                provider,
                base_url: var("GROQ_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_GROQ_BASE_URL.to_string()),
                api_key: Some(SecretString::new(
                    api_key.ok_or(ConfigError::Missing("GROQ_API_KEY"))?,
                )),
                model: var("GROQ_MODEL").unwrap_or_else(|| DEFAULT_GROQ_MODEL.to_string()),
                temperature,
            },
            ProviderKind::Ollama => UpstreamConfig {
                provider,
                base_url: ollama_base_url.clone(),
                api_key: None,
                model: var("OLLAMA_MODEL").unwrap_or_else(|| DEFAULT_OLLAMA_MODEL.to_string()),
                temperature,
            },
        };

        let enable_generate_passthrough = match var("ENABLE_GENERATE_PASSTHROUGH") {
            Some(raw) => parse_flag("ENABLE_GENERATE_PASSTHROUGH", &raw)?,
            None => provider == ProviderKind::Ollama,
        };

        Ok(Config {
            server: ServerConfig {
                host: var("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                port,
            },
            cors: CorsConfig { allowed_origin },
            upstream,
            ollama_base_url,
            enable_generate_passthrough,
        })
    }
}

fn parse_temperature(raw: &str) -> Result<f64, ConfigError> {
    let invalid = |reason: String| ConfigError::Invalid {
        var: "SUMMARY_TEMPERATURE",
        value: raw.to_string(),
        reason,
    };

    let value = raw.trim().parse::<f64>().map_err(|e| invalid(e.to_string()))?;
    if !(0.0..=2.0).contains(&value) {
        return Err(invalid("must be between 0 and 2".to_string()));
    }
    Ok(value)
}

fn parse_flag(var: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            var,
            value: raw.to_string(),
            reason: "expected true or false".to_string(),
        }),
    }
}
