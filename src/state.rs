//! Application state management

use std::sync::Arc;

use crate::config::Config;
use crate::gateway::SummaryGateway;
use crate::upstream::build_provider;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    gateway: SummaryGateway,
}

impl AppState {
    /// Create a new application state with the provider named in `config`
    pub fn new(config: Config) -> Self {
        let gateway = SummaryGateway::new(build_provider(&config.upstream));
        Self::with_gateway(config, gateway)
    }

    /// Create a state around an existing gateway
    pub fn with_gateway(config: Config, gateway: SummaryGateway) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, gateway }),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the summary gateway
    pub fn gateway(&self) -> &SummaryGateway {
        &self.inner.gateway
    }
}
