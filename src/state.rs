use crate::config::ServerConfig;
use std::sync::Arc;

/// Shared handle passed to request handlers.
///
/// Holds configuration and a reusable HTTP client only; the service keeps no
/// business state between requests.
pub struct AppState {
    config: Arc<ServerConfig>,
    http: reqwest::Client,
}

impl AppState {
    pub fn new(config: Arc<ServerConfig>) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }
}
