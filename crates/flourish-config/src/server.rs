use std::net::SocketAddr;
use std::time::Duration;

use serde::Deserialize;

use crate::{cors::CorsConfig, health::HealthConfig, rate_limit::RateLimitConfig};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    pub listen_address: Option<SocketAddr>,
    /// Prefix every route is mounted under
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,
    /// Upper bound on request handling time (e.g. "60s")
    #[serde(default = "default_request_timeout")]
    pub request_timeout: String,
    #[serde(default)]
    pub health: HealthConfig,
    #[serde(default)]
    pub cors: Option<CorsConfig>,
    #[serde(default)]
    pub rate_limit: Option<RateLimitConfig>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_address: None,
            api_prefix: default_api_prefix(),
            request_timeout: default_request_timeout(),
            health: HealthConfig::default(),
            cors: None,
            rate_limit: None,
        }
    }
}

impl ServerConfig {
    /// Parsed request timeout
    pub fn request_timeout_duration(&self) -> anyhow::Result<Duration> {
        duration_str::parse(&self.request_timeout)
            .map_err(|e| anyhow::anyhow!("invalid server.request_timeout '{}': {e}", self.request_timeout))
    }
}

fn default_api_prefix() -> String {
    "/api".to_owned()
}

fn default_request_timeout() -> String {
    "60s".to_owned()
}
