use std::time::Duration;

use serde::Deserialize;

/// Per-client-IP request limit
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RateLimitConfig {
    /// Maximum requests per window
    pub requests: u32,
    /// Window duration (e.g. "1m", "1h")
    pub window: String,
}

impl RateLimitConfig {
    /// Parsed window
    pub fn window_duration(&self) -> anyhow::Result<Duration> {
        duration_str::parse(&self.window)
            .map_err(|e| anyhow::anyhow!("invalid server.rate_limit.window '{}': {e}", self.window))
    }
}
