//! Programmatic configuration builder for integration tests

use std::net::SocketAddr;

use flourish_config::{AiConfig, Config, CorsConfig, IdentityConfig, RateLimitConfig, ServerConfig};
use secrecy::SecretString;

/// Builder for constructing test configurations
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder with minimal defaults
    ///
    /// No identity provider and no Gemini key: every token is rejected and
    /// AI endpoints answer with their fallbacks.
    pub fn new() -> Self {
        Self {
            config: Config {
                server: ServerConfig {
                    listen_address: Some(SocketAddr::from(([127, 0, 0, 1], 0))),
                    ..ServerConfig::default()
                },
                ..Config::default()
            },
        }
    }

    /// Verify tokens against a mock identity provider
    pub fn with_identity(mut self, base_url: &str) -> Self {
        self.config.identity = Some(IdentityConfig {
            api_key: SecretString::from("identity-key"),
            base_url: base_url.parse().expect("valid URL"),
            cache_ttl_seconds: 300,
            cache_capacity: 100,
        });
        self
    }

    /// Generate through a mock Gemini backend
    pub fn with_gemini(mut self, base_url: &str) -> Self {
        self.config.ai = AiConfig {
            api_key: Some(SecretString::from("gemini-key")),
            base_url: base_url.parse().expect("valid URL"),
            timeout_seconds: 5,
            ..AiConfig::default()
        };
        self
    }

    pub fn with_webhook_secret(mut self, secret: &str) -> Self {
        self.config.billing.webhook_secret = Some(SecretString::from(secret));
        self
    }

    /// Set CORS configuration
    pub fn with_cors(mut self, config: CorsConfig) -> Self {
        self.config.server.cors = Some(config);
        self
    }

    /// Set rate limit configuration
    pub fn with_rate_limit(mut self, requests: u32, window: &str) -> Self {
        self.config.server.rate_limit = Some(RateLimitConfig {
            requests,
            window: window.to_owned(),
        });
        self
    }

    pub fn with_api_prefix(mut self, prefix: &str) -> Self {
        self.config.server.api_prefix = prefix.to_owned();
        self
    }

    /// Disable health endpoint
    pub fn without_health(mut self) -> Self {
        self.config.server.health.enabled = false;
        self
    }

    /// Build the final config
    pub fn build(self) -> Config {
        self.config.validate().expect("test config is valid");
        self.config
    }
}
