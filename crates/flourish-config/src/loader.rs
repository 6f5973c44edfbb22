use std::collections::HashSet;
use std::path::Path;

use flourish_core::model::AiEndpoint;
use secrecy::ExposeSecret;
use strum::IntoEnumIterator;

use crate::Config;

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Reads the file, expands `{{ env.VAR }}` placeholders, then
    /// deserializes and validates the result.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        Self::from_toml(&raw)
    }

    /// Parse and validate configuration text
    pub fn from_toml(raw: &str) -> anyhow::Result<Self> {
        let expanded =
            crate::env::expand_env(raw).map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let config: Self = toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate that the configuration is internally consistent
    pub fn validate(&self) -> anyhow::Result<()> {
        self.validate_server()?;
        self.validate_identity()?;
        self.validate_ai()?;
        self.validate_billing()?;
        self.validate_challenges()?;
        Ok(())
    }

    fn validate_server(&self) -> anyhow::Result<()> {
        let prefix = &self.server.api_prefix;
        if !prefix.starts_with('/') || (prefix.len() > 1 && prefix.ends_with('/')) {
            anyhow::bail!("server.api_prefix must start with '/' and not end with one: '{prefix}'");
        }

        if !self.server.health.path.starts_with('/') {
            anyhow::bail!("server.health.path must start with '/'");
        }

        self.server.request_timeout_duration()?;

        if let Some(ref rate_limit) = self.server.rate_limit {
            if rate_limit.requests == 0 {
                anyhow::bail!("server.rate_limit.requests must be greater than 0");
            }
            if rate_limit.window_duration()?.is_zero() {
                anyhow::bail!("server.rate_limit.window must be greater than 0");
            }
        }

        Ok(())
    }

    fn validate_identity(&self) -> anyhow::Result<()> {
        let Some(ref identity) = self.identity else {
            return Ok(());
        };

        if identity.api_key.expose_secret().is_empty() {
            anyhow::bail!("identity.api_key must not be empty");
        }

        if identity.cache_ttl_seconds == 0 {
            anyhow::bail!("identity.cache_ttl_seconds must be greater than 0");
        }

        if identity.cache_capacity > 1_000_000 {
            anyhow::bail!("identity.cache_capacity exceeds maximum of 1,000,000");
        }

        Ok(())
    }

    fn validate_ai(&self) -> anyhow::Result<()> {
        if self.ai.model.trim().is_empty() {
            anyhow::bail!("ai.model must not be empty");
        }

        if !(0.0..=2.0).contains(&self.ai.temperature) {
            anyhow::bail!("ai.temperature must be between 0 and 2");
        }

        if self.ai.max_output_tokens == 0 {
            anyhow::bail!("ai.max_output_tokens must be greater than 0");
        }

        for endpoint in AiEndpoint::iter() {
            let ttl = self.ai.cache_ttl.ttl_for(endpoint)?;
            if ttl.is_zero() && endpoint != AiEndpoint::Chat {
                anyhow::bail!("ai.cache_ttl.{endpoint} must be greater than 0");
            }
        }

        Ok(())
    }

    fn validate_billing(&self) -> anyhow::Result<()> {
        for (product, plan) in &self.billing.products {
            if plan != "monthly" && plan != "annual" {
                anyhow::bail!("billing.products.{product} must be \"monthly\" or \"annual\", got \"{plan}\"");
            }
        }

        Ok(())
    }

    fn validate_challenges(&self) -> anyhow::Result<()> {
        let mut seen = HashSet::new();
        for challenge in &self.challenges {
            if challenge.id.trim().is_empty() {
                anyhow::bail!("challenge ids must not be empty");
            }
            if !seen.insert(challenge.id.as_str()) {
                anyhow::bail!("duplicate challenge id '{}'", challenge.id);
            }
        }

        Ok(())
    }
}
