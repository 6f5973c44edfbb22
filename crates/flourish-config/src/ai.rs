use std::time::Duration;

use flourish_core::model::AiEndpoint;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use url::Url;

/// Placeholder shipped in sample env files; treated as "no key"
const PLACEHOLDER_KEY: &str = "REPLACE_ME";

/// Generative AI configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AiConfig {
    /// Gemini API key; AI endpoints serve canned responses without one
    #[serde(default)]
    pub api_key: Option<SecretString>,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_base_url")]
    pub base_url: Url,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
    /// Timeout for a single generation call in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    /// Response cache lifetimes per endpoint
    #[serde(default)]
    pub cache_ttl: CacheTtlConfig,
    /// Where cached responses live
    #[serde(default)]
    pub cache: AiCacheStorage,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            base_url: default_base_url(),
            temperature: default_temperature(),
            max_output_tokens: default_max_output_tokens(),
            timeout_seconds: default_timeout_seconds(),
            cache_ttl: CacheTtlConfig::default(),
            cache: AiCacheStorage::default(),
        }
    }
}

impl AiConfig {
    /// The API key, if one is set and is not the sample placeholder
    pub fn usable_api_key(&self) -> Option<&SecretString> {
        self.api_key.as_ref().filter(|key| {
            let raw = key.expose_secret().trim();
            !raw.is_empty() && raw != PLACEHOLDER_KEY
        })
    }

    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

/// Cache lifetimes keyed by endpoint name (e.g. `smart-swap = "24h"`)
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct CacheTtlConfig {
    #[serde(default = "default_smart_swap_ttl")]
    pub smart_swap: String,
    #[serde(default = "default_meal_plan_ttl")]
    pub meal_plan: String,
    #[serde(default = "default_goal_ttl")]
    pub goal: String,
    #[serde(default = "default_chat_ttl")]
    pub chat: String,
}

impl Default for CacheTtlConfig {
    fn default() -> Self {
        Self {
            smart_swap: default_smart_swap_ttl(),
            meal_plan: default_meal_plan_ttl(),
            goal: default_goal_ttl(),
            chat: default_chat_ttl(),
        }
    }
}

impl CacheTtlConfig {
    /// Parsed lifetime for one endpoint
    pub fn ttl_for(&self, endpoint: AiEndpoint) -> anyhow::Result<Duration> {
        let raw = match endpoint {
            AiEndpoint::SmartSwap => &self.smart_swap,
            AiEndpoint::MealPlan => &self.meal_plan,
            AiEndpoint::Goal => &self.goal,
            AiEndpoint::Chat => &self.chat,
        };

        duration_str::parse(raw).map_err(|e| anyhow::anyhow!("invalid ai.cache_ttl.{endpoint} '{raw}': {e}"))
    }
}

/// AI response cache backend
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AiCacheStorage {
    /// In-process store (single instance only)
    #[default]
    Memory,
    /// Valkey/Redis shared across instances
    Valkey(ValkeyConfig),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ValkeyConfig {
    pub url: Url,
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
}

#[allow(clippy::missing_panics_doc)]
pub fn default_gemini_base_url() -> Url {
    Url::parse("https://generativelanguage.googleapis.com/v1beta/").expect("static URL is valid")
}

fn default_base_url() -> Url {
    default_gemini_base_url()
}

fn default_model() -> String {
    "gemini-1.5-flash".to_owned()
}

#[allow(clippy::missing_const_for_fn)]
fn default_temperature() -> f32 {
    0.7
}

#[allow(clippy::missing_const_for_fn)]
fn default_max_output_tokens() -> u32 {
    2048
}

#[allow(clippy::missing_const_for_fn)]
fn default_timeout_seconds() -> u64 {
    30
}

fn default_smart_swap_ttl() -> String {
    "24h".to_owned()
}

fn default_meal_plan_ttl() -> String {
    "12h".to_owned()
}

fn default_goal_ttl() -> String {
    "48h".to_owned()
}

fn default_chat_ttl() -> String {
    "1h".to_owned()
}

fn default_key_prefix() -> String {
    "flourish:ai".to_owned()
}
