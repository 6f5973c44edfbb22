#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

pub mod ai;
pub mod billing;
pub mod challenges;
pub mod cors;
mod env;
pub mod health;
pub mod identity;
mod loader;
pub mod rate_limit;
pub mod server;
pub mod telemetry;

use serde::Deserialize;

pub use ai::*;
pub use billing::*;
pub use challenges::*;
pub use cors::*;
pub use health::*;
pub use identity::*;
pub use rate_limit::*;
pub use server::*;
pub use telemetry::*;

/// Top-level Flourish configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Identity provider used to verify bearer tokens
    #[serde(default)]
    pub identity: Option<IdentityConfig>,
    /// Generative AI configuration
    #[serde(default)]
    pub ai: AiConfig,
    /// Subscription billing configuration
    #[serde(default)]
    pub billing: BillingConfig,
    /// Logging configuration
    #[serde(default)]
    pub telemetry: Option<TelemetryConfig>,
    /// Challenge catalog; the built-in catalog is used when empty
    #[serde(default)]
    pub challenges: Vec<ChallengeConfig>,
}
