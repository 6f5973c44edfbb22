use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

/// Identity provider used to verify client ID tokens
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IdentityConfig {
    /// Web API key of the identity project
    pub api_key: SecretString,
    /// Identity Toolkit base URL
    #[serde(default = "default_base_url")]
    pub base_url: Url,
    /// How long a verified token stays cached
    #[serde(default = "default_cache_ttl_seconds")]
    pub cache_ttl_seconds: u64,
    /// Maximum number of cached verifications
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: u64,
}

#[allow(clippy::missing_panics_doc)]
pub fn default_identity_base_url() -> Url {
    Url::parse("https://identitytoolkit.googleapis.com/v1/").expect("static URL is valid")
}

fn default_base_url() -> Url {
    default_identity_base_url()
}

#[allow(clippy::missing_const_for_fn)]
fn default_cache_ttl_seconds() -> u64 {
    300
}

#[allow(clippy::missing_const_for_fn)]
fn default_cache_capacity() -> u64 {
    10_000
}
