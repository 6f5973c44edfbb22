use std::collections::BTreeMap;

use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

/// Subscription billing configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BillingConfig {
    /// Shared secret for webhook signatures; verification is skipped without it
    #[serde(default)]
    pub webhook_secret: Option<SecretString>,
    /// Secret REST API key for subscriber lookups
    #[serde(default)]
    pub api_key: Option<SecretString>,
    /// Billing REST API base URL
    #[serde(default = "default_api_url")]
    pub api_url: Url,
    /// Entitlement that grants premium
    #[serde(default = "default_entitlement")]
    pub entitlement: String,
    /// Extra product id to plan mappings (`"monthly"` or `"annual"`)
    #[serde(default)]
    pub products: BTreeMap<String, String>,
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            webhook_secret: None,
            api_key: None,
            api_url: default_api_url(),
            entitlement: default_entitlement(),
            products: BTreeMap::new(),
        }
    }
}

#[allow(clippy::missing_panics_doc)]
pub fn default_billing_api_url() -> Url {
    Url::parse("https://api.revenuecat.com/").expect("static URL is valid")
}

fn default_api_url() -> Url {
    default_billing_api_url()
}

fn default_entitlement() -> String {
    "premium".to_owned()
}
