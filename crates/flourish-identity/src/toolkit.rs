use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use flourish_config::IdentityConfig;
use mini_moka::sync::Cache;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use url::Url;

use crate::{IdentityError, IdentityVerifier, VerifiedToken};

#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    users: Vec<LookupUser>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LookupUser {
    local_id: String,
    #[serde(default)]
    email: Option<String>,
}

/// Verifies ID tokens with the Identity Toolkit `accounts:lookup` call
///
/// Successful verifications are cached by token hash for the configured TTL.
#[derive(Clone)]
pub struct IdentityToolkitVerifier {
    http: reqwest::Client,
    lookup_url: Url,
    api_key: SecretString,
    cache: Cache<String, Arc<VerifiedToken>>,
}

impl IdentityToolkitVerifier {
    /// Create a new verifier
    pub fn new(
        base_url: &Url,
        api_key: SecretString,
        cache_ttl: Duration,
        cache_capacity: u64,
    ) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder().timeout(Duration::from_secs(5)).build()?;

        let lookup_url = Url::parse(&format!("{}/accounts:lookup", base_url.as_str().trim_end_matches('/')))?;

        let cache = Cache::builder()
            .time_to_live(cache_ttl)
            .max_capacity(cache_capacity)
            .build();

        Ok(Self {
            http,
            lookup_url,
            api_key,
            cache,
        })
    }

    pub fn from_config(config: &IdentityConfig) -> anyhow::Result<Self> {
        Self::new(
            &config.base_url,
            config.api_key.clone(),
            Duration::from_secs(config.cache_ttl_seconds),
            config.cache_capacity,
        )
    }

    /// Drop a cached verification (e.g. after sign-out)
    pub fn invalidate(&self, id_token: &str) {
        self.cache.invalidate(&sha256_hex(id_token));
    }

    async fn lookup(&self, id_token: &str) -> Result<VerifiedToken, IdentityError> {
        let response = self
            .http
            .post(self.lookup_url.clone())
            .query(&[("key", self.api_key.expose_secret())])
            .json(&serde_json::json!({ "idToken": id_token }))
            .send()
            .await?;

        let status = response.status();

        // The toolkit answers 400 INVALID_ID_TOKEN / TOKEN_EXPIRED / USER_NOT_FOUND
        if status == reqwest::StatusCode::BAD_REQUEST {
            return Err(IdentityError::InvalidToken);
        }

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(IdentityError::Provider {
                status: status.as_u16(),
                message,
            });
        }

        let body: LookupResponse = response.json().await.map_err(|e| IdentityError::Provider {
            status: status.as_u16(),
            message: format!("failed to parse response: {e}"),
        })?;

        let user = body.users.into_iter().next().ok_or(IdentityError::InvalidToken)?;

        Ok(VerifiedToken {
            uid: user.local_id,
            email: user.email.filter(|email| !email.is_empty()),
        })
    }
}

#[async_trait]
impl IdentityVerifier for IdentityToolkitVerifier {
    async fn verify(&self, id_token: &str) -> Result<VerifiedToken, IdentityError> {
        if id_token.trim().is_empty() {
            return Err(IdentityError::InvalidToken);
        }

        let cache_key = sha256_hex(id_token);

        if let Some(cached) = self.cache.get(&cache_key) {
            return Ok(VerifiedToken::clone(&cached));
        }

        let verified = self.lookup(id_token).await?;
        tracing::debug!(uid = %verified.uid, "verified ID token");

        self.cache.insert(cache_key, Arc::new(verified.clone()));

        Ok(verified)
    }
}

fn sha256_hex(input: &str) -> String {
    format!("{:x}", Sha256::digest(input.as_bytes()))
}
