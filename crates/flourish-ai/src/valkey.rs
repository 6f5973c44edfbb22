use async_trait::async_trait;
use flourish_core::model::{AiCacheEntry, AiEndpoint};
use jiff::Timestamp;
use serde_json::Value;

use crate::cache::AiCacheStore;
use crate::error::CacheError;

/// AI response cache shared across instances through Valkey
///
/// Each `(user, endpoint, hash)` maps to one key whose Valkey TTL matches
/// the entry's remaining lifetime, so the server does the expiry.
#[derive(Clone)]
pub struct ValkeyAiCache {
    client: redis::Client,
    key_prefix: String,
}

impl ValkeyAiCache {
    pub fn new(url: &str, key_prefix: impl Into<String>) -> Result<Self, CacheError> {
        let client = redis::Client::open(url).map_err(|e| CacheError::Backend(format!("invalid URL: {e}")))?;

        Ok(Self {
            client,
            key_prefix: key_prefix.into(),
        })
    }

    fn key(&self, user_id: &str, endpoint: AiEndpoint, prompt_hash: &str) -> String {
        format!("{}:{user_id}:{endpoint}:{prompt_hash}", self.key_prefix)
    }

    async fn connection(&self) -> Result<redis::aio::MultiplexedConnection, CacheError> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| CacheError::Backend(format!("connection failed: {e}")))
    }
}

#[async_trait]
impl AiCacheStore for ValkeyAiCache {
    async fn lookup(
        &self,
        user_id: &str,
        endpoint: AiEndpoint,
        prompt_hash: &str,
        now: Timestamp,
    ) -> Result<Option<Value>, CacheError> {
        use redis::AsyncCommands;

        let mut conn = self.connection().await?;
        let key = self.key(user_id, endpoint, prompt_hash);

        let raw: Option<String> = conn
            .get(&key)
            .await
            .map_err(|e| CacheError::Backend(format!("GET failed: {e}")))?;

        let Some(raw) = raw else {
            tracing::debug!(%endpoint, "ai cache miss");
            return Ok(None);
        };

        let entry: AiCacheEntry =
            serde_json::from_str(&raw).map_err(|e| CacheError::Serialization(format!("deserialize: {e}")))?;

        // Valkey expiry has second granularity
        if entry.expires_at <= now {
            return Ok(None);
        }

        tracing::debug!(%endpoint, "ai cache hit");
        Ok(Some(entry.response))
    }

    async fn insert(&self, entry: AiCacheEntry) -> Result<(), CacheError> {
        use redis::AsyncCommands;

        let ttl_secs = entry.expires_at.duration_since(entry.created_at).as_secs();
        let Ok(ttl_secs) = u64::try_from(ttl_secs) else {
            return Ok(());
        };
        if ttl_secs == 0 {
            return Ok(());
        }

        let mut conn = self.connection().await?;
        let key = self.key(&entry.user_id, entry.endpoint, &entry.prompt_hash);
        let data =
            serde_json::to_string(&entry).map_err(|e| CacheError::Serialization(format!("serialize: {e}")))?;

        let _: () = conn
            .set_ex(&key, &data, ttl_secs)
            .await
            .map_err(|e| CacheError::Backend(format!("SET failed: {e}")))?;

        tracing::debug!(endpoint = %entry.endpoint, ttl_secs, "cached ai response");
        Ok(())
    }
}
