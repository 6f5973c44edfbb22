use async_trait::async_trait;
use flourish_core::model::{AiCacheEntry, AiEndpoint};
use jiff::Timestamp;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::error::CacheError;

/// Storage for generated AI responses
#[async_trait]
pub trait AiCacheStore: Send + Sync {
    /// Newest unexpired response for `(user, endpoint, hash)`
    async fn lookup(
        &self,
        user_id: &str,
        endpoint: AiEndpoint,
        prompt_hash: &str,
        now: Timestamp,
    ) -> Result<Option<Value>, CacheError>;

    async fn insert(&self, entry: AiCacheEntry) -> Result<(), CacheError>;
}

/// Insert-only in-process cache
///
/// Expired entries are filtered out on read and never removed.
#[derive(Debug, Default)]
pub struct MemoryAiCache {
    entries: RwLock<Vec<AiCacheEntry>>,
}

impl MemoryAiCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries, stale ones included
    pub async fn entry_count(&self) -> usize {
        self.entries.read().await.len()
    }
}

#[async_trait]
impl AiCacheStore for MemoryAiCache {
    async fn lookup(
        &self,
        user_id: &str,
        endpoint: AiEndpoint,
        prompt_hash: &str,
        now: Timestamp,
    ) -> Result<Option<Value>, CacheError> {
        let entries = self.entries.read().await;

        Ok(entries
            .iter()
            .filter(|entry| {
                entry.user_id == user_id
                    && entry.endpoint == endpoint
                    && entry.prompt_hash == prompt_hash
                    && entry.expires_at > now
            })
            .max_by_key(|entry| entry.expires_at)
            .map(|entry| entry.response.clone()))
    }

    async fn insert(&self, entry: AiCacheEntry) -> Result<(), CacheError> {
        self.entries.write().await.push(entry);
        Ok(())
    }
}
