use std::sync::Arc;
use std::time::Duration;

use flourish_config::{AiCacheStorage, AiConfig, CacheTtlConfig};
use flourish_core::Clock;
use flourish_core::model::{AiCacheEntry, AiEndpoint, Profile};
use jiff::{SignedDuration, Timestamp};
use serde_json::Value;
use strum::IntoEnumIterator;

use crate::cache::{AiCacheStore, MemoryAiCache};
use crate::context::{assemble_prompt, build_user_context, prompt_hash};
use crate::generator::{GeminiGenerator, Generator};
use crate::valkey::ValkeyAiCache;

/// Cache lifetime per endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheTtls {
    smart_swap: Duration,
    meal_plan: Duration,
    goal: Duration,
    chat: Duration,
}

impl Default for CacheTtls {
    fn default() -> Self {
        const HOUR: u64 = 60 * 60;

        Self {
            smart_swap: Duration::from_secs(24 * HOUR),
            meal_plan: Duration::from_secs(12 * HOUR),
            goal: Duration::from_secs(48 * HOUR),
            chat: Duration::from_secs(HOUR),
        }
    }
}

impl CacheTtls {
    pub fn from_config(config: &CacheTtlConfig) -> anyhow::Result<Self> {
        let mut ttls = Self::default();
        for endpoint in AiEndpoint::iter() {
            ttls.set(endpoint, config.ttl_for(endpoint)?);
        }
        Ok(ttls)
    }

    pub const fn get(&self, endpoint: AiEndpoint) -> Duration {
        match endpoint {
            AiEndpoint::SmartSwap => self.smart_swap,
            AiEndpoint::MealPlan => self.meal_plan,
            AiEndpoint::Goal => self.goal,
            AiEndpoint::Chat => self.chat,
        }
    }

    #[must_use]
    pub const fn with(mut self, endpoint: AiEndpoint, ttl: Duration) -> Self {
        self.set(endpoint, ttl);
        self
    }

    const fn set(&mut self, endpoint: AiEndpoint, ttl: Duration) {
        match endpoint {
            AiEndpoint::SmartSwap => self.smart_swap = ttl,
            AiEndpoint::MealPlan => self.meal_plan = ttl,
            AiEndpoint::Goal => self.goal = ttl,
            AiEndpoint::Chat => self.chat = ttl,
        }
    }
}

/// One generation call
#[derive(Debug, Clone)]
pub struct GenerateRequest<'a> {
    pub user_id: &'a str,
    pub endpoint: AiEndpoint,
    pub system_prompt: &'a str,
    pub user_prompt: &'a str,
    pub profile: Option<&'a Profile>,
    /// Skip the lookup; a fresh response is still stored
    pub skip_cache: bool,
    /// Returned when generation is unavailable or fails
    pub fallback: Value,
}

/// Where a response came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum ResponseSource {
    Cache,
    Generated,
    Fallback,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Generated {
    pub value: Value,
    pub source: ResponseSource,
}

impl Generated {
    pub fn cached(&self) -> bool {
        self.source == ResponseSource::Cache
    }
}

/// Cache-aside generation with canned fallbacks
#[derive(Clone)]
pub struct AiService {
    generator: Option<Arc<dyn Generator>>,
    cache: Arc<dyn AiCacheStore>,
    clock: Arc<dyn Clock>,
    ttls: CacheTtls,
}

impl AiService {
    pub fn new(
        generator: Option<Arc<dyn Generator>>,
        cache: Arc<dyn AiCacheStore>,
        clock: Arc<dyn Clock>,
        ttls: CacheTtls,
    ) -> Self {
        Self {
            generator,
            cache,
            clock,
            ttls,
        }
    }

    /// Wire the Gemini client and cache backend described by `config`
    pub fn from_config(config: &AiConfig, clock: Arc<dyn Clock>) -> anyhow::Result<Self> {
        let generator = GeminiGenerator::from_config(config)?.map(|g| Arc::new(g) as Arc<dyn Generator>);

        if generator.is_none() {
            tracing::warn!("no Gemini API key configured, AI endpoints will serve canned responses");
        }

        let cache: Arc<dyn AiCacheStore> = match &config.cache {
            AiCacheStorage::Memory => Arc::new(MemoryAiCache::new()),
            AiCacheStorage::Valkey(valkey) => {
                tracing::info!(prefix = %valkey.key_prefix, "using Valkey AI response cache");
                Arc::new(ValkeyAiCache::new(valkey.url.as_str(), valkey.key_prefix.clone())?)
            }
        };

        let ttls = CacheTtls::from_config(&config.cache_ttl)?;

        Ok(Self::new(generator, cache, clock, ttls))
    }

    pub fn has_generator(&self) -> bool {
        self.generator.is_some()
    }

    /// Answer from cache, the model, or the fallback, in that order
    ///
    /// Never fails. Cache errors count as misses and generation errors
    /// produce the fallback.
    pub async fn generate(&self, request: GenerateRequest<'_>) -> Generated {
        let endpoint = request.endpoint;
        let context = build_user_context(request.profile);
        let prompt = assemble_prompt(request.system_prompt, &context, request.user_prompt);
        let hash = prompt_hash(&prompt);

        if !request.skip_cache {
            match self
                .cache
                .lookup(request.user_id, endpoint, &hash, self.clock.now())
                .await
            {
                Ok(Some(value)) => {
                    tracing::debug!(%endpoint, "ai cache hit");
                    return Generated {
                        value,
                        source: ResponseSource::Cache,
                    };
                }
                Ok(None) => {}
                Err(e) => tracing::warn!(%endpoint, error = %e, "ai cache lookup failed"),
            }
        }

        let Some(generator) = &self.generator else {
            tracing::debug!(%endpoint, "no generator configured, using fallback");
            return fallback(request.fallback);
        };

        let text = match generator.generate(&prompt).await {
            Ok(text) => text,
            Err(e) => {
                tracing::error!(%endpoint, error = %e, "generation failed, using fallback");
                return fallback(request.fallback);
            }
        };

        let value: Value = match serde_json::from_str(&text) {
            Ok(value) => value,
            Err(e) => {
                tracing::error!(%endpoint, error = %e, "generator returned invalid JSON, using fallback");
                return fallback(request.fallback);
            }
        };

        self.store(request.user_id, endpoint, hash, value.clone()).await;

        tracing::info!(%endpoint, "fresh ai response");

        Generated {
            value,
            source: ResponseSource::Generated,
        }
    }

    async fn store(&self, user_id: &str, endpoint: AiEndpoint, hash: String, value: Value) {
        let now = self.clock.now();
        let Some(expires_at) = expiry(now, self.ttls.get(endpoint)) else {
            tracing::warn!(%endpoint, "ai cache ttl out of range, not caching");
            return;
        };

        let entry = AiCacheEntry {
            user_id: user_id.to_owned(),
            endpoint,
            prompt_hash: hash,
            response: value,
            created_at: now,
            expires_at,
        };

        if let Err(e) = self.cache.insert(entry).await {
            tracing::warn!(%endpoint, error = %e, "failed to cache ai response");
        }
    }
}

fn expiry(now: Timestamp, ttl: Duration) -> Option<Timestamp> {
    let ttl = SignedDuration::try_from(ttl).ok()?;
    now.checked_add(ttl).ok()
}

const fn fallback(value: Value) -> Generated {
    Generated {
        value,
        source: ResponseSource::Fallback,
    }
}
