use std::sync::Arc;

use flourish_ai::AiService;
use flourish_billing::SubscriberClient;
use flourish_config::Config;
use flourish_core::model::Challenge;
use flourish_core::{Clock, SystemClock};
use flourish_identity::{IdentityToolkitVerifier, IdentityVerifier};
use flourish_store::{MemoryStore, Store};
use jiff::Timestamp;
use secrecy::SecretString;

use crate::catalog;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    /// Absent when `[identity]` is not configured; every token is rejected
    pub identity: Option<Arc<dyn IdentityVerifier>>,
    pub ai: AiService,
    pub billing: SubscriberClient,
    pub webhook_secret: Option<SecretString>,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Build state reading time from `clock`
    pub fn with_clock(config: &Config, clock: Arc<dyn Clock>) -> anyhow::Result<Self> {
        let challenges: Vec<Challenge> = if config.challenges.is_empty() {
            catalog::default_challenges()
        } else {
            config.challenges.iter().cloned().map(Challenge::from).collect()
        };
        tracing::debug!(count = challenges.len(), "loaded challenge catalog");

        let store: Arc<dyn Store> = Arc::new(MemoryStore::with_challenges(challenges));

        let identity = match &config.identity {
            Some(identity) => Some(Arc::new(IdentityToolkitVerifier::from_config(identity)?) as Arc<dyn IdentityVerifier>),
            None => {
                tracing::warn!("no [identity] section configured, authenticated routes will reject all tokens");
                None
            }
        };

        let ai = AiService::from_config(&config.ai, Arc::clone(&clock))?;
        let billing = SubscriberClient::from_config(&config.billing)?;

        if config.billing.webhook_secret.is_none() {
            tracing::warn!("no billing webhook secret configured, webhook signatures are not verified");
        }

        Ok(Self {
            store,
            identity,
            ai,
            billing,
            webhook_secret: config.billing.webhook_secret.clone(),
            clock,
        })
    }

    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }
}
