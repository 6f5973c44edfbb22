use std::collections::HashMap;
use std::time::Duration;

use flourish_config::BillingConfig;
use flourish_core::model::PremiumPlan;
use jiff::Timestamp;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use url::Url;

use crate::error::BillingError;
use crate::plan::ProductCatalog;

/// Premium state derived from the billing provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionStatus {
    pub has_premium: bool,
    pub plan: PremiumPlan,
}

impl SubscriptionStatus {
    pub const FREE: Self = Self {
        has_premium: false,
        plan: PremiumPlan::Free,
    };
}

#[derive(Debug, Deserialize)]
struct SubscriberResponse {
    #[serde(default)]
    subscriber: Option<Subscriber>,
}

#[derive(Debug, Deserialize)]
struct Subscriber {
    #[serde(default)]
    entitlements: HashMap<String, Entitlement>,
}

#[derive(Debug, Deserialize)]
struct Entitlement {
    /// `None` for lifetime purchases
    #[serde(default)]
    expires_date: Option<Timestamp>,
    #[serde(default)]
    product_identifier: Option<String>,
}

/// REST client for subscriber lookups
#[derive(Clone)]
pub struct SubscriberClient {
    http: reqwest::Client,
    base_url: Url,
    api_key: Option<SecretString>,
    entitlement: String,
    catalog: ProductCatalog,
}

impl SubscriberClient {
    /// Create a new subscriber client
    pub fn new(
        base_url: Url,
        api_key: Option<SecretString>,
        entitlement: String,
        catalog: ProductCatalog,
    ) -> Result<Self, BillingError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(BillingError::Request)?;

        Ok(Self {
            http,
            base_url,
            api_key,
            entitlement,
            catalog,
        })
    }

    pub fn from_config(config: &BillingConfig) -> Result<Self, BillingError> {
        Self::new(
            config.api_url.clone(),
            config.api_key.clone(),
            config.entitlement.clone(),
            ProductCatalog::with_extras(&config.products),
        )
    }

    pub const fn catalog(&self) -> &ProductCatalog {
        &self.catalog
    }

    /// Current premium state for a subscriber
    ///
    /// Any failure, including a missing API key, reports the free tier.
    pub async fn status(&self, app_user_id: &str, now: Timestamp) -> SubscriptionStatus {
        match self.premium_entitlement(app_user_id).await {
            Ok(Some(entitlement)) if entitlement.expires_date.is_none_or(|expires| expires > now) => {
                SubscriptionStatus {
                    has_premium: true,
                    plan: self.catalog.granted_plan(entitlement.product_identifier.as_deref()),
                }
            }
            Ok(_) => SubscriptionStatus::FREE,
            Err(BillingError::NotConfigured) => {
                tracing::warn!("no billing API key configured, reporting free tier");
                SubscriptionStatus::FREE
            }
            Err(e) => {
                tracing::error!(error = %e, app_user_id, "failed to fetch subscriber status");
                SubscriptionStatus::FREE
            }
        }
    }

    /// GET `/v1/subscribers/:app_user_id`
    async fn premium_entitlement(&self, app_user_id: &str) -> Result<Option<Entitlement>, BillingError> {
        let api_key = self.api_key.as_ref().ok_or(BillingError::NotConfigured)?;

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| BillingError::Api {
                status: 0,
                message: format!("invalid base URL: {}", self.base_url),
            })?
            .pop_if_empty()
            .extend(["v1", "subscribers", app_user_id]);

        let response = self
            .http
            .get(url)
            .bearer_auth(api_key.expose_secret())
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(BillingError::Api { status, message });
        }

        let body: SubscriberResponse = response.json().await?;

        Ok(body
            .subscriber
            .and_then(|mut subscriber| subscriber.entitlements.remove(&self.entitlement)))
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn now() -> Timestamp {
        "2025-06-01T00:00:00Z".parse().unwrap()
    }

    fn client(server: &MockServer, api_key: Option<&str>) -> SubscriberClient {
        SubscriberClient::new(
            Url::parse(&server.uri()).unwrap(),
            api_key.map(SecretString::from),
            "premium".to_owned(),
            ProductCatalog::default(),
        )
        .unwrap()
    }

    async fn respond_with(server: &MockServer, body: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path("/v1/subscribers/uid-1"))
            .and(header("authorization", "Bearer sk_test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn active_entitlement_is_premium() {
        let server = MockServer::start().await;
        respond_with(
            &server,
            serde_json::json!({
                "subscriber": {
                    "entitlements": {
                        "premium": {
                            "expires_date": "2025-07-01T00:00:00Z",
                            "product_identifier": "flourish_premium_annual"
                        }
                    }
                }
            }),
        )
        .await;

        let status = client(&server, Some("sk_test")).status("uid-1", now()).await;
        assert_eq!(
            status,
            SubscriptionStatus {
                has_premium: true,
                plan: PremiumPlan::Annual
            }
        );
    }

    #[tokio::test]
    async fn expired_entitlement_is_free() {
        let server = MockServer::start().await;
        respond_with(
            &server,
            serde_json::json!({
                "subscriber": {
                    "entitlements": {
                        "premium": { "expires_date": "2025-05-01T00:00:00Z", "product_identifier": "x" }
                    }
                }
            }),
        )
        .await;

        let status = client(&server, Some("sk_test")).status("uid-1", now()).await;
        assert_eq!(status, SubscriptionStatus::FREE);
    }

    #[tokio::test]
    async fn lifetime_entitlement_defaults_to_monthly_plan() {
        let server = MockServer::start().await;
        respond_with(
            &server,
            serde_json::json!({
                "subscriber": { "entitlements": { "premium": { "expires_date": null } } }
            }),
        )
        .await;

        let status = client(&server, Some("sk_test")).status("uid-1", now()).await;
        assert!(status.has_premium);
        assert_eq!(status.plan, PremiumPlan::Monthly);
    }

    #[tokio::test]
    async fn other_entitlements_are_ignored() {
        let server = MockServer::start().await;
        respond_with(
            &server,
            serde_json::json!({
                "subscriber": { "entitlements": { "pro": { "expires_date": "2030-01-01T00:00:00Z" } } }
            }),
        )
        .await;

        let status = client(&server, Some("sk_test")).status("uid-1", now()).await;
        assert_eq!(status, SubscriptionStatus::FREE);
    }

    #[tokio::test]
    async fn api_error_is_free() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let status = client(&server, Some("sk_test")).status("uid-1", now()).await;
        assert_eq!(status, SubscriptionStatus::FREE);
    }

    #[tokio::test]
    async fn missing_key_skips_request() {
        let server = MockServer::start().await;
        let status = client(&server, None).status("uid-1", now()).await;

        assert_eq!(status, SubscriptionStatus::FREE);
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn app_user_id_is_path_encoded() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/subscribers/a%2Fb"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .expect(1)
            .mount(&server)
            .await;

        client(&server, Some("sk_test")).status("a/b", now()).await;
    }
}
