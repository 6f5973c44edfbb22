use serde::Deserialize;

/// Effect a subscription event has on premium access
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum EntitlementAction {
    Grant,
    Revoke,
    Ignore,
}

/// Classify a webhook event type
pub fn classify_event(event_type: &str) -> EntitlementAction {
    match event_type {
        "INITIAL_PURCHASE" | "RENEWAL" | "UNCANCELLATION" | "PRODUCT_CHANGE" => EntitlementAction::Grant,
        "EXPIRATION" | "CANCELLATION" | "BILLING_ISSUE" => EntitlementAction::Revoke,
        _ => EntitlementAction::Ignore,
    }
}

/// Webhook request body
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookPayload {
    #[serde(default)]
    pub api_version: Option<String>,
    #[serde(default)]
    pub event: Option<WebhookEvent>,
}

/// Subscription lifecycle event
///
/// Only the fields the backend acts on are required to be present; the
/// rest of the provider's event body is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEvent {
    #[serde(default, rename = "type")]
    pub event_type: Option<String>,
    #[serde(default)]
    pub app_user_id: Option<String>,
    #[serde(default)]
    pub product_id: Option<String>,
    #[serde(default)]
    pub entitlement_ids: Vec<String>,
    #[serde(default)]
    pub period_type: Option<String>,
    #[serde(default)]
    pub purchased_at_ms: Option<i64>,
    #[serde(default)]
    pub expiration_at_ms: Option<i64>,
    #[serde(default)]
    pub environment: Option<String>,
    #[serde(default)]
    pub store: Option<String>,
}

impl WebhookEvent {
    /// Event type and app user id, when both are non-empty
    pub fn identity(&self) -> Option<(&str, &str)> {
        let event_type = self.event_type.as_deref().filter(|t| !t.is_empty())?;
        let app_user_id = self.app_user_id.as_deref().filter(|id| !id.is_empty())?;
        Some((event_type, app_user_id))
    }
}
