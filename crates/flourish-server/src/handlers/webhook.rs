use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use flourish_billing::{EntitlementAction, SIGNATURE_HEADER, WebhookEvent, WebhookPayload, classify_event, verify_signature};
use flourish_core::ApiError;
use flourish_core::model::{ActivityAction, PremiumPlan, User};
use flourish_store::StoreError;
use http::HeaderMap;
use serde_json::json;

use super::record_activity;
use crate::error::AppError;
use crate::state::AppState;

/// `POST /webhooks/revenuecat`: apply subscription lifecycle events
///
/// Authenticated by HMAC signature rather than a bearer token. Once the
/// payload is accepted the response is always 200 so the provider does not
/// retry; failures are reported in the body.
pub async fn revenuecat(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> Response {
    let signature = headers.get(SIGNATURE_HEADER).and_then(|v| v.to_str().ok());

    if !verify_signature(state.webhook_secret.as_ref(), &body, signature) {
        tracing::error!("invalid webhook signature");
        return AppError(ApiError::Unauthorized).into_response();
    }

    let Ok(payload) = serde_json::from_slice::<WebhookPayload>(&body) else {
        return AppError(ApiError::bad_request("Invalid JSON body")).into_response();
    };

    let Some(event) = payload.event else {
        return AppError(ApiError::bad_request("Invalid webhook payload")).into_response();
    };
    let Some((event_type, app_user_id)) = event.identity() else {
        return AppError(ApiError::bad_request("Invalid webhook payload")).into_response();
    };

    tracing::info!(event_type, app_user_id, "billing webhook received");

    let action = classify_event(event_type);
    if action == EntitlementAction::Ignore {
        tracing::info!(event_type, "ignoring billing event");
        return received("ignored");
    }

    match apply(&state, &event, action).await {
        Ok(true) => received(action.as_ref()),
        Ok(false) => {
            tracing::error!(app_user_id, "billing webhook for unknown user");
            received("user_not_found")
        }
        Err(e) => {
            tracing::error!(error = %e, "billing webhook failed");
            Json(json!({ "ok": true, "received": true, "error": "internal" })).into_response()
        }
    }
}

fn received(action: &str) -> Response {
    Json(json!({ "ok": true, "received": true, "action": action })).into_response()
}

/// Apply a grant or revoke; `Ok(false)` when no user matches the event
async fn apply(state: &AppState, event: &WebhookEvent, action: EntitlementAction) -> Result<bool, StoreError> {
    let Some((event_type, app_user_id)) = event.identity() else {
        return Ok(false);
    };

    let user_id = match state.store.get_user(app_user_id).await? {
        Some(user) => user.id,
        None => match state.store.find_user_by_revenuecat_id(app_user_id).await? {
            Some(user) => user.id,
            None => return Ok(false),
        },
    };

    let now = state.now();
    let product = event.product_id.as_deref();

    match action {
        EntitlementAction::Grant => {
            let plan = state.billing.catalog().granted_plan(product);
            state
                .store
                .update_user(&user_id, &|record: &mut User| {
                    record.has_premium = true;
                    record.premium_plan = plan;
                    record.revenuecat_id = Some(app_user_id.to_owned());
                    record.updated_at = now;
                })
                .await?;

            record_activity(
                state,
                &user_id,
                ActivityAction::AppOpen,
                json!({ "event": "subscription_granted", "type": event_type, "product": product, "plan": plan }),
            )
            .await?;

            tracing::info!(uid = %user_id, %plan, "granted premium");
        }
        EntitlementAction::Revoke => {
            state
                .store
                .update_user(&user_id, &|record: &mut User| {
                    record.has_premium = false;
                    record.premium_plan = PremiumPlan::Free;
                    record.updated_at = now;
                })
                .await?;

            record_activity(
                state,
                &user_id,
                ActivityAction::AppOpen,
                json!({ "event": "subscription_revoked", "type": event_type, "product": product }),
            )
            .await?;

            tracing::info!(uid = %user_id, "revoked premium");
        }
        EntitlementAction::Ignore => {}
    }

    Ok(true)
}
