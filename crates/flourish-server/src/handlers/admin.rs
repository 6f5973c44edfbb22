use axum::extract::State;
use flourish_core::ApiError;
use flourish_core::model::{PremiumPlan, User};
use serde::{Deserialize, Serialize};

use crate::auth::VerifiedCaller;
use crate::error::ApiResult;
use crate::extract::ApiJson;
use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetPremiumPayload {
    #[serde(default)]
    uid: Option<String>,
    #[serde(default)]
    has_premium: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct SetPremiumResponse {
    user: User,
}

/// `POST /admin/set-premium`: toggle the caller's own premium flag
///
/// Grants use the `hackathon` plan so billing syncs leave them in place.
pub async fn set_premium(
    State(state): State<AppState>,
    VerifiedCaller(token): VerifiedCaller,
    ApiJson(body): ApiJson<SetPremiumPayload>,
) -> ApiResult<ApiResponse<SetPremiumResponse>> {
    let target = body.uid.filter(|uid| !uid.is_empty()).unwrap_or_else(|| token.uid.clone());
    let has_premium = body.has_premium.unwrap_or(true);

    if target != token.uid {
        tracing::warn!(caller = %token.uid, %target, "refusing to change another user's premium flag");
        return Err(ApiError::Forbidden.into());
    }

    let now = state.now();
    let user = state
        .store
        .update_user(&target, &|record: &mut User| {
            record.has_premium = has_premium;
            record.premium_plan = if has_premium { PremiumPlan::Hackathon } else { PremiumPlan::Free };
            record.updated_at = now;
        })
        .await?
        .ok_or_else(|| ApiError::not_found("User"))?;

    tracing::info!(uid = %user.id, has_premium, "premium flag set manually");

    Ok(ApiResponse::ok(SetPremiumResponse { user }))
}
