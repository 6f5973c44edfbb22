use axum::extract::State;
use flourish_core::{ApiError, round_money};
use flourish_core::model::{ActivityAction, ChallengeStatus, PremiumPlan, Profile, User};
use flourish_store::WinQuery;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::record_activity;
use crate::auth::{AuthUser, VerifiedCaller};
use crate::error::ApiResult;
use crate::extract::ApiJson;
use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitUserPayload {
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitUserResponse {
    user: User,
    profile: Option<Profile>,
    is_new: bool,
}

/// `POST /user/init`: create the user on first sign-in
pub async fn init(
    State(state): State<AppState>,
    VerifiedCaller(token): VerifiedCaller,
    ApiJson(body): ApiJson<InitUserPayload>,
) -> ApiResult<ApiResponse<InitUserResponse>> {
    let email = body
        .email
        .filter(|e| !e.is_empty())
        .or_else(|| token.email.clone().filter(|e| !e.is_empty()))
        .ok_or_else(|| ApiError::bad_request("Email is required"))?;

    if let Some(user) = state.store.get_user(&token.uid).await? {
        let profile = state.store.get_profile(&token.uid).await?;
        return Ok(ApiResponse::ok(InitUserResponse {
            user,
            profile,
            is_new: false,
        }));
    }

    let now = state.now();
    let user = User::new(token.uid.clone(), email, now);
    let profile = Profile::empty(token.uid.clone(), body.display_name, now);

    state.store.put_user(user.clone()).await?;
    state.store.put_profile(profile.clone()).await?;
    record_activity(&state, &user.id, ActivityAction::AppOpen, json!({ "event": "first_init" })).await?;

    tracing::info!(uid = %user.id, "initialized new user");

    Ok(ApiResponse::created(InitUserResponse {
        user,
        profile: Some(profile),
        is_new: true,
    }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    user: UserView,
    profile: ProfileView,
    subscription: SubscriptionView,
    stats: StatsView,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UserView {
    id: String,
    email: String,
    has_premium: bool,
    premium_plan: PremiumPlan,
    streak_days: u32,
    total_savings: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProfileView {
    display_name: Option<String>,
    num_kids: u32,
    kids_ages: Option<Vec<u32>>,
    monthly_income: Option<f64>,
    monthly_budget: Option<f64>,
    savings_goal: Option<f64>,
    savings_goal_label: Option<String>,
    bio: Option<String>,
    avatar_url: Option<String>,
    onboarding_complete: bool,
    dietary_preferences: Option<Vec<String>>,
}

impl From<Profile> for ProfileView {
    fn from(profile: Profile) -> Self {
        Self {
            display_name: profile.display_name,
            num_kids: profile.num_kids,
            kids_ages: profile.kids_ages,
            monthly_income: profile.monthly_income,
            monthly_budget: profile.monthly_budget,
            savings_goal: profile.savings_goal,
            savings_goal_label: profile.savings_goal_label,
            bio: profile.bio,
            avatar_url: profile.avatar_url,
            onboarding_complete: profile.onboarding_complete,
            dietary_preferences: profile.dietary_preferences,
        }
    }
}

#[derive(Debug, Serialize)]
struct SubscriptionView {
    plan: PremiumPlan,
    active: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StatsView {
    total_wins: usize,
    total_saved: f64,
    active_challenges: usize,
}

/// `GET /user/profile`
pub async fn get_profile(State(state): State<AppState>, user: AuthUser) -> ApiResult<ApiResponse<ProfileResponse>> {
    let profile = state
        .store
        .get_profile(&user.id)
        .await?
        .ok_or_else(|| ApiError::not_found("Profile"))?;

    Ok(ApiResponse::ok(profile_response(&state, &user, profile).await?))
}

/// Profile fields a client may change
///
/// Fields that are present, even as `null`, are applied; absent fields are
/// left alone.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfilePayload {
    #[serde(default, with = "::serde_with::rust::double_option")]
    display_name: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    num_kids: Option<Option<u32>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    kids_ages: Option<Option<Vec<u32>>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    monthly_income: Option<Option<f64>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    monthly_budget: Option<Option<f64>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    savings_goal: Option<Option<f64>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    savings_goal_label: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    bio: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    avatar_url: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    dietary_preferences: Option<Option<Vec<String>>>,
}

impl UpdateProfilePayload {
    /// Apply the provided fields, returning the stored names of those changed
    fn apply(self, profile: &mut Profile) -> Vec<&'static str> {
        let mut fields = Vec::new();

        let onboarding = self.display_name.is_some()
            || self.num_kids.is_some()
            || self.monthly_budget.is_some()
            || self.savings_goal.is_some()
            || self.monthly_income.is_some();

        if let Some(value) = self.display_name {
            profile.display_name = value;
            fields.push("display_name");
        }
        if let Some(value) = self.num_kids {
            profile.num_kids = value.unwrap_or_default();
            fields.push("num_kids");
        }
        if let Some(value) = self.kids_ages {
            profile.kids_ages = value;
            fields.push("kids_ages");
        }
        if let Some(value) = self.monthly_income {
            profile.monthly_income = value;
            fields.push("monthly_income");
        }
        if let Some(value) = self.monthly_budget {
            profile.monthly_budget = value;
            fields.push("monthly_budget");
        }
        if let Some(value) = self.savings_goal {
            profile.savings_goal = value;
            fields.push("savings_goal");
        }
        if let Some(value) = self.savings_goal_label {
            profile.savings_goal_label = value;
            fields.push("savings_goal_label");
        }
        if let Some(value) = self.bio {
            profile.bio = value;
            fields.push("bio");
        }
        if let Some(value) = self.avatar_url {
            profile.avatar_url = value;
            fields.push("avatar_url");
        }
        if let Some(value) = self.dietary_preferences {
            profile.dietary_preferences = value;
            fields.push("dietary_preferences");
        }

        if onboarding {
            profile.onboarding_complete = true;
            fields.push("onboarding_complete");
        }

        fields
    }
}

/// `PUT /user/profile`: partial update, creating the profile if needed
pub async fn update_profile(
    State(state): State<AppState>,
    user: AuthUser,
    ApiJson(body): ApiJson<UpdateProfilePayload>,
) -> ApiResult<ApiResponse<ProfileResponse>> {
    let now = state.now();
    let mut profile = state
        .store
        .get_profile(&user.id)
        .await?
        .unwrap_or_else(|| Profile::empty(user.id.clone(), None, now));

    let fields = body.apply(&mut profile);
    if fields.is_empty() {
        return Err(ApiError::bad_request("No fields to update").into());
    }

    profile.updated_at = now;
    state.store.put_profile(profile.clone()).await?;
    record_activity(&state, &user.id, ActivityAction::ProfileUpdated, json!({ "fields": fields })).await?;

    Ok(ApiResponse::ok(profile_response(&state, &user, profile).await?))
}

async fn profile_response(state: &AppState, user: &AuthUser, profile: Profile) -> ApiResult<ProfileResponse> {
    let record = state.store.get_user(&user.id).await?;
    let wins = state.store.list_wins(&user.id, &WinQuery::default()).await?;
    let active_challenges = state
        .store
        .list_user_challenges(&user.id)
        .await?
        .iter()
        .filter(|uc| uc.status == ChallengeStatus::Active)
        .count();

    let (has_premium, premium_plan, streak_days, total_savings) = record.map_or(
        (false, PremiumPlan::Free, 0, 0.0),
        |u| (u.has_premium, u.premium_plan, u.streak_days, u.total_savings),
    );

    Ok(ProfileResponse {
        user: UserView {
            id: user.id.clone(),
            email: user.email.clone(),
            has_premium,
            premium_plan,
            streak_days,
            total_savings,
        },
        profile: profile.into(),
        subscription: SubscriptionView {
            plan: premium_plan,
            active: has_premium,
        },
        stats: StatsView {
            total_wins: wins.len(),
            total_saved: round_money(wins.iter().map(|w| w.amount_saved).sum()),
            active_challenges,
        },
    })
}

#[derive(Debug, Serialize)]
pub struct SyncSubscriptionResponse {
    user: User,
    subscription: SubscriptionView,
}

/// `POST /user/sync-subscription`: refresh premium state from billing
///
/// Manual `hackathon` grants survive a lookup that reports the free tier.
pub async fn sync_subscription(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<ApiResponse<SyncSubscriptionResponse>> {
    let now = state.now();
    let status = state.billing.status(&user.id, now).await;

    let updated = state
        .store
        .update_user(&user.id, &|record: &mut User| {
            if status.has_premium {
                record.has_premium = true;
                record.premium_plan = status.plan;
                if record.revenuecat_id.is_none() {
                    record.revenuecat_id = Some(record.id.clone());
                }
            } else if record.premium_plan != PremiumPlan::Hackathon {
                record.has_premium = false;
                record.premium_plan = PremiumPlan::Free;
            }
            record.updated_at = now;
        })
        .await?
        .ok_or_else(|| ApiError::not_found("User"))?;

    tracing::info!(uid = %user.id, has_premium = updated.has_premium, plan = %updated.premium_plan, "synced subscription");

    Ok(ApiResponse::ok(SyncSubscriptionResponse {
        subscription: SubscriptionView {
            plan: updated.premium_plan,
            active: updated.has_premium,
        },
        user: updated,
    }))
}
