//! AI assistant endpoints
//!
//! Each handler validates its payload, builds a prompt and hands it to
//! [`AiService::generate`](flourish_ai::AiService::generate), which never
//! fails. Usage is logged for every answered request.

use axum::extract::State;
use flourish_ai::prompts::{chat, goal, meal_plan, smart_swap};
use flourish_ai::{GenerateRequest, log_ai_usage};
use flourish_core::ApiError;
use flourish_core::model::{AiEndpoint, Profile};
use flourish_store::WinQuery;
use serde::Deserialize;
use serde_json::Value;

use super::month_start;
use crate::auth::{AuthUser, PremiumUser};
use crate::error::ApiResult;
use crate::extract::ApiJson;
use crate::response::ApiResponse;
use crate::state::AppState;

struct Ask<'a> {
    endpoint: AiEndpoint,
    system_prompt: &'a str,
    user_prompt: &'a str,
    profile: Option<&'a Profile>,
    skip_cache: bool,
    fallback: Value,
}

async fn ask(state: &AppState, user_id: &str, ask: Ask<'_>) -> ApiResponse<Value> {
    let endpoint = ask.endpoint;
    let generated = state
        .ai
        .generate(GenerateRequest {
            user_id,
            endpoint,
            system_prompt: ask.system_prompt,
            user_prompt: ask.user_prompt,
            profile: ask.profile,
            skip_cache: ask.skip_cache,
            fallback: ask.fallback,
        })
        .await;

    tracing::debug!(user_id, %endpoint, source = %generated.source, "ai response ready");
    log_ai_usage(state.store.as_ref(), state.now(), user_id, endpoint, generated.cached()).await;

    ApiResponse::ok(generated.value)
}

#[derive(Debug, Deserialize)]
pub struct SmartSwapPayload {
    #[serde(default)]
    item: Option<String>,
    #[serde(default)]
    budget: Option<f64>,
}

/// `POST /ai/smart-swap`
pub async fn smart_swap(
    State(state): State<AppState>,
    PremiumUser(user): PremiumUser,
    ApiJson(body): ApiJson<SmartSwapPayload>,
) -> ApiResult<ApiResponse<Value>> {
    let item = body
        .item
        .filter(|item| !item.is_empty())
        .ok_or_else(|| ApiError::bad_request(r#"item is required (e.g. "branded cereal")"#))?;

    let profile = state.store.get_profile(&user.id).await?;
    let prompt = smart_swap::user_prompt(&item, body.budget);

    Ok(ask(
        &state,
        &user.id,
        Ask {
            endpoint: AiEndpoint::SmartSwap,
            system_prompt: smart_swap::SYSTEM_PROMPT,
            user_prompt: &prompt,
            profile: profile.as_ref(),
            skip_cache: false,
            fallback: smart_swap::fallback(),
        },
    )
    .await)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealPlanPayload {
    #[serde(default)]
    days: Option<i64>,
    #[serde(default)]
    budget: Option<f64>,
    #[serde(default)]
    num_people: Option<u32>,
    #[serde(default)]
    dietary_preferences: Option<Vec<String>>,
}

/// `POST /ai/meal-plan`, open to free users
pub async fn meal_plan(
    State(state): State<AppState>,
    user: AuthUser,
    ApiJson(body): ApiJson<MealPlanPayload>,
) -> ApiResult<ApiResponse<Value>> {
    let days = body.days.unwrap_or(meal_plan::DEFAULT_DAYS);
    if !(1..=7).contains(&days) {
        return Err(ApiError::bad_request("days must be between 1 and 7").into());
    }

    let profile = state.store.get_profile(&user.id).await?;
    let prompt = meal_plan::user_prompt(
        days,
        body.num_people.unwrap_or(meal_plan::DEFAULT_PEOPLE),
        body.budget.unwrap_or(meal_plan::DEFAULT_BUDGET),
        body.dietary_preferences.as_deref().unwrap_or_default(),
    );

    Ok(ask(
        &state,
        &user.id,
        Ask {
            endpoint: AiEndpoint::MealPlan,
            system_prompt: meal_plan::SYSTEM_PROMPT,
            user_prompt: &prompt,
            profile: profile.as_ref(),
            skip_cache: false,
            fallback: meal_plan::fallback(),
        },
    )
    .await)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalPayload {
    #[serde(default)]
    goal_amount: Option<f64>,
    #[serde(default)]
    goal_label: Option<String>,
    #[serde(default)]
    timeframe_months: Option<f64>,
    #[serde(default)]
    current_savings: Option<f64>,
}

/// `POST /ai/goal`
pub async fn goal(
    State(state): State<AppState>,
    PremiumUser(user): PremiumUser,
    ApiJson(body): ApiJson<GoalPayload>,
) -> ApiResult<ApiResponse<Value>> {
    let non_zero = |v: Option<f64>| v.filter(|v| *v != 0.0);

    let (Some(amount), Some(label), Some(months)) = (
        non_zero(body.goal_amount),
        body.goal_label.filter(|l| !l.is_empty()),
        non_zero(body.timeframe_months),
    ) else {
        return Err(ApiError::bad_request("goalAmount, goalLabel, and timeframeMonths are required").into());
    };

    if amount <= 0.0 || months <= 0.0 {
        return Err(ApiError::bad_request("goalAmount and timeframeMonths must be positive").into());
    }

    let profile = state.store.get_profile(&user.id).await?;
    let prompt = goal::user_prompt(amount, &label, months, body.current_savings);

    Ok(ask(
        &state,
        &user.id,
        Ask {
            endpoint: AiEndpoint::Goal,
            system_prompt: goal::SYSTEM_PROMPT,
            user_prompt: &prompt,
            profile: profile.as_ref(),
            skip_cache: false,
            fallback: goal::fallback(),
        },
    )
    .await)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatPayload {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    conversation_history: Option<Vec<chat::ChatTurn>>,
}

/// `POST /ai/chat`: answers with the user's own numbers in context
///
/// Replies are never served from the cache.
pub async fn chat(
    State(state): State<AppState>,
    PremiumUser(user): PremiumUser,
    ApiJson(body): ApiJson<ChatPayload>,
) -> ApiResult<ApiResponse<Value>> {
    let message = body
        .message
        .filter(|m| !m.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("message is required"))?;

    let profile = state.store.get_profile(&user.id).await?;
    let recent_wins = state
        .store
        .list_wins(
            &user.id,
            &WinQuery {
                limit: Some(chat::RECENT_WINS),
                ..WinQuery::default()
            },
        )
        .await?;
    let record = state.store.get_user(&user.id).await?;
    let budget_entries = state
        .store
        .list_budget_entries(&user.id, month_start(state.now()))
        .await?;
    let history = body.conversation_history.unwrap_or_default();

    let system_prompt = chat::ChatContext {
        profile: profile.as_ref(),
        user: record.as_ref(),
        recent_wins: &recent_wins,
        budget_entries: &budget_entries,
        history: &history,
    }
    .system_prompt(&message);

    Ok(ask(
        &state,
        &user.id,
        Ask {
            endpoint: AiEndpoint::Chat,
            system_prompt: &system_prompt,
            user_prompt: &message,
            profile: profile.as_ref(),
            skip_cache: true,
            fallback: chat::fallback(),
        },
    )
    .await)
}
