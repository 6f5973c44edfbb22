use std::str::FromStr;

use axum::extract::{Query, State};
use flourish_core::model::{ActivityAction, User, Win, WinCategory};
use flourish_core::{ApiError, new_id, round_money};
use flourish_store::WinQuery;
use jiff::{SignedDuration, Timestamp};
use serde::{Deserialize, Serialize};
use serde_json::json;
use strum::IntoEnumIterator;

use super::{month_start_instant, record_activity};
use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::extract::ApiJson;
use crate::response::ApiResponse;
use crate::state::AppState;

const DEFAULT_LIMIT: usize = 20;
const MAX_LIMIT: usize = 100;
const RECENT_WINS: usize = 5;
const DEFAULT_EMOJI: &str = "🎉";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWinPayload {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    amount_saved: Option<f64>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    emoji: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct WinResponse {
    win: Win,
}

/// `POST /wins`
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    ApiJson(body): ApiJson<CreateWinPayload>,
) -> ApiResult<ApiResponse<WinResponse>> {
    let (Some(title), Some(amount_saved), Some(category)) = (
        body.title.filter(|t| !t.is_empty()),
        body.amount_saved,
        body.category.filter(|c| !c.is_empty()),
    ) else {
        return Err(ApiError::bad_request("title, amountSaved, and category are required").into());
    };

    let category = WinCategory::from_str(&category).map_err(|_| {
        let names: Vec<String> = WinCategory::iter().map(|c| c.to_string()).collect();
        ApiError::bad_request(format!("category must be one of: {}", names.join(", ")))
    })?;

    let now = state.now();
    let win = Win {
        id: new_id(),
        user_id: user.id.clone(),
        title,
        description: body.description,
        amount_saved,
        category,
        emoji: body.emoji.unwrap_or_else(|| DEFAULT_EMOJI.to_owned()),
        created_at: now,
    };

    state.store.insert_win(win.clone()).await?;

    state
        .store
        .update_user(&user.id, &|record: &mut User| {
            record.total_savings += amount_saved;
            record.streak_days += 1;
            record.updated_at = now;
        })
        .await?;

    record_activity(
        &state,
        &user.id,
        ActivityAction::WinLogged,
        json!({ "win_id": win.id, "category": category, "amount": amount_saved }),
    )
    .await?;

    Ok(ApiResponse::created(WinResponse { win }))
}

/// Raw listing parameters; unparseable values fall back to defaults
#[derive(Debug, Default, Deserialize)]
pub struct ListWinsParams {
    #[serde(default)]
    limit: Option<String>,
    #[serde(default)]
    offset: Option<String>,
    #[serde(default)]
    category: Option<String>,
}

impl ListWinsParams {
    fn limit(&self) -> usize {
        self.limit
            .as_deref()
            .and_then(|l| l.parse::<usize>().ok())
            .filter(|&l| l > 0)
            .map_or(DEFAULT_LIMIT, |l| l.min(MAX_LIMIT))
    }

    fn offset(&self) -> usize {
        self.offset
            .as_deref()
            .and_then(|o| o.parse::<usize>().ok())
            .unwrap_or(0)
    }
}

#[derive(Debug, Serialize)]
pub struct WinList {
    wins: Vec<Win>,
    total: usize,
    limit: usize,
    offset: usize,
}

/// `GET /wins`
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<ListWinsParams>,
) -> ApiResult<ApiResponse<WinList>> {
    let limit = params.limit();
    let offset = params.offset();

    let category = match params.category.as_deref().filter(|c| !c.is_empty()) {
        None => None,
        Some(raw) => match WinCategory::from_str(raw) {
            Ok(category) => Some(category),
            // An unknown category matches nothing
            Err(_) => {
                return Ok(ApiResponse::ok(WinList {
                    wins: Vec::new(),
                    total: 0,
                    limit,
                    offset,
                }));
            }
        },
    };

    let query = WinQuery {
        category,
        limit: Some(limit),
        offset,
    };
    let wins = state.store.list_wins(&user.id, &query).await?;
    let total = state.store.count_wins(&user.id, category).await?;

    Ok(ApiResponse::ok(WinList {
        wins,
        total,
        limit,
        offset,
    }))
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize)]
pub struct CategoryTotal {
    count: usize,
    total: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WinsSummary {
    total_saved: f64,
    win_count: usize,
    streak_days: u32,
    this_week: f64,
    this_month: f64,
    by_category: serde_json::Map<String, serde_json::Value>,
    recent_wins: Vec<Win>,
}

/// `GET /wins/summary`
pub async fn summary(State(state): State<AppState>, user: AuthUser) -> ApiResult<ApiResponse<WinsSummary>> {
    let wins = state.store.list_wins(&user.id, &WinQuery::default()).await?;
    let streak_days = state
        .store
        .get_user(&user.id)
        .await?
        .map_or(0, |u| u.streak_days);

    let now = state.now();
    let week_ago = now - SignedDuration::from_hours(7 * 24);
    let month_start = month_start_instant(now)?;

    Ok(ApiResponse::ok(summarize(&wins, streak_days, week_ago, month_start)))
}

fn summarize(wins: &[Win], streak_days: u32, week_ago: Timestamp, month_start: Timestamp) -> WinsSummary {
    let sum = |filter: &dyn Fn(&Win) -> bool| -> f64 {
        round_money(wins.iter().filter(|w| filter(w)).map(|w| w.amount_saved).sum())
    };

    let by_category = WinCategory::iter()
        .map(|category| {
            let matching = wins.iter().filter(|w| w.category == category);
            let totals = CategoryTotal {
                count: matching.clone().count(),
                total: round_money(matching.map(|w| w.amount_saved).sum()),
            };
            (category.to_string(), json!(totals))
        })
        .collect();

    WinsSummary {
        total_saved: sum(&|_| true),
        win_count: wins.len(),
        streak_days,
        this_week: sum(&|w| w.created_at >= week_ago),
        this_month: sum(&|w| w.created_at >= month_start),
        by_category,
        recent_wins: wins.iter().take(RECENT_WINS).cloned().collect(),
    }
}
