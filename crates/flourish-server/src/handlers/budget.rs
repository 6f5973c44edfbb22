use std::str::FromStr;

use axum::extract::State;
use flourish_core::model::{BudgetEntry, BudgetKind};
use flourish_core::{ApiError, new_id, round_money};
use jiff::civil::Date;
use jiff::tz::TimeZone;
use serde::{Deserialize, Serialize};

use super::month_start;
use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::extract::ApiJson;
use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthBudget {
    entries: Vec<BudgetEntry>,
    income: f64,
    expenses: f64,
    balance: f64,
    month_start: Date,
}

impl MonthBudget {
    fn new(entries: Vec<BudgetEntry>, month_start: Date) -> Self {
        let total = |kind| round_money(entries.iter().filter(|e| e.kind == kind).map(|e| e.amount).sum());
        let income = total(BudgetKind::Income);
        let expenses = total(BudgetKind::Expense);

        Self {
            income,
            expenses,
            balance: round_money(income - expenses),
            month_start,
            entries,
        }
    }
}

/// `GET /budget`: this month's entries and totals
pub async fn list(State(state): State<AppState>, user: AuthUser) -> ApiResult<ApiResponse<MonthBudget>> {
    let since = month_start(state.now());
    let entries = state.store.list_budget_entries(&user.id, since).await?;

    Ok(ApiResponse::ok(MonthBudget::new(entries, since)))
}

#[derive(Debug, Deserialize)]
pub struct CreateEntryPayload {
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    amount: Option<f64>,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    /// `YYYY-MM-DD`; today (UTC) when absent
    #[serde(default)]
    date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct EntryResponse {
    entry: BudgetEntry,
}

/// `POST /budget`
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    ApiJson(body): ApiJson<CreateEntryPayload>,
) -> ApiResult<ApiResponse<EntryResponse>> {
    let (Some(category), Some(amount), Some(kind)) = (
        body.category.filter(|c| !c.is_empty()),
        body.amount,
        body.kind.filter(|k| !k.is_empty()),
    ) else {
        return Err(ApiError::bad_request("category, amount, and type are required").into());
    };

    let kind = BudgetKind::from_str(&kind).map_err(|_| ApiError::bad_request("type must be one of: income, expense"))?;

    if amount <= 0.0 {
        return Err(ApiError::bad_request("amount must be positive").into());
    }

    let now = state.now();
    let date = match body.date.as_deref().filter(|d| !d.is_empty()) {
        Some(raw) => raw
            .parse::<Date>()
            .map_err(|_| ApiError::bad_request("date must be YYYY-MM-DD"))?,
        None => now.to_zoned(TimeZone::UTC).date(),
    };

    let entry = BudgetEntry {
        id: new_id(),
        user_id: user.id.clone(),
        category,
        description: body.description,
        amount,
        kind,
        date,
        created_at: now,
    };
    state.store.insert_budget_entry(entry.clone()).await?;

    tracing::debug!(uid = %user.id, %kind, "budget entry added");

    Ok(ApiResponse::created(EntryResponse { entry }))
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use jiff::civil::date;

    use super::*;

    fn entry(amount: f64, kind: BudgetKind) -> BudgetEntry {
        BudgetEntry {
            id: new_id(),
            user_id: "u1".into(),
            category: "groceries".into(),
            description: None,
            amount,
            kind,
            date: date(2025, 3, 4),
            created_at: Timestamp::UNIX_EPOCH,
        }
    }

    #[test]
    fn month_totals() {
        let budget = MonthBudget::new(
            vec![
                entry(1200.0, BudgetKind::Income),
                entry(85.555, BudgetKind::Expense),
                entry(14.445, BudgetKind::Expense),
            ],
            date(2025, 3, 1),
        );

        assert!((budget.income - 1200.0).abs() < f64::EPSILON);
        assert!((budget.expenses - 100.0).abs() < f64::EPSILON);
        assert!((budget.balance - 1100.0).abs() < f64::EPSILON);
        assert_eq!(serde_json::to_value(&budget).unwrap()["monthStart"], "2025-03-01");
    }
}
