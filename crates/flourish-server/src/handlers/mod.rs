pub mod admin;
pub mod ai;
pub mod budget;
pub mod challenges;
pub mod health;
pub mod user;
pub mod webhook;
pub mod wins;

use flourish_core::model::{ActivityAction, ActivityLog};
use flourish_store::StoreError;
use jiff::Timestamp;
use jiff::civil::Date;
use jiff::tz::TimeZone;
use serde_json::Value;

use crate::state::AppState;

/// Append an activity record stamped with the current time
async fn record_activity(
    state: &AppState,
    user_id: &str,
    action: ActivityAction,
    metadata: Value,
) -> Result<(), StoreError> {
    state
        .store
        .append_activity(ActivityLog::new(user_id, action, metadata, state.now()))
        .await
}

/// First day of `now`'s month in UTC
fn month_start(now: Timestamp) -> Date {
    now.to_zoned(TimeZone::UTC).date().first_of_month()
}

/// Midnight UTC on the first day of `now`'s month
fn month_start_instant(now: Timestamp) -> anyhow::Result<Timestamp> {
    Ok(month_start(now).to_zoned(TimeZone::UTC)?.timestamp())
}
