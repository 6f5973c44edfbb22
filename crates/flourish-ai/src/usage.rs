use flourish_core::model::{ActivityAction, ActivityLog, AiEndpoint};
use flourish_store::Store;
use jiff::Timestamp;
use serde_json::json;

/// Record an `ai_used` activity, logging rather than failing on errors
pub async fn log_ai_usage(store: &dyn Store, now: Timestamp, user_id: &str, endpoint: AiEndpoint, cached: bool) {
    let entry = ActivityLog::new(
        user_id,
        ActivityAction::AiUsed,
        json!({ "endpoint": endpoint, "cached": cached }),
        now,
    );

    if let Err(e) = store.append_activity(entry).await {
        tracing::error!(user_id, %endpoint, error = %e, "failed to log ai usage");
    }
}
