use axum::extract::State;
use flourish_core::model::{
    ActivityAction, Challenge, ChallengeCategory, ChallengeStatus, Difficulty, UserChallenge, Win, WinCategory,
};
use flourish_core::{ApiError, new_id};
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::record_activity;
use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::extract::ApiJson;
use crate::response::ApiResponse;
use crate::state::AppState;

/// Catalog entry as seen by one user
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeView {
    #[serde(flatten)]
    challenge: Challenge,
    locked: bool,
    user_progress: Option<UserProgress>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UserProgress {
    status: ChallengeStatus,
    progress: u8,
    started_at: Timestamp,
    completed_at: Option<Timestamp>,
    user_challenge_id: String,
}

impl From<&UserChallenge> for UserProgress {
    fn from(uc: &UserChallenge) -> Self {
        Self {
            status: uc.status,
            progress: uc.progress,
            started_at: uc.started_at,
            completed_at: uc.completed_at,
            user_challenge_id: uc.id.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ChallengeList {
    challenges: Vec<ChallengeView>,
}

/// `GET /challenges`
pub async fn list(State(state): State<AppState>, user: AuthUser) -> ApiResult<ApiResponse<ChallengeList>> {
    let catalog = state.store.list_challenges().await?;
    let progress = state.store.list_user_challenges(&user.id).await?;

    let challenges = catalog
        .into_iter()
        .map(|challenge| ChallengeView {
            locked: challenge.is_premium && !user.has_premium,
            user_progress: progress
                .iter()
                .find(|uc| uc.challenge_id == challenge.id)
                .map(UserProgress::from),
            challenge,
        })
        .collect();

    Ok(ApiResponse::ok(ChallengeList { challenges }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartChallengePayload {
    #[serde(default)]
    challenge_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartedChallenge {
    user_challenge: UserChallenge,
    challenge: Challenge,
    message: String,
}

/// `POST /challenges/start`
///
/// A finished or abandoned attempt is replaced by a fresh one. Premium
/// challenges are only locked in the listing, not here.
pub async fn start(
    State(state): State<AppState>,
    user: AuthUser,
    ApiJson(body): ApiJson<StartChallengePayload>,
) -> ApiResult<ApiResponse<StartedChallenge>> {
    let challenge_id = body
        .challenge_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::bad_request("challengeId is required"))?;

    let challenge = state
        .store
        .get_challenge(&challenge_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Challenge"))?;

    if let Some(existing) = state.store.find_user_challenge(&user.id, &challenge_id).await? {
        if existing.status == ChallengeStatus::Active {
            return Err(ApiError::conflict("You've already started this challenge!").into());
        }
        state.store.delete_user_challenge(&user.id, &existing.id).await?;
    }

    let user_challenge = UserChallenge {
        id: new_id(),
        user_id: user.id.clone(),
        challenge_id: challenge_id.clone(),
        status: ChallengeStatus::Active,
        progress: 0,
        started_at: state.now(),
        completed_at: None,
    };
    state.store.put_user_challenge(user_challenge.clone()).await?;

    record_activity(
        &state,
        &user.id,
        ActivityAction::ChallengeStarted,
        json!({ "challenge_id": challenge_id, "title": challenge.title }),
    )
    .await?;

    Ok(ApiResponse::created(StartedChallenge {
        message: format!("You've started \"{}\"! 🌱", challenge.title),
        user_challenge,
        challenge,
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteChallengePayload {
    #[serde(default)]
    user_challenge_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedChallenge {
    user_challenge: UserChallenge,
    win: Win,
    message: String,
}

/// Stand-in for a catalog entry removed after the user started it
fn missing_challenge(id: &str) -> Challenge {
    Challenge {
        id: id.to_owned(),
        title: "Challenge".to_owned(),
        description: String::new(),
        duration_days: 0,
        category: ChallengeCategory::Saving,
        difficulty: Difficulty::Easy,
        reward_description: None,
        reward_emoji: "🏆".to_owned(),
        is_premium: false,
        sort_order: 0,
    }
}

/// `POST /challenges/complete`: finish an attempt and record it as a win
pub async fn complete(
    State(state): State<AppState>,
    user: AuthUser,
    ApiJson(body): ApiJson<CompleteChallengePayload>,
) -> ApiResult<ApiResponse<CompletedChallenge>> {
    let user_challenge_id = body
        .user_challenge_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::bad_request("userChallengeId is required"))?;

    let mut user_challenge = state
        .store
        .get_user_challenge(&user.id, &user_challenge_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Challenge progress"))?;

    match user_challenge.status {
        ChallengeStatus::Active => {}
        ChallengeStatus::Completed => {
            return Err(ApiError::conflict("This challenge is already completed! 🎉").into());
        }
        ChallengeStatus::Abandoned => {
            return Err(ApiError::bad_request("This challenge is not active").into());
        }
    }

    let challenge = state
        .store
        .get_challenge(&user_challenge.challenge_id)
        .await?
        .unwrap_or_else(|| missing_challenge(&user_challenge.challenge_id));

    let now = state.now();
    user_challenge.status = ChallengeStatus::Completed;
    user_challenge.progress = 100;
    user_challenge.completed_at = Some(now);
    state.store.put_user_challenge(user_challenge.clone()).await?;

    let win = Win {
        id: new_id(),
        user_id: user.id.clone(),
        title: format!("Completed: {}", challenge.title),
        description: Some(
            challenge
                .reward_description
                .clone()
                .unwrap_or_else(|| "Challenge completed!".to_owned()),
        ),
        amount_saved: 0.0,
        category: WinCategory::Challenge,
        emoji: challenge.reward_emoji.clone(),
        created_at: now,
    };
    state.store.insert_win(win.clone()).await?;

    record_activity(
        &state,
        &user.id,
        ActivityAction::ChallengeCompleted,
        json!({
            "challenge_id": user_challenge.challenge_id,
            "title": challenge.title,
            "duration_days": challenge.duration_days,
        }),
    )
    .await?;

    tracing::info!(uid = %user.id, challenge = %challenge.id, "challenge completed");

    Ok(ApiResponse::ok(CompletedChallenge {
        message: format!("Amazing! You completed \"{}\"! {}", challenge.title, challenge.reward_emoji),
        user_challenge,
        win,
    }))
}
