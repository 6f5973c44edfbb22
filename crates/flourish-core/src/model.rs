//! Documents persisted by the store
//!
//! Field names serialize in `snake_case`, matching how records are stored.
//! Handlers that present camelCase views build them separately.

use jiff::Timestamp;
use jiff::civil::Date;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Subscription tier recorded on a user
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PremiumPlan {
    #[default]
    Free,
    Monthly,
    Annual,
    /// Granted manually through the admin endpoint
    Hackathon,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Identity-provider uid
    pub id: String,
    pub email: String,
    pub has_premium: bool,
    pub premium_plan: PremiumPlan,
    pub revenuecat_id: Option<String>,
    pub streak_days: u32,
    pub total_savings: f64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    /// A fresh free-tier user
    pub fn new(id: impl Into<String>, email: impl Into<String>, now: Timestamp) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            has_premium: false,
            premium_plan: PremiumPlan::Free,
            revenuecat_id: None,
            streak_days: 0,
            total_savings: 0.0,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: String,
    pub display_name: Option<String>,
    pub num_kids: u32,
    pub kids_ages: Option<Vec<u32>>,
    pub monthly_income: Option<f64>,
    pub monthly_budget: Option<f64>,
    pub savings_goal: Option<f64>,
    pub savings_goal_label: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub onboarding_complete: bool,
    pub dietary_preferences: Option<Vec<String>>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Profile {
    /// An empty profile, optionally seeded with a display name
    pub fn empty(user_id: impl Into<String>, display_name: Option<String>, now: Timestamp) -> Self {
        Self {
            user_id: user_id.into(),
            display_name,
            num_kids: 0,
            kids_ages: None,
            monthly_income: None,
            monthly_budget: None,
            savings_goal: None,
            savings_goal_label: None,
            bio: None,
            avatar_url: None,
            onboarding_complete: false,
            dietary_preferences: None,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum WinCategory {
    Swap,
    Meal,
    Budget,
    Challenge,
    Custom,
}

/// A logged saving
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Win {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub description: Option<String>,
    pub amount_saved: f64,
    pub category: WinCategory,
    pub emoji: String,
    pub created_at: Timestamp,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ChallengeCategory {
    Saving,
    Spending,
    Meal,
    Investing,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// Catalog entry users can start
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Challenge {
    pub id: String,
    pub title: String,
    pub description: String,
    pub duration_days: u32,
    pub category: ChallengeCategory,
    pub difficulty: Difficulty,
    pub reward_description: Option<String>,
    pub reward_emoji: String,
    pub is_premium: bool,
    pub sort_order: i32,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ChallengeStatus {
    Active,
    Completed,
    Abandoned,
}

/// A user's attempt at a catalog challenge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserChallenge {
    pub id: String,
    pub user_id: String,
    pub challenge_id: String,
    pub status: ChallengeStatus,
    /// Percentage, 0 to 100
    pub progress: u8,
    pub started_at: Timestamp,
    pub completed_at: Option<Timestamp>,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum BudgetKind {
    Income,
    Expense,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetEntry {
    pub id: String,
    pub user_id: String,
    pub category: String,
    pub description: Option<String>,
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: BudgetKind,
    pub date: Date,
    pub created_at: Timestamp,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ActivityAction {
    AppOpen,
    WinLogged,
    ChallengeStarted,
    ChallengeCompleted,
    AiUsed,
    LessonViewed,
    ProfileUpdated,
}

/// Append-only audit record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityLog {
    pub id: String,
    pub user_id: String,
    pub action: ActivityAction,
    pub metadata: Value,
    pub created_at: Timestamp,
}

impl ActivityLog {
    pub fn new(user_id: impl Into<String>, action: ActivityAction, metadata: Value, now: Timestamp) -> Self {
        Self {
            id: crate::new_id(),
            user_id: user_id.into(),
            action,
            metadata,
            created_at: now,
        }
    }
}

/// AI feature that produced a response
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum AiEndpoint {
    SmartSwap,
    MealPlan,
    Goal,
    Chat,
}

/// Cached AI response
///
/// Entries are never updated or swept; readers ignore anything whose
/// `expires_at` has passed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiCacheEntry {
    pub user_id: String,
    pub endpoint: AiEndpoint,
    pub prompt_hash: String,
    pub response: Value,
    pub created_at: Timestamp,
    pub expires_at: Timestamp,
}
