use flourish_core::model::{Challenge, ChallengeCategory, Difficulty};
use serde::Deserialize;

/// One `[[challenges]]` catalog entry
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChallengeConfig {
    pub id: String,
    pub title: String,
    pub description: String,
    pub duration_days: u32,
    pub category: ChallengeCategory,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub reward_description: Option<String>,
    #[serde(default = "default_reward_emoji")]
    pub reward_emoji: String,
    #[serde(default)]
    pub is_premium: bool,
    #[serde(default)]
    pub sort_order: i32,
}

impl From<ChallengeConfig> for Challenge {
    fn from(config: ChallengeConfig) -> Self {
        Self {
            id: config.id,
            title: config.title,
            description: config.description,
            duration_days: config.duration_days,
            category: config.category,
            difficulty: config.difficulty,
            reward_description: config.reward_description,
            reward_emoji: config.reward_emoji,
            is_premium: config.is_premium,
            sort_order: config.sort_order,
        }
    }
}

fn default_reward_emoji() -> String {
    "🏆".to_owned()
}
