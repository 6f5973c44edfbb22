use indoc::indoc;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

pub const SYSTEM_PROMPT: &str = indoc! {r#"
    You are a supportive, calm financial coach for UK mums.
    The user has a savings goal. Calculate a realistic plan and provide encouragement.

    Rules:
    - Be warm, never preachy
    - Use UK-relevant suggestions (ISAs, supermarket savings, etc.)
    - Provide 3-4 practical strategies with estimated savings
    - Create motivating milestones with mini celebrations
    - End with genuine encouragement

    Respond in this exact JSON format:
    {
      "monthlyTarget": "£XX.XX",
      "weeklyTarget": "£XX.XX",
      "dailyTarget": "£X.XX",
      "strategies": [
        { "title": "Strategy name", "description": "How to do it", "potentialSaving": "£XX/month", "emoji": "💡" }
      ],
      "milestones": [
        { "month": 3, "amount": "£XXX", "celebration": "Treat yourself to a coffee! ☕" }
      ],
      "encouragement": "A warm, motivating message"
    }"#};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalResponse {
    pub monthly_target: String,
    pub weekly_target: String,
    pub daily_target: String,
    pub strategies: Vec<Strategy>,
    pub milestones: Vec<Milestone>,
    pub encouragement: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Strategy {
    pub title: String,
    pub description: String,
    pub potential_saving: String,
    pub emoji: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    pub month: u32,
    pub amount: String,
    pub celebration: String,
}

pub fn user_prompt(amount: f64, label: &str, months: f64, current_savings: Option<f64>) -> String {
    let current = current_savings
        .filter(|c| *c != 0.0)
        .map(|c| format!(" I've already saved £{c}."))
        .unwrap_or_default();

    format!("I want to save £{amount} for \"{label}\" in {months} months.{current} What's my plan?")
}

pub fn fallback() -> Value {
    json!({
        "monthlyTarget": "£166.67",
        "weeklyTarget": "£41.67",
        "dailyTarget": "£5.95",
        "strategies": [
            {
                "title": "The Smart Swap Savings",
                "description": "Switch to own-brand products for your weekly shop. Most families save £15-20/week.",
                "potentialSaving": "£70/month",
                "emoji": "🛒"
            },
            {
                "title": "Round-Up Rule",
                "description": "Round up every purchase to the nearest pound and save the difference.",
                "potentialSaving": "£30/month",
                "emoji": "🪙"
            },
            {
                "title": "Subscription Audit",
                "description": "Cancel unused subscriptions. The average family has 2-3 they don't use.",
                "potentialSaving": "£25/month",
                "emoji": "✂️"
            },
            {
                "title": "Meal Prep Sundays",
                "description": "Batch cook meals on Sunday to avoid expensive midweek takeaways.",
                "potentialSaving": "£50/month",
                "emoji": "🍳"
            }
        ],
        "milestones": [
            { "month": 1, "amount": "£167", "celebration": "First month done! You're building a habit 🌱" },
            { "month": 3, "amount": "£500", "celebration": "Halfway to £1000! Treat yourself to a nice coffee ☕" },
            { "month": 6, "amount": "£1,000", "celebration": "FOUR figures! You're doing amazing 🎉" },
            { "month": 12, "amount": "£2,000", "celebration": "You did it! Goal reached! 🏆🎊" }
        ],
        "encouragement": "You're already ahead by planning this — most people never start. Every little bit adds up, and your kids will thank you for it. You've got this, mama! 💚"
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_mentions_current_savings() {
        assert_eq!(
            user_prompt(2000.0, "Family holiday", 12.0, Some(150.0)),
            "I want to save £2000 for \"Family holiday\" in 12 months. I've already saved £150. What's my plan?"
        );
        assert_eq!(
            user_prompt(500.0, "Christmas", 6.0, None),
            "I want to save £500 for \"Christmas\" in 6 months. What's my plan?"
        );
    }

    #[test]
    fn fallback_has_response_shape() {
        let goal: GoalResponse = serde_json::from_value(fallback()).unwrap();
        assert_eq!(goal.strategies.len(), 4);
        assert_eq!(goal.milestones.last().map(|m| m.month), Some(12));
    }
}
