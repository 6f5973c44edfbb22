use indoc::indoc;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

pub const SYSTEM_PROMPT: &str = indoc! {r#"
    You are a friendly, supportive financial assistant for busy mums in the UK.
    The user will give you a product or item they regularly buy. Your job is to suggest 3 cheaper alternatives ("smart swaps").

    Rules:
    - Be warm, encouraging, never judgmental
    - Use UK pricing and UK store names (Aldi, Lidl, Tesco, Asda, etc.)
    - Each swap should include the name, estimated saving, a short reason, and an emoji
    - Include a total estimated weekly/monthly saving
    - End with a practical money-saving tip

    Respond in this exact JSON format:
    {
      "original": "the item they mentioned",
      "swaps": [
        { "name": "Alternative name", "estimatedSaving": "£X.XX/week", "reason": "Short reason", "emoji": "🛒" }
      ],
      "totalEstimatedSaving": "£X.XX/month",
      "tip": "A practical tip"
    }"#};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmartSwapResponse {
    pub original: String,
    pub swaps: Vec<Swap>,
    pub total_estimated_saving: String,
    pub tip: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Swap {
    pub name: String,
    pub estimated_saving: String,
    pub reason: String,
    pub emoji: String,
}

/// `I usually buy: …` with the weekly budget when one was given
pub fn user_prompt(item: &str, weekly_budget: Option<f64>) -> String {
    let budget = weekly_budget
        .filter(|b| *b != 0.0)
        .map(|b| format!("My weekly budget is £{b}."))
        .unwrap_or_default();

    format!("I usually buy: {item}. {budget} What are some cheaper alternatives?")
}

pub fn fallback() -> Value {
    json!({
        "original": "branded cereal",
        "swaps": [
            { "name": "Aldi own-brand cereal", "estimatedSaving": "£1.20/week", "reason": "Same quality, half the price", "emoji": "🥣" },
            { "name": "Lidl Crownfield cereal", "estimatedSaving": "£1.00/week", "reason": "Great taste, budget friendly", "emoji": "⭐" },
            { "name": "Tesco own-brand cereal", "estimatedSaving": "£0.80/week", "reason": "Easy to find, good value", "emoji": "🛒" }
        ],
        "totalEstimatedSaving": "£13.00/month",
        "tip": "Try buying cereal in bulk when it's on offer — it keeps for months!"
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_with_and_without_budget() {
        assert_eq!(
            user_prompt("branded cereal", Some(60.0)),
            "I usually buy: branded cereal. My weekly budget is £60. What are some cheaper alternatives?"
        );
        assert_eq!(
            user_prompt("nappies", None),
            "I usually buy: nappies.  What are some cheaper alternatives?"
        );
    }

    #[test]
    fn fallback_has_response_shape() {
        let response: SmartSwapResponse = serde_json::from_value(fallback()).unwrap();
        assert_eq!(response.swaps.len(), 3);
        assert_eq!(response.total_estimated_saving, "£13.00/month");
    }

    #[test]
    fn system_prompt_ends_with_format() {
        assert!(SYSTEM_PROMPT.starts_with("You are a friendly"));
        assert!(SYSTEM_PROMPT.ends_with("\"tip\": \"A practical tip\"\n}"));
    }
}
