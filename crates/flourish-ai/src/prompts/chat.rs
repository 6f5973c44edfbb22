use flourish_core::model::{BudgetEntry, BudgetKind, Profile, User, Win};
use indoc::indoc;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::context::build_user_context;

pub const SYSTEM_PROMPT: &str = indoc! {r#"
    You are "Flo", the Flourish AI assistant — a warm, supportive, and knowledgeable financial friend for busy UK mums.

    Your personality:
    - Calm, encouraging, and never judgmental
    - You speak like a supportive friend, not a bank manager
    - You use emojis sparingly but warmly
    - You keep answers concise (2-4 paragraphs max)
    - You celebrate small wins

    Your expertise:
    - Everyday budgeting and saving tips for UK families
    - Smart shopping and meal planning on a budget
    - Basic investing concepts (ISAs, pensions, index funds) — educational only
    - Money mindset and reducing financial anxiety
    - Kid-related expenses and family finances

    Rules:
    - NEVER give specific investment advice (say "I'd suggest chatting to a financial adviser for specifics")
    - NEVER be condescending about someone's financial situation
    - Always relate to the user's actual data when available
    - If asked about something outside your scope, gently redirect
    - Reference UK-specific products, stores, and financial instruments

    Respond in this exact JSON format:
    {
      "reply": "Your conversational response here",
      "suggestedActions": ["Optional follow-up action 1", "Optional follow-up action 2"]
    }"#};

/// How many recent wins the assistant sees
pub const RECENT_WINS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub reply: String,
    pub suggested_actions: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    #[serde(other)]
    Assistant,
}

/// A previous message in the conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

/// Everything the assistant knows about the user for one message
#[derive(Debug, Clone, Copy)]
pub struct ChatContext<'a> {
    pub profile: Option<&'a Profile>,
    pub user: Option<&'a User>,
    /// Newest first, at most [`RECENT_WINS`]
    pub recent_wins: &'a [Win],
    /// Entries dated this month
    pub budget_entries: &'a [BudgetEntry],
    pub history: &'a [ChatTurn],
}

impl ChatContext<'_> {
    /// System prompt enriched with the user's data, history and message
    ///
    /// Sections with nothing to say are left out entirely.
    pub fn system_prompt(&self, message: &str) -> String {
        let stats = self
            .user
            .map(|u| format!("Total savings: £{}. Streak: {} days.", u.total_savings, u.streak_days))
            .unwrap_or_default();

        let wins = if self.recent_wins.is_empty() {
            "No wins logged yet.".to_owned()
        } else {
            let listed: Vec<String> = self
                .recent_wins
                .iter()
                .map(|w| format!("{} (£{})", w.title, w.amount_saved))
                .collect();
            format!("Recent wins: {}", listed.join(", "))
        };

        let budget = if self.budget_entries.is_empty() {
            String::new()
        } else {
            format!(
                "This month: £{} income, £{} spent.",
                self.total(BudgetKind::Income),
                self.total(BudgetKind::Expense)
            )
        };

        let history = if self.history.is_empty() {
            String::new()
        } else {
            let turns: Vec<String> = self
                .history
                .iter()
                .map(|turn| {
                    let speaker = match turn.role {
                        ChatRole::User => "Mum",
                        ChatRole::Assistant => "Flo",
                    };
                    format!("{speaker}: {}", turn.content)
                })
                .collect();
            format!("Previous conversation:\n{}\n", turns.join("\n"))
        };

        let sections = [
            SYSTEM_PROMPT.to_owned(),
            build_user_context(self.profile),
            stats,
            wins,
            budget,
            history,
            format!("Mum: {message}"),
        ];

        sections
            .into_iter()
            .filter(|section| !section.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn total(&self, kind: BudgetKind) -> f64 {
        self.budget_entries
            .iter()
            .filter(|entry| entry.kind == kind)
            .map(|entry| entry.amount)
            .sum()
    }
}

pub fn fallback() -> Value {
    json!({
        "reply": "That's such a great question! 💚 Starting to save doesn't have to be complicated. Even putting away £5 a week adds up to over £250 a year — that's a lovely family day out! \n\nA simple way to start is the \"spare change\" method: round up everything you spend to the nearest pound, and pop the difference into a savings pot. Most banking apps can do this automatically.\n\nYou're already doing amazing by thinking about this. Want me to help you set a specific savings goal?",
        "suggestedActions": [
            "Set a savings goal",
            "Try a no-spend challenge",
            "See smart swap suggestions"
        ]
    })
}
