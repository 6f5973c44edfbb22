use flourish_core::model::{Challenge, ChallengeCategory, Difficulty};

/// Challenges served when the config does not define a catalog
pub fn default_challenges() -> Vec<Challenge> {
    vec![
        challenge(
            "no-spend-weekend",
            "No-Spend Weekend",
            "Get through a whole weekend without spending a penny on non-essentials.",
            2,
            ChallengeCategory::Spending,
            Difficulty::Easy,
            ("A calmer bank balance on Monday", "🛡️"),
            false,
            1,
        ),
        challenge(
            "packed-lunch-week",
            "Packed Lunch Week",
            "Make lunches at home for five days instead of buying them out.",
            5,
            ChallengeCategory::Meal,
            Difficulty::Easy,
            ("Around £20 back in your pocket", "🥪"),
            false,
            2,
        ),
        challenge(
            "own-brand-swap",
            "Own-Brand Swap",
            "Swap five branded items in your weekly shop for own-brand versions.",
            7,
            ChallengeCategory::Saving,
            Difficulty::Easy,
            ("Smart Swapper badge", "🛒"),
            false,
            3,
        ),
        challenge(
            "meal-plan-fortnight",
            "Meal Plan Fortnight",
            "Plan every dinner for two weeks and shop only from your list.",
            14,
            ChallengeCategory::Meal,
            Difficulty::Medium,
            ("Less food waste and fewer takeaways", "🍲"),
            true,
            4,
        ),
        challenge(
            "subscription-audit",
            "Subscription Audit",
            "Review every subscription and cancel the ones the family no longer uses.",
            3,
            ChallengeCategory::Spending,
            Difficulty::Medium,
            ("Money back every single month", "✂️"),
            true,
            5,
        ),
        challenge(
            "thirty-day-saver",
            "30-Day Saver",
            "Put something aside every day for a month, even if it is just £1.",
            30,
            ChallengeCategory::Saving,
            Difficulty::Hard,
            ("A brand new savings habit", "🌱"),
            true,
            6,
        ),
        challenge(
            "first-isa-steps",
            "First ISA Steps",
            "Learn how a Stocks and Shares ISA works and set up a small monthly amount.",
            14,
            ChallengeCategory::Investing,
            Difficulty::Hard,
            ("Your money working for the kids' future", "📈"),
            true,
            7,
        ),
    ]
}

#[allow(clippy::too_many_arguments)]
fn challenge(
    id: &str,
    title: &str,
    description: &str,
    duration_days: u32,
    category: ChallengeCategory,
    difficulty: Difficulty,
    (reward, emoji): (&str, &str),
    is_premium: bool,
    sort_order: i32,
) -> Challenge {
    Challenge {
        id: id.to_owned(),
        title: title.to_owned(),
        description: description.to_owned(),
        duration_days,
        category,
        difficulty,
        reward_description: Some(reward.to_owned()),
        reward_emoji: emoji.to_owned(),
        is_premium,
        sort_order,
    }
}
