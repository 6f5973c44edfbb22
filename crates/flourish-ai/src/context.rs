use flourish_core::model::Profile;
use sha2::{Digest, Sha256};

/// Describe the user's household for the model
pub fn build_user_context(profile: Option<&Profile>) -> String {
    let Some(profile) = profile else {
        return "No profile data available.".to_owned();
    };

    let mut lines = Vec::new();

    if let Some(name) = non_empty(profile.display_name.as_deref()) {
        lines.push(format!("Name: {name}"));
    }
    if profile.num_kids > 0 {
        lines.push(format!("Number of kids: {}", profile.num_kids));
    }
    if let Some(ages) = profile.kids_ages.as_ref().filter(|ages| !ages.is_empty()) {
        lines.push(format!("Kids ages: {}", join(ages)));
    }
    if let Some(income) = money(profile.monthly_income) {
        lines.push(format!("Monthly income: £{income}"));
    }
    if let Some(budget) = money(profile.monthly_budget) {
        lines.push(format!("Monthly budget: £{budget}"));
    }
    if let Some(goal) = money(profile.savings_goal) {
        lines.push(format!("Savings goal: £{goal}"));
    }
    if let Some(label) = non_empty(profile.savings_goal_label.as_deref()) {
        lines.push(format!("Goal: {label}"));
    }
    if let Some(prefs) = profile.dietary_preferences.as_ref().filter(|prefs| !prefs.is_empty()) {
        lines.push(format!("Dietary preferences: {}", prefs.join(", ")));
    }

    if lines.is_empty() {
        "No detailed profile data available.".to_owned()
    } else {
        format!("User context:\n{}", lines.join("\n"))
    }
}

/// Full prompt sent to the model and hashed for caching
pub fn assemble_prompt(system_prompt: &str, context: &str, user_prompt: &str) -> String {
    format!("{system_prompt}\n\n{context}\n\nUser request:\n{user_prompt}")
}

/// Lowercase hex SHA-256 of a prompt
pub fn prompt_hash(prompt: &str) -> String {
    format!("{:x}", Sha256::digest(prompt.as_bytes()))
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn money(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v != 0.0 && !v.is_nan())
}

fn join(ages: &[u32]) -> String {
    ages.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}
