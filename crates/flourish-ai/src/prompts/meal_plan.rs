use std::collections::BTreeMap;

use indoc::indoc;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

pub const SYSTEM_PROMPT: &str = indoc! {r#"
    You are a meal planning assistant for busy UK mums on a budget.
    Generate a practical, family-friendly meal plan that's:
    - Budget-conscious (use UK pricing and UK supermarket availability)
    - Quick to prepare (most meals under 30 mins)
    - Kid-friendly
    - Nutritious but realistic
    - Including a complete shopping list with estimated costs

    Respond in this exact JSON format:
    {
      "days": [
        {
          "day": "Monday",
          "meals": {
            "breakfast": { "name": "Porridge with banana", "estimatedCost": "£0.50", "emoji": "🥣" },
            "lunch": { "name": "Cheese sandwich & apple", "estimatedCost": "£0.80", "emoji": "🥪" },
            "dinner": { "name": "Pasta with tomato sauce", "estimatedCost": "£1.50", "emoji": "🍝" },
            "snack": { "name": "Rice cakes", "estimatedCost": "£0.30", "emoji": "🍘" }
          }
        }
      ],
      "shoppingList": [
        { "item": "Porridge oats (1kg)", "estimatedCost": "£0.75" }
      ],
      "totalEstimatedCost": "£XX.XX",
      "tips": ["Batch cook pasta sauce on Sunday to save time midweek"]
    }"#};

pub const DEFAULT_DAYS: i64 = 3;
pub const DEFAULT_BUDGET: f64 = 30.0;
pub const DEFAULT_PEOPLE: u32 = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealPlanResponse {
    pub days: Vec<MealPlanDay>,
    pub shopping_list: Vec<ShoppingItem>,
    pub total_estimated_cost: String,
    pub tips: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealPlanDay {
    pub day: String,
    /// Keyed by meal slot: breakfast, lunch, dinner, snack
    pub meals: BTreeMap<String, Meal>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meal {
    pub name: String,
    pub estimated_cost: String,
    pub emoji: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingItem {
    pub item: String,
    pub estimated_cost: String,
}

pub fn user_prompt(days: i64, people: u32, budget: f64, dietary_preferences: &[String]) -> String {
    let dietary = if dietary_preferences.is_empty() {
        String::new()
    } else {
        format!("Dietary preferences: {}.", dietary_preferences.join(", "))
    };

    format!("Create a {days}-day meal plan for {people} people with a budget of £{budget}. {dietary}")
}

pub fn fallback() -> Value {
    json!({
        "days": [
            {
                "day": "Monday",
                "meals": {
                    "breakfast": { "name": "Porridge with banana", "estimatedCost": "£0.50", "emoji": "🥣" },
                    "lunch": { "name": "Cheese toastie & apple", "estimatedCost": "£0.80", "emoji": "🧀" },
                    "dinner": { "name": "One-pot chicken pasta", "estimatedCost": "£2.50", "emoji": "🍝" },
                    "snack": { "name": "Carrot sticks & hummus", "estimatedCost": "£0.40", "emoji": "🥕" }
                }
            },
            {
                "day": "Tuesday",
                "meals": {
                    "breakfast": { "name": "Toast with peanut butter", "estimatedCost": "£0.35", "emoji": "🍞" },
                    "lunch": { "name": "Leftover pasta", "estimatedCost": "£0.00", "emoji": "🍝" },
                    "dinner": { "name": "Veggie stir-fry with rice", "estimatedCost": "£2.00", "emoji": "🍜" },
                    "snack": { "name": "Banana", "estimatedCost": "£0.15", "emoji": "🍌" }
                }
            },
            {
                "day": "Wednesday",
                "meals": {
                    "breakfast": { "name": "Cereal with milk", "estimatedCost": "£0.40", "emoji": "🥣" },
                    "lunch": { "name": "Beans on toast", "estimatedCost": "£0.55", "emoji": "🫘" },
                    "dinner": { "name": "Fish fingers, chips & peas", "estimatedCost": "£2.20", "emoji": "🐟" },
                    "snack": { "name": "Apple slices", "estimatedCost": "£0.20", "emoji": "🍎" }
                }
            }
        ],
        "shoppingList": [
            { "item": "Porridge oats (1kg)", "estimatedCost": "£0.75" },
            { "item": "Bananas (bunch of 5)", "estimatedCost": "£0.65" },
            { "item": "Bread (800g)", "estimatedCost": "£0.55" },
            { "item": "Chicken breast (500g)", "estimatedCost": "£2.50" },
            { "item": "Pasta (500g)", "estimatedCost": "£0.50" },
            { "item": "Tinned tomatoes x2", "estimatedCost": "£0.70" },
            { "item": "Rice (1kg)", "estimatedCost": "£0.45" },
            { "item": "Mixed veg (frozen)", "estimatedCost": "£1.00" },
            { "item": "Fish fingers", "estimatedCost": "£1.50" },
            { "item": "Oven chips", "estimatedCost": "£1.00" }
        ],
        "totalEstimatedCost": "£18.50",
        "tips": [
            "Batch cook the pasta sauce — it freezes well for next week!",
            "Buy frozen veg instead of fresh to reduce waste.",
            "Check Aldi's Super 6 for cheap seasonal fruit & veg."
        ]
    })
}
