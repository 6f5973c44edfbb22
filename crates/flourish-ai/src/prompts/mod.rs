//! System prompts, user prompt builders and canned fallbacks per endpoint
//!
//! Fallbacks are returned when no model is configured or generation fails,
//! so each one matches the JSON shape its system prompt asks for.

pub mod chat;
pub mod goal;
pub mod meal_plan;
pub mod smart_swap;
