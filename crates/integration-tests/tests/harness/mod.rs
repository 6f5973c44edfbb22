#![allow(dead_code)]

pub mod config;
pub mod failing_store;
pub mod mock_gemini;
pub mod mock_identity;
pub mod server;

/// Bearer token the mock identity provider accepts for `uid`
pub fn token(uid: &str) -> String {
    format!("token-{uid}")
}
