//! Generative AI for Flourish
//!
//! [`AiService::generate`] wraps a [`Generator`] with a per-user response
//! cache and pre-authored fallbacks, so the AI endpoints always answer.

#![allow(clippy::missing_errors_doc, clippy::must_use_candidate)]

mod cache;
mod context;
mod error;
mod generate;
mod generator;
pub mod prompts;
mod protocol;
mod usage;
mod valkey;

pub use cache::{AiCacheStore, MemoryAiCache};
pub use context::{assemble_prompt, build_user_context, prompt_hash};
pub use error::{CacheError, GeneratorError};
pub use generate::{AiService, CacheTtls, GenerateRequest, Generated, ResponseSource};
pub use generator::{GeminiGenerator, Generator};
pub use usage::log_ai_usage;
pub use valkey::ValkeyAiCache;
