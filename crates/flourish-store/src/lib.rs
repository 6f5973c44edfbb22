//! Document storage for users and their records
//!
//! Handlers depend on the [`Store`] trait only. [`MemoryStore`] keeps
//! everything in process and backs both local runs and tests.

#![allow(clippy::missing_errors_doc, clippy::must_use_candidate)]

mod error;
mod memory;

use async_trait::async_trait;
use flourish_core::model::{
    ActivityLog, BudgetEntry, Challenge, Profile, User, UserChallenge, Win, WinCategory,
};
use jiff::civil::Date;

pub use error::StoreError;
pub use memory::MemoryStore;

/// In-place user mutation applied atomically by the store
pub type UserUpdate<'a> = &'a (dyn Fn(&mut User) + Send + Sync);

/// Filter and page for win listings
#[derive(Debug, Clone, Default)]
pub struct WinQuery {
    pub category: Option<WinCategory>,
    /// `None` returns every matching win
    pub limit: Option<usize>,
    pub offset: usize,
}

#[async_trait]
pub trait Store: Send + Sync {
    async fn get_user(&self, id: &str) -> Result<Option<User>, StoreError>;

    /// Insert or replace a user
    async fn put_user(&self, user: User) -> Result<(), StoreError>;

    /// Apply `update` to an existing user, returning the new state
    async fn update_user(&self, id: &str, update: UserUpdate<'_>) -> Result<Option<User>, StoreError>;

    async fn find_user_by_revenuecat_id(&self, revenuecat_id: &str) -> Result<Option<User>, StoreError>;

    async fn get_profile(&self, user_id: &str) -> Result<Option<Profile>, StoreError>;

    /// Insert or replace a profile
    async fn put_profile(&self, profile: Profile) -> Result<(), StoreError>;

    async fn insert_win(&self, win: Win) -> Result<(), StoreError>;

    /// Wins newest first
    async fn list_wins(&self, user_id: &str, query: &WinQuery) -> Result<Vec<Win>, StoreError>;

    async fn count_wins(&self, user_id: &str, category: Option<WinCategory>) -> Result<usize, StoreError>;

    /// Catalog ordered by `sort_order`
    async fn list_challenges(&self) -> Result<Vec<Challenge>, StoreError>;

    async fn get_challenge(&self, id: &str) -> Result<Option<Challenge>, StoreError>;

    async fn put_challenge(&self, challenge: Challenge) -> Result<(), StoreError>;

    async fn list_user_challenges(&self, user_id: &str) -> Result<Vec<UserChallenge>, StoreError>;

    async fn get_user_challenge(&self, user_id: &str, id: &str) -> Result<Option<UserChallenge>, StoreError>;

    /// First record the user holds for a catalog challenge
    async fn find_user_challenge(
        &self,
        user_id: &str,
        challenge_id: &str,
    ) -> Result<Option<UserChallenge>, StoreError>;

    /// Insert or replace by id
    async fn put_user_challenge(&self, user_challenge: UserChallenge) -> Result<(), StoreError>;

    async fn delete_user_challenge(&self, user_id: &str, id: &str) -> Result<(), StoreError>;

    async fn insert_budget_entry(&self, entry: BudgetEntry) -> Result<(), StoreError>;

    /// Entries dated on or after `since`, newest date first
    async fn list_budget_entries(&self, user_id: &str, since: Date) -> Result<Vec<BudgetEntry>, StoreError>;

    async fn append_activity(&self, entry: ActivityLog) -> Result<(), StoreError>;

    /// Activity in insertion order
    async fn list_activity(&self, user_id: &str) -> Result<Vec<ActivityLog>, StoreError>;
}
