//! Store wrapper that fails selected operations

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use flourish_core::model::{
    ActivityLog, BudgetEntry, Challenge, Profile, User, UserChallenge, Win, WinCategory,
};
use flourish_store::{Store, StoreError, UserUpdate, WinQuery};
use jiff::civil::Date;

/// Delegates to `inner` except for the named operations, which return
/// [`StoreError::Backend`]
pub struct FailingStore {
    inner: Arc<dyn Store>,
    failing: HashSet<&'static str>,
}

impl FailingStore {
    pub fn wrap(inner: Arc<dyn Store>, failing: &[&'static str]) -> Arc<dyn Store> {
        Arc::new(Self {
            inner,
            failing: failing.iter().copied().collect(),
        })
    }

    fn check(&self, operation: &'static str) -> Result<(), StoreError> {
        if self.failing.contains(operation) {
            return Err(StoreError::Backend(format!("{operation} unavailable")));
        }
        Ok(())
    }
}

#[async_trait]
impl Store for FailingStore {
    async fn get_user(&self, id: &str) -> Result<Option<User>, StoreError> {
        self.check("get_user")?;
        self.inner.get_user(id).await
    }

    async fn put_user(&self, user: User) -> Result<(), StoreError> {
        self.check("put_user")?;
        self.inner.put_user(user).await
    }

    async fn update_user(&self, id: &str, update: UserUpdate<'_>) -> Result<Option<User>, StoreError> {
        self.check("update_user")?;
        self.inner.update_user(id, update).await
    }

    async fn find_user_by_revenuecat_id(&self, revenuecat_id: &str) -> Result<Option<User>, StoreError> {
        self.check("find_user_by_revenuecat_id")?;
        self.inner.find_user_by_revenuecat_id(revenuecat_id).await
    }

    async fn get_profile(&self, user_id: &str) -> Result<Option<Profile>, StoreError> {
        self.check("get_profile")?;
        self.inner.get_profile(user_id).await
    }

    async fn put_profile(&self, profile: Profile) -> Result<(), StoreError> {
        self.check("put_profile")?;
        self.inner.put_profile(profile).await
    }

    async fn insert_win(&self, win: Win) -> Result<(), StoreError> {
        self.check("insert_win")?;
        self.inner.insert_win(win).await
    }

    async fn list_wins(&self, user_id: &str, query: &WinQuery) -> Result<Vec<Win>, StoreError> {
        self.check("list_wins")?;
        self.inner.list_wins(user_id, query).await
    }

    async fn count_wins(&self, user_id: &str, category: Option<WinCategory>) -> Result<usize, StoreError> {
        self.check("count_wins")?;
        self.inner.count_wins(user_id, category).await
    }

    async fn list_challenges(&self) -> Result<Vec<Challenge>, StoreError> {
        self.check("list_challenges")?;
        self.inner.list_challenges().await
    }

    async fn get_challenge(&self, id: &str) -> Result<Option<Challenge>, StoreError> {
        self.check("get_challenge")?;
        self.inner.get_challenge(id).await
    }

    async fn put_challenge(&self, challenge: Challenge) -> Result<(), StoreError> {
        self.check("put_challenge")?;
        self.inner.put_challenge(challenge).await
    }

    async fn list_user_challenges(&self, user_id: &str) -> Result<Vec<UserChallenge>, StoreError> {
        self.check("list_user_challenges")?;
        self.inner.list_user_challenges(user_id).await
    }

    async fn get_user_challenge(&self, user_id: &str, id: &str) -> Result<Option<UserChallenge>, StoreError> {
        self.check("get_user_challenge")?;
        self.inner.get_user_challenge(user_id, id).await
    }

    async fn find_user_challenge(
        &self,
        user_id: &str,
        challenge_id: &str,
    ) -> Result<Option<UserChallenge>, StoreError> {
        self.check("find_user_challenge")?;
        self.inner.find_user_challenge(user_id, challenge_id).await
    }

    async fn put_user_challenge(&self, user_challenge: UserChallenge) -> Result<(), StoreError> {
        self.check("put_user_challenge")?;
        self.inner.put_user_challenge(user_challenge).await
    }

    async fn delete_user_challenge(&self, user_id: &str, id: &str) -> Result<(), StoreError> {
        self.check("delete_user_challenge")?;
        self.inner.delete_user_challenge(user_id, id).await
    }

    async fn insert_budget_entry(&self, entry: BudgetEntry) -> Result<(), StoreError> {
        self.check("insert_budget_entry")?;
        self.inner.insert_budget_entry(entry).await
    }

    async fn list_budget_entries(&self, user_id: &str, since: Date) -> Result<Vec<BudgetEntry>, StoreError> {
        self.check("list_budget_entries")?;
        self.inner.list_budget_entries(user_id, since).await
    }

    async fn append_activity(&self, entry: ActivityLog) -> Result<(), StoreError> {
        self.check("append_activity")?;
        self.inner.append_activity(entry).await
    }

    async fn list_activity(&self, user_id: &str) -> Result<Vec<ActivityLog>, StoreError> {
        self.check("list_activity")?;
        self.inner.list_activity(user_id).await
    }
}
