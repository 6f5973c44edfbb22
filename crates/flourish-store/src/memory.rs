use async_trait::async_trait;
use dashmap::DashMap;
use flourish_core::model::{
    ActivityLog, BudgetEntry, Challenge, Profile, User, UserChallenge, Win, WinCategory,
};
use jiff::civil::Date;

use crate::{Store, StoreError, UserUpdate, WinQuery};

/// Process-local store
///
/// Per-user collections are vectors keyed by user id; each call locks a
/// single shard for its duration.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: DashMap<String, User>,
    profiles: DashMap<String, Profile>,
    wins: DashMap<String, Vec<Win>>,
    challenges: DashMap<String, Challenge>,
    user_challenges: DashMap<String, Vec<UserChallenge>>,
    budget: DashMap<String, Vec<BudgetEntry>>,
    activity: DashMap<String, Vec<ActivityLog>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-loaded with a challenge catalog
    pub fn with_challenges(challenges: impl IntoIterator<Item = Challenge>) -> Self {
        let store = Self::new();
        for challenge in challenges {
            store.challenges.insert(challenge.id.clone(), challenge);
        }
        store
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn get_user(&self, id: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users.get(id).map(|user| user.clone()))
    }

    async fn put_user(&self, user: User) -> Result<(), StoreError> {
        self.users.insert(user.id.clone(), user);
        Ok(())
    }

    async fn update_user(&self, id: &str, update: UserUpdate<'_>) -> Result<Option<User>, StoreError> {
        Ok(self.users.get_mut(id).map(|mut user| {
            update(user.value_mut());
            user.clone()
        }))
    }

    async fn find_user_by_revenuecat_id(&self, revenuecat_id: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .users
            .iter()
            .find(|user| user.revenuecat_id.as_deref() == Some(revenuecat_id))
            .map(|user| user.clone()))
    }

    async fn get_profile(&self, user_id: &str) -> Result<Option<Profile>, StoreError> {
        Ok(self.profiles.get(user_id).map(|profile| profile.clone()))
    }

    async fn put_profile(&self, profile: Profile) -> Result<(), StoreError> {
        self.profiles.insert(profile.user_id.clone(), profile);
        Ok(())
    }

    async fn insert_win(&self, win: Win) -> Result<(), StoreError> {
        self.wins.entry(win.user_id.clone()).or_default().push(win);
        Ok(())
    }

    async fn list_wins(&self, user_id: &str, query: &WinQuery) -> Result<Vec<Win>, StoreError> {
        let Some(wins) = self.wins.get(user_id) else {
            return Ok(Vec::new());
        };

        let mut matching: Vec<Win> = wins
            .iter()
            .filter(|win| query.category.is_none_or(|category| win.category == category))
            .cloned()
            .collect();
        drop(wins);

        // Stable sort keeps later inserts first among equal timestamps
        matching.reverse();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let page = matching.into_iter().skip(query.offset);
        Ok(match query.limit {
            Some(limit) => page.take(limit).collect(),
            None => page.collect(),
        })
    }

    async fn count_wins(&self, user_id: &str, category: Option<WinCategory>) -> Result<usize, StoreError> {
        Ok(self.wins.get(user_id).map_or(0, |wins| {
            wins.iter()
                .filter(|win| category.is_none_or(|category| win.category == category))
                .count()
        }))
    }

    async fn list_challenges(&self) -> Result<Vec<Challenge>, StoreError> {
        let mut challenges: Vec<Challenge> = self.challenges.iter().map(|c| c.clone()).collect();
        challenges.sort_by(|a, b| a.sort_order.cmp(&b.sort_order).then_with(|| a.id.cmp(&b.id)));
        Ok(challenges)
    }

    async fn get_challenge(&self, id: &str) -> Result<Option<Challenge>, StoreError> {
        Ok(self.challenges.get(id).map(|c| c.clone()))
    }

    async fn put_challenge(&self, challenge: Challenge) -> Result<(), StoreError> {
        self.challenges.insert(challenge.id.clone(), challenge);
        Ok(())
    }

    async fn list_user_challenges(&self, user_id: &str) -> Result<Vec<UserChallenge>, StoreError> {
        Ok(self.user_challenges.get(user_id).map(|list| list.clone()).unwrap_or_default())
    }

    async fn get_user_challenge(&self, user_id: &str, id: &str) -> Result<Option<UserChallenge>, StoreError> {
        Ok(self
            .user_challenges
            .get(user_id)
            .and_then(|list| list.iter().find(|uc| uc.id == id).cloned()))
    }

    async fn find_user_challenge(
        &self,
        user_id: &str,
        challenge_id: &str,
    ) -> Result<Option<UserChallenge>, StoreError> {
        Ok(self
            .user_challenges
            .get(user_id)
            .and_then(|list| list.iter().find(|uc| uc.challenge_id == challenge_id).cloned()))
    }

    async fn put_user_challenge(&self, user_challenge: UserChallenge) -> Result<(), StoreError> {
        let mut list = self.user_challenges.entry(user_challenge.user_id.clone()).or_default();
        if let Some(index) = list.iter().position(|uc| uc.id == user_challenge.id) {
            list[index] = user_challenge;
        } else {
            list.push(user_challenge);
        }
        Ok(())
    }

    async fn delete_user_challenge(&self, user_id: &str, id: &str) -> Result<(), StoreError> {
        if let Some(mut list) = self.user_challenges.get_mut(user_id) {
            list.retain(|uc| uc.id != id);
        }
        Ok(())
    }

    async fn insert_budget_entry(&self, entry: BudgetEntry) -> Result<(), StoreError> {
        self.budget.entry(entry.user_id.clone()).or_default().push(entry);
        Ok(())
    }

    async fn list_budget_entries(&self, user_id: &str, since: Date) -> Result<Vec<BudgetEntry>, StoreError> {
        let mut entries: Vec<BudgetEntry> = self
            .budget
            .get(user_id)
            .map(|list| list.iter().filter(|entry| entry.date >= since).cloned().collect())
            .unwrap_or_default();
        entries.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.created_at.cmp(&a.created_at)));
        Ok(entries)
    }

    async fn append_activity(&self, entry: ActivityLog) -> Result<(), StoreError> {
        self.activity.entry(entry.user_id.clone()).or_default().push(entry);
        Ok(())
    }

    async fn list_activity(&self, user_id: &str) -> Result<Vec<ActivityLog>, StoreError> {
        Ok(self.activity.get(user_id).map(|list| list.clone()).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use flourish_core::model::{ActivityAction, BudgetKind, ChallengeCategory, ChallengeStatus, Difficulty};
    use jiff::{SignedDuration, Timestamp};

    use super::*;

    fn at(offset_hours: i64) -> Timestamp {
        let base: Timestamp = "2025-02-10T12:00:00Z".parse().unwrap();
        base.checked_add(SignedDuration::from_hours(offset_hours)).unwrap()
    }

    fn win(user_id: &str, title: &str, amount: f64, category: WinCategory, hours: i64) -> Win {
        Win {
            id: flourish_core::new_id(),
            user_id: user_id.into(),
            title: title.into(),
            description: None,
            amount_saved: amount,
            category,
            emoji: "🎉".into(),
            created_at: at(hours),
        }
    }

    fn challenge(id: &str, sort_order: i32) -> Challenge {
        Challenge {
            id: id.into(),
            title: id.to_uppercase(),
            description: "test".into(),
            duration_days: 7,
            category: ChallengeCategory::Saving,
            difficulty: Difficulty::Easy,
            reward_description: None,
            reward_emoji: "🏆".into(),
            is_premium: false,
            sort_order,
        }
    }

    #[tokio::test]
    async fn update_user_applies_in_place() {
        let store = MemoryStore::new();
        store.put_user(User::new("u1", "a@example.com", at(0))).await.unwrap();

        let updated = store
            .update_user("u1", &|user: &mut User| {
                user.total_savings += 12.5;
                user.streak_days += 1;
            })
            .await
            .unwrap()
            .unwrap();

        assert!((updated.total_savings - 12.5).abs() < f64::EPSILON);
        assert_eq!(updated.streak_days, 1);
        assert!(store.update_user("missing", &|_: &mut User| {}).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn wins_are_newest_first_and_paged() {
        let store = MemoryStore::new();
        store.insert_win(win("u1", "old", 1.0, WinCategory::Swap, 0)).await.unwrap();
        store.insert_win(win("u1", "mid", 2.0, WinCategory::Meal, 1)).await.unwrap();
        store.insert_win(win("u1", "new", 3.0, WinCategory::Swap, 2)).await.unwrap();
        store.insert_win(win("u2", "other", 9.0, WinCategory::Swap, 3)).await.unwrap();

        let all = store.list_wins("u1", &WinQuery::default()).await.unwrap();
        let titles: Vec<_> = all.iter().map(|w| w.title.as_str()).collect();
        assert_eq!(titles, ["new", "mid", "old"]);

        let page = store
            .list_wins("u1", &WinQuery { limit: Some(1), offset: 1, ..WinQuery::default() })
            .await
            .unwrap();
        assert_eq!(page[0].title, "mid");

        let swaps = store
            .list_wins("u1", &WinQuery { category: Some(WinCategory::Swap), ..WinQuery::default() })
            .await
            .unwrap();
        assert_eq!(swaps.len(), 2);

        assert_eq!(store.count_wins("u1", None).await.unwrap(), 3);
        assert_eq!(store.count_wins("u1", Some(WinCategory::Meal)).await.unwrap(), 1);
        assert_eq!(store.count_wins("nobody", None).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn challenges_sorted_by_order() {
        let store = MemoryStore::with_challenges([challenge("b", 2), challenge("a", 1), challenge("c", 0)]);
        let ids: Vec<_> = store.list_challenges().await.unwrap().into_iter().map(|c| c.id).collect();
        assert_eq!(ids, ["c", "a", "b"]);
    }

    #[tokio::test]
    async fn user_challenge_lifecycle() {
        let store = MemoryStore::new();
        let mut uc = UserChallenge {
            id: "uc1".into(),
            user_id: "u1".into(),
            challenge_id: "no-spend".into(),
            status: ChallengeStatus::Active,
            progress: 0,
            started_at: at(0),
            completed_at: None,
        };
        store.put_user_challenge(uc.clone()).await.unwrap();

        uc.status = ChallengeStatus::Completed;
        uc.progress = 100;
        store.put_user_challenge(uc.clone()).await.unwrap();

        assert_eq!(store.list_user_challenges("u1").await.unwrap().len(), 1);
        let found = store.find_user_challenge("u1", "no-spend").await.unwrap().unwrap();
        assert_eq!(found.status, ChallengeStatus::Completed);

        store.delete_user_challenge("u1", "uc1").await.unwrap();
        assert!(store.get_user_challenge("u1", "uc1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn budget_filtered_by_date() {
        let store = MemoryStore::new();
        for (day, amount) in [(28, 10.0), (1, 20.0), (5, 30.0)] {
            let month = if day == 28 { 1 } else { 2 };
            store
                .insert_budget_entry(BudgetEntry {
                    id: flourish_core::new_id(),
                    user_id: "u1".into(),
                    category: "food".into(),
                    description: None,
                    amount,
                    kind: BudgetKind::Expense,
                    date: jiff::civil::date(2025, month, day),
                    created_at: at(0),
                })
                .await
                .unwrap();
        }

        let entries = store.list_budget_entries("u1", jiff::civil::date(2025, 2, 1)).await.unwrap();
        let amounts: Vec<f64> = entries.iter().map(|e| e.amount).collect();
        assert_eq!(amounts, [30.0, 20.0]);
    }

    #[tokio::test]
    async fn finds_user_by_billing_id() {
        let store = MemoryStore::new();
        let mut user = User::new("u1", "a@example.com", at(0));
        user.revenuecat_id = Some("$RCAnonymousID:abc".into());
        store.put_user(user).await.unwrap();

        let found = store.find_user_by_revenuecat_id("$RCAnonymousID:abc").await.unwrap();
        assert_eq!(found.unwrap().id, "u1");
        assert!(store.find_user_by_revenuecat_id("other").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn activity_keeps_order() {
        let store = MemoryStore::new();
        for action in [ActivityAction::AppOpen, ActivityAction::WinLogged] {
            store
                .append_activity(ActivityLog::new("u1", action, serde_json::json!({}), at(0)))
                .await
                .unwrap();
        }
        let actions: Vec<_> = store.list_activity("u1").await.unwrap().into_iter().map(|a| a.action).collect();
        assert_eq!(actions, [ActivityAction::AppOpen, ActivityAction::WinLogged]);
    }
}
