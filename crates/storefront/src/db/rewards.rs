//! Reward stores: definitions, and the rewards each user holds.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock, watch};

use pixel_arcade_core::{RewardId, UserId};

use super::RepositoryError;
use crate::models::{HeldReward, Reward};

/// Read reward definitions.
#[async_trait]
pub trait RewardStore: Send + Sync {
    /// All reward definitions.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Storage` if the backend fails.
    async fn all(&self) -> Result<Vec<Reward>, RepositoryError>;

    /// Get one reward definition by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Storage` if the backend fails.
    async fn get(&self, id: RewardId) -> Result<Option<Reward>, RepositoryError>;
}

/// Track which rewards each user holds.
///
/// A held reward is single-use: checkout consumes it with [`remove`]
/// (idempotence at the caller's discretion), redemption records it with
/// [`add`].
///
/// [`remove`]: UserRewardStore::remove
/// [`add`]: UserRewardStore::add
#[async_trait]
pub trait UserRewardStore: Send + Sync {
    /// Subscribe to the IDs of rewards a user holds.
    async fn watch_for_user(&self, user_id: UserId) -> watch::Receiver<Vec<RewardId>>;

    /// Record a newly redeemed reward.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the user already holds the
    /// reward.
    async fn add(&self, held: HeldReward) -> Result<(), RepositoryError>;

    /// Remove one held reward.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user does not hold the
    /// reward.
    async fn remove(&self, user_id: UserId, reward_id: RewardId) -> Result<(), RepositoryError>;
}

/// In-memory [`RewardStore`].
#[derive(Debug, Default)]
pub struct MemoryRewardStore {
    rewards: RwLock<HashMap<RewardId, Reward>>,
}

impl MemoryRewardStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a reward definition.
    pub async fn upsert(&self, reward: Reward) {
        self.rewards.write().await.insert(reward.id, reward);
    }
}

#[async_trait]
impl RewardStore for MemoryRewardStore {
    async fn all(&self) -> Result<Vec<Reward>, RepositoryError> {
        Ok(self.rewards.read().await.values().cloned().collect())
    }

    async fn get(&self, id: RewardId) -> Result<Option<Reward>, RepositoryError> {
        Ok(self.rewards.read().await.get(&id).cloned())
    }
}

/// In-memory [`UserRewardStore`].
#[derive(Debug, Default)]
pub struct MemoryUserRewardStore {
    channels: Mutex<HashMap<UserId, watch::Sender<Vec<RewardId>>>>,
}

impl MemoryUserRewardStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRewardStore for MemoryUserRewardStore {
    async fn watch_for_user(&self, user_id: UserId) -> watch::Receiver<Vec<RewardId>> {
        self.channels
            .lock()
            .await
            .entry(user_id)
            .or_insert_with(|| watch::channel(Vec::new()).0)
            .subscribe()
    }

    async fn add(&self, held: HeldReward) -> Result<(), RepositoryError> {
        let mut channels = self.channels.lock().await;
        let tx = channels
            .entry(held.user_id)
            .or_insert_with(|| watch::channel(Vec::new()).0);

        if tx.borrow().contains(&held.reward_id) {
            return Err(RepositoryError::Conflict(format!(
                "reward {} already held",
                held.reward_id
            )));
        }

        tx.send_modify(|held_ids| held_ids.push(held.reward_id));
        Ok(())
    }

    async fn remove(&self, user_id: UserId, reward_id: RewardId) -> Result<(), RepositoryError> {
        let mut channels = self.channels.lock().await;
        let tx = channels
            .entry(user_id)
            .or_insert_with(|| watch::channel(Vec::new()).0);

        let removed = tx.send_if_modified(|held_ids| {
            let before = held_ids.len();
            held_ids.retain(|id| *id != reward_id);
            held_ids.len() < before
        });

        if removed {
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }
}
