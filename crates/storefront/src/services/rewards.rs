//! Reward redemption: exchanging loyalty points for a held reward.
//!
//! The counterpart of checkout's points accrual. Redemption deducts the
//! reward's cost from the balance and records the held reward; checkout
//! later consumes the held reward when an order uses it.

use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info, instrument};

use pixel_arcade_core::{RewardId, UserId};

use crate::db::{RepositoryError, RewardStore, UserRewardStore, UserStore};
use crate::models::HeldReward;

/// Errors from reward redemption.
#[derive(Debug, Error)]
pub enum RedeemError {
    /// No reward definition with that ID.
    #[error("unknown reward")]
    UnknownReward,

    /// The account is suspended; no points were spent.
    #[error("account suspended")]
    AccountSuspended,

    /// The user already holds this reward.
    #[error("reward already held")]
    AlreadyHeld,

    /// The points balance does not cover the reward's cost.
    #[error("insufficient points: have {have}, need {need}")]
    InsufficientPoints {
        /// Current balance.
        have: i64,
        /// Cost of the reward.
        need: i64,
    },

    /// A store failed.
    #[error("redemption failed: {0}")]
    Persistence(#[from] RepositoryError),
}

/// Redeems rewards against the store collaborators.
pub struct RewardService {
    rewards: Arc<dyn RewardStore>,
    user_rewards: Arc<dyn UserRewardStore>,
    users: Arc<dyn UserStore>,
}

impl RewardService {
    /// Create a reward service.
    #[must_use]
    pub fn new(
        rewards: Arc<dyn RewardStore>,
        user_rewards: Arc<dyn UserRewardStore>,
        users: Arc<dyn UserStore>,
    ) -> Self {
        Self {
            rewards,
            user_rewards,
            users,
        }
    }

    /// Redeem `reward_id` for `user_id`, returning the remaining balance.
    ///
    /// Checks, in order: the reward exists, the account is active, the
    /// reward is not already held, the balance covers the cost. The balance
    /// is deducted before the held reward is recorded; a failure between the
    /// two is logged for reconciliation.
    ///
    /// # Errors
    ///
    /// See [`RedeemError`].
    #[instrument(skip(self))]
    pub async fn redeem(&self, user_id: UserId, reward_id: RewardId) -> Result<i64, RedeemError> {
        let reward = self
            .rewards
            .get(reward_id)
            .await?
            .ok_or(RedeemError::UnknownReward)?;

        let user = self
            .users
            .get(user_id)
            .await?
            .ok_or(RedeemError::Persistence(RepositoryError::NotFound))?;
        if !user.is_active {
            return Err(RedeemError::AccountSuspended);
        }

        let held = self.user_rewards.watch_for_user(user_id).await;
        if held.borrow().contains(&reward_id) {
            return Err(RedeemError::AlreadyHeld);
        }

        if user.points < reward.points_cost {
            return Err(RedeemError::InsufficientPoints {
                have: user.points,
                need: reward.points_cost,
            });
        }

        let remaining = user.points - reward.points_cost;
        let mut updated = user;
        updated.points = remaining;
        self.users.update(updated).await?;

        if let Err(source) = self
            .user_rewards
            .add(HeldReward { user_id, reward_id })
            .await
        {
            error!(
                reward_id = %reward_id,
                error = %source,
                "Points deducted but reward not recorded"
            );
            return Err(RedeemError::Persistence(source));
        }

        info!(reward_id = %reward_id, remaining, "Reward redeemed");
        Ok(remaining)
    }
}
