//! Loyalty reward domain types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use pixel_arcade_core::{RewardId, RewardKind, UserId};

/// A redeemable loyalty reward definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reward {
    /// Unique reward ID.
    pub id: RewardId,
    /// Display title (e.g. "10% off").
    pub title: String,
    /// Longer description shown at redemption.
    pub description: String,
    /// How the benefit is applied.
    pub kind: RewardKind,
    /// Kind-dependent magnitude: a percentage for percentage discounts, a
    /// flat amount for amount discounts, unused for free shipping.
    pub value: Decimal,
    /// Points deducted when the reward is redeemed.
    pub points_cost: i64,
}

/// A reward held by a user, pending use at checkout.
///
/// Consumed (removed) by a successful order commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeldReward {
    /// Holding user.
    pub user_id: UserId,
    /// Held reward definition.
    pub reward_id: RewardId,
}
