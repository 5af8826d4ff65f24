//! Reward policy: what a selected reward is worth against a subtotal.

use rust_decimal::Decimal;

use pixel_arcade_core::{Money, RewardKind};

use crate::models::Reward;

/// Merchandise discount granted by a reward.
///
/// Percentage values are expected in `[0, 100]` but are deliberately not
/// clamped here: callers display the computed figure even when it exceeds
/// the subtotal, and the order total is floored separately by the pricing
/// calculator. Free-shipping rewards grant no merchandise discount; their
/// benefit is reported through [`waives_shipping`].
#[must_use]
pub fn discount_for(reward: Option<&Reward>, subtotal: Money) -> Money {
    match reward {
        Some(reward) => match reward.kind {
            RewardKind::PercentageDiscount => {
                Money::new(subtotal.amount() * reward.value / Decimal::from(100))
            }
            RewardKind::AmountDiscount => Money::new(reward.value),
            RewardKind::FreeShipping => Money::ZERO,
        },
        None => Money::ZERO,
    }
}

/// Whether a reward waives the shipping cost entirely.
#[must_use]
pub fn waives_shipping(reward: Option<&Reward>) -> bool {
    reward.is_some_and(|r| r.kind == RewardKind::FreeShipping)
}
