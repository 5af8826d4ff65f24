//! Reward kinds for the loyalty program.

use serde::{Deserialize, Serialize};

/// The kind of benefit a loyalty reward grants.
///
/// At most one reward is applied per order. The numeric `value` carried by a
/// reward definition is interpreted according to this kind: a percentage in
/// `[0, 100]` for [`Self::PercentageDiscount`], a flat amount for
/// [`Self::AmountDiscount`], and unused for [`Self::FreeShipping`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RewardKind {
    /// Percentage off the merchandise subtotal.
    PercentageDiscount,
    /// Flat amount off the merchandise subtotal.
    AmountDiscount,
    /// Shipping cost waived; merchandise untouched.
    FreeShipping,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_serialized_names() {
        assert_eq!(
            serde_json::to_string(&RewardKind::PercentageDiscount).unwrap(),
            "\"PERCENTAGE_DISCOUNT\""
        );
        assert_eq!(
            serde_json::to_string(&RewardKind::AmountDiscount).unwrap(),
            "\"AMOUNT_DISCOUNT\""
        );
        assert_eq!(
            serde_json::to_string(&RewardKind::FreeShipping).unwrap(),
            "\"FREE_SHIPPING\""
        );
    }

    #[test]
    fn test_deserialize() {
        let kind: RewardKind = serde_json::from_str("\"FREE_SHIPPING\"").unwrap();
        assert_eq!(kind, RewardKind::FreeShipping);
    }
}
