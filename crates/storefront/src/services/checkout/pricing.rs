//! Pricing calculator: cart + selections in, totals breakdown out.
//!
//! Pure - no I/O beyond the rate lookup on the resolver it is handed, no
//! mutation, deterministic for identical inputs. Cheap enough to run on
//! every selection change.

use serde::Serialize;

use pixel_arcade_core::Money;

use super::policy;
use crate::models::{Address, CartLine, Reward};
use crate::shipping::ShippingRateResolver;

/// The four-field priced summary shown at checkout and stamped on orders.
///
/// Always produced whole by [`compute`]; never mutated field-by-field.
/// Invariant: `total = max(0, subtotal - discount_amount) + shipping_cost`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TotalsBreakdown {
    /// Exact sum of line totals.
    pub subtotal: Money,
    /// Shipping cost after any waiver.
    pub shipping_cost: Money,
    /// Merchandise discount as computed by the reward policy.
    pub discount_amount: Money,
    /// Amount to charge.
    pub total: Money,
}

/// Compute the totals for the given cart lines and selections.
#[must_use]
pub fn compute(
    lines: &[CartLine],
    address: Option<&Address>,
    reward: Option<&Reward>,
    rates: &dyn ShippingRateResolver,
) -> TotalsBreakdown {
    let subtotal: Money = lines.iter().map(CartLine::line_total).sum();

    let base_shipping = address.map_or(Money::ZERO, |a| rates.rate_for(&a.region));
    let shipping_cost = if policy::waives_shipping(reward) {
        Money::ZERO
    } else {
        base_shipping
    };

    let discount_amount = policy::discount_for(reward, subtotal);
    let total = subtotal.saturating_sub(discount_amount) + shipping_cost;

    TotalsBreakdown {
        subtotal,
        shipping_cost,
        discount_amount,
        total,
    }
}
