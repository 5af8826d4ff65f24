//! Order domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use pixel_arcade_core::{AddressId, Money, OrderId, PaymentMethod, ProductCode, UserId};

use super::CartLine;

/// A placed order header.
///
/// Created once per successful commit and immutable afterwards; fulfillment
/// status lives with the downstream fulfillment system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    /// Unique order ID, minted at commit time.
    pub id: OrderId,
    /// Purchasing user.
    pub user_id: UserId,
    /// Shipping destination.
    pub address_id: AddressId,
    /// Merchandise subtotal at commit time.
    pub subtotal: Money,
    /// Shipping cost charged.
    pub shipping_cost: Money,
    /// Discount applied to merchandise.
    pub discount_amount: Money,
    /// Amount charged.
    pub total: Money,
    /// Payment method selected at checkout.
    pub payment_method: PaymentMethod,
    /// When the order was committed.
    pub placed_at: DateTime<Utc>,
}

/// One line of a placed order.
///
/// A value copy of the cart line at commit time - later catalog changes
/// never retroactively alter a placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    /// Owning order.
    pub order_id: OrderId,
    /// Product purchased.
    pub product_code: ProductCode,
    /// Units purchased.
    pub quantity: u32,
    /// Unit price as charged.
    pub unit_price: Money,
}

impl OrderLine {
    /// Copy a cart line into an order line.
    #[must_use]
    pub fn from_cart_line(order_id: OrderId, line: &CartLine) -> Self {
        Self {
            order_id,
            product_code: line.product_code.clone(),
            quantity: line.quantity(),
            unit_price: line.unit_price,
        }
    }
}
