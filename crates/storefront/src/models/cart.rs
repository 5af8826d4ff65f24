//! Cart and cart line domain types.
//!
//! The cart is owned by the checkout session for the lifetime of checkout;
//! it is never persisted by this engine. Each line snapshots the unit price
//! at the moment the product was added, so a later catalog price change does
//! not silently reprice a cart.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use pixel_arcade_core::{Money, ProductCode};

use super::Product;

/// Errors from cart mutations.
#[derive(Debug, Error)]
pub enum CartError {
    /// Cart lines must carry at least one unit.
    #[error("quantity must be greater than zero")]
    ZeroQuantity,
}

/// One product + quantity pairing with a captured unit price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Product being purchased.
    pub product_code: ProductCode,
    /// Unit price snapshot taken when the line was created.
    pub unit_price: Money,
    /// Units purchased, always > 0.
    quantity: u32,
}

impl CartLine {
    /// Create a cart line.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ZeroQuantity`] if `quantity` is zero.
    pub fn new(
        product_code: ProductCode,
        unit_price: Money,
        quantity: u32,
    ) -> Result<Self, CartError> {
        if quantity == 0 {
            return Err(CartError::ZeroQuantity);
        }
        Ok(Self {
            product_code,
            unit_price,
            quantity,
        })
    }

    /// Create a cart line for a catalog product, snapshotting its price.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ZeroQuantity`] if `quantity` is zero.
    pub fn for_product(product: &Product, quantity: u32) -> Result<Self, CartError> {
        Self::new(product.code.clone(), product.unit_price, quantity)
    }

    /// Units purchased.
    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Price of the whole line (`unit_price × quantity`).
    #[must_use]
    pub fn line_total(&self) -> Money {
        self.unit_price * self.quantity
    }
}

/// The shopping cart: an ordered list of lines, one per product.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// The current lines, in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(CartLine::quantity).sum()
    }

    /// Merchandise subtotal: exact sum of line totals.
    #[must_use]
    pub fn subtotal(&self) -> Money {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Add a line to the cart.
    ///
    /// If a line for the same product already exists, its quantity is
    /// increased and its original price snapshot kept.
    pub fn add(&mut self, line: CartLine) {
        if let Some(existing) = self
            .lines
            .iter_mut()
            .find(|l| l.product_code == line.product_code)
        {
            existing.quantity += line.quantity;
        } else {
            self.lines.push(line);
        }
    }

    /// Set the quantity of an existing line.
    ///
    /// A quantity of zero removes the line. Unknown products are ignored.
    pub fn set_quantity(&mut self, product_code: &ProductCode, quantity: u32) {
        if quantity == 0 {
            self.remove(product_code);
            return;
        }
        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|l| &l.product_code == product_code)
        {
            line.quantity = quantity;
        }
    }

    /// Remove a product's line from the cart.
    ///
    /// Returns `true` if a line was removed.
    pub fn remove(&mut self, product_code: &ProductCode) -> bool {
        let before = self.lines.len();
        self.lines.retain(|l| &l.product_code != product_code);
        self.lines.len() < before
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn code(s: &str) -> ProductCode {
        s.parse().unwrap()
    }

    fn line(s: &str, price: i64, qty: u32) -> CartLine {
        CartLine::new(code(s), Money::from(price), qty).unwrap()
    }

    #[test]
    fn test_line_rejects_zero_quantity() {
        assert!(matches!(
            CartLine::new(code("JM001"), Money::from(1000), 0),
            Err(CartError::ZeroQuantity)
        ));
    }

    #[test]
    fn test_line_total() {
        assert_eq!(line("JM001", 29_990, 3).line_total(), Money::from(89_970));
    }

    #[test]
    fn test_empty_cart_has_zero_subtotal() {
        let cart = Cart::new();
        assert!(cart.is_empty());
        assert_eq!(cart.subtotal(), Money::ZERO);
        assert_eq!(cart.item_count(), 0);
    }

    #[test]
    fn test_subtotal_is_exact_sum() {
        let mut cart = Cart::new();
        cart.add(line("JM001", 1000, 2));
        cart.add(line("AC002", 490, 3));
        assert_eq!(cart.subtotal(), Money::from(2000 + 1470));
        assert_eq!(cart.item_count(), 5);
    }

    #[test]
    fn test_add_merges_same_product() {
        let mut cart = Cart::new();
        cart.add(line("JM001", 1000, 1));
        cart.add(line("JM001", 1000, 2));
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn test_merge_keeps_original_price_snapshot() {
        let mut cart = Cart::new();
        cart.add(line("JM001", 1000, 1));
        // price changed in the catalog since the first add
        cart.add(line("JM001", 1500, 1));
        assert_eq!(cart.subtotal(), Money::from(2000));
    }

    #[test]
    fn test_set_quantity_and_remove() {
        let mut cart = Cart::new();
        cart.add(line("JM001", 1000, 1));
        cart.set_quantity(&code("JM001"), 5);
        assert_eq!(cart.item_count(), 5);

        cart.set_quantity(&code("JM001"), 0);
        assert!(cart.is_empty());

        cart.add(line("AC002", 490, 1));
        assert!(cart.remove(&code("AC002")));
        assert!(!cart.remove(&code("AC002")));
    }

    #[test]
    fn test_clear() {
        let mut cart = Cart::new();
        cart.add(line("JM001", 1000, 1));
        cart.clear();
        assert!(cart.is_empty());
    }
}
