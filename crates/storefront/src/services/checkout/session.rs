//! Checkout session state.
//!
//! One session per checkout, owned by one logical caller. Every mutator
//! recomputes the totals synchronously before returning, so no reader ever
//! observes a half-updated breakdown. Sessions are shared behind
//! [`SharedSession`] so the commit orchestrator and the store feed can reach
//! the same state without holding a lock across store calls.

use std::sync::Arc;

use serde::Serialize;

use pixel_arcade_core::{OrderId, PaymentMethod, ProductCode};

use super::error::CheckoutError;
use super::pricing::{self, TotalsBreakdown};
use crate::models::{Address, Cart, CartLine, Reward};
use crate::shipping::ShippingRateResolver;

/// A checkout session shared between its owner and the engine.
pub type SharedSession = Arc<tokio::sync::Mutex<CheckoutSession>>;

/// Whether the session's totals are current.
///
/// `Computing` is only ever observable from within a mutator; every mutator
/// lands back in `Ready` before returning control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// Totals are stale relative to the current selections.
    Computing,
    /// Totals reflect the current selections.
    Ready,
}

/// What a successful commit hands back to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OrderReceipt {
    /// The freshly minted order identifier.
    pub order_id: OrderId,
    /// Loyalty points awarded for the order.
    pub points_earned: i64,
}

/// Everything the commit sequence needs, snapshotted under the session lock.
///
/// The commit works on this copy so selection changes made while stores are
/// being called cannot shear the order being written.
#[derive(Debug, Clone)]
pub(crate) struct CommitPlan {
    pub(crate) lines: Vec<CartLine>,
    pub(crate) address: Address,
    pub(crate) reward: Option<Reward>,
    pub(crate) payment_method: PaymentMethod,
    pub(crate) totals: TotalsBreakdown,
}

/// Mutable checkout state: cart, selections, and the last computed totals.
pub struct CheckoutSession {
    cart: Cart,
    addresses: Vec<Address>,
    held_rewards: Vec<Reward>,
    selected_address: Option<Address>,
    selected_reward: Option<Reward>,
    payment_method: Option<PaymentMethod>,
    totals: TotalsBreakdown,
    status: SessionStatus,
    committing: bool,
    last_error: Option<String>,
    last_receipt: Option<OrderReceipt>,
    resolver: Arc<dyn ShippingRateResolver>,
}

impl CheckoutSession {
    /// Create an empty session that prices shipping with `resolver`.
    #[must_use]
    pub fn new(resolver: Arc<dyn ShippingRateResolver>) -> Self {
        Self {
            cart: Cart::new(),
            addresses: Vec::new(),
            held_rewards: Vec::new(),
            selected_address: None,
            selected_reward: None,
            payment_method: None,
            totals: TotalsBreakdown::default(),
            status: SessionStatus::Ready,
            committing: false,
            last_error: None,
            last_receipt: None,
            resolver,
        }
    }

    // =========================================================================
    // Read-only snapshot
    // =========================================================================

    /// The last computed totals.
    #[must_use]
    pub const fn totals(&self) -> TotalsBreakdown {
        self.totals
    }

    /// Whether totals are current.
    #[must_use]
    pub const fn status(&self) -> SessionStatus {
        self.status
    }

    /// Whether a commit is currently in flight.
    #[must_use]
    pub const fn commit_in_flight(&self) -> bool {
        self.committing
    }

    /// The cart owned by this session.
    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// The user's addresses as last seen from the store stream.
    #[must_use]
    pub fn addresses(&self) -> &[Address] {
        &self.addresses
    }

    /// The user's held rewards as last seen from the store stream.
    #[must_use]
    pub fn held_rewards(&self) -> &[Reward] {
        &self.held_rewards
    }

    /// The selected shipping address, if any.
    #[must_use]
    pub const fn selected_address(&self) -> Option<&Address> {
        self.selected_address.as_ref()
    }

    /// The selected reward, if any.
    #[must_use]
    pub const fn selected_reward(&self) -> Option<&Reward> {
        self.selected_reward.as_ref()
    }

    /// The selected payment method, if any.
    #[must_use]
    pub const fn payment_method(&self) -> Option<PaymentMethod> {
        self.payment_method
    }

    /// The error recorded by the last failed commit attempt, if any.
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// The receipt of the last successful commit, if any.
    #[must_use]
    pub const fn last_receipt(&self) -> Option<OrderReceipt> {
        self.last_receipt
    }

    // =========================================================================
    // Mutators - each recomputes totals before returning
    // =========================================================================

    /// Add a line to the cart.
    pub fn add_line(&mut self, line: CartLine) {
        self.cart.add(line);
        self.recompute();
    }

    /// Set the quantity of a cart line; zero removes it.
    pub fn set_quantity(&mut self, product_code: &ProductCode, quantity: u32) {
        self.cart.set_quantity(product_code, quantity);
        self.recompute();
    }

    /// Remove a product from the cart.
    pub fn remove_line(&mut self, product_code: &ProductCode) {
        self.cart.remove(product_code);
        self.recompute();
    }

    /// Empty the cart.
    pub fn clear_cart(&mut self) {
        self.cart.clear();
        self.recompute();
    }

    /// Select the shipping address.
    pub fn select_address(&mut self, address: Address) {
        self.selected_address = Some(address);
        self.recompute();
    }

    /// Select a reward, or clear the selection with `None`.
    pub fn select_reward(&mut self, reward: Option<Reward>) {
        self.selected_reward = reward;
        self.recompute();
    }

    /// Select the payment method.
    pub fn select_payment_method(&mut self, method: PaymentMethod) {
        self.payment_method = Some(method);
        self.recompute();
    }

    /// Apply an address-list update from the store stream.
    ///
    /// Keeps the current selection if it still exists (refreshing its
    /// value), drops it otherwise, and preselects the primary address when
    /// nothing is selected.
    pub fn apply_addresses(&mut self, addresses: Vec<Address>) {
        self.addresses = addresses;

        if let Some(selected) = &self.selected_address {
            self.selected_address = self
                .addresses
                .iter()
                .find(|a| a.id == selected.id)
                .cloned();
        }
        if self.selected_address.is_none() {
            self.selected_address = self.addresses.iter().find(|a| a.is_primary).cloned();
        }

        self.recompute();
    }

    /// Apply a held-rewards update from the store stream.
    ///
    /// A selected reward that is no longer held (consumed elsewhere, or by a
    /// finished commit) is deselected.
    pub fn apply_held_rewards(&mut self, rewards: Vec<Reward>) {
        self.held_rewards = rewards;

        if let Some(selected) = &self.selected_reward
            && !self.held_rewards.iter().any(|r| r.id == selected.id)
        {
            self.selected_reward = None;
        }

        self.recompute();
    }

    // =========================================================================
    // Commit protocol (used by the orchestrator)
    // =========================================================================

    /// Validate preconditions and claim the in-flight-commit guard.
    ///
    /// On success the session is marked committing and a [`CommitPlan`]
    /// snapshot is returned; the caller must later hand the outcome to
    /// [`Self::finish_commit`]. Every failure records the session error and
    /// leaves the session untouched.
    pub(crate) fn begin_commit(&mut self) -> Result<CommitPlan, CheckoutError> {
        if self.committing {
            return Err(self.reject(CheckoutError::CommitInFlight));
        }
        let Some(address) = self.selected_address.clone() else {
            return Err(self.reject(CheckoutError::MissingAddress));
        };
        let Some(payment_method) = self.payment_method else {
            return Err(self.reject(CheckoutError::MissingPaymentMethod));
        };

        self.committing = true;
        Ok(CommitPlan {
            lines: self.cart.lines().to_vec(),
            address,
            reward: self.selected_reward.clone(),
            payment_method,
            totals: self.totals,
        })
    }

    /// Record a commit outcome and release the in-flight-commit guard.
    ///
    /// Success clears the cart and the consumed reward selection and stores
    /// the receipt; failure stores the error message. Either way the session
    /// is ready for another attempt.
    pub(crate) fn finish_commit(&mut self, outcome: &Result<OrderReceipt, CheckoutError>) {
        self.committing = false;
        match outcome {
            Ok(receipt) => {
                self.cart.clear();
                self.selected_reward = None;
                self.last_receipt = Some(*receipt);
                self.last_error = None;
                self.recompute();
            }
            Err(err) => {
                self.last_error = Some(err.to_string());
            }
        }
    }

    fn reject(&mut self, err: CheckoutError) -> CheckoutError {
        self.last_error = Some(err.to_string());
        err
    }

    fn recompute(&mut self) {
        self.status = SessionStatus::Computing;
        self.totals = pricing::compute(
            self.cart.lines(),
            self.selected_address.as_ref(),
            self.selected_reward.as_ref(),
            self.resolver.as_ref(),
        );
        self.status = SessionStatus::Ready;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use rust_decimal::Decimal;

    use pixel_arcade_core::{AddressId, Money, RewardId, RewardKind, UserId};

    use super::*;
    use crate::shipping::TableRateResolver;

    fn session() -> CheckoutSession {
        let resolver = TableRateResolver::new(HashMap::from([(
            "Metropolitana".to_owned(),
            Money::from(2990),
        )]));
        CheckoutSession::new(Arc::new(resolver))
    }

    fn line(code: &str, price: i64, qty: u32) -> CartLine {
        CartLine::new(code.parse().unwrap(), Money::from(price), qty).unwrap()
    }

    fn address(id: i32, primary: bool) -> Address {
        Address {
            id: AddressId::new(id),
            user_id: UserId::new(1),
            street: "Street 123".to_owned(),
            unit: None,
            region: "Metropolitana".to_owned(),
            commune: "Centro".to_owned(),
            is_primary: primary,
        }
    }

    fn ten_percent() -> Reward {
        Reward {
            id: RewardId::new(1),
            title: "10% off".to_owned(),
            description: String::new(),
            kind: RewardKind::PercentageDiscount,
            value: Decimal::from(10),
            points_cost: 100,
        }
    }

    #[test]
    fn test_new_session_is_ready_with_zero_totals() {
        let session = session();
        assert_eq!(session.status(), SessionStatus::Ready);
        assert_eq!(session.totals(), TotalsBreakdown::default());
        assert!(!session.commit_in_flight());
    }

    #[test]
    fn test_every_mutator_lands_in_ready_with_fresh_totals() {
        let mut session = session();

        session.add_line(line("JM001", 10_000, 1));
        assert_eq!(session.status(), SessionStatus::Ready);
        assert_eq!(session.totals().subtotal, Money::from(10_000));

        session.select_address(address(1, true));
        assert_eq!(session.totals().shipping_cost, Money::from(2990));

        session.select_reward(Some(ten_percent()));
        assert_eq!(session.totals().discount_amount, Money::from(1000));
        assert_eq!(session.totals().total, Money::from(9000 + 2990));

        session.select_reward(None);
        assert_eq!(session.totals().discount_amount, Money::ZERO);

        session.set_quantity(&"JM001".parse().unwrap(), 2);
        assert_eq!(session.totals().subtotal, Money::from(20_000));

        session.remove_line(&"JM001".parse().unwrap());
        assert_eq!(session.totals().subtotal, Money::ZERO);
    }

    #[test]
    fn test_begin_commit_checks_address_before_payment() {
        let mut session = session();
        // neither selected: address is reported first
        assert!(matches!(
            session.begin_commit(),
            Err(CheckoutError::MissingAddress)
        ));
        assert_eq!(session.last_error(), Some("no shipping address selected"));

        session.select_address(address(1, true));
        assert!(matches!(
            session.begin_commit(),
            Err(CheckoutError::MissingPaymentMethod)
        ));
        assert_eq!(session.last_error(), Some("no payment method selected"));
        assert!(!session.commit_in_flight());
    }

    #[test]
    fn test_begin_commit_snapshots_and_guards() {
        let mut session = session();
        session.add_line(line("JM001", 1000, 2));
        session.select_address(address(1, true));
        session.select_payment_method(PaymentMethod::Webpay);

        let plan = session.begin_commit().unwrap();
        assert_eq!(plan.lines.len(), 1);
        assert_eq!(plan.totals.subtotal, Money::from(2000));
        assert!(session.commit_in_flight());

        // second attempt while in flight is rejected, not queued
        assert!(matches!(
            session.begin_commit(),
            Err(CheckoutError::CommitInFlight)
        ));

        // selection changes after the snapshot do not shear the plan
        session.set_quantity(&"JM001".parse().unwrap(), 5);
        assert_eq!(plan.totals.subtotal, Money::from(2000));
    }

    #[test]
    fn test_finish_commit_success_clears_cart_and_reward() {
        let mut session = session();
        session.add_line(line("JM001", 1000, 1));
        session.select_address(address(1, true));
        session.select_payment_method(PaymentMethod::Webpay);
        session.select_reward(Some(ten_percent()));
        session.begin_commit().unwrap();

        let receipt = OrderReceipt {
            order_id: OrderId::generate(),
            points_earned: 10,
        };
        session.finish_commit(&Ok(receipt));

        assert!(!session.commit_in_flight());
        assert!(session.cart().is_empty());
        assert!(session.selected_reward().is_none());
        assert_eq!(session.last_receipt(), Some(receipt));
        assert!(session.last_error().is_none());
        assert_eq!(session.totals().subtotal, Money::ZERO);
    }

    #[test]
    fn test_finish_commit_failure_keeps_cart_and_records_error() {
        let mut session = session();
        session.add_line(line("JM001", 1000, 1));
        session.select_address(address(1, true));
        session.select_payment_method(PaymentMethod::Webpay);
        session.begin_commit().unwrap();

        session.finish_commit(&Err(CheckoutError::AccountSuspended));

        assert!(!session.commit_in_flight());
        assert!(!session.cart().is_empty());
        assert_eq!(session.last_error(), Some("account suspended"));
        assert!(session.last_receipt().is_none());
    }

    #[test]
    fn test_apply_addresses_preselects_primary() {
        let mut session = session();
        session.apply_addresses(vec![address(1, false), address(2, true)]);
        assert_eq!(session.selected_address().map(|a| a.id), Some(AddressId::new(2)));
        // shipping is now priced against the preselected address
        assert_eq!(session.totals().shipping_cost, Money::from(2990));
    }

    #[test]
    fn test_apply_addresses_keeps_existing_selection() {
        let mut session = session();
        session.apply_addresses(vec![address(1, false), address(2, true)]);
        session.select_address(address(1, false));

        session.apply_addresses(vec![address(1, false), address(2, true), address(3, false)]);
        assert_eq!(session.selected_address().map(|a| a.id), Some(AddressId::new(1)));
    }

    #[test]
    fn test_apply_addresses_drops_vanished_selection() {
        let mut session = session();
        session.apply_addresses(vec![address(1, false)]);
        session.select_address(address(1, false));

        session.apply_addresses(vec![address(2, true)]);
        assert_eq!(session.selected_address().map(|a| a.id), Some(AddressId::new(2)));
    }

    #[test]
    fn test_apply_held_rewards_prunes_consumed_selection() {
        let mut session = session();
        session.add_line(line("JM001", 10_000, 1));
        session.apply_held_rewards(vec![ten_percent()]);
        session.select_reward(Some(ten_percent()));
        assert_eq!(session.totals().discount_amount, Money::from(1000));

        session.apply_held_rewards(Vec::new());
        assert!(session.selected_reward().is_none());
        assert_eq!(session.totals().discount_amount, Money::ZERO);
    }
}
