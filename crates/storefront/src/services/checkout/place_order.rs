//! Order commit orchestrator.
//!
//! Runs the fixed commit sequence once the user confirms: mint an order ID,
//! persist the header and lines as one unit, decrement stock per line,
//! consume the selected reward, accrue loyalty points, then clear the cart.
//! The order header must exist before any other mutation is attempted, so a
//! failure is either "nothing happened" (before the header) or a reported
//! partial-fulfillment condition carrying the order ID (after it).

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{error, info, instrument, warn};

use pixel_arcade_core::{OrderId, UserId};

use super::error::CheckoutError;
use super::session::{CheckoutSession, CommitPlan, OrderReceipt};
use crate::config::LoyaltyConfig;
use crate::db::{OrderStore, ProductStore, RepositoryError, UserRewardStore, UserStore};
use crate::models::{Order, OrderLine};

/// Places orders against the store collaborators.
pub struct OrderService {
    products: Arc<dyn ProductStore>,
    users: Arc<dyn UserStore>,
    user_rewards: Arc<dyn UserRewardStore>,
    orders: Arc<dyn OrderStore>,
    loyalty: LoyaltyConfig,
}

impl OrderService {
    /// Create an order service.
    #[must_use]
    pub fn new(
        products: Arc<dyn ProductStore>,
        users: Arc<dyn UserStore>,
        user_rewards: Arc<dyn UserRewardStore>,
        orders: Arc<dyn OrderStore>,
        loyalty: LoyaltyConfig,
    ) -> Self {
        Self {
            products,
            users,
            user_rewards,
            orders,
            loyalty,
        }
    }

    /// Commit the session's current selections as an order for `user_id`.
    ///
    /// Preconditions are checked in a fixed order, each with its own error:
    /// no commit already in flight, an address selected, a payment method
    /// selected, the account active. The session lock is held only to
    /// snapshot the plan and to record the outcome - never across store
    /// calls - so a second call while this one is pending observes the
    /// in-flight guard and is rejected rather than queued.
    ///
    /// # Errors
    ///
    /// See [`CheckoutError`]; every failure is also recorded on the session.
    #[instrument(skip(self, session))]
    pub async fn place_order(
        &self,
        session: &Mutex<CheckoutSession>,
        user_id: UserId,
    ) -> Result<OrderReceipt, CheckoutError> {
        let plan = session.lock().await.begin_commit()?;

        let outcome = self.commit(&plan, user_id).await;
        session.lock().await.finish_commit(&outcome);
        outcome
    }

    async fn commit(
        &self,
        plan: &CommitPlan,
        user_id: UserId,
    ) -> Result<OrderReceipt, CheckoutError> {
        let user = self
            .users
            .get(user_id)
            .await?
            .ok_or(CheckoutError::Persistence(RepositoryError::NotFound))?;
        if !user.is_active {
            return Err(CheckoutError::AccountSuspended);
        }

        let order_id = OrderId::generate();
        let order = Order {
            id: order_id,
            user_id,
            address_id: plan.address.id,
            subtotal: plan.totals.subtotal,
            shipping_cost: plan.totals.shipping_cost,
            discount_amount: plan.totals.discount_amount,
            total: plan.totals.total,
            payment_method: plan.payment_method,
            placed_at: Utc::now(),
        };
        let lines = plan
            .lines
            .iter()
            .map(|line| OrderLine::from_cart_line(order_id, line))
            .collect();
        self.orders.append(order, lines).await?;

        // From here on the order exists; failures are partial fulfillment.
        for line in &plan.lines {
            if let Err(source) = self
                .products
                .decrement_stock(&line.product_code, line.quantity())
                .await
            {
                return Err(partial(order_id, source));
            }
        }

        if let Some(reward) = &plan.reward {
            match self.user_rewards.remove(user_id, reward.id).await {
                Ok(()) => {}
                Err(RepositoryError::NotFound) => {
                    warn!(
                        order_id = %order_id,
                        reward_id = %reward.id,
                        "Selected reward was already consumed"
                    );
                }
                Err(source) => return Err(partial(order_id, source)),
            }
        }

        let points_earned = self.loyalty.points_for(plan.totals.subtotal);
        let mut updated = user;
        updated.points += points_earned;
        if let Err(source) = self.users.update(updated).await {
            return Err(partial(order_id, source));
        }

        info!(
            order_id = %order_id,
            points_earned,
            total = %plan.totals.total,
            "Order placed"
        );
        Ok(OrderReceipt {
            order_id,
            points_earned,
        })
    }
}

/// Classify a post-header failure, logging it for operator reconciliation.
fn partial(order_id: OrderId, source: RepositoryError) -> CheckoutError {
    error!(
        order_id = %order_id,
        error = %source,
        "Order recorded but fulfillment incomplete"
    );
    CheckoutError::PartialFulfillment { order_id, source }
}
