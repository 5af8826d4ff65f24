//! Checkout error types.
//!
//! Commit failures are an explicit result, not an unwound exception: every
//! caller of the orchestrator has to handle one of these kinds, and the
//! session records the message so the presentation layer always has a signal.

use thiserror::Error;

use pixel_arcade_core::OrderId;

use crate::db::RepositoryError;

/// Errors from the checkout commit sequence.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// No shipping address selected; commit not attempted.
    #[error("no shipping address selected")]
    MissingAddress,

    /// No payment method selected; commit not attempted.
    #[error("no payment method selected")]
    MissingPaymentMethod,

    /// The account is suspended; commit not attempted.
    #[error("account suspended")]
    AccountSuspended,

    /// Another commit is already in flight for this session.
    #[error("an order is already being placed for this session")]
    CommitInFlight,

    /// A store failed before the order header was written. Nothing was
    /// recorded; the user may retry.
    #[error("order could not be placed: {0}")]
    Persistence(#[from] RepositoryError),

    /// A store failed after the order header was written. The order exists
    /// but stock/points/reward state may not match it; operators reconcile
    /// using the order ID.
    #[error("order {order_id} was recorded but fulfillment is incomplete: {source}")]
    PartialFulfillment {
        /// The order that was recorded before the failure.
        order_id: OrderId,
        /// The store failure that interrupted fulfillment.
        source: RepositoryError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_fulfillment_carries_order_id() {
        let order_id = OrderId::generate();
        let err = CheckoutError::PartialFulfillment {
            order_id,
            source: RepositoryError::Storage("disk full".to_owned()),
        };
        let message = err.to_string();
        assert!(message.contains(&order_id.to_string()));
        assert!(message.contains("disk full"));
    }

    #[test]
    fn test_validation_failures_are_distinct_from_suspension() {
        // Callers route suspension to account-recovery UX, so the variants
        // must stay distinguishable.
        assert!(!matches!(
            CheckoutError::MissingAddress,
            CheckoutError::AccountSuspended
        ));
    }
}
