//! Order store: header + line items appended as one logical unit.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use pixel_arcade_core::OrderId;

use super::RepositoryError;
use crate::models::{Order, OrderLine};

/// Append and read placed orders.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Persist an order header and its lines as one call.
    ///
    /// Either the whole order lands or none of it does; the engine relies on
    /// this when classifying commit failures.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the order ID already exists.
    async fn append(&self, order: Order, lines: Vec<OrderLine>) -> Result<(), RepositoryError>;

    /// Read back a placed order with its lines.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Storage` if the backend fails.
    async fn get(&self, id: OrderId) -> Result<Option<(Order, Vec<OrderLine>)>, RepositoryError>;
}

/// In-memory [`OrderStore`].
#[derive(Debug, Default)]
pub struct MemoryOrderStore {
    orders: RwLock<HashMap<OrderId, (Order, Vec<OrderLine>)>>,
}

impl MemoryOrderStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of orders placed so far.
    pub async fn count(&self) -> usize {
        self.orders.read().await.len()
    }
}

#[async_trait]
impl OrderStore for MemoryOrderStore {
    async fn append(&self, order: Order, lines: Vec<OrderLine>) -> Result<(), RepositoryError> {
        let mut orders = self.orders.write().await;
        if orders.contains_key(&order.id) {
            return Err(RepositoryError::Conflict(format!(
                "order {} already exists",
                order.id
            )));
        }
        orders.insert(order.id, (order, lines));
        Ok(())
    }

    async fn get(&self, id: OrderId) -> Result<Option<(Order, Vec<OrderLine>)>, RepositoryError> {
        Ok(self.orders.read().await.get(&id).cloned())
    }
}
