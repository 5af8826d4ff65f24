//! Product store: catalog reads and stock decrements.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use pixel_arcade_core::ProductCode;

use super::RepositoryError;
use crate::models::Product;

/// Read products and mutate their stock.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Get a product by its catalog code.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Storage` if the backend fails.
    async fn get(&self, code: &ProductCode) -> Result<Option<Product>, RepositoryError>;

    /// Insert or replace a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Storage` if the backend fails.
    async fn upsert(&self, product: Product) -> Result<(), RepositoryError>;

    /// Atomically decrement a product's stock by `quantity`.
    ///
    /// The check and the write are one compare-and-swap: stock is never
    /// driven below zero, even with two sessions committing the same
    /// product. Returns the remaining stock.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` for an unknown code and
    /// `RepositoryError::Conflict` when stock is insufficient.
    async fn decrement_stock(
        &self,
        code: &ProductCode,
        quantity: u32,
    ) -> Result<i32, RepositoryError>;
}

/// In-memory [`ProductStore`].
#[derive(Debug, Default)]
pub struct MemoryProductStore {
    products: RwLock<HashMap<ProductCode, Product>>,
}

impl MemoryProductStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductStore for MemoryProductStore {
    async fn get(&self, code: &ProductCode) -> Result<Option<Product>, RepositoryError> {
        Ok(self.products.read().await.get(code).cloned())
    }

    async fn upsert(&self, product: Product) -> Result<(), RepositoryError> {
        self.products
            .write()
            .await
            .insert(product.code.clone(), product);
        Ok(())
    }

    async fn decrement_stock(
        &self,
        code: &ProductCode,
        quantity: u32,
    ) -> Result<i32, RepositoryError> {
        let mut products = self.products.write().await;
        let product = products.get_mut(code).ok_or(RepositoryError::NotFound)?;

        let needed = i32::try_from(quantity).map_err(|_| {
            RepositoryError::Conflict(format!(
                "insufficient stock for {code}: have {}, need {quantity}",
                product.stock
            ))
        })?;

        if product.stock < needed {
            return Err(RepositoryError::Conflict(format!(
                "insufficient stock for {code}: have {}, need {quantity}",
                product.stock
            )));
        }

        product.stock -= needed;
        Ok(product.stock)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pixel_arcade_core::Money;

    use super::*;

    fn product(code: &str, stock: i32) -> Product {
        Product {
            code: code.parse().unwrap(),
            name: "Test Product".to_owned(),
            category: "Test".to_owned(),
            unit_price: Money::from(1000),
            description: String::new(),
            stock,
            image_url: None,
            average_rating: 0.0,
        }
    }

    #[tokio::test]
    async fn test_decrement_is_visible_to_subsequent_reads() {
        let store = MemoryProductStore::new();
        store.upsert(product("JM001", 10)).await.unwrap();

        let remaining = store
            .decrement_stock(&"JM001".parse().unwrap(), 3)
            .await
            .unwrap();
        assert_eq!(remaining, 7);

        let read_back = store.get(&"JM001".parse().unwrap()).await.unwrap().unwrap();
        assert_eq!(read_back.stock, 7);
    }

    #[tokio::test]
    async fn test_decrement_never_drives_stock_below_zero() {
        let store = MemoryProductStore::new();
        store.upsert(product("JM001", 2)).await.unwrap();

        let err = store
            .decrement_stock(&"JM001".parse().unwrap(), 3)
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));

        // the failed decrement left stock untouched
        let read_back = store.get(&"JM001".parse().unwrap()).await.unwrap().unwrap();
        assert_eq!(read_back.stock, 2);
    }

    #[tokio::test]
    async fn test_decrement_unknown_product() {
        let store = MemoryProductStore::new();
        let err = store
            .decrement_stock(&"NOPE".parse().unwrap(), 1)
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }
}
