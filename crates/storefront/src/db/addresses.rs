//! Address store: a user's addresses as a reactive read stream.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::{Mutex, watch};

use pixel_arcade_core::UserId;

use super::RepositoryError;
use crate::models::Address;

/// Read a user's addresses as a watch stream.
#[async_trait]
pub trait AddressStore: Send + Sync {
    /// Subscribe to a user's address list.
    ///
    /// The receiver starts at the current list and observes every later
    /// mutation; it can be polled with `borrow` or awaited with `changed`.
    async fn watch_for_user(&self, user_id: UserId) -> watch::Receiver<Vec<Address>>;

    /// Add an address for a user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the address ID already exists
    /// for the user.
    async fn add(&self, address: Address) -> Result<(), RepositoryError>;
}

/// In-memory [`AddressStore`].
///
/// State lives inside the watch channels themselves; the sender half is kept
/// alive here so subscriptions survive idle periods.
#[derive(Debug, Default)]
pub struct MemoryAddressStore {
    channels: Mutex<HashMap<UserId, watch::Sender<Vec<Address>>>>,
}

impl MemoryAddressStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AddressStore for MemoryAddressStore {
    async fn watch_for_user(&self, user_id: UserId) -> watch::Receiver<Vec<Address>> {
        self.channels
            .lock()
            .await
            .entry(user_id)
            .or_insert_with(|| watch::channel(Vec::new()).0)
            .subscribe()
    }

    async fn add(&self, address: Address) -> Result<(), RepositoryError> {
        let mut channels = self.channels.lock().await;
        let tx = channels
            .entry(address.user_id)
            .or_insert_with(|| watch::channel(Vec::new()).0);

        if tx.borrow().iter().any(|a| a.id == address.id) {
            return Err(RepositoryError::Conflict(format!(
                "address {} already exists",
                address.id
            )));
        }

        tx.send_modify(|list| list.push(address));
        Ok(())
    }
}
