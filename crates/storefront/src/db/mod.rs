//! Store collaborator interfaces.
//!
//! The engine performs one local read-compute-write cycle per order against
//! these traits. The persistence engine behind them is external and assumed
//! to offer simple CRUD plus reactive read streams; an in-memory reference
//! implementation ships alongside each trait for tests and embedded use.
//!
//! # Stores
//!
//! - [`products::ProductStore`] - product reads and stock decrements
//! - [`addresses::AddressStore`] - a user's addresses as a watch stream
//! - [`rewards::RewardStore`] - reward definitions
//! - [`rewards::UserRewardStore`] - a user's held rewards as a watch stream
//! - [`users::UserStore`] - user reads and loyalty updates
//! - [`orders::OrderStore`] - order header + lines appended as one unit
//!
//! # Reactive reads
//!
//! Streams use [`tokio::sync::watch`]: every mutation publishes the new
//! collection value, and consumers may either poll (`borrow`) or await
//! (`changed`). Nothing in the engine assumes push-based delivery.

use thiserror::Error;

pub mod addresses;
pub mod orders;
pub mod products;
pub mod rewards;
pub mod users;

pub use addresses::{AddressStore, MemoryAddressStore};
pub use orders::{MemoryOrderStore, OrderStore};
pub use products::{MemoryProductStore, ProductStore};
pub use rewards::{MemoryRewardStore, MemoryUserRewardStore, RewardStore, UserRewardStore};
pub use users::{MemoryUserStore, UserStore};

/// Errors returned by store operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The backing storage failed.
    #[error("storage error: {0}")]
    Storage(String),

    /// Data in the store is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g. duplicate key, insufficient stock).
    #[error("constraint violation: {0}")]
    Conflict(String),
}
