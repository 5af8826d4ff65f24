//! Domain models for the storefront.
//!
//! These are validated domain objects, separate from whatever row or document
//! types a persistence backend uses.

pub mod address;
pub mod cart;
pub mod order;
pub mod product;
pub mod reward;
pub mod user;

pub use address::Address;
pub use cart::{Cart, CartError, CartLine};
pub use order::{Order, OrderLine};
pub use product::Product;
pub use reward::{HeldReward, Reward};
pub use user::User;
