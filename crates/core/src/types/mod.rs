//! Core types for Pixel Arcade.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod code;
pub mod email;
pub mod id;
pub mod payment;
pub mod price;
pub mod reward;

pub use code::{ProductCode, ProductCodeError};
pub use email::{Email, EmailError};
pub use id::*;
pub use payment::PaymentMethod;
pub use price::Money;
pub use reward::RewardKind;
