//! Pixel Arcade Core - Shared types library.
//!
//! This crate provides common types used across all Pixel Arcade components:
//! - `storefront` - The checkout and fulfillment engine
//! - `integration-tests` - End-to-end tests against seeded stores
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no store access, no async.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, money, product codes,
//!   emails, reward kinds, and payment methods

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
