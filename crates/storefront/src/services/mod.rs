//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `checkout` - pricing, session state, and the order commit sequence
//! - `rewards` - redeeming loyalty points for rewards

pub mod checkout;
pub mod rewards;
