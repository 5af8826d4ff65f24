//! User domain type.

use serde::{Deserialize, Serialize};

use pixel_arcade_core::{Email, UserId};

/// A storefront user.
///
/// Credential and session data live with the auth collaborator; checkout
/// only needs the loyalty balance and the account gate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// User's email address.
    pub email: Email,
    /// Suspended accounts cannot place orders or redeem rewards.
    pub is_active: bool,
    /// Loyalty points balance.
    pub points: i64,
}
