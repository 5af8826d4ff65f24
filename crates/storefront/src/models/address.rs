//! Shipping address domain type.

use serde::{Deserialize, Serialize};

use pixel_arcade_core::{AddressId, UserId};

/// A user's shipping address.
///
/// Immutable value at the checkout layer; at most one address is marked
/// primary per user, and the primary one is preselected when a session first
/// sees the user's address list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// Unique address ID.
    pub id: AddressId,
    /// Owning user.
    pub user_id: UserId,
    /// Street name and number.
    pub street: String,
    /// Apartment or unit, if any.
    pub unit: Option<String>,
    /// Region, the key for shipping rate lookup.
    pub region: String,
    /// Commune within the region.
    pub commune: String,
    /// Whether this is the user's primary address.
    pub is_primary: bool,
}
