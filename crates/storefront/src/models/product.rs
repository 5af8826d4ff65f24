//! Product domain type.

use serde::{Deserialize, Serialize};

use pixel_arcade_core::{Money, ProductCode};

/// A catalog product.
///
/// The catalog itself is synchronized elsewhere; checkout only reads prices
/// and stock and writes stock decrements.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Catalog code, the product's identity.
    pub code: ProductCode,
    /// Display name.
    pub name: String,
    /// Category label (e.g. "Consoles", "Accessories").
    pub category: String,
    /// Current unit price.
    pub unit_price: Money,
    /// Marketing description.
    pub description: String,
    /// Units currently in stock.
    pub stock: i32,
    /// Remote image URL, if any.
    pub image_url: Option<String>,
    /// Average review rating, 0.0 when unrated.
    pub average_rating: f32,
}
