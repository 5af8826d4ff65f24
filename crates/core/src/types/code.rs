//! Product code type.
//!
//! Products are referenced by their catalog code (e.g. `JM001` or
//! `CONSOLE-PS5`) rather than by a store-assigned numeric ID, so order lines
//! stay readable after the catalog changes.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`ProductCode`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum ProductCodeError {
    /// The input string is empty.
    #[error("product code cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("product code must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains a character outside `[A-Za-z0-9_-]`.
    #[error("product code contains invalid character {0:?}")]
    InvalidCharacter(char),
}

/// A catalog product code.
///
/// ## Constraints
///
/// - Length: 1-32 characters
/// - ASCII alphanumerics, `-` and `_` only
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct ProductCode(String);

impl ProductCode {
    /// Maximum length of a product code.
    pub const MAX_LENGTH: usize = 32;

    /// Parse a `ProductCode` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, longer than 32 characters, or
    /// contains a character outside `[A-Za-z0-9_-]`.
    pub fn parse(s: &str) -> Result<Self, ProductCodeError> {
        if s.is_empty() {
            return Err(ProductCodeError::Empty);
        }

        if s.len() > Self::MAX_LENGTH {
            return Err(ProductCodeError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        if let Some(bad) = s
            .chars()
            .find(|c| !c.is_ascii_alphanumeric() && *c != '-' && *c != '_')
        {
            return Err(ProductCodeError::InvalidCharacter(bad));
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `ProductCode` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ProductCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ProductCode {
    type Err = ProductCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for ProductCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
