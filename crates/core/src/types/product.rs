//! Catalog product records.
//!
//! Products are owned by the catalog source and treated as read-only here.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::id::ProductId;
use super::price::Price;

/// A purchasable product as returned by the catalog API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub category: String,
    pub style: Style,
    /// Unit price in the store currency.
    pub price: Decimal,
    pub description: String,
    /// Image URL.
    pub image: String,
}

impl Product {
    /// Unit price, for display.
    #[must_use]
    pub fn unit_price(&self) -> Price {
        Price::new(self.price)
    }
}

/// Style families used to tag products and filter the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Style {
    Casual,
    Professional,
    Edgy,
    Feminine,
    Sporty,
}

impl Style {
    /// All styles, in the order the storefront lists them.
    pub const ALL: [Self; 5] = [
        Self::Casual,
        Self::Professional,
        Self::Edgy,
        Self::Feminine,
        Self::Sporty,
    ];

    /// Canonical name as stored in the catalog.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Casual => "Casual",
            Self::Professional => "Professional",
            Self::Edgy => "Edgy",
            Self::Feminine => "Feminine",
            Self::Sporty => "Sporty",
        }
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not one of the known styles.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown style: {0}")]
pub struct ParseStyleError(pub String);

impl FromStr for Style {
    type Err = ParseStyleError;

    /// Parses the canonical (case-sensitive) style name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|style| style.as_str() == s)
            .ok_or_else(|| ParseStyleError(s.to_owned()))
    }
}
