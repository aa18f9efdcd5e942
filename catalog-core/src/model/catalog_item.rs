//! src/model/catalog_item.rs
//! ============================================================================
//! # `CatalogItem`: immutable product record
//!
//! Items are validated once at the remote client boundary and never mutated
//! afterwards. A re-fetch replaces the whole collection.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable per-session product identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub u64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ItemId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatalogItem {
    pub id: ItemId,
    pub title: String,
    pub description: String,
    /// Non-negative and finite.
    pub price: f64,
    /// In `[0, 5]`. `None` or zero means unrated.
    pub rating: Option<f64>,
    pub category: String,
    pub thumbnail: String,
}

impl CatalogItem {
    pub const MAX_RATING: f64 = 5.0;

    /// Rating used for ordering; unrated items sort as zero.
    #[must_use]
    pub fn sort_rating(&self) -> f64 {
        self.rating.unwrap_or(0.0)
    }

    #[must_use]
    pub fn is_rated(&self) -> bool {
        self.rating.is_some_and(|r| r > 0.0)
    }

    #[must_use]
    pub fn rating_label(&self) -> RatingLabel {
        match self.rating {
            Some(r) if r > 0.0 => RatingLabel::Rated(r),
            _ => RatingLabel::Unrated,
        }
    }

    #[must_use]
    pub fn matches_title(&self, needle_lowercase: &str) -> bool {
        needle_lowercase.is_empty() || self.title.to_lowercase().contains(needle_lowercase)
    }
}

/// Display form of an item rating.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RatingLabel {
    Rated(f64),
    Unrated,
}

impl fmt::Display for RatingLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rated(r) => write!(f, "{r}"),
            Self::Unrated => write!(f, "unrated"),
        }
    }
}

#[cfg(test)]
pub(crate) fn item(id: u64, title: &str, price: f64, rating: f64, category: &str) -> CatalogItem {
    CatalogItem {
        id: ItemId(id),
        title: title.to_string(),
        description: format!("{title} description"),
        price,
        rating: Some(rating),
        category: category.to_string(),
        thumbnail: format!("https://cdn.example/{id}.png"),
    }
}
