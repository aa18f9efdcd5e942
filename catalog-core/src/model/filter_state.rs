//! src/model/filter_state.rs
//! ============================================================================
//! # `FilterState`: search text, category and sort selection
//!
//! Seeded from defaults or a location query at startup, mutated by user input
//! and read by the filter-sort pipeline on every recomputation.

use std::{fmt, str::FromStr};

/// Literal used for "no category filter" in the UI and in query strings.
pub const ALL_CATEGORIES: &str = "all";

/// Sort order for the visible list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortKey {
    /// No explicit choice; orders like `RatingDesc`.
    #[default]
    Unspecified,
    RatingDesc,
    PriceAsc,
    PriceDesc,
}

impl SortKey {
    /// Query/UI token. `Unspecified` has none.
    #[must_use]
    pub const fn token(self) -> Option<&'static str> {
        match self {
            Self::Unspecified => None,
            Self::RatingDesc => Some("rating"),
            Self::PriceAsc => Some("price-low"),
            Self::PriceDesc => Some("price-high"),
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Unspecified | Self::RatingDesc => "Top rated",
            Self::PriceAsc => "Price: low to high",
            Self::PriceDesc => "Price: high to low",
        }
    }

    /// Next entry of the sort selector. `Unspecified` is never re-entered.
    #[must_use]
    pub const fn cycle(self) -> Self {
        match self {
            Self::Unspecified | Self::PriceDesc => Self::RatingDesc,
            Self::RatingDesc => Self::PriceAsc,
            Self::PriceAsc => Self::PriceDesc,
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token().unwrap_or("default"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sort key '{0}'")]
pub struct UnknownSortKey(pub String);

impl FromStr for SortKey {
    type Err = UnknownSortKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "default" => Ok(Self::Unspecified),
            "rating" => Ok(Self::RatingDesc),
            "price-low" => Ok(Self::PriceAsc),
            "price-high" => Ok(Self::PriceDesc),
            other => Err(UnknownSortKey(other.to_string())),
        }
    }
}

/// Category selection: the "all" sentinel or one literal category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl CategoryFilter {
    /// Maps the selector value back to a filter; `"all"` is the sentinel.
    #[must_use]
    pub fn from_value(value: &str) -> Self {
        if value == ALL_CATEGORIES {
            Self::All
        } else {
            Self::Only(value.to_string())
        }
    }

    #[must_use]
    pub fn as_value(&self) -> &str {
        match self {
            Self::All => ALL_CATEGORIES,
            Self::Only(c) => c,
        }
    }

    /// Exact, case-sensitive comparison against an item category.
    #[must_use]
    pub fn admits(&self, category: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(c) => c == category,
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_value())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FilterState {
    pub search_text: String,
    pub category: CategoryFilter,
    pub sort: SortKey,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_tokens_parse_back() {
        for key in [SortKey::RatingDesc, SortKey::PriceAsc, SortKey::PriceDesc] {
            let token = key.token().unwrap();
            assert_eq!(token.parse::<SortKey>().unwrap(), key);
        }
        assert_eq!("".parse::<SortKey>().unwrap(), SortKey::Unspecified);
        let err = "newest".parse::<SortKey>().unwrap_err();
        assert_eq!(err, UnknownSortKey("newest".into()));
        assert_eq!(err.to_string(), "unknown sort key 'newest'");
    }

    #[test]
    fn test_sort_cycle_skips_unspecified() {
        let mut key = SortKey::Unspecified;
        let mut seen = Vec::new();
        for _ in 0..4 {
            key = key.cycle();
            seen.push(key);
        }
        assert_eq!(
            seen,
            vec![
                SortKey::RatingDesc,
                SortKey::PriceAsc,
                SortKey::PriceDesc,
                SortKey::RatingDesc
            ]
        );
    }

    #[test]
    fn test_category_sentinel() {
        assert_eq!(CategoryFilter::from_value("all"), CategoryFilter::All);
        assert_eq!(
            CategoryFilter::from_value("toys"),
            CategoryFilter::Only("toys".into())
        );
        assert!(CategoryFilter::All.admits("anything"));
        assert!(!CategoryFilter::Only("Toys".into()).admits("toys"));
    }
}
