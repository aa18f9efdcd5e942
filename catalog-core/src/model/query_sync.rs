//! src/model/query_sync.rs
//! ============================================================================
//! # Query Sync: `FilterState` <-> location query string
//!
//! Only non-default members are written: `q` (search), `cat` (category) and
//! `sort`. Decoding is lenient: unknown keys are ignored and unknown values
//! fall back to that field's default, so any shared link opens.

use url::{Url, form_urlencoded};

use tracing::{debug, warn};

use crate::{
    error::AppError,
    model::filter_state::{CategoryFilter, FilterState, SortKey},
};

pub const PARAM_SEARCH: &str = "q";
pub const PARAM_CATEGORY: &str = "cat";
pub const PARAM_SORT: &str = "sort";

/// Serializes the non-default members as `?q=..&cat=..&sort=..`, or `""`.
#[must_use]
pub fn encode(state: &FilterState) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());

    if !state.search_text.is_empty() {
        query.append_pair(PARAM_SEARCH, &state.search_text);
    }
    if let CategoryFilter::Only(category) = &state.category {
        query.append_pair(PARAM_CATEGORY, category);
    }
    if let Some(token) = state.sort.token() {
        query.append_pair(PARAM_SORT, token);
    }

    let query = query.finish();
    if query.is_empty() {
        query
    } else {
        format!("?{query}")
    }
}

/// Reconstructs a `FilterState` from a query string, with or without `?`.
#[must_use]
pub fn decode(query: &str) -> FilterState {
    let query = query.strip_prefix('?').unwrap_or(query);
    let mut state = FilterState::default();

    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        match key.as_ref() {
            PARAM_SEARCH => state.search_text = value.into_owned(),
            PARAM_CATEGORY => state.category = CategoryFilter::from_value(&value),
            PARAM_SORT => {
                state.sort = value.parse().unwrap_or_else(|e| {
                    warn!("Ignoring query sort value: {}", e);
                    SortKey::Unspecified
                });
            }
            other => debug!("Ignoring unknown query parameter '{}'", other),
        }
    }

    state
}

/// A location whose query can be replaced in place.
pub trait NavigableLocation: Send {
    fn current(&self) -> &Url;

    /// Replaces the query without adding a history entry.
    fn replace_query(&mut self, query: &str);

    /// The current query including its leading `?`, or `""`.
    fn query_string(&self) -> String {
        self.current()
            .query()
            .filter(|q| !q.is_empty())
            .map(|q| format!("?{q}"))
            .unwrap_or_default()
    }
}

/// Location held in memory; the terminal has no address bar.
///
/// The session has a single history entry; query replacement rewrites it in
/// place.
#[derive(Debug, Clone)]
pub struct InMemoryLocation {
    url: Url,
    history_len: usize,
}

impl InMemoryLocation {
    pub fn parse(url: &str) -> Result<Self, AppError> {
        Ok(Self::new(Url::parse(url)?))
    }

    /// Builds `base` with `query` attached, e.g. from a `--query` argument.
    pub fn with_query(base: &str, query: &str) -> Result<Self, AppError> {
        let mut location = Self::parse(base)?;
        location.replace_query(query);
        Ok(location)
    }

    #[must_use]
    pub fn new(url: Url) -> Self {
        Self { url, history_len: 1 }
    }

    /// Number of history entries. Query replacement never adds one.
    #[must_use]
    pub fn history_len(&self) -> usize {
        self.history_len
    }
}

impl NavigableLocation for InMemoryLocation {
    fn current(&self) -> &Url {
        &self.url
    }

    fn replace_query(&mut self, query: &str) {
        let query = query.strip_prefix('?').unwrap_or(query);
        self.url
            .set_query(if query.is_empty() { None } else { Some(query) });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(search: &str, category: &str, sort: SortKey) -> FilterState {
        FilterState {
            search_text: search.into(),
            category: CategoryFilter::from_value(category),
            sort,
        }
    }

    #[test]
    fn test_encode_shared_link() {
        let s = state("art", "indoor", SortKey::PriceAsc);
        assert_eq!(encode(&s), "?q=art&cat=indoor&sort=price-low");
        assert_eq!(decode(&encode(&s)), s);
    }

    #[test]
    fn test_defaults_encode_to_nothing() {
        assert_eq!(encode(&FilterState::default()), "");
        assert_eq!(decode(""), FilterState::default());
        assert_eq!(decode("?"), FilterState::default());
    }

    #[test]
    fn test_only_non_default_members_written() {
        assert_eq!(encode(&state("", "all", SortKey::PriceDesc)), "?sort=price-high");
        assert_eq!(encode(&state("", "toys", SortKey::Unspecified)), "?cat=toys");
        assert_eq!(encode(&state("zoo", "all", SortKey::Unspecified)), "?q=zoo");
    }

    #[test]
    fn test_round_trip_with_reserved_characters() {
        let s = state("kids & art = fun?", "home-decoration", SortKey::RatingDesc);
        let encoded = encode(&s);
        assert!(!encoded[1..].contains('?'));
        assert_eq!(decode(&encoded), s);
    }

    #[test]
    fn test_decode_is_lenient() {
        let s = decode("sort=newest&utm_source=x&cat=all&q=lego");
        assert_eq!(s, state("lego", "all", SortKey::Unspecified));
    }

    #[test]
    fn test_replace_query_keeps_history_length() {
        let mut loc = InMemoryLocation::parse("catalog://browse").unwrap();
        assert_eq!(loc.query_string(), "");

        loc.replace_query("?q=art&cat=indoor&sort=price-low");
        loc.replace_query("?q=arts");
        assert_eq!(loc.history_len(), 1);
        assert_eq!(loc.current().as_str(), "catalog://browse?q=arts");

        loc.replace_query("");
        assert_eq!(loc.query_string(), "");
        assert_eq!(loc.current().as_str(), "catalog://browse");
    }

    #[test]
    fn test_with_query_seeds_state() {
        let loc = InMemoryLocation::with_query("catalog://browse", "?q=art&cat=indoor&sort=price-low")
            .unwrap();
        assert_eq!(
            decode(&loc.query_string()),
            state("art", "indoor", SortKey::PriceAsc)
        );
    }
}
