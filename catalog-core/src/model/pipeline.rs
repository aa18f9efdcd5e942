//! src/model/pipeline.rs
//! ============================================================================
//! # Filter-Sort Pipeline
//!
//! Pure derivation from the raw catalog and the current filter inputs to the
//! ordered visible list, plus a small memo that recomputes only when an input
//! actually changed by value.

use std::{cmp::Ordering, sync::Arc};

use tracing::trace;

use crate::model::{
    catalog_item::CatalogItem,
    filter_state::{ALL_CATEGORIES, CategoryFilter, SortKey},
};

/// Filters by title and category, then stably sorts the survivors.
///
/// The raw slice is never reordered; equal keys keep their raw order.
#[must_use]
pub fn derive_visible(
    raw: &[CatalogItem],
    search_text: &str,
    category: &CategoryFilter,
    sort: SortKey,
) -> Vec<CatalogItem> {
    let needle = search_text.to_lowercase();

    let mut visible: Vec<CatalogItem> = raw
        .iter()
        .filter(|item| item.matches_title(&needle))
        .filter(|item| category.admits(&item.category))
        .cloned()
        .collect();

    // `sort_by` is stable.
    visible.sort_by(|a, b| compare(a, b, sort));
    visible
}

fn compare(a: &CatalogItem, b: &CatalogItem, sort: SortKey) -> Ordering {
    match sort {
        SortKey::PriceAsc => a.price.total_cmp(&b.price),
        SortKey::PriceDesc => b.price.total_cmp(&a.price),
        SortKey::RatingDesc | SortKey::Unspecified => b.sort_rating().total_cmp(&a.sort_rating()),
    }
}

/// `"all"` followed by each distinct category in first-occurrence order.
#[must_use]
pub fn derive_categories(raw: &[CatalogItem]) -> Vec<String> {
    let mut categories: Vec<String> = vec![ALL_CATEGORIES.to_string()];
    for item in raw {
        if !categories[1..].iter().any(|c| *c == item.category) {
            categories.push(item.category.clone());
        }
    }
    categories
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Inputs {
    catalog_generation: u64,
    search_text: String,
    category: CategoryFilter,
    sort: SortKey,
}

/// Memoized visible list.
///
/// The catalog is compared by generation: the engine bumps it whenever the
/// raw collection is replaced.
#[derive(Debug, Default)]
pub struct VisibleList {
    inputs: Option<Inputs>,
    items: Arc<[CatalogItem]>,
    recomputes: u64,
}

impl VisibleList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the visible list, recomputing only if an input differs.
    pub fn get(
        &mut self,
        raw: &[CatalogItem],
        catalog_generation: u64,
        search_text: &str,
        category: &CategoryFilter,
        sort: SortKey,
    ) -> Arc<[CatalogItem]> {
        let fresh = self.inputs.as_ref().is_some_and(|i| {
            i.catalog_generation == catalog_generation
                && i.search_text == search_text
                && i.category == *category
                && i.sort == sort
        });

        if !fresh {
            self.items = derive_visible(raw, search_text, category, sort).into();
            self.inputs = Some(Inputs {
                catalog_generation,
                search_text: search_text.to_string(),
                category: category.clone(),
                sort,
            });
            self.recomputes += 1;
            trace!(
                visible = self.items.len(),
                recomputes = self.recomputes,
                "Visible list recomputed"
            );
        }

        Arc::clone(&self.items)
    }

    /// Number of recomputations so far.
    #[must_use]
    pub const fn recompute_count(&self) -> u64 {
        self.recomputes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        model::catalog_item::{ItemId, item},
        operators::catalog_client::parse_catalog,
    };

    fn ids(items: &[CatalogItem]) -> Vec<u64> {
        items.iter().map(|i| i.id.0).collect()
    }

    fn scenario() -> Vec<CatalogItem> {
        vec![
            item(1, "Zoo Trip", 20.0, 0.0, "outdoor"),
            item(2, "Art Class", 10.0, 4.5, "indoor"),
        ]
    }

    fn mixed() -> Vec<CatalogItem> {
        vec![
            item(1, "Lego Set", 30.0, 4.0, "toys"),
            item(2, "Puzzle Box", 15.0, 4.0, "toys"),
            item(3, "Story Book", 15.0, 3.5, "books"),
            item(4, "Kite", 8.0, 0.0, "outdoor"),
            item(5, "Comic Book", 15.0, 4.0, "books"),
            item(6, "Art Kit", 22.5, 4.8, "crafts"),
        ]
    }

    #[test]
    fn test_default_sort_is_rating_desc_with_unrated_last() {
        let raw = scenario();
        let visible = derive_visible(&raw, "", &CategoryFilter::All, SortKey::RatingDesc);
        assert_eq!(ids(&visible), vec![2, 1]);

        let visible = derive_visible(&raw, "", &CategoryFilter::All, SortKey::Unspecified);
        assert_eq!(ids(&visible), vec![2, 1]);
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let raw = scenario();
        for query in ["zoo", "ZOO", "oo t"] {
            let visible = derive_visible(&raw, query, &CategoryFilter::All, SortKey::RatingDesc);
            assert_eq!(ids(&visible), vec![1], "query {query:?}");
        }
        assert!(derive_visible(&raw, "museum", &CategoryFilter::All, SortKey::RatingDesc).is_empty());
    }

    #[test]
    fn test_every_visible_title_contains_search() {
        let raw = mixed();
        for query in ["", "b", "BOOK", "k", "set", "xyz"] {
            let visible = derive_visible(&raw, query, &CategoryFilter::All, SortKey::Unspecified);
            let needle = query.to_lowercase();
            assert!(visible.iter().all(|i| i.title.to_lowercase().contains(&needle)));
            let expected = raw
                .iter()
                .filter(|i| i.title.to_lowercase().contains(&needle))
                .count();
            assert_eq!(visible.len(), expected);
        }
    }

    #[test]
    fn test_category_filter_is_exact() {
        let raw = mixed();
        let books = derive_visible(
            &raw,
            "",
            &CategoryFilter::Only("books".into()),
            SortKey::PriceAsc,
        );
        assert_eq!(ids(&books), vec![3, 5]);

        let none = derive_visible(
            &raw,
            "",
            &CategoryFilter::Only("Books".into()),
            SortKey::PriceAsc,
        );
        assert!(none.is_empty());
    }

    #[test]
    fn test_sort_is_stable_for_equal_keys() {
        let raw = mixed();

        let by_price = derive_visible(&raw, "", &CategoryFilter::All, SortKey::PriceAsc);
        assert_eq!(ids(&by_price), vec![4, 2, 3, 5, 6, 1]);

        let by_price_desc = derive_visible(&raw, "", &CategoryFilter::All, SortKey::PriceDesc);
        assert_eq!(ids(&by_price_desc), vec![1, 6, 2, 3, 5, 4]);

        let by_rating = derive_visible(&raw, "", &CategoryFilter::All, SortKey::RatingDesc);
        assert_eq!(ids(&by_rating), vec![6, 1, 2, 5, 3, 4]);
    }

    #[test]
    fn test_negative_zero_ties_keep_raw_order() {
        let body = r#"{"products":[
            {"id":1,"title":"A","description":"","price":-0.0,"rating":-0.0,"category":"x","thumbnail":""},
            {"id":2,"title":"B","description":"","price":0,"category":"x","thumbnail":""}]}"#;
        let raw = parse_catalog(body.as_bytes()).unwrap();
        assert_eq!(raw[0].rating_label(), raw[1].rating_label());

        for sort in [SortKey::RatingDesc, SortKey::PriceAsc, SortKey::PriceDesc] {
            let visible = derive_visible(&raw, "", &CategoryFilter::All, sort);
            assert_eq!(ids(&visible), vec![1, 2], "sort {sort:?}");
        }
    }

    #[test]
    fn test_price_desc_is_reverse_of_price_asc_without_ties() {
        let raw = vec![
            item(1, "A", 5.0, 1.0, "x"),
            item(2, "B", 50.0, 2.0, "x"),
            item(3, "C", 0.0, 3.0, "y"),
            item(4, "D", 12.25, 4.0, "y"),
        ];
        let mut asc = derive_visible(&raw, "", &CategoryFilter::All, SortKey::PriceAsc);
        let desc = derive_visible(&raw, "", &CategoryFilter::All, SortKey::PriceDesc);
        asc.reverse();
        assert_eq!(ids(&asc), ids(&desc));
    }

    #[test]
    fn test_raw_catalog_is_not_reordered() {
        let raw = mixed();
        let before = ids(&raw);
        let _ = derive_visible(&raw, "", &CategoryFilter::All, SortKey::PriceDesc);
        assert_eq!(ids(&raw), before);
    }

    #[test]
    fn test_categories_first_occurrence_order() {
        let raw = vec![
            item(1, "a", 1.0, 1.0, "toys"),
            item(2, "b", 1.0, 1.0, "toys"),
            item(3, "c", 1.0, 1.0, "books"),
        ];
        assert_eq!(derive_categories(&raw), vec!["all", "toys", "books"]);
        assert_eq!(derive_categories(&[]), vec!["all"]);
    }

    #[test]
    fn test_memo_recomputes_only_on_value_change() {
        let raw = mixed();
        let mut memo = VisibleList::new();
        let all = CategoryFilter::All;

        let first = memo.get(&raw, 1, "book", &all, SortKey::PriceAsc);
        let again = memo.get(&raw, 1, &"book".to_string(), &all, SortKey::PriceAsc);
        assert_eq!(memo.recompute_count(), 1);
        assert!(Arc::ptr_eq(&first, &again));

        memo.get(&raw, 1, "book", &all, SortKey::PriceDesc);
        assert_eq!(memo.recompute_count(), 2);

        memo.get(&raw, 2, "book", &all, SortKey::PriceDesc);
        assert_eq!(memo.recompute_count(), 3);

        let shown = memo.get(&raw, 2, "book", &CategoryFilter::Only("books".into()), SortKey::PriceDesc);
        assert_eq!(memo.recompute_count(), 4);
        assert_eq!(shown.iter().map(|i| i.id).collect::<Vec<_>>(), vec![ItemId(3), ItemId(5)]);
    }
}
