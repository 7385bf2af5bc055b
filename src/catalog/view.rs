//! Display ordering and visibility derived from the store.
//!
//! Ordering and filtering are deliberately separate: a sort produces a new
//! `display_order`, a search only flips `visibility`. Hidden items keep their
//! slot, so clearing a query restores the previous order without a re-sort and
//! the renderer can move existing handles instead of rebuilding them.

use super::store::{ItemStore, VisualHandle};
use crate::domain::{ItemId, ItemRecord};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Sort order selectable by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortKey {
    /// Case-insensitive name, A to Z.
    #[default]
    NameAsc,
    /// Case-insensitive name, Z to A.
    NameDesc,
    /// Smallest first, ties by name A to Z.
    SizeAsc,
    /// Largest first, ties by name A to Z.
    SizeDesc,
}

impl SortKey {
    /// All keys in menu order.
    pub const ALL: [Self; 4] = [Self::NameAsc, Self::NameDesc, Self::SizeAsc, Self::SizeDesc];

    /// Parses a sort key name, falling back to [`SortKey::NameAsc`] for
    /// anything unrecognised.
    ///
    /// Accepts the canonical names (`name-asc`, `name-desc`, `size-asc`,
    /// `size-desc`) and the short web menu aliases `az` and `za`.
    ///
    /// ```
    /// use gameshelf::catalog::SortKey;
    ///
    /// assert_eq!(SortKey::parse("size-desc"), SortKey::SizeDesc);
    /// assert_eq!(SortKey::parse("za"), SortKey::NameDesc);
    /// assert_eq!(SortKey::parse("newest"), SortKey::NameAsc);
    /// ```
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "name-asc" | "az" => Self::NameAsc,
            "name-desc" | "za" => Self::NameDesc,
            "size-asc" => Self::SizeAsc,
            "size-desc" => Self::SizeDesc,
            other => {
                tracing::debug!(sort_key = %other, "unknown sort key, using name-asc");
                Self::NameAsc
            }
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NameAsc => "name-asc",
            Self::NameDesc => "name-desc",
            Self::SizeAsc => "size-asc",
            Self::SizeDesc => "size-desc",
        }
    }

    /// Short human label for the header.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::NameAsc => "Name A-Z",
            Self::NameDesc => "Name Z-A",
            Self::SizeAsc => "Smallest",
            Self::SizeDesc => "Largest",
        }
    }

    /// Returns the next key in menu order, wrapping around.
    #[must_use]
    pub const fn cycle(self) -> Self {
        match self {
            Self::NameAsc => Self::NameDesc,
            Self::NameDesc => Self::SizeAsc,
            Self::SizeAsc => Self::SizeDesc,
            Self::SizeDesc => Self::NameAsc,
        }
    }

    fn compare(self, a: &Row<'_>, b: &Row<'_>) -> Ordering {
        match self {
            Self::NameAsc => name_asc(a, b),
            Self::NameDesc => name_asc(b, a),
            Self::SizeAsc => a.size.cmp(&b.size).then_with(|| name_asc(a, b)),
            Self::SizeDesc => b.size.cmp(&a.size).then_with(|| name_asc(a, b)),
        }
    }
}

struct Row<'a> {
    id: &'a ItemId,
    key: &'a str,
    size: u64,
}

/// Name ascending, with the id as a last resort so equal names still order
/// the same way every time.
fn name_asc(a: &Row<'_>, b: &Row<'_>) -> Ordering {
    a.key.cmp(b.key).then_with(|| a.id.cmp(b.id))
}

/// Returns `true` if every character of `needle` occurs in `haystack` in
/// order, not necessarily contiguously. An empty needle matches anything.
///
/// Both arguments are compared as given; callers lower-case them first.
///
/// ```
/// use gameshelf::catalog::fuzzy_match;
///
/// assert!(fuzzy_match("half-life 2", "hl2"));
/// assert!(!fuzzy_match("half-life 2", "2hl"));
/// assert!(fuzzy_match("anything", ""));
/// ```
#[must_use]
pub fn fuzzy_match(haystack: &str, needle: &str) -> bool {
    let mut pending = needle.chars().peekable();
    for c in haystack.chars() {
        if pending.peek() == Some(&c) {
            pending.next();
        }
    }
    pending.peek().is_none()
}

/// Derived view: what to show, in which order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    pub sort_key: SortKey,
    /// Normalized (lower-cased) query the visibility was computed for.
    pub query: String,
    /// Every item id, in display order, visible or not.
    pub display_order: Vec<ItemId>,
    pub visibility: HashMap<ItemId, bool>,
    pub visible_count: usize,
}

impl ViewState {
    #[must_use]
    pub fn is_visible(&self, id: &ItemId) -> bool {
        self.visibility.get(id).copied().unwrap_or(false)
    }

    /// `(id, visible)` pairs in display order.
    pub fn rows(&self) -> impl Iterator<Item = (&ItemId, bool)> + '_ {
        self.display_order.iter().map(|id| (id, self.is_visible(id)))
    }

    /// Visible ids in display order.
    pub fn visible_ids(&self) -> impl Iterator<Item = &ItemId> + '_ {
        self.rows().filter_map(|(id, visible)| visible.then_some(id))
    }

    /// The empty-state signal: nothing is currently shown.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.visible_count == 0
    }
}

/// Computes the view for `items` under `sort_key` and `query`.
///
/// Deterministic and total: the same inputs always produce the same state.
/// The query is lower-cased here; visibility follows [`fuzzy_match`] against
/// each item's lower-cased name.
pub fn compute_view<'a, I>(items: I, sort_key: SortKey, query: &str) -> ViewState
where
    I: IntoIterator<Item = (&'a ItemRecord, &'a VisualHandle)>,
{
    let query = query.to_lowercase();

    let mut rows: Vec<Row<'a>> = items
        .into_iter()
        .map(|(record, handle)| Row {
            id: &record.id,
            key: handle.search_key(),
            size: record.size_bytes,
        })
        .collect();
    rows.sort_by(|a, b| sort_key.compare(a, b));

    let mut visibility = HashMap::with_capacity(rows.len());
    let mut visible_count = 0;
    for row in &rows {
        let visible = fuzzy_match(row.key, &query);
        if visible {
            visible_count += 1;
        }
        visibility.insert(row.id.clone(), visible);
    }

    ViewState {
        sort_key,
        display_order: rows.iter().map(|row| row.id.clone()).collect(),
        visibility,
        visible_count,
        query,
    }
}

/// Holds the current sort key and query and the view derived from them.
///
/// Changing either only recomputes the view; it never touches the store.
#[derive(Debug, Clone, Default)]
pub struct ViewEngine {
    sort_key: SortKey,
    query: String,
    view: ViewState,
}

impl ViewEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn sort_key(&self) -> SortKey {
        self.sort_key
    }

    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    #[must_use]
    pub const fn view(&self) -> &ViewState {
        &self.view
    }

    /// Selects a sort key and reorders.
    pub fn set_sort(&mut self, key: SortKey, store: &ItemStore) -> &ViewState {
        tracing::debug!(sort_key = key.as_str(), "sort key changed");
        self.sort_key = key;
        self.recompute(store)
    }

    /// Sets the search query (trimmed and lower-cased) and re-filters.
    pub fn set_search(&mut self, raw: &str, store: &ItemStore) -> &ViewState {
        self.query = raw.trim().to_lowercase();
        tracing::trace!(query = %self.query, "search query changed");
        self.recompute(store)
    }

    /// Clears the search query, showing every item again.
    pub fn clear_search(&mut self, store: &ItemStore) -> &ViewState {
        self.set_search("", store)
    }

    /// Rebuilds the view from the store's current contents.
    pub fn recompute(&mut self, store: &ItemStore) -> &ViewState {
        let _span = tracing::debug_span!(
            "compute_view",
            items = store.len(),
            sort_key = self.sort_key.as_str(),
            query_len = self.query.len()
        )
        .entered();

        self.view = compute_view(store.all(), self.sort_key, &self.query);

        tracing::debug!(visible_count = self.view.visible_count, "view recomputed");
        &self.view
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CacheVersion;

    fn store_of(records: Vec<ItemRecord>) -> ItemStore {
        let mut store = ItemStore::new();
        store.replace_all(records, CacheVersion::default());
        store
    }

    fn order(view: &ViewState) -> Vec<&str> {
        view.display_order.iter().map(ItemId::as_str).collect()
    }

    fn sample() -> ItemStore {
        store_of(vec![
            ItemRecord::new("a", "Alpha", 100),
            ItemRecord::new("b", "Beta", 50),
            ItemRecord::new("c", "charlie", 100),
            ItemRecord::new("d", "Delta", 75),
        ])
    }

    #[test]
    fn name_sorts_ignore_case() {
        let store = sample();
        let view = compute_view(store.all(), SortKey::NameAsc, "");
        assert_eq!(order(&view), ["a", "b", "c", "d"]);

        let view = compute_view(store.all(), SortKey::NameDesc, "");
        assert_eq!(order(&view), ["d", "c", "b", "a"]);
    }

    #[test]
    fn size_ties_break_by_name() {
        let store = sample();
        let view = compute_view(store.all(), SortKey::SizeAsc, "");
        assert_eq!(order(&view), ["b", "d", "a", "c"]);

        let view = compute_view(store.all(), SortKey::SizeDesc, "");
        assert_eq!(order(&view), ["a", "c", "d", "b"]);
    }

    #[test]
    fn tie_break_is_stable_across_computations() {
        let store = store_of(vec![
            ItemRecord::new("z", "Zed", 10),
            ItemRecord::new("y", "same", 10),
            ItemRecord::new("x", "Same", 10),
        ]);
        let first = compute_view(store.all(), SortKey::SizeDesc, "");
        for _ in 0..5 {
            assert_eq!(compute_view(store.all(), SortKey::SizeDesc, ""), first);
        }
        assert_eq!(order(&first), ["x", "y", "z"]);
    }

    #[test]
    fn fuzzy_match_law() {
        assert!(fuzzy_match("half-life 2", "hl2"));
        assert!(!fuzzy_match("half-life 2", "2hl"));
        assert!(fuzzy_match("half-life 2", "half-life 2"));
        assert!(!fuzzy_match("doom", "doom2"));
        assert!(fuzzy_match("", ""));
        assert!(!fuzzy_match("", "a"));
    }

    #[test]
    fn empty_query_shows_everything() {
        let store = sample();
        let view = compute_view(store.all(), SortKey::NameAsc, "");
        assert_eq!(view.visible_count, 4);
        assert!(view.rows().all(|(_, visible)| visible));
    }

    #[test]
    fn query_is_case_insensitive() {
        let store = store_of(vec![ItemRecord::new("hl2", "Half-Life 2", 1)]);
        let view = compute_view(store.all(), SortKey::NameAsc, "HL2");
        assert!(view.is_visible(&ItemId::from("hl2")));
        assert_eq!(view.query, "hl2");
    }

    #[test]
    fn hidden_items_keep_their_slot() {
        let store = sample();
        let unfiltered = compute_view(store.all(), SortKey::SizeAsc, "");
        let filtered = compute_view(store.all(), SortKey::SizeAsc, "ta");

        assert_eq!(filtered.display_order, unfiltered.display_order);
        let visible: Vec<&str> = filtered.visible_ids().map(ItemId::as_str).collect();
        assert_eq!(visible, ["b", "d"]);
        assert_eq!(filtered.visible_count, 2);
        assert!(!filtered.is_empty());
    }

    #[test]
    fn no_match_asserts_empty_signal() {
        let store = sample();
        let view = compute_view(store.all(), SortKey::NameAsc, "zzz");
        assert!(view.is_empty());
        assert_eq!(view.display_order.len(), 4);
    }

    #[test]
    fn unknown_sort_key_falls_back_to_name_asc() {
        assert_eq!(SortKey::parse("by-rating"), SortKey::NameAsc);
        assert_eq!(SortKey::parse(" SIZE-ASC "), SortKey::SizeAsc);
        for key in SortKey::ALL {
            assert_eq!(SortKey::parse(key.as_str()), key);
        }
    }

    #[test]
    fn cycle_visits_every_key() {
        let mut key = SortKey::default();
        let mut seen = vec![key];
        for _ in 0..3 {
            key = key.cycle();
            seen.push(key);
        }
        assert_eq!(seen, SortKey::ALL);
        assert_eq!(key.cycle(), SortKey::NameAsc);
    }

    #[test]
    fn engine_reorders_without_touching_handles() {
        let store = sample();
        let before: Vec<_> = store.all().map(|(_, h)| h.serial()).collect();

        let mut engine = ViewEngine::new();
        engine.set_sort(SortKey::SizeDesc, &store);
        engine.set_search("  ALP ", &store);
        engine.set_sort(SortKey::NameDesc, &store);

        let after: Vec<_> = store.all().map(|(_, h)| h.serial()).collect();
        assert_eq!(before, after);
        assert_eq!(engine.query(), "alp");
        assert_eq!(engine.view().visible_count, 1);
        assert_eq!(order(engine.view()), ["d", "c", "b", "a"]);

        engine.clear_search(&store);
        assert_eq!(engine.view().visible_count, 4);
        assert_eq!(order(engine.view()), ["d", "c", "b", "a"]);
    }
}
