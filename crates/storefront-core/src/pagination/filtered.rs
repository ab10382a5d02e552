use tracing::debug;

use super::{ListController, ListSnapshot, LoadOutcome, SkipReason};
use crate::models::Identified;

/// What the filter key of a [`FilteredController`] means
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    /// A category slug. `"all"` is the same as no category.
    Category,
    /// A free-text search query
    Query,
}

impl FilterKind {
    /// Turn raw input into the key the controller compares against
    ///
    /// Whitespace is trimmed; an empty key, or the `"all"` category,
    /// means "no filter".
    pub fn normalize(self, raw: Option<&str>) -> Option<String> {
        let key = raw.map(str::trim).filter(|k| !k.is_empty())?;
        if self == FilterKind::Category && key.eq_ignore_ascii_case("all") {
            return None;
        }
        Some(key.to_string())
    }
}

/// A [`ListController`] scoped to one category or search query at a time
///
/// Switching the key aborts whatever was in flight for the old key and
/// resets the list before anything is fetched for the new one.
pub struct FilteredController<T: Identified> {
    kind: FilterKind,
    list: ListController<T>,
}

impl<T: Identified + Clone + Send> FilteredController<T> {
    pub fn new(kind: FilterKind, list: ListController<T>) -> Self {
        Self { kind, list }
    }

    pub fn kind(&self) -> FilterKind {
        self.kind
    }

    /// Switch to `key`, fetching its first page when there is one
    ///
    /// Selecting the key that's already active does nothing. An empty key
    /// (or `"all"` for categories) just resets: the caller shows the
    /// unfiltered feed instead.
    pub async fn select(&self, key: Option<&str>) -> LoadOutcome {
        let key = self.kind.normalize(key);
        if key == self.list.filter_key() {
            return LoadOutcome::Skipped(SkipReason::Unchanged);
        }
        self.switch_to(key).await
    }

    /// Like [`select`](Self::select) but starts over even for the active key
    pub async fn reload(&self, key: Option<&str>) -> LoadOutcome {
        let key = self.kind.normalize(key);
        self.switch_to(key).await
    }

    async fn switch_to(&self, key: Option<String>) -> LoadOutcome {
        debug!("{}: switching filter to {:?}", self.list.label(), key);
        let has_key = key.is_some();
        self.list.replace_filter(key);

        if has_key {
            self.list.load_next().await
        } else {
            LoadOutcome::Skipped(SkipReason::NoFilter)
        }
    }

    /// Next page for the active key, no-op without one
    pub async fn load_next(&self) -> LoadOutcome {
        if self.list.filter_key().is_none() {
            return LoadOutcome::Skipped(SkipReason::NoFilter);
        }
        self.list.load_next().await
    }

    /// Drop the key and everything loaded for it
    pub fn clear(&self) {
        self.list.replace_filter(None);
    }

    pub fn key(&self) -> Option<String> {
        self.list.filter_key()
    }

    pub fn snapshot(&self) -> ListSnapshot<T> {
        self.list.snapshot()
    }

    pub fn list(&self) -> &ListController<T> {
        &self.list
    }
}
