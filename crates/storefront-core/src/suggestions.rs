// Recent searches and search-as-you-type suggestions
use std::collections::HashSet;
use std::sync::Arc;

use storefront_cache::KeyValueStore;
use tracing::warn;

use crate::Result;

/// Storage key for the recent-searches list
pub const RECENT_SEARCHES_KEY: &str = "recent_searches";

pub const MAX_RECENT_SEARCHES: usize = 5;
pub const MAX_SUGGESTIONS: usize = 5;

/// Offered when there's nothing better to suggest
pub const POPULAR_SEARCHES: [&str; 10] = [
    "phone",
    "laptop",
    "watch",
    "shirt",
    "shoes",
    "headphones",
    "camera",
    "furniture",
    "books",
    "groceries",
];

pub fn popular_searches() -> Vec<String> {
    POPULAR_SEARCHES.iter().map(|s| s.to_string()).collect()
}

/// Where the recent-searches list is persisted
#[cfg_attr(test, mockall::automock)]
pub trait SearchHistory: Send + Sync {
    fn load(&self) -> Result<Vec<String>>;
    fn save(&self, searches: &[String]) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

impl SearchHistory for KeyValueStore {
    fn load(&self) -> Result<Vec<String>> {
        Ok(self
            .get::<Vec<String>>(RECENT_SEARCHES_KEY)?
            .unwrap_or_default())
    }

    fn save(&self, searches: &[String]) -> Result<()> {
        Ok(self.set(RECENT_SEARCHES_KEY, searches)?)
    }

    fn clear(&self) -> Result<()> {
        self.remove(RECENT_SEARCHES_KEY)?;
        Ok(())
    }
}

/// Put `query` at the front of `recents`, dropping any case-insensitive
/// duplicate and anything past `limit`
pub fn push_recent(recents: &[String], query: &str, limit: usize) -> Vec<String> {
    let lowered = query.to_lowercase();
    std::iter::once(query.to_string())
        .chain(
            recents
                .iter()
                .filter(|q| q.to_lowercase() != lowered)
                .cloned(),
        )
        .take(limit)
        .collect()
}

/// Suggestions for `query` given the recent searches and popular terms
///
/// Empty query: the recents, or the popular terms if there are none.
/// Otherwise case-insensitive substring matches, recents first, without
/// repeats, at most `limit`.
pub fn suggest_from(recents: &[String], popular: &[String], query: &str, limit: usize) -> Vec<String> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        let source = if recents.is_empty() { popular } else { recents };
        return source.iter().take(limit).cloned().collect();
    }

    let mut seen = HashSet::new();
    recents
        .iter()
        .chain(popular.iter())
        .filter(|term| term.to_lowercase().contains(&needle))
        .filter(|term| seen.insert(term.as_str()))
        .take(limit)
        .cloned()
        .collect()
}

/// Bounded, most-recent-first list of executed searches
#[derive(Clone)]
pub struct RecentSearches {
    history: Arc<dyn SearchHistory>,
    limit: usize,
}

impl RecentSearches {
    pub fn new(history: Arc<dyn SearchHistory>) -> Self {
        Self::with_limit(history, MAX_RECENT_SEARCHES)
    }

    pub fn with_limit(history: Arc<dyn SearchHistory>, limit: usize) -> Self {
        Self {
            history,
            limit: limit.max(1),
        }
    }

    /// Current list. Storage trouble reads as an empty list.
    pub fn list(&self) -> Vec<String> {
        match self.history.load() {
            Ok(mut recents) => {
                recents.truncate(self.limit);
                recents
            }
            Err(e) => {
                warn!("Error loading recent searches: {}", e);
                Vec::new()
            }
        }
    }

    /// Remember an executed search, returns the updated list
    pub fn record(&self, query: &str) -> Result<Vec<String>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(self.list());
        }

        let updated = push_recent(&self.list(), query, self.limit);
        self.history.save(&updated)?;
        Ok(updated)
    }

    pub fn clear(&self) -> Result<()> {
        self.history.clear()
    }
}

/// Search-box suggestions from recent searches and popular terms
///
/// No network involved; the view debounces keystrokes before asking.
pub struct SuggestionEngine {
    recents: RecentSearches,
    popular: Vec<String>,
    limit: usize,
}

impl SuggestionEngine {
    pub fn new(recents: RecentSearches) -> Self {
        Self {
            recents,
            popular: popular_searches(),
            limit: MAX_SUGGESTIONS,
        }
    }

    pub fn with_popular(mut self, popular: Vec<String>) -> Self {
        self.popular = popular;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn suggest(&self, query: &str) -> Vec<String> {
        suggest_from(&self.recents.list(), &self.popular, query, self.limit)
    }
}
