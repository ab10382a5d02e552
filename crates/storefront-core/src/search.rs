use tracing::{info, warn};

use crate::{
    models::Product,
    pagination::{FilteredController, ListSnapshot, LoadOutcome, SkipReason},
    suggestions::{RecentSearches, SuggestionEngine},
};

/// Everything behind a search screen
///
/// Results are a query-keyed paginated list; executed searches land in the
/// recent-searches list, which in turn feeds the suggestions.
pub struct SearchSession {
    results: FilteredController<Product>,
    recents: RecentSearches,
    suggestions: SuggestionEngine,
}

impl SearchSession {
    pub fn new(
        results: FilteredController<Product>,
        recents: RecentSearches,
        suggestions: SuggestionEngine,
    ) -> Self {
        Self {
            results,
            recents,
            suggestions,
        }
    }

    /// Run a search from the first page
    ///
    /// Anything still loading for the previous query is aborted. A blank
    /// query clears the results instead.
    pub async fn submit(&self, query: &str) -> LoadOutcome {
        let query = query.trim();
        if query.is_empty() {
            self.results.clear();
            return LoadOutcome::Skipped(SkipReason::NoFilter);
        }

        info!("Searching for: {}", query);
        // A storage hiccup shouldn't cost the user their search
        if let Err(e) = self.recents.record(query) {
            warn!("Error saving recent search: {}", e);
        }

        self.results.reload(Some(query)).await
    }

    pub async fn load_more(&self) -> LoadOutcome {
        self.results.load_next().await
    }

    pub fn clear(&self) {
        self.results.clear();
    }

    pub fn current_query(&self) -> Option<String> {
        self.results.key()
    }

    pub fn results(&self) -> ListSnapshot<Product> {
        self.results.snapshot()
    }

    pub fn suggestions(&self, query: &str) -> Vec<String> {
        self.suggestions.suggest(query)
    }

    pub fn recent_searches(&self) -> Vec<String> {
        self.recents.list()
    }

    pub fn clear_recent_searches(&self) -> crate::Result<()> {
        self.recents.clear()
    }
}
