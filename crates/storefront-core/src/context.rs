// Wires config, HTTP client and local storage into ready-to-use controllers
use std::sync::Arc;

use storefront_api::StoreClient;
use storefront_cache::KeyValueStore;
use tracing::debug;

use crate::{
    cart::{Cart, CART_KEY},
    catalog::Catalog,
    config::Config,
    launch::LaunchState,
    models::Product,
    pagination::{FilterKind, FilteredController, ListController},
    providers::{FeedKind, StoreFeed},
    search::SearchSession,
    suggestions::{RecentSearches, SuggestionEngine},
    Result,
};

/// Shared handles every screen builds on
///
/// Cheap to clone; the client and the store are reference counted.
#[derive(Clone)]
pub struct AppContext {
    config: Config,
    client: Arc<StoreClient>,
    store: Arc<KeyValueStore>,
}

impl AppContext {
    /// Build the client and open the database the config points at
    pub fn new(config: Config) -> Result<Self> {
        let client = StoreClient::with_config(config.api.client_config())?;
        let db_path = config.storage.resolve_db_path()?;
        debug!("Opening storage at {}", db_path.display());
        let store = KeyValueStore::open(&db_path)?;

        Ok(Self::with_parts(config, Arc::new(client), Arc::new(store)))
    }

    pub fn with_parts(config: Config, client: Arc<StoreClient>, store: Arc<KeyValueStore>) -> Self {
        Self {
            config,
            client,
            store,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn client(&self) -> Arc<StoreClient> {
        self.client.clone()
    }

    pub fn store(&self) -> Arc<KeyValueStore> {
        self.store.clone()
    }

    fn list(&self, kind: FeedKind) -> ListController<Product> {
        let source = Arc::new(StoreFeed::new(self.client.clone(), kind));
        ListController::new(source, self.config.feed.page_size).with_label(kind.to_string())
    }

    /// Unfiltered home feed
    pub fn product_feed(&self) -> ListController<Product> {
        self.list(FeedKind::All)
    }

    pub fn category_feed(&self) -> FilteredController<Product> {
        FilteredController::new(FilterKind::Category, self.list(FeedKind::Category))
    }

    pub fn recent_searches(&self) -> RecentSearches {
        RecentSearches::with_limit(self.store.clone(), self.config.search.recent_limit)
    }

    pub fn suggestions(&self) -> SuggestionEngine {
        SuggestionEngine::new(self.recent_searches())
            .with_popular(self.config.search.popular_terms.clone())
            .with_limit(self.config.search.suggestion_limit)
    }

    pub fn search_session(&self) -> SearchSession {
        SearchSession::new(
            FilteredController::new(FilterKind::Query, self.list(FeedKind::Search)),
            self.recent_searches(),
            self.suggestions(),
        )
    }

    pub fn catalog(&self) -> Catalog {
        Catalog::new(self.client.clone())
    }

    pub fn launch_state(&self) -> LaunchState {
        LaunchState::new(self.store.clone())
    }

    /// Persisted cart, empty if nothing was saved yet
    pub fn load_cart(&self) -> Result<Cart> {
        Ok(self.store.get::<Cart>(CART_KEY)?.unwrap_or_default())
    }

    pub fn save_cart(&self, cart: &Cart) -> Result<()> {
        self.store.set(CART_KEY, cart)?;
        Ok(())
    }
}
