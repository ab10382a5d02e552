// Core storefront logic: pagination, search, cart, and the glue between them
pub mod cart;
pub mod catalog;
pub mod config;
pub mod context;
pub mod debounce;
pub mod error;
pub mod launch;
pub mod models;
pub mod pagination;
pub mod providers;
pub mod search;
pub mod suggestions;

pub use cart::{Cart, CartEvent, CartItem};
pub use catalog::{Catalog, ALL_CATEGORIES};
pub use config::Config;
pub use context::AppContext;
pub use debounce::Debouncer;
pub use error::{Error, ErrorInfo, ErrorKind};
pub use launch::LaunchState;
pub use models::{Identified, Product, ProductDetails, Review};
pub use pagination::{
    FilterKind, FilteredController, ListController, ListPhase, ListSnapshot, LoadOutcome,
    SkipReason,
};
pub use search::SearchSession;
pub use suggestions::{RecentSearches, SearchHistory, SuggestionEngine};

/// Result type alias because typing Result<T, Error> everywhere is tedious
pub type Result<T> = std::result::Result<T, Error>;
