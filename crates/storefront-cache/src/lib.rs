// SQLite-backed device storage
// Small key/value records that have to survive between runs

pub mod cache;

pub use cache::{CacheError, KeyValueStore, Result};
