// Page sources backed by the product API
pub mod store;

pub use store::{FeedKind, StoreFeed};
