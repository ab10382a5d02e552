// API client for the demo product REST service
pub mod client;
pub mod models;
pub mod retry;

// Re-export common types
pub use client::{ClientConfig, ListEndpoint, StoreClient, StoreError};
pub use models::{ApiDimensions, ApiMeta, ApiProduct, ApiReview, ProductPage};
pub use retry::RetryConfig;
