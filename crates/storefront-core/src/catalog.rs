// Non-paginated lookups: category list and product details
use std::sync::Arc;

use storefront_api::StoreClient;
use tracing::{debug, info};

use crate::{
    models::ProductDetails,
    providers::store::api_to_details,
    Result,
};

/// Pseudo-category that means "everything"
pub const ALL_CATEGORIES: &str = "all";

pub struct Catalog {
    client: Arc<StoreClient>,
}

impl Catalog {
    pub fn new(client: Arc<StoreClient>) -> Self {
        Self { client }
    }

    /// Category slugs, with `"all"` in front
    pub async fn categories(&self) -> Result<Vec<String>> {
        let fetched = self.client.get_categories().await?;
        info!("Loaded {} categories", fetched.len());

        let mut categories = Vec::with_capacity(fetched.len() + 1);
        categories.push(ALL_CATEGORIES.to_string());
        categories.extend(
            fetched
                .into_iter()
                .filter(|c| !c.eq_ignore_ascii_case(ALL_CATEGORIES)),
        );
        Ok(categories)
    }

    pub async fn product(&self, id: u64) -> Result<ProductDetails> {
        debug!("Fetching product details for ID: {}", id);
        let product = self.client.get_product(id).await?;
        Ok(api_to_details(product))
    }
}
