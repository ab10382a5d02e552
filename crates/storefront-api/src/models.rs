use serde::{Deserialize, Serialize};

/// One page of a product listing, as returned by `/products`,
/// `/products/category/{name}` and `/products/search`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductPage {
    #[serde(default)]
    pub products: Vec<ApiProduct>,
    /// Server-reported total. Not trustworthy on every endpoint.
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub skip: u32,
    #[serde(default)]
    pub limit: u32,
}

/// Product record straight off the wire
///
/// Listing endpoints and the detail endpoint return the same shape, but
/// plenty of fields are optional in practice, so everything defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApiProduct {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub category: String,
    pub price: f64,
    pub discount_percentage: f64,
    pub rating: f64,
    pub stock: u32,
    pub tags: Vec<String>,
    pub brand: Option<String>,
    pub sku: String,
    pub weight: f64,
    pub dimensions: Option<ApiDimensions>,
    pub warranty_information: String,
    pub shipping_information: String,
    pub availability_status: String,
    pub reviews: Vec<ApiReview>,
    pub return_policy: String,
    pub minimum_order_quantity: u32,
    pub meta: Option<ApiMeta>,
    pub thumbnail: String,
    pub images: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiDimensions {
    pub width: f64,
    pub height: f64,
    pub depth: f64,
}

/// Customer review attached to a product
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApiReview {
    pub rating: u8,
    pub comment: String,
    pub date: String, // ISO 8601, parsed further up
    pub reviewer_name: String,
    pub reviewer_email: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApiMeta {
    pub created_at: String,
    pub updated_at: String,
    pub barcode: String,
    pub qr_code: String,
}
