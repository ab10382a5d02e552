use std::fmt::Debug;
use std::hash::Hash;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Anything a paginated list can hold
///
/// The identity is the only thing the list logic ever looks at.
pub trait Identified {
    type Id: Eq + Hash + Clone + Debug + Send + Sync;

    fn id(&self) -> Self::Id;
}

/// Product as shown in feeds and search results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub category: String,
    pub price: f64,
    pub discount_percentage: f64,
    pub rating: f64,
    pub stock: u32,
    pub brand: Option<String>,
    pub thumbnail: String,
}

impl Product {
    /// Price before the discount was applied
    pub fn original_price(&self) -> f64 {
        if self.discount_percentage <= 0.0 || self.discount_percentage >= 100.0 {
            return self.price;
        }
        self.price / (1.0 - self.discount_percentage / 100.0)
    }

    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

impl Identified for Product {
    type Id = u64;

    fn id(&self) -> u64 {
        self.id
    }
}

/// Everything the product detail view needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDetails {
    pub product: Product,
    pub tags: Vec<String>,
    pub sku: String,
    pub weight: f64,
    pub dimensions: Option<Dimensions>,
    pub warranty_information: String,
    pub shipping_information: String,
    pub availability_status: String,
    pub return_policy: String,
    pub minimum_order_quantity: u32,
    pub reviews: Vec<Review>,
    pub images: Vec<String>,
    pub meta: Option<ProductMeta>,
}

impl ProductDetails {
    /// Mean of the review ratings, falls back to the listed rating
    pub fn average_review_rating(&self) -> f64 {
        if self.reviews.is_empty() {
            return self.product.rating;
        }
        let sum: u32 = self.reviews.iter().map(|r| r.rating as u32).sum();
        sum as f64 / self.reviews.len() as f64
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
    pub depth: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub rating: u8,
    pub comment: String,
    pub date: Option<DateTime<Utc>>,
    pub reviewer_name: String,
    pub reviewer_email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductMeta {
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub barcode: String,
    pub qr_code: String,
}
