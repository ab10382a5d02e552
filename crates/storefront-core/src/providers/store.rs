// Store feed - bridges the API client with the PageSource trait
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use storefront_api::{ApiProduct, ListEndpoint, StoreClient};

use crate::{
    models::{Dimensions, Product, ProductDetails, ProductMeta, Review},
    pagination::{Page, PageRequest, PageSource},
    Error, Result,
};

/// Which listing a [`StoreFeed`] pages through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedKind {
    All,
    Category,
    Search,
}

impl std::fmt::Display for FeedKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeedKind::All => write!(f, "products"),
            FeedKind::Category => write!(f, "category"),
            FeedKind::Search => write!(f, "search"),
        }
    }
}

/// Product listing endpoint wrapped as a [`PageSource`]
pub struct StoreFeed {
    client: Arc<StoreClient>,
    kind: FeedKind,
}

impl StoreFeed {
    pub fn new(client: Arc<StoreClient>, kind: FeedKind) -> Self {
        Self { client, kind }
    }

    pub fn kind(&self) -> FeedKind {
        self.kind
    }

    fn endpoint<'a>(&self, filter: Option<&'a str>) -> Result<ListEndpoint<'a>> {
        match (self.kind, filter) {
            (FeedKind::All, _) => Ok(ListEndpoint::All),
            (FeedKind::Category, Some(category)) => Ok(ListEndpoint::Category(category)),
            (FeedKind::Search, Some(query)) => Ok(ListEndpoint::Search(query)),
            (kind, None) => Err(Error::ConfigError(format!(
                "{} feed needs a filter key",
                kind
            ))),
        }
    }
}

#[async_trait]
impl PageSource<Product> for StoreFeed {
    async fn fetch_page(&self, filter: Option<&str>, request: PageRequest) -> Result<Page<Product>> {
        let endpoint = self.endpoint(filter)?;
        let page = self
            .client
            .list_products(endpoint, request.limit, request.offset)
            .await?;

        Ok(Page {
            total: Some(page.total).filter(|t| *t > 0),
            items: page.products.into_iter().map(api_to_product).collect(),
        })
    }
}

/// Convert an API product to the list model
pub(crate) fn api_to_product(api: ApiProduct) -> Product {
    Product {
        id: api.id,
        title: api.title,
        description: api.description,
        category: api.category,
        price: api.price,
        discount_percentage: api.discount_percentage,
        rating: api.rating,
        stock: api.stock,
        brand: api.brand,
        thumbnail: api.thumbnail,
    }
}

/// Convert an API product to the detail model
pub(crate) fn api_to_details(mut api: ApiProduct) -> ProductDetails {
    let tags = std::mem::take(&mut api.tags);
    let sku = std::mem::take(&mut api.sku);
    let weight = api.weight;
    let dimensions = api.dimensions.map(|d| Dimensions {
        width: d.width,
        height: d.height,
        depth: d.depth,
    });
    let warranty_information = std::mem::take(&mut api.warranty_information);
    let shipping_information = std::mem::take(&mut api.shipping_information);
    let availability_status = std::mem::take(&mut api.availability_status);
    let return_policy = std::mem::take(&mut api.return_policy);
    let minimum_order_quantity = api.minimum_order_quantity.max(1);
    let reviews = std::mem::take(&mut api.reviews)
        .into_iter()
        .map(|r| Review {
            rating: r.rating,
            comment: r.comment,
            date: parse_timestamp(&r.date),
            reviewer_name: r.reviewer_name,
            reviewer_email: r.reviewer_email,
        })
        .collect();
    let images = std::mem::take(&mut api.images);
    let meta = api.meta.take().map(|m| ProductMeta {
        created_at: parse_timestamp(&m.created_at),
        updated_at: parse_timestamp(&m.updated_at),
        barcode: m.barcode,
        qr_code: m.qr_code,
    });

    ProductDetails {
        product: api_to_product(api),
        tags,
        sku,
        weight,
        dimensions,
        warranty_information,
        shipping_information,
        availability_status,
        return_policy,
        minimum_order_quantity,
        reviews,
        images,
        meta,
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
