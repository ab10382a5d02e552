use std::time::Duration;

use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use crate::models::{ApiProduct, ProductPage};
use crate::retry::{is_retryable_status, with_retry, RetryConfig};

const DEFAULT_BASE_URL: &str = "https://dummyjson.com";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Server returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Product not found: {0}")]
    NotFound(String),

    #[error("JSON parsing failed: {0}")]
    ParseError(#[from] serde_json::Error),
}

impl StoreError {
    /// Transient failures that a detail/category fetch may retry
    pub fn is_retryable(&self) -> bool {
        match self {
            StoreError::Timeout(_) | StoreError::NetworkError(_) => true,
            StoreError::Status { status, .. } => reqwest::StatusCode::from_u16(*status)
                .map(is_retryable_status)
                .unwrap_or(false),
            StoreError::NotFound(_) | StoreError::ParseError(_) => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Transport settings: base URL, fixed timeout, retry policy
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub retry: RetryConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            retry: RetryConfig::default(),
        }
    }
}

/// Which listing endpoint a page request goes to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListEndpoint<'a> {
    /// `/products`
    All,
    /// `/products/category/{category}`
    Category(&'a str),
    /// `/products/search?q={query}`
    Search(&'a str),
}

impl ListEndpoint<'_> {
    fn path(&self) -> String {
        match self {
            ListEndpoint::All => "/products".to_string(),
            ListEndpoint::Category(category) => {
                format!("/products/category/{}", urlencoding::encode(category))
            }
            ListEndpoint::Search(_) => "/products/search".to_string(),
        }
    }
}

pub struct StoreClient {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
    retry_config: RetryConfig,
}

impl StoreClient {
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static("Storefront/0.1.0"),
        );
        headers.insert(
            reqwest::header::CONTENT_TYPE,
            reqwest::header::HeaderValue::from_static("application/json"),
        );
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/json"),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout: config.timeout,
            retry_config: config.retry,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch one page of a listing
    ///
    /// Never retried here: a failed page is reported and the caller decides
    /// whether to ask again. Dropping the returned future aborts the request.
    pub async fn list_products(
        &self,
        endpoint: ListEndpoint<'_>,
        limit: u32,
        skip: u32,
    ) -> Result<ProductPage> {
        let url = format!("{}{}", self.base_url, endpoint.path());
        debug!("GET {} limit={} skip={}", url, limit, skip);

        let limit = limit.to_string();
        let skip = skip.to_string();
        let mut query: Vec<(&str, &str)> = Vec::with_capacity(3);
        if let ListEndpoint::Search(q) = endpoint {
            query.push(("q", q));
        }
        query.push(("limit", &limit));
        query.push(("skip", &skip));

        self.get_json(&url, &query, &url).await
    }

    /// Fetch a single product by id
    pub async fn get_product(&self, id: u64) -> Result<ApiProduct> {
        let url = format!("{}/products/{}", self.base_url, id);
        let id = id.to_string();

        with_retry(&self.retry_config, StoreError::is_retryable, || {
            self.get_json(&url, &[], &id)
        })
        .await
    }

    /// Fetch the list of category slugs
    pub async fn get_categories(&self) -> Result<Vec<String>> {
        let url = format!("{}/products/category-list", self.base_url);

        with_retry(&self.retry_config, StoreError::is_retryable, || {
            self.get_json(&url, &[], "category-list")
        })
        .await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
        resource: &str,
    ) -> Result<T> {
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound(resource.to_string()));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Status {
                status: status.as_u16(),
                body,
            });
        }

        // Read the body first so a malformed payload shows up as a parse error
        // instead of being folded into the network bucket
        let body = response.text().await.map_err(|e| self.classify(e))?;
        Ok(serde_json::from_str(&body)?)
    }

    fn classify(&self, err: reqwest::Error) -> StoreError {
        if err.is_timeout() {
            StoreError::Timeout(self.timeout)
        } else {
            StoreError::NetworkError(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> StoreClient {
        StoreClient::with_config(ClientConfig {
            base_url: server.uri(),
            timeout: Duration::from_millis(500),
            retry: RetryConfig {
                max_retries: 2,
                initial_delay_ms: 10,
                max_delay_ms: 50,
                backoff_multiplier: 2.0,
            },
        })
        .unwrap()
    }

    fn page_body(ids: &[u64], total: u32) -> serde_json::Value {
        let products: Vec<_> = ids
            .iter()
            .map(|id| serde_json::json!({ "id": id, "title": format!("Product {}", id), "price": 10.0 }))
            .collect();
        serde_json::json!({ "products": products, "total": total, "skip": 0, "limit": ids.len() })
    }

    #[tokio::test]
    async fn test_list_all_sends_limit_and_skip() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/products"))
            .and(query_param("limit", "10"))
            .and(query_param("skip", "20"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page_body(&[21, 22], 22)))
            .expect(1)
            .mount(&server)
            .await;

        let page = client_for(&server)
            .list_products(ListEndpoint::All, 10, 20)
            .await
            .unwrap();

        assert_eq!(page.total, 22);
        assert_eq!(page.products.iter().map(|p| p.id).collect::<Vec<_>>(), vec![21, 22]);
    }

    #[tokio::test]
    async fn test_category_endpoint_uses_path_segment() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/products/category/smartphones"))
            .and(query_param("limit", "5"))
            .and(query_param("skip", "0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page_body(&[1], 1)))
            .expect(1)
            .mount(&server)
            .await;

        let page = client_for(&server)
            .list_products(ListEndpoint::Category("smartphones"), 5, 0)
            .await
            .unwrap();

        assert_eq!(page.products.len(), 1);
    }

    #[tokio::test]
    async fn test_search_endpoint_sends_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/products/search"))
            .and(query_param("q", "red phone"))
            .and(query_param("limit", "10"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page_body(&[3, 4], 2)))
            .expect(1)
            .mount(&server)
            .await;

        let page = client_for(&server)
            .list_products(ListEndpoint::Search("red phone"), 10, 0)
            .await
            .unwrap();

        assert_eq!(page.products.len(), 2);
    }

    #[tokio::test]
    async fn test_server_error_is_status_and_not_retried_for_pages() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/products"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .expect(1)
            .mount(&server)
            .await;

        let err = client_for(&server)
            .list_products(ListEndpoint::All, 10, 0)
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::Status { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_malformed_payload_is_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/products"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .list_products(ListEndpoint::All, 10, 0)
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::ParseError(_)));
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn test_slow_response_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/products"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(page_body(&[1], 1))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let err = client_for(&server)
            .list_products(ListEndpoint::All, 10, 0)
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::Timeout(_)));
    }

    #[tokio::test]
    async fn test_missing_product_is_not_found_without_retry() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/products/999"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let err = client_for(&server).get_product(999).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(ref id) if id == "999"));
    }

    #[tokio::test]
    async fn test_categories_retry_transient_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/products/category-list"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/products/category-list"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!(["beauty", "laptops"])),
            )
            .mount(&server)
            .await;

        let categories = client_for(&server).get_categories().await.unwrap();
        assert_eq!(categories, vec!["beauty", "laptops"]);
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = StoreClient::with_config(ClientConfig {
            base_url: "https://example.com/".to_string(),
            ..ClientConfig::default()
        })
        .unwrap();
        assert_eq!(client.base_url(), "https://example.com");
    }
}
