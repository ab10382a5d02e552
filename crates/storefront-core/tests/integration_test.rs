use std::sync::Arc;
use std::time::Duration;

use storefront_api::{ClientConfig, RetryConfig, StoreClient};
use storefront_cache::KeyValueStore;
use storefront_core::{
    AppContext, Config, ErrorKind, ListPhase, LoadOutcome, SkipReason, ALL_CATEGORIES,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn context_for(server: &MockServer, page_size: u32, timeout: Duration) -> AppContext {
    let mut config = Config::default();
    config.feed.page_size = page_size;
    config.api.base_url = server.uri();

    let client = StoreClient::with_config(ClientConfig {
        base_url: server.uri(),
        timeout,
        retry: RetryConfig {
            max_retries: 1,
            initial_delay_ms: 10,
            max_delay_ms: 20,
            backoff_multiplier: 2.0,
        },
    })
    .unwrap();

    AppContext::with_parts(
        config,
        Arc::new(client),
        Arc::new(KeyValueStore::in_memory().unwrap()),
    )
}

fn page(ids: impl IntoIterator<Item = u64>, total: u32) -> ResponseTemplate {
    let products: Vec<_> = ids
        .into_iter()
        .map(|id| {
            serde_json::json!({
                "id": id,
                "title": format!("Product {}", id),
                "price": 9.99,
                "category": "misc",
                "thumbnail": format!("https://cdn.example.com/{}.png", id),
            })
        })
        .collect();
    ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "products": products,
        "total": total,
        "skip": 0,
        "limit": 10,
    }))
}

fn ids(items: &[storefront_core::Product]) -> Vec<u64> {
    items.iter().map(|p| p.id).collect()
}

async fn mount_page(server: &MockServer, route: &str, skip: u32, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(route))
        .and(query_param("skip", skip.to_string()))
        .respond_with(response)
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_feed_pages_until_a_short_page() {
    let server = MockServer::start().await;
    mount_page(&server, "/products", 0, page(1..=10, 25)).await;
    mount_page(&server, "/products", 10, page(11..=20, 25)).await;
    mount_page(&server, "/products", 20, page(21..=25, 25)).await;

    let ctx = context_for(&server, 10, Duration::from_secs(2));
    let feed = ctx.product_feed();
    assert_eq!(feed.phase(), ListPhase::Idle);

    assert_eq!(
        feed.load_next().await,
        LoadOutcome::Loaded {
            added: 10,
            has_more: true
        }
    );
    feed.load_next().await;
    assert_eq!(
        feed.load_next().await,
        LoadOutcome::Loaded {
            added: 5,
            has_more: false
        }
    );

    // Exhausted: no fourth request reaches the server
    assert_eq!(
        feed.load_next().await,
        LoadOutcome::Skipped(SkipReason::Exhausted)
    );

    let snapshot = feed.snapshot();
    assert_eq!(ids(&snapshot.items), (1..=25).collect::<Vec<_>>());
    assert_eq!(snapshot.total, Some(25));
    assert_eq!(snapshot.offset, 30);
    assert_eq!(snapshot.phase, ListPhase::Ready { has_more: false });
}

#[tokio::test]
async fn test_overlapping_pages_are_deduplicated() {
    let server = MockServer::start().await;
    mount_page(&server, "/products", 0, page(1..=10, 20)).await;
    mount_page(&server, "/products", 10, page(7..=16, 20)).await;

    let ctx = context_for(&server, 10, Duration::from_secs(2));
    let feed = ctx.product_feed();
    feed.load_next().await;

    assert_eq!(
        feed.load_next().await,
        LoadOutcome::Loaded {
            added: 6,
            has_more: true
        }
    );
    assert_eq!(ids(&feed.items()), (1..=16).collect::<Vec<_>>());
}

#[tokio::test]
async fn test_failed_page_keeps_items_and_can_be_retried() {
    let server = MockServer::start().await;
    mount_page(&server, "/products", 0, page(1..=10, 30)).await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .and(query_param("skip", "10"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    mount_page(&server, "/products", 10, page(11..=20, 30)).await;

    let ctx = context_for(&server, 10, Duration::from_secs(2));
    let feed = ctx.product_feed();
    feed.load_next().await;

    match feed.load_next().await {
        LoadOutcome::Failed(info) => assert_eq!(info.kind, ErrorKind::Server),
        other => panic!("expected failure, got {:?}", other),
    }
    assert_eq!(feed.len(), 10);
    assert_eq!(feed.cursor().offset(), 10);
    assert_eq!(feed.phase(), ListPhase::Error);

    // Pages are never retried by the client, the caller asks again
    assert!(matches!(
        feed.load_next().await,
        LoadOutcome::Loaded { added: 10, .. }
    ));
    assert!(feed.error().is_none());
    assert_eq!(feed.len(), 20);
}

#[tokio::test]
async fn test_timeout_reads_as_network_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(page(1..=10, 10).set_delay(Duration::from_millis(500)))
        .mount(&server)
        .await;

    let ctx = context_for(&server, 10, Duration::from_millis(100));
    let feed = ctx.product_feed();

    match feed.load_next().await {
        LoadOutcome::Failed(info) => assert_eq!(info.kind, ErrorKind::Network),
        other => panic!("expected failure, got {:?}", other),
    }
    assert!(!feed.is_loading());
    assert!(feed.is_empty());
}

#[tokio::test]
async fn test_category_switch_discards_slow_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products/category/smartphones"))
        .respond_with(page(1..=10, 10).set_delay(Duration::from_millis(400)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/products/category/laptops"))
        .respond_with(page(101..=105, 5))
        .mount(&server)
        .await;

    let ctx = context_for(&server, 10, Duration::from_secs(2));
    let categories = ctx.category_feed();

    let (phones, laptops) = tokio::join!(categories.select(Some("smartphones")), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        categories.select(Some("laptops")).await
    });

    assert_eq!(phones, LoadOutcome::Cancelled);
    assert!(matches!(laptops, LoadOutcome::Loaded { added: 5, .. }));

    let snapshot = categories.snapshot();
    assert_eq!(snapshot.filter_key.as_deref(), Some("laptops"));
    assert_eq!(ids(&snapshot.items), (101..=105).collect::<Vec<_>>());
    assert!(!snapshot.loading);
}

#[tokio::test]
async fn test_all_category_falls_back_to_no_filter() {
    let server = MockServer::start().await;
    mount_page(&server, "/products/category/beauty", 0, page(1..=3, 3)).await;

    let ctx = context_for(&server, 10, Duration::from_secs(2));
    let categories = ctx.category_feed();

    categories.select(Some("beauty")).await;
    assert_eq!(categories.snapshot().items.len(), 3);

    assert_eq!(
        categories.select(Some("beauty")).await,
        LoadOutcome::Skipped(SkipReason::Unchanged)
    );
    assert_eq!(
        categories.select(Some(ALL_CATEGORIES)).await,
        LoadOutcome::Skipped(SkipReason::NoFilter)
    );
    assert!(categories.snapshot().items.is_empty());
    assert!(categories.key().is_none());
}

#[tokio::test]
async fn test_search_session_records_and_suggests() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products/search"))
        .and(query_param("q", "phone"))
        .respond_with(page(1..=4, 4))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/products/search"))
        .and(query_param("q", "laptop"))
        .respond_with(page(50..=52, 3))
        .expect(1)
        .mount(&server)
        .await;

    let ctx = context_for(&server, 10, Duration::from_secs(2));
    let session = ctx.search_session();

    session.submit("  phone ").await;
    session.submit("laptop").await;
    assert_eq!(ids(&session.results().items), vec![50, 51, 52]);

    // Same query again still runs a fresh search
    assert!(matches!(
        session.submit("phone").await,
        LoadOutcome::Loaded { added: 4, .. }
    ));
    assert_eq!(session.current_query().as_deref(), Some("phone"));
    assert_eq!(session.recent_searches(), vec!["phone", "laptop"]);

    // Recents come first, then popular terms
    assert_eq!(session.suggestions("op"), vec!["laptop"]);
    assert_eq!(session.suggestions("")[0], "phone");
    assert_eq!(session.suggestions("ph"), vec!["phone", "headphones"]);

    assert_eq!(
        session.load_more().await,
        LoadOutcome::Skipped(SkipReason::Exhausted)
    );

    assert_eq!(
        session.submit("   ").await,
        LoadOutcome::Skipped(SkipReason::NoFilter)
    );
    assert!(session.results().items.is_empty());
    assert!(session.current_query().is_none());

    session.clear_recent_searches().unwrap();
    assert!(session.recent_searches().is_empty());
}

#[tokio::test]
async fn test_catalog_categories_and_details() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products/category-list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            "beauty",
            "laptops"
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/products/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": 1,
            "title": "Mascara",
            "price": 9.99,
            "stock": 5,
            "reviews": [
                { "rating": 5, "comment": "Great", "date": "2024-05-23T08:56:21.618Z", "reviewerName": "A", "reviewerEmail": "a@x.com" },
                { "rating": 3, "comment": "Ok", "date": "2024-05-23T08:56:21.618Z", "reviewerName": "B", "reviewerEmail": "b@x.com" }
            ]
        })))
        .mount(&server)
        .await;

    let ctx = context_for(&server, 10, Duration::from_secs(2));
    let catalog = ctx.catalog();

    assert_eq!(
        catalog.categories().await.unwrap(),
        vec!["all", "beauty", "laptops"]
    );

    let details = catalog.product(1).await.unwrap();
    assert_eq!(details.product.title, "Mascara");
    assert_eq!(details.reviews.len(), 2);
    assert!((details.average_review_rating() - 4.0).abs() < 1e-9);

    let missing = catalog.product(404).await.unwrap_err();
    assert_eq!(missing.info().kind, ErrorKind::NotFound);
}
