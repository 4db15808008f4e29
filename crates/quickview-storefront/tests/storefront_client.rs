//! Integration tests for `StorefrontClient` against a wiremock GraphQL endpoint.

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use quickview_storefront::{StorefrontClient, StorefrontError};

const GRAPHQL_PATH: &str = "/api/2025-01/graphql.json";

/// 5-second timeout, no retries.
fn test_client(server: &MockServer) -> StorefrontClient {
    test_client_with_retries(server, 0)
}

fn test_client_with_retries(server: &MockServer, max_retries: u32) -> StorefrontClient {
    StorefrontClient::with_endpoint(
        &format!("{}{GRAPHQL_PATH}", server.uri()),
        "test-storefront-token",
        5,
        "quickview-test/0.1",
        max_retries,
        0,
    )
    .expect("failed to build test StorefrontClient")
}

fn product_json() -> serde_json::Value {
    json!({
        "data": {
            "product": {
                "id": "gid://shopify/Product/1",
                "handle": "linen-shirt",
                "title": "Linen Shirt",
                "description": "Breathable summer shirt.",
                "featuredImage": { "url": "https://cdn.example.com/shirt.jpg", "altText": null },
                "images": { "nodes": [{ "url": "https://cdn.example.com/shirt.jpg", "altText": null }] },
                "options": [
                    { "name": "Color", "values": ["Red", "Blue"] },
                    { "name": "Size", "values": ["S", "M"] }
                ],
                "variants": { "nodes": [
                    {
                        "id": "gid://shopify/ProductVariant/11",
                        "availableForSale": true,
                        "selectedOptions": [{ "name": "Color", "value": "Red" }, { "name": "Size", "value": "S" }],
                        "image": null,
                        "price": { "amount": "49.0", "currencyCode": "USD" }
                    },
                    {
                        "id": "gid://shopify/ProductVariant/12",
                        "availableForSale": false,
                        "selectedOptions": [{ "name": "Color", "value": "Red" }, { "name": "Size", "value": "M" }],
                        "image": { "url": "https://cdn.example.com/shirt-red-m.jpg", "altText": "Red M" },
                        "price": { "amount": "49.0", "currencyCode": "USD" }
                    }
                ]}
            }
        }
    })
}

// ---------------------------------------------------------------------------
// product by handle
// ---------------------------------------------------------------------------

#[tokio::test]
async fn get_product_by_handle_returns_normalized_product() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(header("X-Shopify-Storefront-Access-Token", "test-storefront-token"))
        .and(body_partial_json(json!({ "variables": { "handle": "linen-shirt" } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(product_json()))
        .expect(1)
        .mount(&server)
        .await;

    let product = test_client(&server)
        .get_product_by_handle("linen-shirt")
        .await
        .expect("request should succeed")
        .expect("product should exist");

    assert_eq!(product.title, "Linen Shirt");
    assert_eq!(product.options.len(), 2);
    assert_eq!(product.variants.len(), 2);
    assert_eq!(product.media.len(), 1);
    assert_eq!(
        product.variants[1].image.as_ref().map(|i| i.url.as_str()),
        Some("https://cdn.example.com/shirt-red-m.jpg")
    );
}

#[tokio::test]
async fn get_product_by_handle_returns_none_for_missing_product() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": { "product": null } })))
        .mount(&server)
        .await;

    let result = test_client(&server).get_product_by_handle("ghost").await;
    assert!(matches!(result, Ok(None)), "expected Ok(None), got: {result:?}");
}

#[tokio::test]
async fn get_product_by_handle_surfaces_graphql_errors() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errors": [{ "message": "Access denied for product field." }]
        })))
        .mount(&server)
        .await;

    let result = test_client(&server).get_product_by_handle("linen-shirt").await;
    assert!(
        matches!(result, Err(StorefrontError::GraphQl(ref msg)) if msg.contains("Access denied")),
        "expected GraphQl error, got: {result:?}"
    );
}

// ---------------------------------------------------------------------------
// collections and grid cards
// ---------------------------------------------------------------------------

#[tokio::test]
async fn get_products_from_collection_returns_cards() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(body_partial_json(json!({ "variables": { "handle": "all" } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "collection": { "products": { "nodes": [
                {
                    "id": "gid://shopify/Product/1",
                    "handle": "linen-shirt",
                    "title": "Linen Shirt",
                    "featuredImage": null,
                    "priceRange": { "minVariantPrice": { "amount": "49.0", "currencyCode": "USD" } }
                },
                {
                    "id": "gid://shopify/Product/2",
                    "handle": "wool-beanie",
                    "title": "Wool Beanie",
                    "featuredImage": { "url": "https://cdn.example.com/beanie.jpg", "altText": "Beanie", "width": 800, "height": 800 },
                    "priceRange": { "minVariantPrice": { "amount": "18.0", "currencyCode": "USD" } }
                }
            ]}}}
        })))
        .mount(&server)
        .await;

    let cards = test_client(&server)
        .get_products_from_collection("all")
        .await
        .expect("request should succeed");

    assert_eq!(cards.len(), 2);
    assert_eq!(cards[1].handle, "wool-beanie");
    assert_eq!(cards[1].price_range.min_variant_price.amount, "18.0");
    assert_eq!(
        cards[1].featured_image.as_ref().and_then(|i| i.width),
        Some(800)
    );
}

#[tokio::test]
async fn get_products_from_missing_collection_is_empty() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": { "collection": null } })))
        .mount(&server)
        .await;

    let cards = test_client(&server)
        .get_products_from_collection("does-not-exist")
        .await
        .expect("missing collection is not an error");
    assert!(cards.is_empty());
}

#[tokio::test]
async fn get_collections_lists_handles() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "collections": { "nodes": [
                { "title": "All", "handle": "all" },
                { "title": "Summer", "handle": "summer" }
            ]}}
        })))
        .mount(&server)
        .await;

    let collections = test_client(&server).get_collections().await.expect("ok");
    let handles: Vec<&str> = collections.iter().map(|c| c.handle.as_str()).collect();
    assert_eq!(handles, ["all", "summer"]);
}

// ---------------------------------------------------------------------------
// HTTP-level failures
// ---------------------------------------------------------------------------

#[tokio::test]
async fn rate_limit_is_reported_with_retry_after() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "12"))
        .mount(&server)
        .await;

    let result = test_client(&server).get_collections().await;
    assert!(
        matches!(result, Err(StorefrontError::RateLimited { retry_after_secs: 12 })),
        "expected RateLimited(12), got: {result:?}"
    );
}

#[tokio::test]
async fn unauthorized_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let result = test_client_with_retries(&server, 3).get_collections().await;
    assert!(
        matches!(result, Err(StorefrontError::UnexpectedStatus { status: 401, .. })),
        "expected UnexpectedStatus(401), got: {result:?}"
    );
}

#[tokio::test]
async fn server_error_is_retried_until_success() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(product_json()))
        .expect(1)
        .mount(&server)
        .await;

    let product = test_client_with_retries(&server, 2)
        .get_product_by_handle("linen-shirt")
        .await
        .expect("second attempt should succeed");
    assert!(product.is_some());
}
