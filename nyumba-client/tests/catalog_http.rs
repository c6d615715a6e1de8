// nyumba-client/tests/catalog_http.rs
// Catalog client against a local mock of the commerce API

use std::collections::HashMap;

use axum::{
    Json, Router,
    extract::Query,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
};
use nyumba_client::{CatalogConfig, ClientError, ProductQuery, SortOrder};
use serde_json::{Value, json};

/// base64("ck_test:cs_test")
const EXPECTED_AUTH: &str = "Basic Y2tfdGVzdDpjc190ZXN0";

async fn spawn(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

fn config(base_url: &str) -> CatalogConfig {
    CatalogConfig::new(base_url)
        .with_credentials("ck_test", "cs_test")
        .with_timeout(5)
}

fn product(id: i64, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "status": "publish",
        "regular_price": "12000",
        "categories": [{"name": "Bedroom"}],
        "images": [{"src": format!("https://cdn.example/{}.jpg", id)}],
        "stock_status": "instock"
    })
}

async fn products_handler(
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if auth != EXPECTED_AUTH {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"code": "woocommerce_rest_cannot_view", "message": "Invalid signature"})),
        )
            .into_response();
    }

    let per_page: i64 = params.get("per_page").and_then(|p| p.parse().ok()).unwrap_or(10);
    let offset: i64 = params.get("offset").and_then(|p| p.parse().ok()).unwrap_or(0);
    assert_eq!(params.get("orderby").map(String::as_str), Some("popularity"));
    assert_eq!(params.get("order").map(String::as_str), Some("asc"));

    let page: Vec<Value> = (offset + 1..=offset + per_page)
        .map(|id| product(id, &format!("Product {}", id)))
        .collect();
    Json(Value::Array(page)).into_response()
}

#[tokio::test]
async fn test_fetch_products_sends_auth_and_paging() {
    let base = spawn(Router::new().route("/wp-json/wc/v3/products", get(products_handler))).await;
    let client = config(&base).build_client().unwrap();

    let query = ProductQuery::new(3)
        .sorted_by("popularity", SortOrder::Asc)
        .with_offset(20);
    let products = client.fetch_products(&query).await.unwrap();

    let ids: Vec<i64> = products.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![21, 22, 23]);
    assert_eq!(products[0].category, "Bedroom");
    assert_eq!(products[0].variants[0].stock, 100);
}

#[tokio::test]
async fn test_error_body_message_is_surfaced() {
    let base = spawn(Router::new().route("/wp-json/wc/v3/products", get(products_handler))).await;
    let client = CatalogConfig::new(&base)
        .with_credentials("ck_test", "wrong")
        .build_client()
        .unwrap();

    let err = client
        .fetch_products(&ProductQuery::new(3).sorted_by("popularity", SortOrder::Asc))
        .await
        .unwrap_err();
    match err {
        ClientError::Fetch { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "Invalid signature");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_unparseable_error_body_uses_status_line() {
    let router = Router::new().route(
        "/wp-json/wc/v3/products",
        get(|| async { (StatusCode::BAD_GATEWAY, "<html>upstream down</html>") }),
    );
    let base = spawn(router).await;
    let client = config(&base).build_client().unwrap();

    let err = client.fetch_products(&ProductQuery::default()).await.unwrap_err();
    match err {
        ClientError::Fetch { status, message } => {
            assert_eq!(status, 502);
            assert_eq!(message, "502 Bad Gateway");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_non_array_body_is_empty_result() {
    let router = Router::new().route(
        "/wp-json/wc/v3/products",
        get(|| async { Json(json!({"products": []})) }),
    );
    let base = spawn(router).await;
    let client = config(&base).build_client().unwrap();

    let products = client.fetch_products(&ProductQuery::default()).await.unwrap();
    assert!(products.is_empty());
}

#[tokio::test]
async fn test_malformed_records_do_not_fail_the_page() {
    let router = Router::new().route(
        "/wp-json/wc/v3/products",
        get(|| async {
            Json(json!([
                product(1, "Sofa"),
                null,
                {"name": "No id"},
                product(2, "Ottoman")
            ]))
        }),
    );
    let base = spawn(router).await;
    let client = config(&base).build_client().unwrap();

    let products = client.fetch_products(&ProductQuery::default()).await.unwrap();
    let names: Vec<&str> = products.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Sofa", "Ottoman"]);
}

#[tokio::test]
async fn test_categories_query_and_uncategorized_filter() {
    let router = Router::new().route(
        "/wp-json/wc/v3/products/categories",
        get(|Query(params): Query<HashMap<String, String>>| async move {
            assert_eq!(params.get("per_page").map(String::as_str), Some("100"));
            assert_eq!(params.get("parent").map(String::as_str), Some("0"));
            assert_eq!(params.get("hide_empty").map(String::as_str), Some("true"));
            Json(json!([
                {"id": 15, "name": "Uncategorized", "slug": "uncategorized"},
                {"id": 16, "name": "Living Room", "slug": "living-room",
                 "image": {"src": "https://cdn.example/living.jpg"}}
            ]))
        }),
    );
    let base = spawn(router).await;
    let client = config(&base).build_client().unwrap();

    let categories = client.fetch_categories().await.unwrap();
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0].name, "Living Room");
    assert_eq!(categories[0].image_url, "https://cdn.example/living.jpg");
}

#[tokio::test]
async fn test_requests_go_through_cors_relay() {
    let router = Router::new().route(
        "/relay",
        get(|headers: HeaderMap, Query(params): Query<HashMap<String, String>>| async move {
            let target = params.get("url").cloned().unwrap_or_default();
            assert!(target.starts_with("https://shop.example/wp-json/wc/v3/products?"));
            assert!(target.contains("per_page=2"));
            assert_eq!(
                headers.get("authorization").and_then(|v| v.to_str().ok()),
                Some(EXPECTED_AUTH)
            );
            Json(json!([product(7, "Relayed Lamp")]))
        }),
    );
    let base = spawn(router).await;
    let client = config("https://shop.example")
        .with_proxy(format!("{}/relay", base))
        .build_client()
        .unwrap();

    let products = client.fetch_products(&ProductQuery::new(2)).await.unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].name, "Relayed Lamp");
}

#[tokio::test]
async fn test_authorization_header_sent_without_credentials() {
    let router = Router::new().route(
        "/wp-json/wc/v3/products",
        get(|headers: HeaderMap| async move {
            // base64(":")
            assert_eq!(
                headers.get("authorization").and_then(|v| v.to_str().ok()),
                Some("Basic Og==")
            );
            Json(json!([product(7, "Sisal Rug")]))
        }),
    );
    let base = spawn(router).await;
    let client = CatalogConfig::new(&base).build_client().unwrap();

    let products = client.fetch_products(&ProductQuery::default()).await.unwrap();
    assert_eq!(products.len(), 1);
}
