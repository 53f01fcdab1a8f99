//! HTTP-level tests for the storefront API.

use std::time::Duration;

use axum::http::{Method, StatusCode};
use serde_json::{Value, json};
use zar_integration_tests::{TestApp, ids};
use zar_storefront::catalog::{Catalog, RemoteCatalog};
use zar_storefront::config::CatalogConfig;
use zar_storefront::services::assistant::FALLBACK_CHAT_REPLY;

/// A storefront whose catalog API refuses connections.
fn app_without_catalog() -> TestApp {
    let config = CatalogConfig {
        base_url: url::Url::parse("http://127.0.0.1:9").expect("valid url"),
        cache_ttl: Duration::from_secs(60),
    };
    TestApp::with_catalog(Catalog::Remote(RemoteCatalog::new(&config)))
}

// ============================================================================
// Health & Catalog
// ============================================================================

#[tokio::test]
async fn test_health() {
    let mut app = TestApp::new();
    let (status, body) = app.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("ok"));
}

#[tokio::test]
async fn test_products_unfiltered_returns_catalog_in_order() {
    let mut app = TestApp::new();
    let (status, body) = app.get("/api/products").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec![1, 2, 3, 4, 5, 6]);
}

#[tokio::test]
async fn test_products_filters_combine() {
    let mut app = TestApp::new();

    let (_, body) = app.get("/api/products?style=Casual").await;
    assert_eq!(ids(&body), vec![1, 6]);

    let (_, body) = app.get("/api/products?category=Outerwear&style=Edgy").await;
    assert_eq!(ids(&body), vec![3]);

    let (_, body) = app.get("/api/products?search=BLUE").await;
    assert_eq!(ids(&body), vec![6]);

    let (_, body) = app.get("/api/products?category=&style=&search=").await;
    assert_eq!(ids(&body).len(), 6);
}

#[tokio::test]
async fn test_products_no_match_is_empty_array() {
    let mut app = TestApp::new();
    let (status, body) = app.get("/api/products?category=Hats").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_products_unknown_style_is_bad_request() {
    let mut app = TestApp::new();
    let (status, _) = app.get("/api/products?style=Gothic").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_categories_are_sorted_and_distinct() {
    let mut app = TestApp::new();
    let (status, body) = app.get("/api/categories").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!(["Bottoms", "Dresses", "Outerwear", "Tops"]));
}

#[tokio::test]
async fn test_catalog_outage_is_service_unavailable() {
    let mut app = app_without_catalog();

    let (status, body) = app.get("/api/products").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body, json!("No products available"));

    let (status, _) = app.get("/api/categories").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

// ============================================================================
// Cart
// ============================================================================

fn line(product_id: i64, size: &str, color: &str, quantity: i64) -> Value {
    json!({ "productId": product_id, "size": size, "color": color, "quantity": quantity })
}

#[tokio::test]
async fn test_new_visitor_has_empty_cart() {
    let mut app = TestApp::new();
    let (status, body) = app.get("/api/cart").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"], json!([]));
    assert_eq!(body["itemCount"], json!(0));
    assert_eq!(body["subtotal"], json!("$0.00"));

    let (_, body) = app.get("/api/cart/count").await;
    assert_eq!(body, json!({ "count": 0 }));
}

#[tokio::test]
async fn test_add_same_line_twice_merges() {
    let mut app = TestApp::new();

    let (status, _) = app.post("/api/cart/items", line(1, "M", "White", 2)).await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = app.post("/api/cart/items", line(1, "M", "White", 1)).await;

    assert_eq!(body["items"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["items"][0]["quantity"], json!(3));
    assert_eq!(body["items"][0]["name"], json!("Linen Shirt"));
    assert_eq!(body["itemCount"], json!(3));
    assert_eq!(body["subtotal"], json!("$135.00"));

    let (_, body) = app.get("/api/cart/count").await;
    assert_eq!(body, json!({ "count": 3 }));
}

#[tokio::test]
async fn test_variants_are_separate_lines() {
    let mut app = TestApp::new();
    app.post("/api/cart/items", line(1, "M", "White", 1)).await;
    let (_, body) = app.post("/api/cart/items", line(1, "L", "White", 1)).await;

    assert_eq!(body["items"].as_array().map(Vec::len), Some(2));
    assert_eq!(body["itemCount"], json!(2));
}

#[tokio::test]
async fn test_quantity_defaults_to_one() {
    let mut app = TestApp::new();
    let (_, body) = app
        .post("/api/cart/items", json!({ "productId": 5, "size": "S" }))
        .await;
    assert_eq!(body["items"][0]["quantity"], json!(1));
    assert_eq!(body["items"][0]["color"], json!(""));
}

#[tokio::test]
async fn test_add_rejects_unknown_product_and_zero_quantity() {
    let mut app = TestApp::new();

    let (status, _) = app.post("/api/cart/items", line(99, "M", "Red", 1)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.post("/api/cart/items", line(1, "M", "Red", 0)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = app.get("/api/cart").await;
    assert_eq!(body["itemCount"], json!(0));
}

#[tokio::test]
async fn test_update_quantity_sets_and_removes() {
    let mut app = TestApp::new();
    app.post("/api/cart/items", line(2, "40", "Grey", 1)).await;
    app.post("/api/cart/items", line(4, "S", "Red", 1)).await;

    let (status, body) = app
        .send(Method::PATCH, "/api/cart/items", Some(line(2, "40", "Grey", 4)))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["itemCount"], json!(5));

    let (_, body) = app
        .send(Method::PATCH, "/api/cart/items", Some(line(2, "40", "Grey", 0)))
        .await;
    assert_eq!(body["itemCount"], json!(1));
    assert_eq!(body["items"][0]["productId"], json!(4));

    let (_, body) = app
        .send(Method::PATCH, "/api/cart/items", Some(line(4, "S", "Red", -3)))
        .await;
    assert_eq!(body["items"], json!([]));
}

#[tokio::test]
async fn test_remove_and_clear() {
    let mut app = TestApp::new();
    app.post("/api/cart/items", line(1, "M", "White", 1)).await;
    app.post("/api/cart/items", line(3, "L", "Black", 1)).await;

    let (_, body) = app
        .send(
            Method::DELETE,
            "/api/cart/items",
            Some(json!({ "productId": 1, "size": "M", "color": "White" })),
        )
        .await;
    assert_eq!(body["items"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["items"][0]["productId"], json!(3));

    let (_, body) = app
        .send(
            Method::DELETE,
            "/api/cart/items",
            Some(json!({ "productId": 1, "size": "M", "color": "White" })),
        )
        .await;
    assert_eq!(body["itemCount"], json!(1));

    let (status, body) = app.send(Method::DELETE, "/api/cart", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["itemCount"], json!(0));
}

#[tokio::test]
async fn test_carts_are_scoped_to_sessions() {
    let mut app = TestApp::new();
    app.post("/api/cart/items", line(1, "M", "White", 2)).await;

    app.clear_cookies();
    let (_, body) = app.get("/api/cart/count").await;
    assert_eq!(body, json!({ "count": 0 }));
}

#[tokio::test]
async fn test_update_without_cart_is_noop() {
    let mut app = TestApp::new();
    let (status, body) = app
        .send(Method::PATCH, "/api/cart/items", Some(line(1, "M", "White", 3)))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["itemCount"], json!(0));
}

// ============================================================================
// Assistant (AI disabled, fallback paths)
// ============================================================================

#[tokio::test]
async fn test_chat_falls_back_without_model() {
    let mut app = TestApp::new();
    let (status, body) = app
        .post(
            "/api/ai/chat",
            json!({
                "message": "What goes with a leather jacket?",
                "history": [
                    { "role": "user", "text": "Hi" },
                    { "role": "assistant", "text": "Hello! How can I help?" }
                ]
            }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source"], json!("fallback"));
    assert_eq!(body["reply"], json!(FALLBACK_CHAT_REPLY));
}

#[tokio::test]
async fn test_chat_requires_message() {
    let mut app = TestApp::new();
    let (status, _) = app.post("/api/ai/chat", json!({ "message": "   " })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_recommendations_fallback_uses_style_and_budget() {
    let mut app = TestApp::new();
    let (status, body) = app
        .post(
            "/api/ai/recommendations",
            json!({ "style": "Casual", "budget": "50.00", "preferences": ["linen"] }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source"], json!("fallback"));
    assert_eq!(ids(&body["products"]), vec![1]);
}

#[tokio::test]
async fn test_recommendations_fallback_is_capped() {
    let mut app = TestApp::new();
    let (_, body) = app.post("/api/ai/recommendations", json!({})).await;
    assert_eq!(ids(&body["products"]).len(), 6);
}

#[tokio::test]
async fn test_style_advice_fallback() {
    let mut app = TestApp::new();
    let (status, body) = app
        .post(
            "/api/ai/style-advice",
            json!({ "preferences": ["edgy", "Feminine"], "occasion": "date night" }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source"], json!("fallback"));
    assert_eq!(body["bodyType"], json!("regular"));
    assert_eq!(body["tips"], json!([]));
    assert_eq!(ids(&body["recommendations"]), vec![3, 4]);
}

#[tokio::test]
async fn test_assistant_survives_catalog_outage() {
    let mut app = app_without_catalog();

    let (status, body) = app.post("/api/ai/chat", json!({ "message": "Hello" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source"], json!("fallback"));

    let (status, body) = app.post("/api/ai/recommendations", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["products"], json!([]));
}
