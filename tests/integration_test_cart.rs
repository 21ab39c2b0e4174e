mod common;

use axum::http::StatusCode;
use common::TestApp;
use serde_json::{json, Value};

async fn add_to_cart(app: &TestApp, cookie: &str, product_id: &str, quantity: i64) -> common::TestResponse {
    app.post_json(
        "/api/v1/cart/items",
        Some(cookie),
        json!({ "product_id": product_id, "quantity": quantity }),
    ).await
}

async fn seed_tomatoes(app: &TestApp) -> (String, Value) {
    let (_, alice) = app.register_and_login("alice", "pw1", "farmer").await;
    let tomatoes = app.add_product(&alice, "Tomatoes", "Fresh", "20", "10").await;
    (alice, tomatoes)
}

#[tokio::test]
async fn test_buyer_cart_and_checkout_scenario() {
    let app = TestApp::new().await;
    let (_, tomatoes) = seed_tomatoes(&app).await;
    let tomatoes_id = tomatoes["id"].as_str().unwrap();
    let (_, bob) = app.register_and_login("bob", "pw", "buyer").await;

    let added = add_to_cart(&app, &bob, tomatoes_id, 3).await;
    assert_eq!(added.status, StatusCode::OK);
    assert_eq!(added.body["message"], "Added to cart");
    assert_eq!(added.body["cart_items"], 1);

    let view = app.get("/api/v1/cart", Some(&bob)).await;
    assert_eq!(view.status, StatusCode::OK);
    let lines = view.body["lines"].as_array().unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["title"], "Tomatoes");
    assert_eq!(lines[0]["quantity"], 3);
    assert_eq!(lines[0]["unit_price"], 20.0);
    assert_eq!(lines[0]["subtotal"], 60.0);
    assert_eq!(view.body["total"], 60.0);

    let checkout = app.post_json("/api/v1/cart/checkout", Some(&bob), json!({})).await;
    assert_eq!(checkout.status, StatusCode::OK);
    assert_eq!(checkout.body["success"], true);
    assert_eq!(checkout.body["message"], "Order placed successfully!");
    assert_eq!(checkout.body["cleared_lines"], 1);

    let after = app.get("/api/v1/cart", Some(&bob)).await;
    assert!(after.body["lines"].as_array().unwrap().is_empty());
    assert_eq!(after.body["total"], 0.0);

    // Checkout is confirmation only; stock is untouched.
    let market = app.get("/api/v1/products", None).await;
    assert_eq!(market.body[0]["quantity"], 10);
}

#[tokio::test]
async fn test_add_to_cart_overwrites_quantity() {
    let app = TestApp::new().await;
    let (alice, tomatoes) = seed_tomatoes(&app).await;
    let honey = app.add_product(&alice, "Honey", "", "7.5", "4").await;
    let (_, bob) = app.register_and_login("bob", "pw", "buyer").await;

    add_to_cart(&app, &bob, tomatoes["id"].as_str().unwrap(), 3).await;
    add_to_cart(&app, &bob, honey["id"].as_str().unwrap(), 2).await;
    let second = add_to_cart(&app, &bob, tomatoes["id"].as_str().unwrap(), 5).await;
    assert_eq!(second.body["cart_items"], 2);

    let view = app.get("/api/v1/cart", Some(&bob)).await;
    let lines = view.body["lines"].as_array().unwrap();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["title"], "Tomatoes");
    assert_eq!(lines[0]["quantity"], 5);
    assert_eq!(lines[0]["subtotal"], 100.0);
    assert_eq!(lines[1]["title"], "Honey");
    assert_eq!(lines[1]["subtotal"], 15.0);
    assert_eq!(view.body["total"], 115.0);
}

#[tokio::test]
async fn test_add_to_cart_rejections() {
    let app = TestApp::new().await;
    let (_, tomatoes) = seed_tomatoes(&app).await;
    let id = tomatoes["id"].as_str().unwrap();
    let (_, bob) = app.register_and_login("bob", "pw", "buyer").await;

    for quantity in [0, -2] {
        let res = add_to_cart(&app, &bob, id, quantity).await;
        assert_eq!(res.status, StatusCode::BAD_REQUEST);
        assert_eq!(res.body["error"], "Select quantity");
    }

    let too_many = add_to_cart(&app, &bob, id, 11).await;
    assert_eq!(too_many.status, StatusCode::BAD_REQUEST);

    let unknown = add_to_cart(&app, &bob, "no-such-product", 1).await;
    assert_eq!(unknown.status, StatusCode::NOT_FOUND);

    let view = app.get("/api/v1/cart", Some(&bob)).await;
    assert!(view.body["lines"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_cart_reprices_and_skips_vanished_products() {
    let app = TestApp::new().await;
    let (alice, tomatoes) = seed_tomatoes(&app).await;
    let tomatoes_id = tomatoes["id"].as_str().unwrap();
    let honey = app.add_product(&alice, "Honey", "", "8", "4").await;
    let (_, bob) = app.register_and_login("bob", "pw", "buyer").await;

    add_to_cart(&app, &bob, tomatoes_id, 2).await;
    add_to_cart(&app, &bob, honey["id"].as_str().unwrap(), 1).await;

    sqlx::query("UPDATE products SET price = 25 WHERE id = ?")
        .bind(tomatoes_id)
        .execute(&app.pool)
        .await
        .unwrap();

    let repriced = app.get("/api/v1/cart", Some(&bob)).await;
    assert_eq!(repriced.body["lines"][0]["unit_price"], 25.0);
    assert_eq!(repriced.body["total"], 58.0);

    let deleted = app.delete(&format!("/api/v1/products/{}", tomatoes_id), Some(&alice)).await;
    assert_eq!(deleted.status, StatusCode::OK);

    let view = app.get("/api/v1/cart", Some(&bob)).await;
    assert_eq!(view.status, StatusCode::OK);
    let lines = view.body["lines"].as_array().unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["title"], "Honey");
    assert_eq!(view.body["total"], 8.0);
}

#[tokio::test]
async fn test_checkout_on_empty_cart() {
    let app = TestApp::new().await;
    let (_, bob) = app.register_and_login("bob", "pw", "buyer").await;

    let checkout = app.post_json("/api/v1/cart/checkout", Some(&bob), json!({})).await;
    assert_eq!(checkout.status, StatusCode::OK);
    assert_eq!(checkout.body["success"], true);
    assert_eq!(checkout.body["cleared_lines"], 0);

    let view = app.get("/api/v1/cart", Some(&bob)).await;
    assert!(view.body["lines"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_cart_requires_buyer() {
    let app = TestApp::new().await;
    let (alice, tomatoes) = seed_tomatoes(&app).await;
    let id = tomatoes["id"].as_str().unwrap();

    assert_eq!(add_to_cart(&app, &alice, id, 1).await.status, StatusCode::FORBIDDEN);
    assert_eq!(app.get("/api/v1/cart", Some(&alice)).await.status, StatusCode::FORBIDDEN);
    assert_eq!(
        app.post_json("/api/v1/cart/checkout", Some(&alice), json!({})).await.status,
        StatusCode::FORBIDDEN
    );

    assert_eq!(app.get("/api/v1/cart", None).await.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_clears_cart_and_sessions_are_isolated() {
    let app = TestApp::new().await;
    let (_, tomatoes) = seed_tomatoes(&app).await;
    let id = tomatoes["id"].as_str().unwrap();
    app.register("bob", "pw", "buyer").await;

    let laptop = app.login("bob", "pw").await;
    let phone = app.login("bob", "pw").await;

    add_to_cart(&app, &laptop, id, 4).await;
    let phone_view = app.get("/api/v1/cart", Some(&phone)).await;
    assert!(phone_view.body["lines"].as_array().unwrap().is_empty(), "carts are per session");

    let logout = app.post_json("/api/v1/auth/logout", Some(&laptop), json!({})).await;
    assert_eq!(logout.status, StatusCode::OK);

    let relogin = app.login("bob", "pw").await;
    let view = app.get("/api/v1/cart", Some(&relogin)).await;
    assert!(view.body["lines"].as_array().unwrap().is_empty());
}
