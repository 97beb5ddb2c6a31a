//! Contract tests for `ApiClient` against a mock backend.
//!
//! ## Endpoints Tested
//!
//! | Method | Path | Test |
//! |--------|------|------|
//! | POST   | `/auth/signin` | `login_*` |
//! | POST   | `/auth/signup` | `register_*` |
//! | GET    | `/restaurants`, `/restaurants/{id}`, `/restaurants/search`, `/restaurants/cuisine/{c}` | `*_restaurants_*` |
//! | GET    | `/restaurants/{id}/menu` | `list_menu_items_*` |
//! | POST   | `/orders` | `create_order_*` |
//! | GET    | `/orders/user`, `/orders/restaurant` | `list_*_orders_*` |
//! | PUT    | `/orders/{id}/status` | `update_order_status_*` |
//! | POST/PUT/DELETE | `/menu-items` | `*_menu_item_*` |

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use secrecy::SecretString;
use serde_json::json;
use tastebud_core::{MenuItemId, OrderId, OrderStatus, Price, RestaurantId};
use tastebud_integration_tests::client_for;
use tastebud_storefront::gateway::{GatewayError, MenuItemInput, NewOrder, NewOrderItem};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn token() -> SecretString {
    SecretString::from("t1")
}

fn restaurant_json(id: u32, name: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "cuisine": "Thai",
        "rating": 4.6,
        "deliveryTime": "20-30 min",
        "deliveryFee": 1.99,
        "image": "",
        "description": "Noodles and curries"
    })
}

// ── POST /auth/signin ───────────────────────────────────────────────

#[tokio::test]
async fn login_returns_token_and_stringified_id() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/signin"))
        .and(body_json(json!({"email": "a@b.com", "password": "pw"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "t1",
            "id": 7,
            "email": "a@b.com",
            "full_name": "Ann",
            "role": "customer"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let response = client
        .login("a@b.com", &SecretString::from("pw"))
        .await
        .unwrap();

    assert_eq!(response.token, "t1");
    assert_eq!(response.id.as_str(), "7");
    assert_eq!(response.role, "customer");
}

#[tokio::test]
async fn login_rejected_surfaces_server_text() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/signin"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Invalid email or password"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .login("a@b.com", &SecretString::from("wrong"))
        .await
        .unwrap_err();

    assert!(err.is_auth());
    assert_eq!(err.to_string(), "Invalid email or password");
}

#[tokio::test]
async fn login_rejected_with_empty_body_uses_fallback() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/signin"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .login("a@b.com", &SecretString::from("pw"))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Login failed");
}

// ── POST /auth/signup ───────────────────────────────────────────────

#[tokio::test]
async fn register_lowercases_role() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/signup"))
        .and(body_json(json!({
            "full_name": "Ann Lee",
            "email": "ann@example.com",
            "password": "pw",
            "role": "restaurant_owner"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"message": "User created"})))
        .expect(1)
        .mount(&server)
        .await;

    let response = client_for(&server)
        .register(
            "Ann Lee",
            "ann@example.com",
            &SecretString::from("pw"),
            "RESTAURANT_OWNER",
        )
        .await
        .unwrap();

    assert_eq!(response.message, "User created");
}

#[tokio::test]
async fn register_conflict_extracts_json_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/signup"))
        .respond_with(
            ResponseTemplate::new(409).set_body_json(json!({"message": "Email already registered"})),
        )
        .mount(&server)
        .await;

    let err = client_for(&server)
        .register("Ann", "ann@example.com", &SecretString::from("pw"), "customer")
        .await
        .unwrap_err();

    assert!(matches!(err, GatewayError::Auth(ref m) if m == "Email already registered"));
}

// ── GET /restaurants ────────────────────────────────────────────────

#[tokio::test]
async fn list_restaurants_returns_records() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/restaurants"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            restaurant_json(1, "Thai Orchid"),
            restaurant_json(2, "Noodle Bar")
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let restaurants = client_for(&server).list_restaurants().await.unwrap();
    assert_eq!(restaurants.len(), 2);
    assert_eq!(restaurants[0].id.as_str(), "1");
    assert_eq!(restaurants[1].delivery_fee, Price::from_cents(199));
}

#[tokio::test]
async fn list_restaurants_failure_has_fixed_message() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/restaurants"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
        .mount(&server)
        .await;

    let err = client_for(&server).list_restaurants().await.unwrap_err();
    assert_eq!(err.to_string(), "Failed to fetch restaurants");
}

#[tokio::test]
async fn get_restaurant_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/restaurants/99"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .get_restaurant(&RestaurantId::from("99"))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Failed to fetch restaurant");
}

#[tokio::test]
async fn search_restaurants_escapes_term() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/restaurants/search"))
        .and(query_param("q", "thai & noodles"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([restaurant_json(1, "Thai Orchid")])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let results = client_for(&server)
        .search_restaurants("thai & noodles")
        .await
        .unwrap();
    assert_eq!(results.len(), 1);
}

#[tokio::test]
async fn list_restaurants_by_cuisine_uses_path_segment() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/restaurants/cuisine/Thai"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let results = client_for(&server)
        .list_restaurants_by_cuisine("Thai")
        .await
        .unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn list_menu_items_parses_prices_exactly() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/restaurants/1/menu"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 3, "name": "Pad Thai", "price": 12.99, "category": "Mains"},
            {"id": "4", "name": "Spring Rolls", "price": 6.5, "is_available": false}
        ])))
        .mount(&server)
        .await;

    let items = client_for(&server)
        .list_menu_items(&RestaurantId::from("1"))
        .await
        .unwrap();
    assert_eq!(items[0].price, Price::from_cents(1299));
    assert_eq!(items[1].id.as_str(), "4");
    assert!(!items[1].is_available);
}

// ── Orders ──────────────────────────────────────────────────────────

#[tokio::test]
async fn list_user_orders_sends_bearer_token() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/orders/user"))
        .and(header("Authorization", "Bearer t1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 42, "status": "preparing", "total": 25.97, "items": []}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let orders = client_for(&server).list_user_orders(&token()).await.unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].status, OrderStatus::Preparing);
}

#[tokio::test]
async fn unauthorized_bearer_call_is_token_expired() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/orders/restaurant"))
        .respond_with(ResponseTemplate::new(401).set_body_string("jwt expired"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .list_restaurant_orders(&token())
        .await
        .unwrap_err();
    assert!(err.is_token_expired());
}

#[tokio::test]
async fn create_order_failure_surfaces_server_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/orders"))
        .and(header("Authorization", "Bearer t1"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"error": "Restaurant is closed"})),
        )
        .mount(&server)
        .await;

    let order = NewOrder {
        restaurant_id: RestaurantId::from("1"),
        items: vec![NewOrderItem {
            menu_item_id: MenuItemId::from("3"),
            quantity: 2,
            price: Price::from_cents(1299),
            name: "Pad Thai".to_string(),
        }],
        total: Price::from_cents(2598),
        delivery_address: "1 Main St".to_string(),
    };

    let err = client_for(&server)
        .create_order(&order, &token())
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Restaurant is closed");
}

#[tokio::test]
async fn update_order_status_sends_kebab_case() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/api/orders/42/status"))
        .and(body_json(json!({"status": "on-the-way"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 42, "status": "on-the-way", "total": 25.97
        })))
        .expect(1)
        .mount(&server)
        .await;

    let order = client_for(&server)
        .update_order_status(&OrderId::from("42"), OrderStatus::OnTheWay, &token())
        .await
        .unwrap();
    assert_eq!(order.status, OrderStatus::OnTheWay);
}

// ── Menu items ──────────────────────────────────────────────────────

#[tokio::test]
async fn create_menu_item_posts_input() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/menu-items"))
        .and(body_json(json!({"name": "Pad Thai", "price": 12.99})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 17, "name": "Pad Thai", "price": 12.99
        })))
        .expect(1)
        .mount(&server)
        .await;

    let input = MenuItemInput {
        name: "Pad Thai".to_string(),
        price: Price::from_cents(1299),
        ..MenuItemInput::default()
    };
    let item = client_for(&server)
        .create_menu_item(&input, &token())
        .await
        .unwrap();
    assert_eq!(item.id.as_str(), "17");
}

#[tokio::test]
async fn delete_menu_item_no_content_is_none() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/menu-items/17"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let result = client_for(&server)
        .delete_menu_item(&MenuItemId::from("17"), &token())
        .await
        .unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn delete_menu_item_with_body_returns_json() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/menu-items/17"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"deleted": true})))
        .mount(&server)
        .await;

    let result = client_for(&server)
        .delete_menu_item(&MenuItemId::from("17"), &token())
        .await
        .unwrap();
    assert_eq!(result, Some(json!({"deleted": true})));
}

// ── GET /restaurants/{id} ───────────────────────────────────────────

#[tokio::test]
async fn get_restaurant_returns_record() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/restaurants/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(restaurant_json(3, "Thai Orchid")))
        .expect(1)
        .mount(&server)
        .await;

    let restaurant = client_for(&server)
        .get_restaurant(&RestaurantId::from("3"))
        .await
        .unwrap();
    assert_eq!(restaurant.id.as_str(), "3");
    assert_eq!(restaurant.name, "Thai Orchid");
    assert_eq!(restaurant.delivery_time, "20-30 min");
    assert_eq!(restaurant.delivery_fee, Price::from_cents(199));
}

// ── GET /orders/restaurant ──────────────────────────────────────────

#[tokio::test]
async fn list_restaurant_orders_sends_bearer_token() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/orders/restaurant"))
        .and(header("Authorization", "Bearer t1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 42, "status": "pending", "total": 17.02, "items": [
                {"menu_item_id": 5, "name": "Pad Thai", "price": 12.99, "quantity": 1}
            ]},
            {"id": 43, "status": "delivered", "total": 9.5, "items": []}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let orders = client_for(&server)
        .list_restaurant_orders(&token())
        .await
        .unwrap();
    assert_eq!(orders.len(), 2);
    assert_eq!(orders[0].id.as_str(), "42");
    assert_eq!(orders[0].status, OrderStatus::Pending);
    assert_eq!(orders[0].total, Price::from_cents(1702));
    assert_eq!(orders[0].items.len(), 1);
    assert_eq!(orders[1].status, OrderStatus::Delivered);
}

#[tokio::test]
async fn list_restaurant_orders_failure_has_fixed_message() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/orders/restaurant"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .list_restaurant_orders(&token())
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Failed to fetch restaurant orders");
}

// ── PUT /menu-items/{id} ────────────────────────────────────────────

#[tokio::test]
async fn update_menu_item_puts_input_with_bearer() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/api/menu-items/17"))
        .and(header("Authorization", "Bearer t1"))
        .and(body_json(json!({
            "name": "Pad Thai",
            "price": 13.5,
            "is_available": false
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 17, "name": "Pad Thai", "price": 13.5, "is_available": false
        })))
        .expect(1)
        .mount(&server)
        .await;

    let input = MenuItemInput {
        name: "Pad Thai".to_string(),
        price: Price::from_cents(1350),
        is_available: Some(false),
        ..MenuItemInput::default()
    };
    let item = client_for(&server)
        .update_menu_item(&MenuItemId::from("17"), &input, &token())
        .await
        .unwrap();
    assert_eq!(item.id.as_str(), "17");
    assert_eq!(item.price, Price::from_cents(1350));
    assert!(!item.is_available);
}

#[tokio::test]
async fn update_menu_item_failure_has_fixed_message() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/api/menu-items/17"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({"message": "not your dish"})))
        .mount(&server)
        .await;

    let input = MenuItemInput {
        name: "Pad Thai".to_string(),
        price: Price::from_cents(1350),
        ..MenuItemInput::default()
    };
    let err = client_for(&server)
        .update_menu_item(&MenuItemId::from("17"), &input, &token())
        .await
        .unwrap_err();
    assert!(matches!(err, GatewayError::Fetch(_)));
    assert_eq!(err.to_string(), "Failed to update menu item");
}
