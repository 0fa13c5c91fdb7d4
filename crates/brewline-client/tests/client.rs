//! Integration tests for `ApiClient` using wiremock HTTP mocks.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use brewline_client::{ApiClient, ApiError, AuthHook, NearbyQuery, ProductQuery, RecommendQuery};
use brewline_core::{NewOrder, OrderLine, OrderStatus};
use rust_decimal::Decimal;
use wiremock::matchers::{body_json, header, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Session double: hands out a fixed token and counts 401 notifications.
#[derive(Default)]
struct RecordingHook {
    token: Mutex<Option<String>>,
    unauthorized_calls: AtomicUsize,
}

impl RecordingHook {
    fn with_token(token: &str) -> Arc<Self> {
        Arc::new(Self {
            token: Mutex::new(Some(token.to_string())),
            unauthorized_calls: AtomicUsize::new(0),
        })
    }
}

impl AuthHook for RecordingHook {
    fn bearer_token(&self) -> Option<String> {
        self.token.lock().unwrap().clone()
    }

    fn on_unauthorized(&self) {
        self.unauthorized_calls.fetch_add(1, Ordering::SeqCst);
        *self.token.lock().unwrap() = None;
    }
}

fn test_client(base_url: &str) -> ApiClient {
    ApiClient::new(&format!("{base_url}/api/v1"), 5, "brewline-test/0.1")
        .expect("client construction should not fail")
}

fn envelope(data: serde_json::Value) -> serde_json::Value {
    serde_json::json!({ "code": 200, "message": "success", "data": data })
}

#[tokio::test]
async fn login_posts_credentials_and_unwraps_envelope() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .and(body_json(serde_json::json!({
            "phone": "13800138000",
            "password": "secret1"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(serde_json::json!({
            "token": "tok-123",
            "user": { "id": 9, "name": "Mina", "phone": "13800138000", "points": 120, "memberLevelId": 2 }
        }))))
        .mount(&server)
        .await;

    let payload = test_client(&server.uri())
        .login("13800138000", "secret1")
        .await
        .expect("login should succeed");

    assert_eq!(payload.token, "tok-123");
    assert_eq!(payload.user.id, 9);
    assert_eq!(payload.user.points, 120);
    assert_eq!(payload.user.member_level_id, 2);
}

#[tokio::test]
async fn bearer_token_comes_from_hook() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/auth/profile"))
        .and(header("authorization", "Bearer tok-abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(serde_json::json!({
            "id": 4, "name": "Jun"
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let hook = RecordingHook::with_token("tok-abc");
    let client = test_client(&server.uri()).with_auth_hook(hook);
    let user = client.profile().await.expect("profile should load");
    assert_eq!(user.name, "Jun");
}

#[tokio::test]
async fn unauthorized_notifies_hook_once() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/auth/profile"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(serde_json::json!({ "message": "token expired" })),
        )
        .mount(&server)
        .await;

    let hook = RecordingHook::with_token("stale");
    let client = test_client(&server.uri()).with_auth_hook(hook.clone());
    let err = client.profile().await.expect_err("401 must surface as an error");

    assert!(err.is_unauthorized());
    assert_eq!(err.user_message(), "token expired");
    assert_eq!(hook.unauthorized_calls.load(Ordering::SeqCst), 1);
    assert!(hook.bearer_token().is_none());
}

#[tokio::test]
async fn business_code_in_2xx_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/register"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "code": 409,
            "message": "phone already registered",
            "data": null
        })))
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .register("Mina", "13800138000", "mina@example.com", "secret1")
        .await
        .expect_err("business failure must be an error");

    match err {
        ApiError::Business { code, message } => {
            assert_eq!(code, 409);
            assert_eq!(message, "phone already registered");
        }
        other => panic!("expected Business, got {other:?}"),
    }
}

#[tokio::test]
async fn server_error_maps_to_status_with_message() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/categories"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .categories()
        .await
        .expect_err("503 must be an error");

    assert!(matches!(err, ApiError::Status { status: 503, .. }));
    assert_eq!(err.user_message(), "internal server error, please retry later");
}

#[tokio::test]
async fn products_unwraps_paged_records_and_sends_query() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/products"))
        .and(query_param("categoryId", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(serde_json::json!({
            "total": 1,
            "records": [{
                "id": 11,
                "productNo": "P011",
                "name": "Flat White",
                "price": "4.20",
                "categoryId": 2,
                "status": 1
            }]
        }))))
        .mount(&server)
        .await;

    let query = ProductQuery {
        category_id: Some(2),
        ..ProductQuery::default()
    };
    let products = test_client(&server.uri())
        .products(&query)
        .await
        .expect("products should parse");

    assert_eq!(products.len(), 1);
    assert_eq!(products[0].product_no, "P011");
    assert_eq!(products[0].price, Decimal::new(420, 2));
    assert!(products[0].is_active());
}

#[tokio::test]
async fn null_list_payload_is_empty() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/stores/favorites"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(serde_json::Value::Null)))
        .mount(&server)
        .await;

    let stores = test_client(&server.uri())
        .favorite_stores()
        .await
        .expect("null data should be accepted");
    assert!(stores.is_empty());
}

#[tokio::test]
async fn nearby_stores_accepts_bare_list() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/stores/nearby"))
        .and(query_param("radius", "5000"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "id": 1, "name": "Harbour Roastery", "latitude": 39.91, "longitude": 116.41, "distance": 820.0 }
        ])))
        .mount(&server)
        .await;

    let query = NearbyQuery {
        latitude: 39.9042,
        longitude: 116.4074,
        radius: 5000,
        ..NearbyQuery::default()
    };
    let stores = test_client(&server.uri())
        .nearby_stores(&query)
        .await
        .expect("bare array should parse");

    assert_eq!(stores.len(), 1);
    assert_eq!(stores[0].distance, Some(820.0));
    assert!(!stores[0].is_favorite);
}

#[tokio::test]
async fn trace_headers_are_sent_when_enabled() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/stores/3/favorite"))
        .and(header_exists("x-request-id"))
        .and(header_exists("x-timestamp"))
        .and(body_json(serde_json::json!({ "isFavorite": true })))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(serde_json::Value::Null)))
        .expect(1)
        .mount(&server)
        .await;

    test_client(&server.uri())
        .with_trace_headers(true)
        .set_favorite(3, true)
        .await
        .expect("favorite toggle should succeed");
}

#[tokio::test]
async fn order_lifecycle_endpoints() {
    let server = MockServer::start().await;

    let order = serde_json::json!({
        "id": 31,
        "orderNo": "SO-31",
        "storeId": 1,
        "totalAmount": "7.00",
        "orderStatus": 1
    });

    Mock::given(method("POST"))
        .and(path("/api/v1/orders"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(order.clone())))
        .mount(&server)
        .await;

    let mut cancelled = order.clone();
    cancelled["orderStatus"] = serde_json::json!(4);
    Mock::given(method("PUT"))
        .and(path("/api/v1/orders/31/status"))
        .and(body_json(serde_json::json!({ "status": 4 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(cancelled)))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/v1/orders/31/pay"))
        .and(body_json(serde_json::json!({ "paymentMethod": 2, "paymentChannel": "wechat" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(serde_json::json!({
            "orderId": 31, "orderStatus": 2, "paymentMethod": 2
        }))))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let created = client
        .create_order(&NewOrder {
            store_id: 1,
            items: vec![OrderLine {
                product_id: 1,
                quantity: 2,
                price: None,
                total: None,
            }],
            payment_method: 2,
            pickup_time: "2024-05-01T09:30:00".to_string(),
            remarks: None,
        })
        .await
        .expect("order creation should succeed");
    assert_eq!(created.order_status, OrderStatus::Pending);

    let receipt = client
        .pay_order(31, 2, "wechat")
        .await
        .expect("payment should succeed");
    assert_eq!(receipt.order_status, OrderStatus::Processing);

    let updated = client
        .update_order_status(31, OrderStatus::Cancelled)
        .await
        .expect("status update should succeed");
    assert_eq!(updated.order_status, OrderStatus::Cancelled);
}

#[tokio::test]
async fn recommendations_post_parameters_as_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/recommend/products"))
        .and(body_json(serde_json::json!({ "customerId": 9, "limit": 3 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(serde_json::json!([{
            "product": { "id": 1, "name": "Latte", "price": "3.50" },
            "reason": "Popular this week",
            "score": 0.92,
            "tags": ["hot"]
        }]))))
        .mount(&server)
        .await;

    let query = RecommendQuery {
        customer_id: Some(9),
        limit: Some(3),
        store_id: None,
    };
    let recs = test_client(&server.uri())
        .recommendations(&query)
        .await
        .expect("recommendations should parse");

    assert_eq!(recs.len(), 1);
    assert_eq!(recs[0].product.name, "Latte");
    assert_eq!(recs[0].tags, vec!["hot".to_string()]);
}

#[tokio::test]
async fn refresh_accepts_access_token_field() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/refresh"))
        .and(body_json(serde_json::json!({ "refreshToken": "r-1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(serde_json::json!({
            "accessToken": "tok-2",
            "refreshToken": "r-2"
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let pair = test_client(&server.uri())
        .refresh_token("r-1")
        .await
        .expect("refresh should succeed");
    assert_eq!(pair.token, "tok-2");
    assert_eq!(pair.refresh_token.as_deref(), Some("r-2"));
}

#[tokio::test]
async fn cancel_order_sends_reason_only_when_given() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/orders/12/cancel"))
        .and(body_json(serde_json::json!({ "cancelReason": "changed my mind" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(serde_json::json!({
            "orderId": 12,
            "orderStatus": 4,
            "reason": "changed my mind"
        }))))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/orders/13/cancel"))
        .and(body_json(serde_json::json!({})))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(serde_json::json!({
            "orderId": 13,
            "orderStatus": 4
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let with_reason = client
        .cancel_order(12, Some("changed my mind"))
        .await
        .expect("cancel should succeed");
    assert_eq!(with_reason.order_status, OrderStatus::Cancelled);
    assert_eq!(with_reason.reason.as_deref(), Some("changed my mind"));

    let without_reason = client.cancel_order(13, None).await.expect("cancel should succeed");
    assert_eq!(without_reason.order_id, 13);
    assert!(without_reason.reason.is_none());
}

#[tokio::test]
async fn unreachable_server_is_a_network_error() {
    // Port 9 (discard) is closed on test hosts; the connect fails fast.
    let client = ApiClient::new("http://127.0.0.1:9/api/v1", 2, "brewline-test/0.1")
        .expect("client construction should not fail");
    let err = client.categories().await.expect_err("nothing is listening");
    assert!(err.is_network());
}
