//! End-to-end checkout flow tests
//!
//! Runs the real router against an in-memory database and a fake payment
//! provider. No network, no disk.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use tower::ServiceExt;

use checkout_server::core::{Config, ServerState, build_app};
use checkout_server::db::DbService;
use checkout_server::db::models::{
    MenuItem, MenuItemCreate, OrderCreate, OrderItemSnapshot, Store, StoreCreate,
};
use checkout_server::db::repository::{MenuItemRepository, OrderRepository, StoreRepository};
use checkout_server::payment::{
    CheckoutSession, CreateSessionRequest, PaymentError, PaymentProvider,
};

// =============================================================================
// Test harness
// =============================================================================

/// Records session requests; fails on demand
#[derive(Default)]
struct FakeProvider {
    requests: Mutex<Vec<CreateSessionRequest>>,
    fail: AtomicBool,
    counter: AtomicU64,
}

impl FakeProvider {
    fn recorded(&self) -> Vec<CreateSessionRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn fail_next(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl PaymentProvider for FakeProvider {
    async fn create_checkout_session(
        &self,
        request: &CreateSessionRequest,
    ) -> Result<CheckoutSession, PaymentError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(PaymentError::Network("connection refused".into()));
        }
        self.requests.lock().unwrap().push(request.clone());
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(CheckoutSession {
            id: format!("cs_test_{}", n),
            url: format!("https://checkout.stripe.test/c/cs_test_{}", n),
        })
    }
}

fn test_config() -> Config {
    Config {
        work_dir: String::new(),
        http_port: 0,
        environment: "test".into(),
        frontend_url: "https://shop.test".into(),
        stripe_secret_key: String::new(),
        stripe_api_base: String::new(),
    }
}

struct TestApp {
    app: Router,
    db: Surreal<Db>,
    provider: Arc<FakeProvider>,
}

async fn test_app() -> TestApp {
    let db_service = DbService::new_memory().await.expect("in-memory db");
    let db = db_service.db.clone();
    let provider = Arc::new(FakeProvider::default());
    let state = ServerState::new(test_config(), db.clone(), provider.clone());
    TestApp {
        app: build_app().with_state(state),
        db,
        provider,
    }
}

async fn seed_store(db: &Surreal<Db>, name: &str) -> Store {
    StoreRepository::new(db.clone())
        .create(StoreCreate { name: name.into() })
        .await
        .expect("seed store")
}

async fn seed_item(
    db: &Surreal<Db>,
    store: &Store,
    name: &str,
    price_cents: i64,
    is_available: bool,
) -> MenuItem {
    MenuItemRepository::new(db.clone())
        .create(MenuItemCreate {
            store: store.id.clone().unwrap(),
            name: name.into(),
            description: None,
            price_cents,
            cost_cents: price_cents / 3,
            is_available,
        })
        .await
        .expect("seed menu item")
}

fn item_id(item: &MenuItem) -> String {
    item.id.clone().unwrap().to_string()
}

fn store_id(store: &Store) -> String {
    store.id.clone().unwrap().to_string()
}

fn checkout_body(store: &Store, cart: Value, tip_cents: i64) -> Value {
    json!({
        "storeId": store_id(store),
        "cartItems": cart,
        "phoneE164": "+14155552671",
        "consentCall": true,
        "consentSms": false,
        "tipCents": tip_cents,
    })
}

async fn post_checkout(app: &Router, body: Value) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/checkout-session")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

async fn order_count(db: &Surreal<Db>) -> i64 {
    OrderRepository::new(db.clone()).count().await.unwrap()
}

// =============================================================================
// Happy path
// =============================================================================

#[tokio::test]
async fn checkout_creates_order_and_session() {
    let t = test_app().await;
    let store = seed_store(&t.db, "Test Kitchen").await;
    let item = seed_item(&t.db, &store, "Pad Thai", 1000, true).await;

    let body = checkout_body(
        &store,
        json!([{"menuItemId": item_id(&item), "quantity": 2}]),
        0,
    );
    let (status, response) = post_checkout(&t.app, body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["sessionId"], "cs_test_1");
    assert_eq!(
        response["sessionUrl"],
        "https://checkout.stripe.test/c/cs_test_1"
    );

    // Order persisted with computed totals and the session linked
    let order_id = response["orderId"].as_str().unwrap();
    let repo = OrderRepository::new(t.db.clone());
    let order = repo.find_by_id(order_id).await.unwrap().unwrap();

    assert_eq!(order.order_number, 1);
    assert_eq!(order.subtotal_cents, 2000);
    assert_eq!(order.tax_cents, 0);
    assert_eq!(order.tip_cents, 0);
    assert_eq!(order.total_cents, 2000);
    assert_eq!(order.currency, "usd");
    assert_eq!(order.customer_phone_e164, "+14155552671");
    assert!(order.consent_call);
    assert!(!order.consent_sms);
    assert_eq!(order.checkout_session_id.as_deref(), Some("cs_test_1"));

    // One item snapshot, copied from the menu at purchase time
    let items = repo.find_items(order.id.as_ref().unwrap()).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].name_snapshot, "Pad Thai");
    assert_eq!(items[0].price_cents_snapshot, 1000);
    assert_eq!(items[0].quantity, 2);

    // Session requested with one line item: unit 1000, qty 2
    let requests = t.provider.recorded();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].line_items.len(), 1);
    assert_eq!(requests[0].line_items[0].unit_amount_cents, 1000);
    assert_eq!(requests[0].line_items[0].quantity, 2);
}

// The creation transaction collapses to one result slot (the RETURN value);
// the repository must hand back the committed order, not a phantom failure
#[tokio::test]
async fn create_with_items_returns_the_committed_order() {
    let t = test_app().await;
    let store = seed_store(&t.db, "Test Kitchen").await;
    let item = seed_item(&t.db, &store, "Dumplings", 800, true).await;

    let repo = OrderRepository::new(t.db.clone());
    let order = repo
        .create_with_items(
            OrderCreate {
                store: store.id.clone().unwrap(),
                customer_phone_e164: "+14155552671".into(),
                consent_call: false,
                consent_sms: false,
                subtotal_cents: 1600,
                tax_cents: 0,
                tip_cents: 0,
                total_cents: 1600,
                currency: "usd".into(),
            },
            vec![OrderItemSnapshot {
                menu_item: item.id.clone().unwrap(),
                name_snapshot: "Dumplings".into(),
                price_cents_snapshot: 800,
                cost_cents_snapshot: 266,
                quantity: 2,
            }],
        )
        .await
        .expect("creation returns the committed order");

    assert!(order.id.is_some());
    assert_eq!(order.order_number, 1);
    assert_eq!(order.total_cents, 1600);
    assert!(order.checkout_session_id.is_none());

    let items = repo.find_items(order.id.as_ref().unwrap()).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].quantity, 2);
}

#[tokio::test]
async fn session_request_carries_redirects_and_metadata() {
    let t = test_app().await;
    let store = seed_store(&t.db, "Test Kitchen").await;
    let item = seed_item(&t.db, &store, "Soup", 600, true).await;

    let body = checkout_body(
        &store,
        json!([{"menuItemId": item_id(&item), "quantity": 1}]),
        0,
    );
    let (status, response) = post_checkout(&t.app, body).await;
    assert_eq!(status, StatusCode::OK);

    let order_id = response["orderId"].as_str().unwrap();
    let request = &t.provider.recorded()[0];

    assert_eq!(
        request.success_url,
        "https://shop.test/success?session_id={CHECKOUT_SESSION_ID}"
    );
    assert_eq!(
        request.cancel_url,
        format!("https://shop.test/cancel?order_id={}", order_id)
    );
    assert_eq!(request.order_id, order_id);
    assert_eq!(request.store_id, store_id(&store));
}

#[tokio::test]
async fn order_numbers_are_sequential_per_store() {
    let t = test_app().await;
    let store = seed_store(&t.db, "Busy Kitchen").await;
    let other = seed_store(&t.db, "Quiet Kitchen").await;
    let item = seed_item(&t.db, &store, "Burger", 900, true).await;
    let other_item = seed_item(&t.db, &other, "Salad", 700, true).await;

    for expected in 1..=3 {
        let body = checkout_body(
            &store,
            json!([{"menuItemId": item_id(&item), "quantity": 1}]),
            0,
        );
        let (status, response) = post_checkout(&t.app, body).await;
        assert_eq!(status, StatusCode::OK);

        let order = OrderRepository::new(t.db.clone())
            .find_by_id(response["orderId"].as_str().unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(order.order_number, expected);
    }

    // Other stores keep their own sequence
    let body = checkout_body(
        &other,
        json!([{"menuItemId": item_id(&other_item), "quantity": 1}]),
        0,
    );
    let (status, response) = post_checkout(&t.app, body).await;
    assert_eq!(status, StatusCode::OK);

    let order = OrderRepository::new(t.db.clone())
        .find_by_id(response["orderId"].as_str().unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(order.order_number, 1);

    let repo = OrderRepository::new(t.db.clone());
    assert_eq!(
        repo.last_order_number(store.id.clone().unwrap())
            .await
            .unwrap(),
        3
    );
}

#[tokio::test]
async fn tip_is_last_line_item_at_tip_amount() {
    let t = test_app().await;
    let store = seed_store(&t.db, "Test Kitchen").await;
    let item = seed_item(&t.db, &store, "Noodles", 1200, true).await;

    let body = checkout_body(
        &store,
        json!([{"menuItemId": item_id(&item), "quantity": 1}]),
        500,
    );
    let (status, response) = post_checkout(&t.app, body).await;
    assert_eq!(status, StatusCode::OK);

    let request = &t.provider.recorded()[0];
    let tip = request.line_items.last().unwrap();
    assert_eq!(tip.name, "Tip");
    assert_eq!(tip.unit_amount_cents, 500);
    assert_eq!(tip.quantity, 1);

    let order = OrderRepository::new(t.db.clone())
        .find_by_id(response["orderId"].as_str().unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(order.tip_cents, 500);
    assert_eq!(order.total_cents, 1700);
}

// =============================================================================
// Failure paths
// =============================================================================

#[tokio::test]
async fn unknown_store_is_404_and_no_order_is_written() {
    let t = test_app().await;
    seed_store(&t.db, "Test Kitchen").await;

    let body = json!({
        "storeId": "store:missing",
        "cartItems": [{"menuItemId": "menu_item:m1", "quantity": 1}],
        "phoneE164": "+14155552671",
        "consentCall": false,
        "consentSms": false,
        "tipCents": 0,
    });
    let (status, response) = post_checkout(&t.app, body).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(response["error"], "Store not found");
    assert_eq!(order_count(&t.db).await, 0);
    assert!(t.provider.recorded().is_empty());
}

#[tokio::test]
async fn unavailable_item_is_400_and_no_order_is_written() {
    let t = test_app().await;
    let store = seed_store(&t.db, "Test Kitchen").await;
    let sold_out = seed_item(&t.db, &store, "Special", 1500, false).await;

    let body = checkout_body(
        &store,
        json!([{"menuItemId": item_id(&sold_out), "quantity": 1}]),
        0,
    );
    let (status, response) = post_checkout(&t.app, body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"], "Some items are not available");
    assert_eq!(order_count(&t.db).await, 0);
}

#[tokio::test]
async fn foreign_store_item_is_400() {
    let t = test_app().await;
    let store = seed_store(&t.db, "Test Kitchen").await;
    let other = seed_store(&t.db, "Other Kitchen").await;
    let foreign = seed_item(&t.db, &other, "Foreign Dish", 800, true).await;

    let body = checkout_body(
        &store,
        json!([{"menuItemId": item_id(&foreign), "quantity": 1}]),
        0,
    );
    let (status, _) = post_checkout(&t.app, body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(order_count(&t.db).await, 0);
}

#[tokio::test]
async fn semantic_validation_failures_are_400_with_details() {
    let t = test_app().await;
    let store = seed_store(&t.db, "Test Kitchen").await;
    let item = seed_item(&t.db, &store, "Rice", 400, true).await;

    // Empty cart + bad phone + negative tip, all reported together
    let body = json!({
        "storeId": store_id(&store),
        "cartItems": [],
        "phoneE164": "0123",
        "consentCall": false,
        "consentSms": false,
        "tipCents": -5,
    });
    let (status, response) = post_checkout(&t.app, body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"], "Invalid request data");
    let details = response["details"].as_array().unwrap();
    assert_eq!(details.len(), 3);

    // Zero quantity
    let body = checkout_body(
        &store,
        json!([{"menuItemId": item_id(&item), "quantity": 0}]),
        0,
    );
    let (status, response) = post_checkout(&t.app, body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"], "Invalid request data");

    assert_eq!(order_count(&t.db).await, 0);
}

#[tokio::test]
async fn oversized_cart_is_rejected_before_any_lookup() {
    let t = test_app().await;
    let store = seed_store(&t.db, "Test Kitchen").await;
    let item = seed_item(&t.db, &store, "Rice", 400, true).await;

    let lines: Vec<Value> = (0..101)
        .map(|_| json!({"menuItemId": item_id(&item), "quantity": 1}))
        .collect();
    let (status, response) =
        post_checkout(&t.app, checkout_body(&store, Value::Array(lines), 0)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"], "Invalid request data");
    assert_eq!(order_count(&t.db).await, 0);
}

#[tokio::test]
async fn provider_failure_leaves_observable_orphan_order() {
    let t = test_app().await;
    let store = seed_store(&t.db, "Test Kitchen").await;
    let item = seed_item(&t.db, &store, "Curry", 1100, true).await;
    t.provider.fail_next();

    let body = checkout_body(
        &store,
        json!([{"menuItemId": item_id(&item), "quantity": 1}]),
        0,
    );
    let (status, response) = post_checkout(&t.app, body).await;

    // Caller sees only the generic failure
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response["error"], "Failed to create checkout session");

    // Operators see the orphan: order written, no session linked
    let repo = OrderRepository::new(t.db.clone());
    assert_eq!(order_count(&t.db).await, 1);
    let orphans = repo.find_without_session().await.unwrap();
    assert_eq!(orphans.len(), 1);
    assert!(orphans[0].checkout_session_id.is_none());
    assert_eq!(orphans[0].total_cents, 1100);
}

#[tokio::test]
async fn duplicate_cart_lines_for_one_item_are_rejected() {
    // Two cart lines for the same item resolve to one menu row; the count
    // check treats that as unavailable rather than guessing intent
    let t = test_app().await;
    let store = seed_store(&t.db, "Test Kitchen").await;
    let item = seed_item(&t.db, &store, "Tea", 300, true).await;

    let body = checkout_body(
        &store,
        json!([
            {"menuItemId": item_id(&item), "quantity": 1},
            {"menuItemId": item_id(&item), "quantity": 2},
        ]),
        0,
    );
    let (status, _) = post_checkout(&t.app, body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(order_count(&t.db).await, 0);
}

#[tokio::test]
async fn on_disk_database_opens_and_serves_reads() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("checkout.db");

    let service = DbService::new(&path.to_string_lossy())
        .await
        .expect("on-disk db");
    let store = seed_store(&service.db, "Persistent Kitchen").await;

    let found = StoreRepository::new(service.db.clone())
        .find(store.id.as_ref().unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.name, "Persistent Kitchen");
}

#[tokio::test]
async fn health_endpoint_reports_ok() {
    let t = test_app().await;
    let response = t
        .app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "ok");
}

// Multi-item cart pricing comes from the store of record, not the client
#[tokio::test]
async fn multi_item_cart_uses_authoritative_prices() {
    let t = test_app().await;
    let store = seed_store(&t.db, "Test Kitchen").await;
    let a = seed_item(&t.db, &store, "Spring Rolls", 450, true).await;
    let b = seed_item(&t.db, &store, "Green Curry", 1250, true).await;

    let body = checkout_body(
        &store,
        json!([
            {"menuItemId": item_id(&a), "quantity": 3},
            {"menuItemId": item_id(&b), "quantity": 1},
        ]),
        200,
    );
    let (status, response) = post_checkout(&t.app, body).await;
    assert_eq!(status, StatusCode::OK);

    let repo = OrderRepository::new(t.db.clone());
    let order = repo
        .find_by_id(response["orderId"].as_str().unwrap())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(order.subtotal_cents, 3 * 450 + 1250);
    assert_eq!(order.total_cents, order.subtotal_cents + 200);

    let items = repo.find_items(order.id.as_ref().unwrap()).await.unwrap();
    assert_eq!(items.len(), 2);

    // RecordId equality ties each snapshot back to its menu item
    let snap_a = items
        .iter()
        .find(|i| Some(&i.menu_item) == a.id.as_ref())
        .unwrap();
    assert_eq!(snap_a.price_cents_snapshot, 450);
    assert_eq!(snap_a.quantity, 3);
}
