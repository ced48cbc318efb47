//! Storefront operations against a mock backend

use std::sync::Arc;

use api_client::{ApiClient, TracingNavigator};
use serde_json::json;
use session_store::MemorySessionStore;
use storefront::{
    Cart, CheckoutError, Company, Item, ItemDraft, ItemError, ShippingAddress, ShippingStatus,
    Storefront,
};
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn storefront(server: &MockServer) -> Storefront {
    let client = ApiClient::builder()
        .base_url(format!("{}/api/v1/", server.uri()))
        .refresh_url(format!("{}/api/v1/auth/refresh", server.uri()))
        .store(Arc::new(MemorySessionStore::with_access_token("abc123")))
        .navigator(Arc::new(TracingNavigator))
        .build()
        .unwrap();
    Storefront::new(client)
}

fn ok(result: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({"status": "ok", "result": result}))
}

fn address() -> ShippingAddress {
    ShippingAddress {
        street: "1 Main St".into(),
        city: "Springfield".into(),
        state: "IL".into(),
        zip_code: "62701".into(),
        country: "US".into(),
    }
}

fn pen() -> Item {
    Item {
        id: 1,
        item_name: "Pen".into(),
        price: 2.5,
        description: None,
        item_type_id: Some(3),
        type_name: Some("stationery".into()),
        stock_quantity: Some(10),
        reorder_level: Some(2),
        availability_status: Some("in_stock".into()),
    }
}

#[tokio::test]
async fn list_items_flattens_nested_result() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/item"))
        .and(header("authorization", "Bearer abc123"))
        .respond_with(ok(json!([[
            {"id": 1, "item_name": "Pen", "price": "2.50", "stock_quantity": 10},
            {"id": 2, "item_name": "Ink", "price": 4, "stock_quantity": 0}
        ]])))
        .expect(1)
        .mount(&server)
        .await;

    let items = storefront(&server).await.list_items().await.unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].price, 2.5);
    assert_eq!(items[1].item_name, "Ink");
}

#[tokio::test]
async fn non_array_item_result_is_empty_catalog() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/item"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
        .expect(1)
        .mount(&server)
        .await;

    let items = storefront(&server).await.list_items().await.unwrap();
    assert!(items.is_empty());
}

#[tokio::test]
async fn invalid_draft_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ok(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let err = storefront(&server)
        .await
        .create_item(&ItemDraft::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ItemError::Invalid(_)), "got {err:?}");
}

#[tokio::test]
async fn update_item_sends_type_id() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/v1/item/1"))
        .and(body_partial_json(json!({"item_type_id": 3, "stock_quantity": 10})))
        .respond_with(ok(json!({"id": 1})))
        .expect(1)
        .mount(&server)
        .await;

    let draft = ItemDraft::from_item(&pen());
    let result = storefront(&server)
        .await
        .update_item(1, &draft)
        .await
        .unwrap();
    assert_eq!(result["id"], 1);
}

#[tokio::test]
async fn list_shipments_reads_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/shipping"))
        .respond_with(ok(json!([
            {"id": 1, "purchase_id": 10, "shipping_status": "delivered", "tracking_number": "TRK1"}
        ])))
        .mount(&server)
        .await;

    let shipments = storefront(&server).await.list_shipments().await.unwrap();
    assert_eq!(shipments[0].shipping_status, ShippingStatus::Delivered);
}

#[tokio::test]
async fn company_search_passes_name() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/companies/search"))
        .and(query_param("name", "Tech"))
        .respond_with(ok(json!([
            {"id": 1, "name": "Tech Corp", "email": "contact@techcorp.com", "phone": "123-456-7890"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let found = storefront(&server)
        .await
        .search_companies("Tech")
        .await
        .unwrap();
    assert_eq!(
        found,
        vec![Company {
            id: Some(1),
            name: "Tech Corp".into(),
            email: "contact@techcorp.com".into(),
            phone: Some("123-456-7890".into()),
            address: None,
        }]
    );
}

#[tokio::test]
async fn checkout_creates_purchase_then_shipment() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/purchases"))
        .and(body_partial_json(json!({
            "purchase": {"customer_id": 2, "status": "pending", "total_amount": 5.0,
                         "shipping_address": "1 Main St, Springfield, IL, 62701, US"},
            "items": [{"item_id": 1, "quantity": 2, "unit_price": 2.5, "subtotal": 5.0}]
        })))
        .respond_with(ok(json!({"purchaseId": 42})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/shipping"))
        .and(body_partial_json(json!({"purchase_id": 42, "shipping_status": "pending"})))
        .respond_with(ok(json!({"id": 7})))
        .expect(1)
        .mount(&server)
        .await;

    let mut cart = Cart::new();
    cart.add(&pen(), 2);
    let receipt = storefront(&server)
        .await
        .checkout(&cart, &address(), 2)
        .await
        .unwrap();

    assert_eq!(receipt.purchase_id, Some(42));
    assert_eq!(receipt.total, 5.0);
    assert!(receipt.shipment_created);
}

#[tokio::test]
async fn shipment_failure_does_not_fail_checkout() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/purchases"))
        .respond_with(ok(json!({"id": 8})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/shipping"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({"status": "error", "message": "bad date"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut cart = Cart::new();
    cart.add(&pen(), 1);
    let receipt = storefront(&server)
        .await
        .checkout(&cart, &address(), 2)
        .await
        .unwrap();

    assert_eq!(receipt.purchase_id, Some(8));
    assert!(!receipt.shipment_created);
}

#[tokio::test]
async fn missing_purchase_id_skips_shipment() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/purchases"))
        .respond_with(ok(json!({})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/shipping"))
        .respond_with(ok(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let mut cart = Cart::new();
    cart.add(&pen(), 1);
    let receipt = storefront(&server)
        .await
        .checkout(&cart, &address(), 2)
        .await
        .unwrap();
    assert_eq!(receipt.purchase_id, None);
    assert!(!receipt.shipment_created);
}

#[tokio::test]
async fn checkout_rejects_empty_cart_and_incomplete_address() {
    let server = MockServer::start().await;
    let store = storefront(&server).await;

    let err = store
        .checkout(&Cart::new(), &address(), 2)
        .await
        .unwrap_err();
    assert!(matches!(err, CheckoutError::EmptyCart));

    let mut cart = Cart::new();
    cart.add(&pen(), 1);
    let err = store
        .checkout(&cart, &ShippingAddress::default(), 2)
        .await
        .unwrap_err();
    assert!(matches!(err, CheckoutError::IncompleteAddress));
}

#[tokio::test]
async fn failed_purchase_is_an_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/purchases"))
        .respond_with(
            ResponseTemplate::new(409)
                .set_body_json(json!({"status": "error", "message": "insufficient stock"})),
        )
        .mount(&server)
        .await;

    let mut cart = Cart::new();
    cart.add(&pen(), 1);
    let err = storefront(&server)
        .await
        .checkout(&cart, &address(), 2)
        .await
        .unwrap_err();
    match err {
        CheckoutError::Api(api) => {
            assert_eq!(api.application_payload().unwrap()["message"], "insufficient stock");
        }
        other => panic!("expected api error, got {other:?}"),
    }
}
