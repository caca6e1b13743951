//! Payments service against a mocked orders peer.

mod common;

use bookstore::config::ServiceKind;
use common::{json, peers, start};
use serde_json::{json, Value};
use service_framework::mock::MockPeer;
use service_framework::ServiceServer;
use uuid::Uuid;

async fn start_payments(orders_url: &str) -> ServiceServer {
    start(
        ServiceKind::Payments,
        peers(&MockPeer::unreachable_url(), &MockPeer::unreachable_url(), orders_url),
    )
    .await
}

fn payment(order_id: i64, amount: Value) -> Value {
    json!({
        "order_id": order_id,
        "user_id": 1,
        "amount": amount,
        "payment_method": "CREDIT_CARD"
    })
}

async fn pay(base: &str, body: &Value) -> reqwest::Response {
    reqwest::Client::new()
        .post(format!("{base}/api/payments/"))
        .json(body)
        .send()
        .await
        .unwrap()
}

async fn payment_count(base: &str) -> usize {
    let response = reqwest::get(format!("{base}/api/payments/")).await.unwrap();
    json(response).await.as_array().unwrap().len()
}

#[tokio::test]
async fn test_matching_amount_completes_payment() {
    let orders = MockPeer::new("orders");
    orders.expect_get(3).return_ok(json!({ "id": 3, "total_amount": 19.98 }));
    let server = start_payments(&orders.base_url()).await;
    let base = server.base_url();

    let response = pay(&base, &payment(3, json!("19.98"))).await;
    assert_eq!(response.status(), 201);
    let body = json(response).await;
    assert_eq!(body["status"], "COMPLETED");
    assert_eq!(body["amount"], "19.98");
    assert_eq!(body["payment_method"], "CREDIT_CARD");
    let transaction_id = body["transaction_id"].as_str().unwrap();
    assert!(Uuid::parse_str(transaction_id).is_ok());

    orders.verify();
    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_amount_mismatch_writes_nothing() {
    let orders = MockPeer::new("orders");
    orders.expect_get(3).return_ok(json!({ "id": 3, "total_amount": 19.98 }));
    let server = start_payments(&orders.base_url()).await;
    let base = server.base_url();

    let response = pay(&base, &payment(3, json!(19.97))).await;
    assert_eq!(response.status(), 400);
    assert_eq!(
        json(response).await["error"],
        "Payment amount does not match order total"
    );
    assert_eq!(payment_count(&base).await, 0);
    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_null_amount_is_rejected_before_any_write() {
    let server = start_payments(&MockPeer::unreachable_url()).await;
    let base = server.base_url();

    let response = pay(&base, &payment(3, Value::Null)).await;
    assert_eq!(response.status(), 400);
    let body = json(response).await;
    assert_eq!(body["amount"], json!(["This field may not be null."]));
    assert_eq!(payment_count(&base).await, 0);

    let mut missing = payment(3, Value::Null);
    missing.as_object_mut().unwrap().remove("amount");
    let response = pay(&base, &missing).await;
    assert_eq!(response.status(), 400);
    assert!(json(response).await.get("amount").is_some());
    assert_eq!(payment_count(&base).await, 0);
    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_order_lookup_failures() {
    let orders = MockPeer::new("orders");
    orders.expect_get(3).return_status(404);
    let server = start_payments(&orders.base_url()).await;

    let missing = pay(&server.base_url(), &payment(3, json!(1))).await;
    assert_eq!(missing.status(), 404);
    assert_eq!(json(missing).await["error"], "Order 3 not found");
    server.shutdown().await.unwrap();

    let server = start_payments(&MockPeer::unreachable_url()).await;
    let down = pay(&server.base_url(), &payment(3, json!(1))).await;
    assert_eq!(down.status(), 503);
    assert_eq!(
        json(down).await["error"],
        "Unable to verify order. Orders service unavailable."
    );
    assert_eq!(payment_count(&server.base_url()).await, 0);
    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_refund_only_from_completed() {
    let orders = MockPeer::new("orders");
    orders.expect_get(3).return_ok(json!({ "id": 3, "total_amount": 5.0 }));
    let server = start_payments(&orders.base_url()).await;
    let base = server.base_url();
    let http = reqwest::Client::new();

    let created = json(pay(&base, &payment(3, json!(5))).await).await;
    let id = created["id"].as_i64().unwrap();
    let refund_url = format!("{base}/api/payments/{id}/refund/");

    let refunded = http.post(&refund_url).send().await.unwrap();
    assert_eq!(refunded.status(), 200);
    assert_eq!(json(refunded).await["status"], "REFUNDED");

    let again = http.post(&refund_url).send().await.unwrap();
    assert_eq!(again.status(), 400);
    assert_eq!(
        json(again).await["error"],
        "Only completed payments can be refunded"
    );

    let current = http.get(format!("{base}/api/payments/{id}/")).send().await.unwrap();
    assert_eq!(json(current).await["status"], "REFUNDED");

    let unknown = http
        .post(format!("{base}/api/payments/999/refund/"))
        .send()
        .await
        .unwrap();
    assert_eq!(unknown.status(), 404);
    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_pending_payment_cannot_be_refunded() {
    let orders = MockPeer::new("orders");
    orders.expect_get(3).return_ok(json!({ "id": 3, "total_amount": 5.0 }));
    let server = start_payments(&orders.base_url()).await;
    let base = server.base_url();
    let http = reqwest::Client::new();

    let id = json(pay(&base, &payment(3, json!(5))).await).await["id"]
        .as_i64()
        .unwrap();
    let patched = http
        .patch(format!("{base}/api/payments/{id}/"))
        .json(&json!({ "status": "PENDING" }))
        .send()
        .await
        .unwrap();
    assert_eq!(json(patched).await["status"], "PENDING");

    let refund = http
        .post(format!("{base}/api/payments/{id}/refund/"))
        .send()
        .await
        .unwrap();
    assert_eq!(refund.status(), 400);
    let current = http.get(format!("{base}/api/payments/{id}/")).send().await.unwrap();
    assert_eq!(json(current).await["status"], "PENDING");
    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_lookup_by_order_and_user() {
    let orders = MockPeer::new("orders");
    orders.expect_get(3).return_ok(json!({ "id": 3, "total_amount": 5.0 }));
    orders.expect_get(4).return_ok(json!({ "id": 4, "total_amount": 7.5 }));
    let server = start_payments(&orders.base_url()).await;
    let base = server.base_url();

    assert_eq!(pay(&base, &payment(3, json!(5))).await.status(), 201);
    let mut other = payment(4, json!("7.50"));
    other["user_id"] = json!(2);
    other["payment_method"] = json!("PAYPAL");
    assert_eq!(pay(&base, &other).await.status(), 201);

    let by_order = json(
        reqwest::get(format!("{base}/api/payments/by_order/?order_id=4"))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(by_order.as_array().unwrap().len(), 1);
    assert_eq!(by_order[0]["payment_method"], "PAYPAL");

    let by_user = json(
        reqwest::get(format!("{base}/api/payments/by_user/?user_id=1"))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(by_user.as_array().unwrap().len(), 1);
    assert_eq!(by_user[0]["order_id"], 3);

    let no_param = reqwest::get(format!("{base}/api/payments/by_order/")).await.unwrap();
    assert_eq!(no_param.status(), 400);
    assert_eq!(json(no_param).await["error"], "order_id parameter required");
    server.shutdown().await.unwrap();
}
