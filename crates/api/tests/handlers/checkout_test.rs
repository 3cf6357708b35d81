use axum::http::StatusCode;
use axum_test::TestServer;
use chrono::Utc;
use courtside_api::handlers::cart::CartResponse;
use courtside_core::{
    checkout::{CheckoutResult, CheckoutStatus, FailureReason, PendingCheckout},
    collaborators::{CheckoutStore, CollaboratorError},
    mock::MockPayment,
    models::{
        booking::CreateBookingResponse,
        payment::{OrderConfirmation, PaymentOrder},
    },
};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use serde_json::json;
use uuid::Uuid;

use crate::test_utils::{bearer, date, morning_template, TestContext, USER};

const ORDER: &str = "order-42";

async fn fill_cart(server: &TestServer, court_id: Uuid) {
    let (name, value) = bearer(USER);
    server
        .post("/api/cart/items")
        .add_header(name, value)
        .json(&json!({
            "court_id": court_id,
            "date": date(),
            "start": "06:00",
            "duration_minutes": 60,
        }))
        .await
        .assert_status_ok();
}

fn paying_context(confirmed: bool) -> TestContext {
    let mut ctx = TestContext::new();
    let template = morning_template(ctx.court_id);
    let mut payment = MockPayment::new();
    payment.expect_create_order().returning(|_, _| {
        Ok(PaymentOrder {
            order_id: ORDER.to_string(),
            redirect_url: Some(format!("https://pay.example.com/{ORDER}")),
        })
    });
    payment
        .expect_confirm_order()
        .withf(|order_id, _| order_id.to_string() == ORDER)
        .returning(move |_, _| {
            Ok(OrderConfirmation {
                success: confirmed,
                reason: (!confirmed).then(|| "Card declined".to_string()),
            })
        });
    ctx.payment = Some(payment);
    ctx.with_availability(template, Vec::new())
}

#[tokio::test]
async fn test_direct_checkout_commits_cart() {
    let mut ctx = TestContext::new();
    let court_id = ctx.court_id;
    let booking_id = Uuid::new_v4();
    ctx.storage
        .expect_create_booking()
        .withf(move |request, identity| {
            request.court_id == court_id && request.user_id == USER && identity.user_id == USER
        })
        .times(1)
        .returning(move |_, _| Ok(CreateBookingResponse { booking_id }));
    let server = ctx.with_availability(morning_template(court_id), Vec::new()).server();
    fill_cart(&server, court_id).await;
    let (name, value) = bearer(USER);

    let result = server
        .post("/api/checkout")
        .add_header(name.clone(), value.clone())
        .await
        .json::<CheckoutResult>();

    assert_eq!(result.status, CheckoutStatus::Success);
    assert_eq!(result.booking_ids, vec![booking_id]);
    let cart = server
        .get("/api/cart")
        .add_header(name.clone(), value.clone())
        .await
        .json::<CartResponse>();
    assert!(cart.items.is_empty());

    let status = server
        .get("/api/checkout")
        .add_header(name, value)
        .await
        .json::<serde_json::Value>();
    assert_eq!(status["state"], "done");
}

#[tokio::test]
async fn test_checkout_of_empty_cart() {
    let server = TestContext::new().server();
    let (name, value) = bearer(USER);

    server
        .post("/api/checkout")
        .add_header(name, value)
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_conflict_is_reported_in_result() {
    let mut ctx = TestContext::new();
    let court_id = ctx.court_id;
    ctx.storage.expect_create_booking().returning(|_, _| {
        Err(CollaboratorError::Conflict("06:00-07:00 is taken".to_string()))
    });
    let server = ctx.with_availability(morning_template(court_id), Vec::new()).server();
    fill_cart(&server, court_id).await;
    let (name, value) = bearer(USER);

    let response = server.post("/api/checkout").add_header(name.clone(), value.clone()).await;

    response.assert_status_ok();
    let result = response.json::<CheckoutResult>();
    assert_eq!(result.status, CheckoutStatus::Failed);
    let failure = result.error.unwrap();
    assert_eq!(failure.reason, FailureReason::SlotNoLongerAvailable);
    assert!(!failure.retryable);

    let cart = server
        .get("/api/cart")
        .add_header(name, value)
        .await
        .json::<CartResponse>();
    assert_eq!(cart.items.len(), 1);
}

#[tokio::test]
async fn test_payment_flow() {
    let mut ctx = paying_context(true);
    let court_id = ctx.court_id;
    let store = ctx.store.clone();
    let booking_id = Uuid::new_v4();
    ctx.storage
        .expect_create_booking()
        .times(1)
        .returning(move |_, _| Ok(CreateBookingResponse { booking_id }));
    let server = ctx.server();
    fill_cart(&server, court_id).await;
    let (name, value) = bearer(USER);

    let pending = server
        .post("/api/checkout")
        .add_header(name.clone(), value.clone())
        .await
        .json::<CheckoutResult>();
    assert_eq!(pending.status, CheckoutStatus::Pending);
    assert_eq!(
        pending.payment_redirect.as_deref(),
        Some("https://pay.example.com/order-42")
    );
    assert_eq!(store.load(USER).await.unwrap().unwrap().order_id, ORDER);

    server
        .post("/api/checkout")
        .add_header(name.clone(), value.clone())
        .await
        .assert_status(StatusCode::CONFLICT);
    server
        .delete("/api/cart")
        .add_header(name.clone(), value.clone())
        .await
        .assert_status(StatusCode::CONFLICT);
    server
        .post("/api/cart/items")
        .add_header(name.clone(), value.clone())
        .json(&json!({
            "court_id": court_id,
            "date": date(),
            "start": "08:00",
            "duration_minutes": 60,
        }))
        .await
        .assert_status(StatusCode::CONFLICT);
    server
        .post("/api/checkout/confirm")
        .add_header(name.clone(), value.clone())
        .json(&json!({ "transaction_id": "order-7" }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    let result = server
        .post("/api/checkout/confirm")
        .add_header(name, value)
        .json(&json!({ "transaction_id": ORDER }))
        .await
        .json::<CheckoutResult>();

    assert_eq!(result.status, CheckoutStatus::Success);
    assert_eq!(result.booking_ids, vec![booking_id]);
    assert_eq!(store.load(USER).await.unwrap(), None);
}

#[tokio::test]
async fn test_declined_payment_keeps_cart() {
    let ctx = paying_context(false);
    let court_id = ctx.court_id;
    let store = ctx.store.clone();
    let server = ctx.server();
    fill_cart(&server, court_id).await;
    let (name, value) = bearer(USER);

    server
        .post("/api/checkout")
        .add_header(name.clone(), value.clone())
        .await
        .assert_status_ok();
    let result = server
        .post("/api/checkout/confirm")
        .add_header(name.clone(), value.clone())
        .json(&json!({ "transaction_id": ORDER }))
        .await
        .json::<CheckoutResult>();

    assert_eq!(result.status, CheckoutStatus::Failed);
    let failure = result.error.unwrap();
    assert_eq!(failure.reason, FailureReason::PaymentDeclined);
    assert_eq!(failure.message, "Card declined");
    assert_eq!(store.load(USER).await.unwrap(), None);

    let cart = server
        .get("/api/cart")
        .add_header(name, value)
        .await
        .json::<CartResponse>();
    assert_eq!(cart.items.len(), 1);
}

#[tokio::test]
async fn test_cancel_pending_checkout() {
    let ctx = paying_context(true);
    let court_id = ctx.court_id;
    let store = ctx.store.clone();
    let server = ctx.server();
    fill_cart(&server, court_id).await;
    let (name, value) = bearer(USER);

    server
        .post("/api/checkout")
        .add_header(name.clone(), value.clone())
        .await
        .assert_status_ok();
    let result = server
        .post("/api/checkout/cancel")
        .add_header(name.clone(), value.clone())
        .await
        .json::<CheckoutResult>();

    assert_eq!(result.status, CheckoutStatus::Failed);
    assert_eq!(result.error.unwrap().reason, FailureReason::Cancelled);
    assert_eq!(store.load(USER).await.unwrap(), None);

    server
        .post("/api/checkout/cancel")
        .add_header(name, value)
        .await
        .assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_confirm_without_pending_checkout() {
    let server = TestContext::new().server();
    let (name, value) = bearer(USER);

    server
        .post("/api/checkout/confirm")
        .add_header(name, value)
        .json(&json!({ "transaction_id": ORDER }))
        .await
        .assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_stored_checkout_blocks_cart_edits_until_cancelled() {
    let ctx = TestContext::new();
    let court_id = ctx.court_id;
    let store = ctx.store.clone();
    store
        .save(&PendingCheckout {
            order_id: ORDER.to_string(),
            user_id: USER.to_string(),
            items: Vec::new(),
            amount: Decimal::new(50000, 2),
            payment_confirmed: false,
            committed: Vec::new(),
            created_at: Utc::now(),
        })
        .await
        .unwrap();
    let server = ctx.with_availability(morning_template(court_id), Vec::new()).server();
    let (name, value) = bearer(USER);
    let request = json!({
        "court_id": court_id,
        "date": date(),
        "start": "06:00",
        "duration_minutes": 60,
    });

    server
        .post("/api/cart/items")
        .add_header(name.clone(), value.clone())
        .json(&request)
        .await
        .assert_status(StatusCode::CONFLICT);
    server
        .delete(&format!("/api/cart/items/{}", Uuid::new_v4()))
        .add_header(name.clone(), value.clone())
        .await
        .assert_status(StatusCode::CONFLICT);
    server
        .delete("/api/cart")
        .add_header(name.clone(), value.clone())
        .await
        .assert_status(StatusCode::CONFLICT);

    let result = server
        .post("/api/checkout/cancel")
        .add_header(name.clone(), value.clone())
        .await
        .json::<CheckoutResult>();
    assert_eq!(result.error.unwrap().reason, FailureReason::Cancelled);
    assert_eq!(store.load(USER).await.unwrap(), None);

    server
        .post("/api/cart/items")
        .add_header(name, value)
        .json(&request)
        .await
        .assert_status_ok();
}
