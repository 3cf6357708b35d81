use axum::http::StatusCode;
use courtside_api::handlers::cart::CartResponse;
use courtside_core::cart::CartItem;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use serde_json::json;
use uuid::Uuid;

use crate::test_utils::{bearer, booked, date, morning_template, TestContext, USER};

fn add_request(court_id: Uuid, start: &str, duration_minutes: u32) -> serde_json::Value {
    json!({
        "court_id": court_id,
        "date": date(),
        "start": start,
        "duration_minutes": duration_minutes,
    })
}

#[tokio::test]
async fn test_add_item_prorates_partial_unit() {
    let ctx = TestContext::new();
    let court_id = ctx.court_id;
    let server = ctx.with_availability(morning_template(court_id), Vec::new()).server();
    let (name, value) = bearer(USER);

    let response = server
        .post("/api/cart/items")
        .add_header(name.clone(), value.clone())
        .json(&add_request(court_id, "06:00", 90))
        .await;

    response.assert_status_ok();
    let item = response.json::<CartItem>();
    assert_eq!(item.range, "06:00-07:30".parse().unwrap());
    assert_eq!(item.total_price, Decimal::new(75000, 2));

    let cart = server
        .get("/api/cart")
        .add_header(name, value)
        .await
        .json::<CartResponse>();
    assert_eq!(cart.items, vec![item]);
    assert_eq!(cart.total, Decimal::new(75000, 2));
}

#[tokio::test]
async fn test_add_item_across_booked_gap() {
    let ctx = TestContext::new();
    let court_id = ctx.court_id;
    let server = ctx
        .with_availability(morning_template(court_id), vec![booked(court_id, "07:00-08:00")])
        .server();
    let (name, value) = bearer(USER);

    let response = server
        .post("/api/cart/items")
        .add_header(name, value)
        .json(&add_request(court_id, "06:00", 120))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_add_overlapping_item() {
    let ctx = TestContext::new();
    let court_id = ctx.court_id;
    let server = ctx.with_availability(morning_template(court_id), Vec::new()).server();
    let (name, value) = bearer(USER);

    server
        .post("/api/cart/items")
        .add_header(name.clone(), value.clone())
        .json(&add_request(court_id, "06:00", 120))
        .await
        .assert_status_ok();
    let response = server
        .post("/api/cart/items")
        .add_header(name, value)
        .json(&add_request(court_id, "07:00", 60))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_carts_are_per_user() {
    let ctx = TestContext::new();
    let court_id = ctx.court_id;
    let server = ctx.with_availability(morning_template(court_id), Vec::new()).server();
    let (name, value) = bearer(USER);
    let (other_name, other_value) = bearer("player-2");

    server
        .post("/api/cart/items")
        .add_header(name, value)
        .json(&add_request(court_id, "09:00", 60))
        .await
        .assert_status_ok();

    let cart = server
        .get("/api/cart")
        .add_header(other_name, other_value)
        .await
        .json::<CartResponse>();
    assert!(cart.items.is_empty());
    assert_eq!(cart.total, Decimal::ZERO);
}

#[tokio::test]
async fn test_remove_and_clear() {
    let ctx = TestContext::new();
    let court_id = ctx.court_id;
    let server = ctx.with_availability(morning_template(court_id), Vec::new()).server();
    let (name, value) = bearer(USER);

    let first = server
        .post("/api/cart/items")
        .add_header(name.clone(), value.clone())
        .json(&add_request(court_id, "06:00", 60))
        .await
        .json::<CartItem>();
    server
        .post("/api/cart/items")
        .add_header(name.clone(), value.clone())
        .json(&add_request(court_id, "08:00", 60))
        .await
        .assert_status_ok();

    let cart = server
        .delete(&format!("/api/cart/items/{}", first.id))
        .add_header(name.clone(), value.clone())
        .await
        .json::<CartResponse>();
    assert_eq!(cart.items.len(), 1);
    assert_eq!(cart.items[0].range, "08:00-09:00".parse().unwrap());

    let again = server
        .delete(&format!("/api/cart/items/{}", first.id))
        .add_header(name.clone(), value.clone())
        .await;
    again.assert_status_ok();
    assert_eq!(again.json::<CartResponse>(), cart);

    let cart = server
        .delete("/api/cart")
        .add_header(name, value)
        .await
        .json::<CartResponse>();
    assert!(cart.items.is_empty());
}
