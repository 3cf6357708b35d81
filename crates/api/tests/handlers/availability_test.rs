use axum::http::StatusCode;
use courtside_core::{
    collaborators::CollaboratorError,
    models::slot::AvailabilityResponse,
    TimeRange,
};
use pretty_assertions::assert_eq;

use crate::test_utils::{booked, date, morning_template, TestContext};

fn ranges(windows: &[&str]) -> Vec<TimeRange> {
    windows.iter().map(|w| w.parse().unwrap()).collect()
}

#[tokio::test]
async fn test_availability_excludes_booked_units() {
    let ctx = TestContext::new();
    let court_id = ctx.court_id;
    let server = ctx
        .with_availability(morning_template(court_id), vec![booked(court_id, "07:00-08:00")])
        .server();

    let response = server
        .get(&format!("/api/courts/{court_id}/availability"))
        .add_query_param("date", date())
        .await;

    response.assert_status_ok();
    let body = response.json::<AvailabilityResponse>();
    assert_eq!(body.court_id, court_id);
    assert_eq!(body.date, date());
    assert_eq!(
        body.units.iter().map(|unit| unit.range).collect::<Vec<_>>(),
        ranges(&["06:00-07:00", "08:00-09:00", "09:00-10:00"])
    );
    assert_eq!(body.free_ranges, ranges(&["06:00-07:00", "08:00-10:00"]));
}

#[tokio::test]
async fn test_availability_without_templates_is_empty() {
    let mut ctx = TestContext::new();
    let court_id = ctx.court_id;
    ctx.storage
        .expect_list_slot_templates()
        .returning(|_, _| Ok(Vec::new()));
    ctx.storage
        .expect_list_booked_ranges()
        .returning(|_, _| Ok(Vec::new()));
    let server = ctx.server();

    let response = server
        .get(&format!("/api/courts/{court_id}/availability"))
        .add_query_param("date", date())
        .await;

    response.assert_status_ok();
    let body = response.json::<AvailabilityResponse>();
    assert!(body.units.is_empty());
    assert!(body.free_ranges.is_empty());
}

#[tokio::test]
async fn test_availability_with_invalid_template() {
    let ctx = TestContext::new();
    let court_id = ctx.court_id;
    let mut template = morning_template(court_id);
    template.unit_duration_minutes = 0;
    let server = ctx.with_availability(template, Vec::new()).server();

    let response = server
        .get(&format!("/api/courts/{court_id}/availability"))
        .add_query_param("date", date())
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_availability_storage_outage_is_unavailable() {
    let mut ctx = TestContext::new();
    let court_id = ctx.court_id;
    ctx.storage
        .expect_list_slot_templates()
        .returning(|_, _| Err(CollaboratorError::Transient("pool timed out".to_string())));
    let server = ctx.server();

    let response = server
        .get(&format!("/api/courts/{court_id}/availability"))
        .add_query_param("date", date())
        .await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(
        response.json::<serde_json::Value>()["error"],
        "Service temporarily unavailable: pool timed out"
    );
}

#[tokio::test]
async fn test_availability_storage_rejection_is_internal() {
    let mut ctx = TestContext::new();
    let court_id = ctx.court_id;
    ctx.storage
        .expect_list_slot_templates()
        .returning(|_, _| Err(CollaboratorError::Rejected("column does not exist".to_string())));
    let server = ctx.server();

    let response = server
        .get(&format!("/api/courts/{court_id}/availability"))
        .add_query_param("date", date())
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_availability_requires_date() {
    let ctx = TestContext::new();
    let court_id = ctx.court_id;
    let server = ctx.server();

    let response = server
        .get(&format!("/api/courts/{court_id}/availability"))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}
