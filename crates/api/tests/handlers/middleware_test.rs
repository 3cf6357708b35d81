use axum::http::StatusCode;
use chrono::Duration;
use courtside_api::middleware::{
    auth::{decode_identity, issue_token},
    error_handling::{map_error, AppError},
};
use courtside_core::{collaborators::CollaboratorError, errors::BookingError};
use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::test_utils::{TestContext, JWT_SECRET, USER};

#[rstest]
#[case(BookingError::NotFound("Court".to_string()), StatusCode::NOT_FOUND)]
#[case(BookingError::Validation("Invalid input".to_string()), StatusCode::BAD_REQUEST)]
#[case(BookingError::InvalidRange("10:00-09:00".to_string()), StatusCode::BAD_REQUEST)]
#[case(BookingError::InvalidTemplate("zero unit".to_string()), StatusCode::BAD_REQUEST)]
#[case(BookingError::InsufficientCoverage("gap at 07:00".to_string()), StatusCode::BAD_REQUEST)]
#[case(BookingError::AlreadyInProgress, StatusCode::CONFLICT)]
#[case(BookingError::InvalidState("nothing pending".to_string()), StatusCode::CONFLICT)]
#[case(BookingError::Authentication("Invalid token".to_string()), StatusCode::UNAUTHORIZED)]
#[case(BookingError::Authorization("not the owner".to_string()), StatusCode::FORBIDDEN)]
#[case(BookingError::Unavailable("pool timed out".to_string()), StatusCode::SERVICE_UNAVAILABLE)]
#[case(BookingError::Database(eyre::eyre!("Database error")), StatusCode::INTERNAL_SERVER_ERROR)]
fn test_error_status_mapping(#[case] error: BookingError, #[case] expected: StatusCode) {
    let response = map_error(error);

    assert_eq!(response.status(), expected);
}

#[test]
fn test_error_handling_internal() {
    let error = BookingError::Internal(Box::new(std::io::Error::new(
        std::io::ErrorKind::Other,
        "Internal error",
    )));

    let response = map_error(error);

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[rstest]
#[case(CollaboratorError::Transient("connection reset".to_string()), StatusCode::SERVICE_UNAVAILABLE)]
#[case(CollaboratorError::Conflict("already booked".to_string()), StatusCode::INTERNAL_SERVER_ERROR)]
#[case(CollaboratorError::Rejected("bad request".to_string()), StatusCode::INTERNAL_SERVER_ERROR)]
fn test_collaborator_error_status(#[case] error: CollaboratorError, #[case] expected: StatusCode) {
    assert_eq!(AppError::from(error).status(), expected);
}

#[test]
fn test_token_round_trip() {
    let token = issue_token(USER, JWT_SECRET, Duration::minutes(5)).unwrap();

    let identity = decode_identity(&token, JWT_SECRET).unwrap();

    assert_eq!(identity.user_id, USER);
    assert_eq!(identity.access_token, token);
}

#[test]
fn test_token_with_wrong_secret() {
    let token = issue_token(USER, "another-secret", Duration::minutes(5)).unwrap();

    assert!(matches!(
        decode_identity(&token, JWT_SECRET),
        Err(BookingError::Authentication(_))
    ));
}

#[test]
fn test_expired_token() {
    let token = issue_token(USER, JWT_SECRET, Duration::hours(-2)).unwrap();

    assert!(matches!(
        decode_identity(&token, JWT_SECRET),
        Err(BookingError::Authentication(_))
    ));
}

#[tokio::test]
async fn test_missing_bearer_token_is_unauthorized() {
    let server = TestContext::new().server();

    let response = server.get("/api/cart").await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    let body = response.json::<serde_json::Value>();
    assert_eq!(
        body["error"],
        "Authentication error: Missing bearer token"
    );
}

#[tokio::test]
async fn test_health_needs_no_token() {
    let server = TestContext::new().server();

    let response = server.get("/health").await;

    response.assert_status_ok();
    assert_eq!(response.json::<serde_json::Value>()["status"], "ok");
}
