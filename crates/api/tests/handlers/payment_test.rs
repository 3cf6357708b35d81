use courtside_api::payment::status_error;
use courtside_core::collaborators::CollaboratorError;
use pretty_assertions::assert_eq;
use reqwest::StatusCode;
use rstest::rstest;

#[rstest]
#[case(StatusCode::INTERNAL_SERVER_ERROR, true)]
#[case(StatusCode::BAD_GATEWAY, true)]
#[case(StatusCode::TOO_MANY_REQUESTS, true)]
#[case(StatusCode::BAD_REQUEST, false)]
#[case(StatusCode::UNAUTHORIZED, false)]
#[case(StatusCode::CONFLICT, false)]
fn test_status_retryability(#[case] status: StatusCode, #[case] retryable: bool) {
    assert_eq!(status_error(status, String::new()).is_retryable(), retryable);
}

#[test]
fn test_conflict_status() {
    let err = status_error(StatusCode::CONFLICT, "order already captured".to_string());

    assert_eq!(
        err,
        CollaboratorError::Conflict(
            "Payment provider answered 409 Conflict: order already captured".to_string()
        )
    );
}

#[test]
fn test_rejection_without_body() {
    let err = status_error(StatusCode::NOT_FOUND, String::new());

    assert_eq!(
        err,
        CollaboratorError::Rejected("Payment provider answered 404 Not Found".to_string())
    );
}
