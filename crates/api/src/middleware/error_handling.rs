//! # Error Handling Middleware
//!
//! Maps booking errors to HTTP status codes and a JSON `{ "error": ... }`
//! body, so every handler reports failures the same way.
//!
//! Checkout failures reported by collaborators are not errors at this layer;
//! handlers return them inside a `CheckoutResult`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use courtside_core::{collaborators::CollaboratorError, errors::BookingError};
use serde_json::json;
use tracing::error;

/// Application error wrapper that provides HTTP status code mapping
///
/// # Example
///
/// ```
/// use axum::Json;
/// use courtside_api::middleware::error_handling::AppError;
/// use courtside_core::errors::BookingError;
///
/// async fn handler(found: bool) -> Result<Json<&'static str>, AppError> {
///     if !found {
///         return Err(AppError(BookingError::NotFound("court".to_string())));
///     }
///     Ok(Json("ok"))
/// }
/// # fn main() {}
/// ```
#[derive(Debug)]
pub struct AppError(pub BookingError);

impl AppError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            BookingError::InvalidRange(_)
            | BookingError::InvalidTemplate(_)
            | BookingError::InsufficientCoverage(_)
            | BookingError::Validation(_) => StatusCode::BAD_REQUEST,
            BookingError::AlreadyInProgress | BookingError::InvalidState(_) => StatusCode::CONFLICT,
            BookingError::NotFound(_) => StatusCode::NOT_FOUND,
            BookingError::Authentication(_) => StatusCode::UNAUTHORIZED,
            BookingError::Authorization(_) => StatusCode::FORBIDDEN,
            BookingError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            BookingError::Database(_) | BookingError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {}", self.0);
        }

        let body = Json(json!({ "error": self.0.to_string() }));
        (status, body).into_response()
    }
}

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        AppError(err)
    }
}

impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(BookingError::Database(err))
    }
}

/// Collaborator failures outside a checkout, e.g. while reading availability.
/// Retryable ones map to 503.
impl From<CollaboratorError> for AppError {
    fn from(err: CollaboratorError) -> Self {
        match err {
            CollaboratorError::Transient(message) => AppError(BookingError::Unavailable(message)),
            other => AppError(BookingError::Internal(Box::new(other))),
        }
    }
}

pub fn map_error(err: BookingError) -> Response {
    AppError(err).into_response()
}
