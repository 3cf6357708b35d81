//! # Checkout Handlers
//!
//! Thin wrappers over the session's `CheckoutCoordinator`. Collaborator
//! failures come back as `200 OK` with a `failed` `CheckoutResult`; only
//! misuse (empty cart, a second checkout, an unknown transaction) is an HTTP
//! error.

use axum::{extract::State, Json};
use courtside_core::checkout::{CheckoutResult, CheckoutState};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    middleware::{auth::AuthenticatedUser, error_handling::AppError},
    ApiState,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfirmPaymentRequest {
    pub transaction_id: String,
}

#[axum::debug_handler]
pub async fn get_status(
    State(state): State<Arc<ApiState>>,
    AuthenticatedUser(identity): AuthenticatedUser,
) -> Result<Json<CheckoutState>, AppError> {
    let session = state.session(&identity.user_id).await;
    let session = session.lock().await;

    Ok(Json(session.checkout.state().clone()))
}

/// Starts checkout of the caller's cart.
///
/// # Errors
///
/// * `BookingError::AlreadyInProgress` - `409 Conflict`
/// * `BookingError::Validation` - the cart is empty
#[axum::debug_handler]
pub async fn submit(
    State(state): State<Arc<ApiState>>,
    AuthenticatedUser(identity): AuthenticatedUser,
) -> Result<Json<CheckoutResult>, AppError> {
    let session = state.session(&identity.user_id).await;
    let mut session = session.lock().await;
    let session = &mut *session;

    let result = session.checkout.submit(&mut session.cart, &identity).await?;

    Ok(Json(result))
}

/// Called once the payment provider redirects back with a transaction id.
#[axum::debug_handler]
pub async fn confirm(
    State(state): State<Arc<ApiState>>,
    AuthenticatedUser(identity): AuthenticatedUser,
    Json(payload): Json<ConfirmPaymentRequest>,
) -> Result<Json<CheckoutResult>, AppError> {
    let session = state.session(&identity.user_id).await;
    let mut session = session.lock().await;
    let session = &mut *session;

    let result = session
        .checkout
        .confirm_payment(&payload.transaction_id, &mut session.cart, &identity)
        .await?;

    Ok(Json(result))
}

#[axum::debug_handler]
pub async fn cancel(
    State(state): State<Arc<ApiState>>,
    AuthenticatedUser(identity): AuthenticatedUser,
) -> Result<Json<CheckoutResult>, AppError> {
    let session = state.session(&identity.user_id).await;
    let mut session = session.lock().await;

    Ok(Json(session.checkout.cancel(&identity).await?))
}
