use axum::{
    extract::{Path, State},
    Json,
};
use chrono::NaiveDate;
use courtside_core::{
    cart::{BookingCart, CartItem},
    errors::BookingError,
    TimeOfDay,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::{
    handlers::availability::available_units,
    middleware::{auth::AuthenticatedUser, error_handling::AppError},
    session::Session,
    ApiState,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddCartItemRequest {
    pub court_id: Uuid,
    pub date: NaiveDate,
    pub start: TimeOfDay,
    pub duration_minutes: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartResponse {
    pub items: Vec<CartItem>,
    pub total: rust_decimal::Decimal,
}

impl From<&BookingCart> for CartResponse {
    fn from(cart: &BookingCart) -> Self {
        Self {
            items: cart.items().to_vec(),
            total: cart.total(),
        }
    }
}

/// Cart edits are refused while a checkout is live in this session or
/// recorded in the checkout store, e.g. by a process that since restarted.
async fn ensure_not_checking_out(
    state: &ApiState,
    user_id: &str,
    session: &Session,
) -> Result<(), AppError> {
    if session.checkout.state().is_in_progress()
        || state.checkout_store.load(user_id).await?.is_some()
    {
        return Err(AppError(BookingError::AlreadyInProgress));
    }
    Ok(())
}

#[axum::debug_handler]
pub async fn get_cart(
    State(state): State<Arc<ApiState>>,
    AuthenticatedUser(identity): AuthenticatedUser,
) -> Result<Json<CartResponse>, AppError> {
    let session = state.session(&identity.user_id).await;
    let session = session.lock().await;

    Ok(Json(CartResponse::from(&session.cart)))
}

/// Adds `duration_minutes` starting at `start` against live availability.
#[axum::debug_handler]
pub async fn add_item(
    State(state): State<Arc<ApiState>>,
    AuthenticatedUser(identity): AuthenticatedUser,
    Json(payload): Json<AddCartItemRequest>,
) -> Result<Json<CartItem>, AppError> {
    let session = state.session(&identity.user_id).await;
    let mut session = session.lock().await;
    ensure_not_checking_out(&state, &identity.user_id, &session).await?;

    let available = available_units(&state, payload.court_id, payload.date).await?;
    let item = session
        .cart
        .add(&available, payload.start, payload.duration_minutes)?;

    Ok(Json(item))
}

#[axum::debug_handler]
pub async fn remove_item(
    State(state): State<Arc<ApiState>>,
    AuthenticatedUser(identity): AuthenticatedUser,
    Path(item_id): Path<Uuid>,
) -> Result<Json<CartResponse>, AppError> {
    let session = state.session(&identity.user_id).await;
    let mut session = session.lock().await;
    ensure_not_checking_out(&state, &identity.user_id, &session).await?;

    if session.cart.remove(item_id).is_none() {
        debug!("Cart item {} already gone", item_id);
    }

    Ok(Json(CartResponse::from(&session.cart)))
}

#[axum::debug_handler]
pub async fn clear_cart(
    State(state): State<Arc<ApiState>>,
    AuthenticatedUser(identity): AuthenticatedUser,
) -> Result<Json<CartResponse>, AppError> {
    let session = state.session(&identity.user_id).await;
    let mut session = session.lock().await;
    ensure_not_checking_out(&state, &identity.user_id, &session).await?;

    session.cart.clear();

    Ok(Json(CartResponse::from(&session.cart)))
}
