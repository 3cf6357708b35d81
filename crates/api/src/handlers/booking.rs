use axum::{extract::State, Json};
use courtside_core::{errors::BookingError, models::booking::Booking};
use std::sync::Arc;

use crate::{
    middleware::{auth::AuthenticatedUser, error_handling::AppError},
    ApiState,
};

/// The caller's bookings, most recent date first.
#[axum::debug_handler]
pub async fn list_bookings(
    State(state): State<Arc<ApiState>>,
    AuthenticatedUser(identity): AuthenticatedUser,
) -> Result<Json<Vec<Booking>>, AppError> {
    let rows = courtside_db::repositories::booking::get_bookings_by_user(
        &state.db_pool,
        &identity.user_id,
    )
    .await
    .map_err(BookingError::Database)?;

    let bookings = rows
        .into_iter()
        .map(Booking::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(bookings))
}
