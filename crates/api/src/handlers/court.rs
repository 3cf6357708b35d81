use axum::{
    extract::{Path, Query, State},
    Json,
};
use courtside_core::{
    errors::BookingError,
    models::{
        court::{Court, CourtResponse, CreateCourtRequest},
        slot::{CreateSlotTemplateRequest, SlotTemplate},
    },
};
use courtside_db::models::range_to_columns;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::{
    handlers::availability::DateQuery,
    middleware::{auth::AuthenticatedUser, error_handling::AppError},
    ApiState,
};

async fn find_court(state: &ApiState, id: Uuid) -> Result<Court, AppError> {
    let db_court = courtside_db::repositories::court::get_court_by_id(&state.db_pool, id)
        .await
        .map_err(BookingError::Database)?
        .ok_or_else(|| BookingError::NotFound(format!("Court with ID {} not found", id)))?;

    Ok(Court::try_from(db_court)?)
}

#[axum::debug_handler]
pub async fn create_court(
    State(state): State<Arc<ApiState>>,
    AuthenticatedUser(identity): AuthenticatedUser,
    Json(payload): Json<CreateCourtRequest>,
) -> Result<Json<CourtResponse>, AppError> {
    if payload.name.trim().is_empty() || payload.venue.trim().is_empty() {
        return Err(AppError(BookingError::Validation(
            "Court name and venue are required".to_string(),
        )));
    }

    let db_court = courtside_db::repositories::court::create_court(
        &state.db_pool,
        &identity.user_id,
        payload.name.trim(),
        payload.venue.trim(),
        payload.sport.as_str(),
    )
    .await
    .map_err(BookingError::Database)?;

    info!("User {} listed court {}", identity.user_id, db_court.id);
    Ok(Json(Court::try_from(db_court)?.into()))
}

#[axum::debug_handler]
pub async fn get_court(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<CourtResponse>, AppError> {
    Ok(Json(find_court(&state, id).await?.into()))
}

/// Publishes a slot template on a court the caller owns. The template is
/// validated before it is stored.
#[axum::debug_handler]
pub async fn create_template(
    State(state): State<Arc<ApiState>>,
    AuthenticatedUser(identity): AuthenticatedUser,
    Path(court_id): Path<Uuid>,
    Json(payload): Json<CreateSlotTemplateRequest>,
) -> Result<Json<SlotTemplate>, AppError> {
    let template = payload.into_template(court_id);
    template.validate()?;
    let unit_duration_minutes = i32::try_from(template.unit_duration_minutes).map_err(|_| {
        BookingError::InvalidTemplate("unit duration is too long".to_string())
    })?;
    find_court(&state, court_id)
        .await?
        .ensure_owned_by(&identity.user_id)?;

    let (start_seconds, end_seconds) = range_to_columns(&template.range);
    let db_template = courtside_db::repositories::slot_template::create_slot_template(
        &state.db_pool,
        court_id,
        template.date,
        start_seconds,
        end_seconds,
        unit_duration_minutes,
        template.unit_price,
    )
    .await
    .map_err(BookingError::Database)?;

    Ok(Json(SlotTemplate::try_from(db_template)?))
}

#[axum::debug_handler]
pub async fn list_templates(
    State(state): State<Arc<ApiState>>,
    Path(court_id): Path<Uuid>,
    Query(query): Query<DateQuery>,
) -> Result<Json<Vec<SlotTemplate>>, AppError> {
    Ok(Json(
        state.storage.list_slot_templates(court_id, query.date).await?,
    ))
}
