//! # Availability Handlers
//!
//! Availability is never stored. Every request reads the court's slot
//! templates and bookings for the date and recomputes the free units, so two
//! sessions looking at the same court always see the same grid.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::NaiveDate;
use courtside_core::{
    availability,
    models::{
        booking::BookedRange,
        slot::{AvailabilityResponse, AvailableUnit, SlotTemplate},
    },
    TimeRange,
};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::{middleware::error_handling::AppError, ApiState};

#[derive(Debug, Deserialize)]
pub struct DateQuery {
    pub date: NaiveDate,
}

/// Templates and bookings of a court on one date.
async fn court_day(
    state: &ApiState,
    court_id: Uuid,
    date: NaiveDate,
) -> Result<(Vec<SlotTemplate>, Vec<BookedRange>), AppError> {
    let templates = state.storage.list_slot_templates(court_id, date).await?;
    let booked = state.storage.list_booked_ranges(court_id, date).await?;
    Ok((templates, booked))
}

/// Free units of a court on one date, in start order.
pub(crate) async fn available_units(
    state: &ApiState,
    court_id: Uuid,
    date: NaiveDate,
) -> Result<Vec<AvailableUnit>, AppError> {
    let (templates, booked) = court_day(state, court_id, date).await?;

    Ok(availability::calculate_for_court(&templates, &booked)?)
}

/// Lists bookable units and the merged free time of a court.
///
/// # Endpoint
///
/// ```text
/// GET /api/courts/:id/availability?date=2026-10-18
/// ```
///
/// # Errors
///
/// * `BookingError::InvalidTemplate` - a stored template cannot be sliced
/// * `BookingError::Unavailable` - storage is temporarily unreachable
/// * `BookingError::Internal` - storage failed
#[axum::debug_handler]
pub async fn get_availability(
    State(state): State<Arc<ApiState>>,
    Path(court_id): Path<Uuid>,
    Query(query): Query<DateQuery>,
) -> Result<Json<AvailabilityResponse>, AppError> {
    let (templates, booked) = court_day(&state, court_id, query.date).await?;

    let units = availability::calculate_for_court(&templates, &booked)?;

    let mut free = Vec::new();
    for template in &templates {
        free.extend(availability::free_ranges(template, &booked)?);
    }

    Ok(Json(AvailabilityResponse {
        court_id,
        date: query.date,
        units,
        free_ranges: TimeRange::merge(&free),
    }))
}
