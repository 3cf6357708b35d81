//! PostgreSQL-backed collaborators for the booking core.

use async_trait::async_trait;
use chrono::NaiveDate;
use courtside_core::{
    checkout::PendingCheckout,
    collaborators::{BookingStorage, CheckoutStore, CollaboratorError, Identity},
    models::{
        booking::{BookedRange, CreateBookingRequest, CreateBookingResponse},
        slot::SlotTemplate,
    },
};
use tracing::warn;
use uuid::Uuid;

use crate::{
    models::{range_from_columns, range_to_columns},
    repositories::{
        self,
        booking::CreateBookingOutcome,
    },
    DbPool,
};

/// Pool and I/O failures are worth retrying; everything else is not.
pub fn classify_error(err: &eyre::Report) -> CollaboratorError {
    match err.downcast_ref::<sqlx::Error>() {
        Some(sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_)) => {
            CollaboratorError::Transient(err.to_string())
        }
        _ => CollaboratorError::Rejected(err.to_string()),
    }
}

fn corrupt_row(err: impl std::fmt::Display) -> CollaboratorError {
    CollaboratorError::Rejected(format!("Stored row is invalid: {err}"))
}

#[derive(Debug, Clone)]
pub struct PgBookingStorage {
    pool: DbPool,
}

impl PgBookingStorage {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingStorage for PgBookingStorage {
    async fn list_slot_templates(
        &self,
        court_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<SlotTemplate>, CollaboratorError> {
        let rows = repositories::slot_template::get_slot_templates(&self.pool, court_id, date)
            .await
            .map_err(|e| classify_error(&e))?;

        rows.into_iter()
            .map(SlotTemplate::try_from)
            .collect::<Result<_, _>>()
            .map_err(corrupt_row)
    }

    async fn list_booked_ranges(
        &self,
        court_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<BookedRange>, CollaboratorError> {
        let rows = repositories::booking::get_bookings_for_court(&self.pool, court_id, date)
            .await
            .map_err(|e| classify_error(&e))?;

        rows.iter()
            .map(BookedRange::try_from)
            .collect::<Result<_, _>>()
            .map_err(corrupt_row)
    }

    async fn create_booking(
        &self,
        request: &CreateBookingRequest,
        identity: &Identity,
    ) -> Result<CreateBookingResponse, CollaboratorError> {
        if request.user_id != identity.user_id {
            return Err(CollaboratorError::Rejected(format!(
                "User {} cannot book on behalf of {}",
                identity.user_id, request.user_id
            )));
        }

        let (start_seconds, end_seconds) = range_to_columns(&request.range);
        let outcome = repositories::booking::create_booking(
            &self.pool,
            request.court_id,
            &request.user_id,
            request.date,
            start_seconds,
            end_seconds,
            request.price,
        )
        .await
        .map_err(|e| classify_error(&e))?;

        match outcome {
            CreateBookingOutcome::Created(booking) => Ok(CreateBookingResponse {
                booking_id: booking.id,
            }),
            CreateBookingOutcome::Overlaps(existing) => {
                let taken = range_from_columns(existing.start_seconds, existing.end_seconds)
                    .map(|range| range.to_string())
                    .unwrap_or_else(|_| "an existing booking".to_string());
                Err(CollaboratorError::Conflict(format!(
                    "{} on {} is no longer available: overlaps {}",
                    request.range, request.date, taken
                )))
            }
        }
    }
}

/// Keeps each user's in-flight checkout in `pending_checkouts`.
#[derive(Debug, Clone)]
pub struct PgCheckoutStore {
    pool: DbPool,
}

impl PgCheckoutStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CheckoutStore for PgCheckoutStore {
    async fn save(&self, pending: &PendingCheckout) -> Result<(), CollaboratorError> {
        let payload = serde_json::to_value(pending)
            .map_err(|e| CollaboratorError::Rejected(format!("Cannot encode checkout: {e}")))?;

        repositories::pending_checkout::upsert_pending_checkout(
            &self.pool,
            &pending.user_id,
            &pending.order_id,
            payload,
        )
        .await
        .map_err(|e| classify_error(&e))?;

        Ok(())
    }

    async fn load(&self, user_id: &str) -> Result<Option<PendingCheckout>, CollaboratorError> {
        let Some(row) = repositories::pending_checkout::get_pending_checkout(&self.pool, user_id)
            .await
            .map_err(|e| classify_error(&e))?
        else {
            return Ok(None);
        };

        match serde_json::from_value(row.payload.0) {
            Ok(pending) => Ok(Some(pending)),
            Err(err) => {
                warn!("Dropping unreadable pending checkout of user {}: {}", user_id, err);
                self.clear(user_id).await?;
                Ok(None)
            }
        }
    }

    async fn clear(&self, user_id: &str) -> Result<(), CollaboratorError> {
        repositories::pending_checkout::delete_pending_checkout(&self.pool, user_id)
            .await
            .map_err(|e| classify_error(&e))
    }
}
