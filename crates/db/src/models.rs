use chrono::{DateTime, NaiveDate, Utc};
use courtside_core::{
    errors::{BookingError, BookingResult},
    models::{
        booking::{BookedRange, Booking},
        court::Court,
        slot::SlotTemplate,
    },
    TimeOfDay, TimeRange,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbCourt {
    pub id: Uuid,
    pub owner_id: String,
    pub name: String,
    pub venue: String,
    pub sport: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbSlotTemplate {
    pub id: Uuid,
    pub court_id: Uuid,
    pub template_date: NaiveDate,
    pub start_seconds: i32,
    pub end_seconds: i32,
    pub unit_duration_minutes: i32,
    pub unit_price: Decimal,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbBooking {
    pub id: Uuid,
    pub court_id: Uuid,
    pub user_id: String,
    pub booking_date: NaiveDate,
    pub start_seconds: i32,
    pub end_seconds: i32,
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct DbPendingCheckout {
    pub user_id: String,
    pub order_id: String,
    pub payload: Json<serde_json::Value>,
    pub updated_at: DateTime<Utc>,
}

/// Column pair for a range. Both ends are at most 86 400 so they fit an `i32`.
pub fn range_to_columns(range: &TimeRange) -> (i32, i32) {
    (range.start().seconds() as i32, range.end().seconds() as i32)
}

pub fn range_from_columns(start_seconds: i32, end_seconds: i32) -> BookingResult<TimeRange> {
    let time = |seconds: i32| {
        u32::try_from(seconds)
            .map_err(|_| BookingError::InvalidRange(format!("negative time of day: {seconds}")))
            .and_then(TimeOfDay::from_seconds)
    };
    TimeRange::new(time(start_seconds)?, time(end_seconds)?)
}

impl TryFrom<DbCourt> for Court {
    type Error = BookingError;

    fn try_from(row: DbCourt) -> Result<Self, Self::Error> {
        Ok(Court {
            id: row.id,
            owner_id: row.owner_id,
            sport: row.sport.parse()?,
            name: row.name,
            venue: row.venue,
            created_at: row.created_at,
        })
    }
}

impl TryFrom<DbSlotTemplate> for SlotTemplate {
    type Error = BookingError;

    fn try_from(row: DbSlotTemplate) -> Result<Self, Self::Error> {
        let unit_duration_minutes = u32::try_from(row.unit_duration_minutes).map_err(|_| {
            BookingError::InvalidTemplate(format!(
                "template {} has unit duration {}",
                row.id, row.unit_duration_minutes
            ))
        })?;

        Ok(SlotTemplate {
            court_id: row.court_id,
            date: row.template_date,
            range: range_from_columns(row.start_seconds, row.end_seconds)?,
            unit_duration_minutes,
            unit_price: row.unit_price,
        })
    }
}

impl TryFrom<&DbBooking> for BookedRange {
    type Error = BookingError;

    fn try_from(row: &DbBooking) -> Result<Self, Self::Error> {
        Ok(BookedRange {
            court_id: row.court_id,
            date: row.booking_date,
            range: range_from_columns(row.start_seconds, row.end_seconds)?,
        })
    }
}

impl TryFrom<DbBooking> for Booking {
    type Error = BookingError;

    fn try_from(row: DbBooking) -> Result<Self, Self::Error> {
        Ok(Booking {
            id: row.id,
            court_id: row.court_id,
            range: range_from_columns(row.start_seconds, row.end_seconds)?,
            user_id: row.user_id,
            date: row.booking_date,
            price: row.price,
            created_at: row.created_at,
        })
    }
}
