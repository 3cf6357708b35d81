use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::time_range::TimeRange;

/// A reservation the storage backend has already committed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookedRange {
    pub court_id: Uuid,
    pub date: NaiveDate,
    pub range: TimeRange,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub court_id: Uuid,
    pub user_id: String,
    pub date: NaiveDate,
    pub range: TimeRange,
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateBookingRequest {
    pub court_id: Uuid,
    pub date: NaiveDate,
    pub range: TimeRange,
    pub price: Decimal,
    pub user_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBookingResponse {
    pub booking_id: Uuid,
}
