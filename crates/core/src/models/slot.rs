use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    errors::{BookingError, BookingResult},
    time_range::TimeRange,
};

/// A sellable window on a court for one date, cut into fixed-width units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotTemplate {
    pub court_id: Uuid,
    pub date: NaiveDate,
    pub range: TimeRange,
    pub unit_duration_minutes: u32,
    pub unit_price: Decimal,
}

impl SlotTemplate {
    pub fn validate(&self) -> BookingResult<()> {
        if self.unit_duration_minutes == 0 {
            return Err(BookingError::InvalidTemplate(
                "unit duration must be positive".to_string(),
            ));
        }
        if self.unit_price < Decimal::ZERO {
            return Err(BookingError::InvalidTemplate(format!(
                "unit price {} is negative",
                self.unit_price
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSlotTemplateRequest {
    pub date: NaiveDate,
    pub range: TimeRange,
    pub unit_duration_minutes: u32,
    pub unit_price: Decimal,
}

impl CreateSlotTemplateRequest {
    pub fn into_template(self, court_id: Uuid) -> SlotTemplate {
        SlotTemplate {
            court_id,
            date: self.date,
            range: self.range,
            unit_duration_minutes: self.unit_duration_minutes,
            unit_price: self.unit_price,
        }
    }
}

/// One bookable unit. Derived on every query, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailableUnit {
    pub court_id: Uuid,
    pub date: NaiveDate,
    pub range: TimeRange,
    pub unit_price: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityResponse {
    pub court_id: Uuid,
    pub date: NaiveDate,
    pub units: Vec<AvailableUnit>,
    pub free_ranges: Vec<TimeRange>,
}
