//! # Booking Cart
//!
//! A session's selections before checkout. The cart lives in memory only; it
//! is serializable so a caller can stash it across a payment redirect, but it
//! is never stored on its own.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    errors::{BookingError, BookingResult},
    models::{
        booking::CreateBookingRequest,
        payment::OrderItem,
        slot::AvailableUnit,
    },
    time_range::{TimeOfDay, TimeRange},
};

/// One selection: one or more contiguous units on a court for a date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: Uuid,
    pub court_id: Uuid,
    pub date: NaiveDate,
    pub range: TimeRange,
    pub total_price: Decimal,
}

impl CartItem {
    pub fn booking_request(&self, user_id: &str) -> CreateBookingRequest {
        CreateBookingRequest {
            court_id: self.court_id,
            date: self.date,
            range: self.range,
            price: self.total_price,
            user_id: user_id.to_string(),
        }
    }
}

impl From<&CartItem> for OrderItem {
    fn from(item: &CartItem) -> Self {
        Self {
            court_id: item.court_id,
            date: item.date,
            range: item.range,
            price: item.total_price,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookingCart {
    items: Vec<CartItem>,
}

impl BookingCart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Combines the contiguous units starting at `start` into one item
    /// covering `requested_duration_minutes`.
    ///
    /// `available` is the current availability for the court and date. The
    /// price is the sum of the covered units; when the duration is not a
    /// whole number of units the last one is prorated.
    pub fn add(
        &mut self,
        available: &[AvailableUnit],
        start: TimeOfDay,
        requested_duration_minutes: u32,
    ) -> BookingResult<CartItem> {
        if requested_duration_minutes == 0 {
            return Err(BookingError::Validation(
                "Requested duration must be positive".to_string(),
            ));
        }

        let first = available
            .iter()
            .find(|unit| unit.range.start() == start)
            .ok_or_else(|| {
                BookingError::InsufficientCoverage(format!("No available unit starts at {start}"))
            })?;
        let end = start.add_minutes(requested_duration_minutes).ok_or_else(|| {
            BookingError::InsufficientCoverage(format!(
                "{requested_duration_minutes} minutes from {start} runs past the end of the day"
            ))
        })?;

        let mut total_price = Decimal::ZERO;
        let mut current = first;
        loop {
            let unit = current.range;
            let used = end.seconds().min(unit.end().seconds()) - unit.start().seconds();
            total_price += current.unit_price * Decimal::from(used) / Decimal::from(unit.duration_seconds());

            if unit.end() >= end {
                break;
            }
            current = available
                .iter()
                .find(|next| {
                    next.court_id == first.court_id
                        && next.date == first.date
                        && next.range.start() == unit.end()
                })
                .ok_or_else(|| {
                    BookingError::InsufficientCoverage(format!(
                        "{requested_duration_minutes} minutes from {start} is not available: nothing free at {}",
                        unit.end()
                    ))
                })?;
        }

        let range = TimeRange::new(start, end)?;
        if let Some(existing) = self.items.iter().find(|item| {
            item.court_id == first.court_id && item.date == first.date && item.range.overlaps(&range)
        }) {
            return Err(BookingError::Validation(format!(
                "{range} overlaps {} already in the cart",
                existing.range
            )));
        }

        let item = CartItem {
            id: Uuid::new_v4(),
            court_id: first.court_id,
            date: first.date,
            range,
            total_price: total_price.round_dp(2),
        };
        self.items.push(item.clone());
        Ok(item)
    }

    /// Removes an item; absent ids are ignored.
    pub fn remove(&mut self, item_id: Uuid) -> Option<CartItem> {
        let index = self.items.iter().position(|item| item.id == item_id)?;
        Some(self.items.remove(index))
    }

    pub fn total(&self) -> Decimal {
        self.items.iter().map(|item| item.total_price).sum()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn get(&self, item_id: Uuid) -> Option<&CartItem> {
        self.items.iter().find(|item| item.id == item_id)
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
