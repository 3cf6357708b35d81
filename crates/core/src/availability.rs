//! # Slot Availability
//!
//! Turns a court's slot templates and its already-booked ranges into the units
//! a user can still book.
//!
//! For one template the calculation:
//!
//! 1. Validates the template (positive unit width, non-negative price)
//! 2. Walks from the template start in steps of the unit width, stopping once
//!    the next step would run past the template end (a partial remainder is
//!    never offered)
//! 3. Drops every unit that overlaps a booked range for the same court and
//!    date; units that only touch a booking are kept
//!
//! Booked ranges come from an external source and may overlap each other;
//! nothing here assumes otherwise.

use tracing::debug;

use crate::{
    errors::BookingResult,
    models::{
        booking::BookedRange,
        slot::{AvailableUnit, SlotTemplate},
    },
    time_range::TimeRange,
};

/// Bookable units for a single template, in chronological order.
pub fn calculate(template: &SlotTemplate, booked: &[BookedRange]) -> BookingResult<Vec<AvailableUnit>> {
    template.validate()?;
    let taken = booked_for(template, booked);

    let mut units = Vec::new();
    let mut cursor = template.range.start();
    while let Some(next) = cursor.add_minutes(template.unit_duration_minutes) {
        if next > template.range.end() {
            break;
        }

        let range = TimeRange::new(cursor, next)?;
        if !taken.iter().any(|booking| booking.overlaps(&range)) {
            units.push(AvailableUnit {
                court_id: template.court_id,
                date: template.date,
                range,
                unit_price: template.unit_price,
            });
        }
        cursor = next;
    }

    debug!(
        "Template {} on {} for court {}: {} units free, {} bookings considered",
        template.range,
        template.date,
        template.court_id,
        units.len(),
        taken.len()
    );

    Ok(units)
}

/// Units across every template of one court and date.
///
/// Sorted by time. When two templates produce the same range, the unit from
/// the earlier template is kept.
pub fn calculate_for_court(
    templates: &[SlotTemplate],
    booked: &[BookedRange],
) -> BookingResult<Vec<AvailableUnit>> {
    let mut units = Vec::new();
    for template in templates {
        units.extend(calculate(template, booked)?);
    }

    units.sort_by_key(|unit| unit.range);
    units.dedup_by(|later, earlier| later.range == earlier.range);

    Ok(units)
}

/// Maximal free stretches of a template, ignoring unit boundaries.
pub fn free_ranges(template: &SlotTemplate, booked: &[BookedRange]) -> BookingResult<Vec<TimeRange>> {
    template.validate()?;
    Ok(template.range.subtract(&booked_for(template, booked)))
}

fn booked_for(template: &SlotTemplate, booked: &[BookedRange]) -> Vec<TimeRange> {
    booked
        .iter()
        .filter(|booking| booking.court_id == template.court_id && booking.date == template.date)
        .map(|booking| booking.range)
        .collect()
}
