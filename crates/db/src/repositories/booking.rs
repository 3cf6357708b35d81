use crate::models::DbBooking;
use chrono::{NaiveDate, Utc};
use eyre::{eyre, Result};
use rust_decimal::Decimal;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

#[derive(Debug)]
pub enum CreateBookingOutcome {
    Created(DbBooking),
    /// An existing booking overlaps the requested range; nothing was written.
    Overlaps(DbBooking),
}

/// Inserts a booking unless it overlaps an existing one on the same court and
/// date.
///
/// The court row is locked for the duration of the transaction so concurrent
/// writers for one court are serialized and cannot both pass the overlap
/// check.
pub async fn create_booking(
    pool: &Pool<Postgres>,
    court_id: Uuid,
    user_id: &str,
    booking_date: NaiveDate,
    start_seconds: i32,
    end_seconds: i32,
    price: Decimal,
) -> Result<CreateBookingOutcome> {
    let mut tx = pool.begin().await?;

    let court = sqlx::query_scalar::<_, Uuid>(
        r#"
        SELECT id FROM courts WHERE id = $1 FOR UPDATE
        "#,
    )
    .bind(court_id)
    .fetch_optional(&mut *tx)
    .await?;

    if court.is_none() {
        return Err(eyre!("Court {} not found", court_id));
    }

    let existing = sqlx::query_as::<_, DbBooking>(
        r#"
        SELECT id, court_id, user_id, booking_date, start_seconds, end_seconds, price, created_at
        FROM bookings
        WHERE court_id = $1 AND booking_date = $2 AND start_seconds < $4 AND $3 < end_seconds
        LIMIT 1
        "#,
    )
    .bind(court_id)
    .bind(booking_date)
    .bind(start_seconds)
    .bind(end_seconds)
    .fetch_optional(&mut *tx)
    .await?;

    if let Some(existing) = existing {
        tracing::debug!(
            "Booking on court {} at {}..{} overlaps booking {}",
            court_id, start_seconds, end_seconds, existing.id
        );
        tx.rollback().await?;
        return Ok(CreateBookingOutcome::Overlaps(existing));
    }

    let booking = sqlx::query_as::<_, DbBooking>(
        r#"
        INSERT INTO bookings (id, court_id, user_id, booking_date, start_seconds, end_seconds, price, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING id, court_id, user_id, booking_date, start_seconds, end_seconds, price, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(court_id)
    .bind(user_id)
    .bind(booking_date)
    .bind(start_seconds)
    .bind(end_seconds)
    .bind(price)
    .bind(Utc::now())
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::debug!("Booking created: id={}, court={}", booking.id, court_id);
    Ok(CreateBookingOutcome::Created(booking))
}

pub async fn get_bookings_for_court(
    pool: &Pool<Postgres>,
    court_id: Uuid,
    booking_date: NaiveDate,
) -> Result<Vec<DbBooking>> {
    let bookings = sqlx::query_as::<_, DbBooking>(
        r#"
        SELECT id, court_id, user_id, booking_date, start_seconds, end_seconds, price, created_at
        FROM bookings
        WHERE court_id = $1 AND booking_date = $2
        ORDER BY start_seconds ASC
        "#,
    )
    .bind(court_id)
    .bind(booking_date)
    .fetch_all(pool)
    .await?;

    Ok(bookings)
}

pub async fn get_bookings_by_user(pool: &Pool<Postgres>, user_id: &str) -> Result<Vec<DbBooking>> {
    let bookings = sqlx::query_as::<_, DbBooking>(
        r#"
        SELECT id, court_id, user_id, booking_date, start_seconds, end_seconds, price, created_at
        FROM bookings
        WHERE user_id = $1
        ORDER BY booking_date DESC, start_seconds ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(bookings)
}
