use crate::models::DbSlotTemplate;
use chrono::{NaiveDate, Utc};
use eyre::Result;
use rust_decimal::Decimal;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn create_slot_template(
    pool: &Pool<Postgres>,
    court_id: Uuid,
    template_date: NaiveDate,
    start_seconds: i32,
    end_seconds: i32,
    unit_duration_minutes: i32,
    unit_price: Decimal,
) -> Result<DbSlotTemplate> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!(
        "Creating slot template: id={}, court={}, date={}, unit={}min",
        id, court_id, template_date, unit_duration_minutes
    );

    let template = sqlx::query_as::<_, DbSlotTemplate>(
        r#"
        INSERT INTO slot_templates
            (id, court_id, template_date, start_seconds, end_seconds, unit_duration_minutes, unit_price, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING id, court_id, template_date, start_seconds, end_seconds, unit_duration_minutes, unit_price, created_at
        "#,
    )
    .bind(id)
    .bind(court_id)
    .bind(template_date)
    .bind(start_seconds)
    .bind(end_seconds)
    .bind(unit_duration_minutes)
    .bind(unit_price)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(template)
}

pub async fn get_slot_templates(
    pool: &Pool<Postgres>,
    court_id: Uuid,
    template_date: NaiveDate,
) -> Result<Vec<DbSlotTemplate>> {
    let templates = sqlx::query_as::<_, DbSlotTemplate>(
        r#"
        SELECT id, court_id, template_date, start_seconds, end_seconds, unit_duration_minutes, unit_price, created_at
        FROM slot_templates
        WHERE court_id = $1 AND template_date = $2
        ORDER BY created_at ASC
        "#,
    )
    .bind(court_id)
    .bind(template_date)
    .fetch_all(pool)
    .await?;

    Ok(templates)
}
