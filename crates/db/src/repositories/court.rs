use crate::models::DbCourt;
use chrono::Utc;
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn create_court(
    pool: &Pool<Postgres>,
    owner_id: &str,
    name: &str,
    venue: &str,
    sport: &str,
) -> Result<DbCourt> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!(
        "Creating court: id={}, owner={}, name={}, venue={}, sport={}",
        id,
        owner_id,
        name,
        venue,
        sport
    );

    let court = sqlx::query_as::<_, DbCourt>(
        r#"
        INSERT INTO courts (id, owner_id, name, venue, sport, created_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, owner_id, name, venue, sport, created_at
        "#,
    )
    .bind(id)
    .bind(owner_id)
    .bind(name)
    .bind(venue)
    .bind(sport)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(court)
}

pub async fn get_court_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbCourt>> {
    tracing::debug!("Getting court by id: {}", id);

    let court = sqlx::query_as::<_, DbCourt>(
        r#"
        SELECT id, owner_id, name, venue, sport, created_at
        FROM courts
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(court)
}
