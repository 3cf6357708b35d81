use crate::models::DbPendingCheckout;
use chrono::Utc;
use eyre::Result;
use sqlx::{types::Json, Pool, Postgres};

pub async fn upsert_pending_checkout(
    pool: &Pool<Postgres>,
    user_id: &str,
    order_id: &str,
    payload: serde_json::Value,
) -> Result<DbPendingCheckout> {
    let pending = sqlx::query_as::<_, DbPendingCheckout>(
        r#"
        INSERT INTO pending_checkouts (user_id, order_id, payload, updated_at)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (user_id) DO UPDATE
        SET order_id = EXCLUDED.order_id, payload = EXCLUDED.payload, updated_at = EXCLUDED.updated_at
        RETURNING user_id, order_id, payload, updated_at
        "#,
    )
    .bind(user_id)
    .bind(order_id)
    .bind(Json(payload))
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    Ok(pending)
}

pub async fn get_pending_checkout(
    pool: &Pool<Postgres>,
    user_id: &str,
) -> Result<Option<DbPendingCheckout>> {
    let pending = sqlx::query_as::<_, DbPendingCheckout>(
        r#"
        SELECT user_id, order_id, payload, updated_at
        FROM pending_checkouts
        WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(pending)
}

pub async fn delete_pending_checkout(pool: &Pool<Postgres>, user_id: &str) -> Result<()> {
    sqlx::query(
        r#"
        DELETE FROM pending_checkouts
        WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .execute(pool)
    .await?;

    Ok(())
}
