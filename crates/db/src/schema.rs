use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Create courts table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS courts (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            owner_id TEXT NOT NULL,
            name VARCHAR(255) NOT NULL,
            venue VARCHAR(255) NOT NULL,
            sport VARCHAR(64) NOT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create slot_templates table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS slot_templates (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            court_id UUID NOT NULL REFERENCES courts(id),
            template_date DATE NOT NULL,
            start_seconds INTEGER NOT NULL,
            end_seconds INTEGER NOT NULL,
            unit_duration_minutes INTEGER NOT NULL,
            unit_price NUMERIC(12, 2) NOT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_template_range CHECK (0 <= start_seconds AND start_seconds < end_seconds AND end_seconds <= 86400),
            CONSTRAINT positive_unit CHECK (unit_duration_minutes > 0),
            CONSTRAINT non_negative_price CHECK (unit_price >= 0)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create bookings table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS bookings (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            court_id UUID NOT NULL REFERENCES courts(id),
            user_id VARCHAR(255) NOT NULL,
            booking_date DATE NOT NULL,
            start_seconds INTEGER NOT NULL,
            end_seconds INTEGER NOT NULL,
            price NUMERIC(12, 2) NOT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_booking_range CHECK (0 <= start_seconds AND start_seconds < end_seconds AND end_seconds <= 86400)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create pending_checkouts table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS pending_checkouts (
            user_id VARCHAR(255) PRIMARY KEY,
            order_id VARCHAR(255) NOT NULL,
            payload JSONB NOT NULL,
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes, one statement per query
    for statement in [
        "CREATE INDEX IF NOT EXISTS idx_slot_templates_court_date ON slot_templates(court_id, template_date)",
        "CREATE INDEX IF NOT EXISTS idx_bookings_court_date ON bookings(court_id, booking_date)",
        "CREATE INDEX IF NOT EXISTS idx_bookings_user_id ON bookings(user_id)",
    ] {
        sqlx::query(statement).execute(pool).await?;
    }

    info!("Database schema initialized successfully.");
    Ok(())
}
