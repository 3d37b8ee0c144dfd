use sqlx::{postgres::PgPoolOptions, PgPool};

pub struct Database {
    pub pool: PgPool,
}

impl Database {
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;

        // Prediction persistence is a single append-only table
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS predictions (
                id UUID PRIMARY KEY,
                user_email TEXT,
                profile JSONB NOT NULL,
                result JSONB NOT NULL,
                prediction DOUBLE PRECISION NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT now()
            )
            "#,
        )
        .execute(&pool)
        .await?;

        Ok(Self { pool })
    }
}
