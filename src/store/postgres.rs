use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use super::{StorageResult, Subscriber, SubscriberStore};
use crate::domain::subscriber::email::Email;

pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubscriberStore for PostgresStore {
    #[instrument(name = "Create subscriber table", skip(self))]
    async fn setup(&self) -> StorageResult<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!(detail = e.to_string(), "failed to create subscriber table");
                e
            })?;

        Ok(())
    }

    #[instrument(name = "Upsert subscriber", skip(self, email), fields(email = %email))]
    async fn upsert(&self, email: &Email, opt_in: bool) -> StorageResult<Subscriber> {
        let subscriber = sqlx::query_as::<_, Subscriber>(
            r#"
            INSERT INTO subscribers (email, opt_in)
            VALUES ($1, $2)
            ON CONFLICT (email) DO UPDATE SET
                opt_in = EXCLUDED.opt_in,
                timestamp = CURRENT_TIMESTAMP
            RETURNING id, email, opt_in, timestamp, created_at
            "#,
        )
        .bind(email.as_ref())
        .bind(opt_in)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(detail = e.to_string(), "failed to save subscriber");
            e
        })?;

        Ok(subscriber)
    }

    #[instrument(name = "List subscribers", skip(self))]
    async fn list(&self) -> StorageResult<Vec<Subscriber>> {
        let subscribers = sqlx::query_as::<_, Subscriber>(
            r#"
            SELECT id, email, opt_in, timestamp, created_at
            FROM subscribers
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(subscribers)
    }

    #[instrument(name = "Count subscribers", skip(self))]
    async fn count(&self) -> StorageResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM subscribers")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    #[instrument(name = "Delete subscriber", skip(self, email), fields(email = %email))]
    async fn delete(&self, email: &Email) -> StorageResult<bool> {
        let result = sqlx::query("DELETE FROM subscribers WHERE email = $1")
            .bind(email.as_ref())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!(detail = e.to_string(), "failed to delete subscriber");
                e
            })?;

        Ok(result.rows_affected() > 0)
    }
}
