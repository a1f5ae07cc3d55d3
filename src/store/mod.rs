//! Subscriber persistence.
//!
//! Handlers only see [`SubscriberStore`]. Which implementation backs it is decided once, at
//! startup, from [`DatabaseSettings`]: Postgres when a connection string is configured, an
//! in-process list otherwise.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use secrecy::ExposeSecret;
use serde::Serialize;
use sqlx::postgres::PgPoolOptions;

use crate::{config::DatabaseSettings, domain::subscriber::email::Email};

mod memory;
mod postgres;

pub use self::memory::MemoryStore;
pub use self::postgres::PostgresStore;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Subscriber {
    pub id: i64,
    pub email: String,
    pub opt_in: bool,
    /// Last write.
    pub timestamp: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("subscriber store is unavailable: {0}")]
    Unavailable(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

#[async_trait]
pub trait SubscriberStore: Send + Sync {
    /// Create the subscriber table if it does not exist yet.
    async fn setup(&self) -> StorageResult<()>;

    /// Insert `email`, or refresh `opt_in` and `timestamp` of the record already holding it.
    async fn upsert(&self, email: &Email, opt_in: bool) -> StorageResult<Subscriber>;

    /// All subscribers, newest first.
    async fn list(&self) -> StorageResult<Vec<Subscriber>>;

    async fn count(&self) -> StorageResult<i64>;

    /// Returns whether a record was removed.
    async fn delete(&self, email: &Email) -> StorageResult<bool>;
}

pub fn from_settings(settings: &DatabaseSettings) -> anyhow::Result<Arc<dyn SubscriberStore>> {
    match settings.connection_string() {
        Some(url) => {
            let pool = PgPoolOptions::new()
                .max_connections(settings.max_connections)
                .acquire_timeout(settings.timeout())
                .connect_lazy(url.expose_secret())?;

            tracing::info!("using postgres subscriber store");
            Ok(Arc::new(PostgresStore::new(pool)))
        }
        None => {
            tracing::warn!(
                "no database url configured, subscribers are kept in memory and lost on restart"
            );
            Ok(Arc::new(MemoryStore::default()))
        }
    }
}
