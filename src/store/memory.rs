use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;

use super::{StorageError, StorageResult, Subscriber, SubscriberStore};
use crate::domain::subscriber::email::Email;

/// Process-local store used when no database is configured, and in tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    last_id: i64,
    subscribers: Vec<Subscriber>,
}

impl MemoryStore {
    fn lock(&self) -> StorageResult<MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|e| StorageError::Unavailable(e.to_string()))
    }
}

#[async_trait]
impl SubscriberStore for MemoryStore {
    async fn setup(&self) -> StorageResult<()> {
        tracing::info!("in-memory subscriber store needs no setup");
        Ok(())
    }

    async fn upsert(&self, email: &Email, opt_in: bool) -> StorageResult<Subscriber> {
        let mut inner = self.lock()?;
        let now = Utc::now();

        if let Some(existing) = inner
            .subscribers
            .iter_mut()
            .find(|s| s.email == email.as_ref())
        {
            existing.opt_in = opt_in;
            existing.timestamp = now;
            return Ok(existing.clone());
        }

        inner.last_id += 1;
        let subscriber = Subscriber {
            id: inner.last_id,
            email: email.to_string(),
            opt_in,
            timestamp: now,
            created_at: now,
        };
        inner.subscribers.push(subscriber.clone());

        Ok(subscriber)
    }

    async fn list(&self) -> StorageResult<Vec<Subscriber>> {
        let mut subscribers = self.lock()?.subscribers.clone();
        subscribers.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(subscribers)
    }

    async fn count(&self) -> StorageResult<i64> {
        Ok(self.lock()?.subscribers.len() as i64)
    }

    async fn delete(&self, email: &Email) -> StorageResult<bool> {
        let mut inner = self.lock()?;
        let before = inner.subscribers.len();
        inner.subscribers.retain(|s| s.email != email.as_ref());
        Ok(inner.subscribers.len() != before)
    }
}
