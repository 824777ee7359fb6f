use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};

use super::{Dated, Entity};
use crate::error::{EduboardError, Result};

/// In-memory collection of one entity type with simulated network latency.
///
/// Every operation is applied to the collection when it is called and
/// hands back a future that resolves after the store's latency. The future
/// owns its result and borrows nothing, so calls can be issued back to back
/// and awaited later: a `get_all` issued before a `delete` still resolves
/// with the pre-delete snapshot. Dropping a future does not undo its
/// operation.
///
/// Cloning a `Store` yields another handle onto the same collection.
pub struct Store<T: Entity> {
    inner: Arc<Mutex<Collection<T>>>,
    latency: Duration,
}

struct Collection<T> {
    records: Vec<T>,
    /// Highest Id ever held. Ids are allocated above it so a deleted Id is
    /// never handed out again.
    high_water: u32,
}

impl<T: Entity> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            latency: self.latency,
        }
    }
}

impl<T: Entity> Store<T> {
    /// Create a store holding `records` in the given order.
    pub fn new(records: Vec<T>, latency: Duration) -> Self {
        let high_water = records.iter().map(|r| r.id()).max().unwrap_or(0);
        Self {
            inner: Arc::new(Mutex::new(Collection {
                records,
                high_water,
            })),
            latency,
        }
    }

    pub fn empty(latency: Duration) -> Self {
        Self::new(Vec::new(), latency)
    }

    /// Number of records currently held.
    pub fn len(&self) -> usize {
        self.lock().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of the whole collection, in insertion order.
    pub fn get_all(&self) -> impl Future<Output = Vec<T>> + Send + 'static {
        let snapshot = self.lock().records.clone();
        tracing::debug!(entity = T::NAME, count = snapshot.len(), "get_all");
        self.resolve(snapshot)
    }

    pub fn get_by_id(&self, id: u32) -> impl Future<Output = Result<T>> + Send + 'static {
        let found = self
            .lock()
            .records
            .iter()
            .find(|r| r.id() == id)
            .cloned()
            .ok_or_else(|| EduboardError::not_found(T::NAME, id));
        tracing::debug!(entity = T::NAME, id, found = found.is_ok(), "get_by_id");
        self.resolve(found)
    }

    /// Allocate the next Id, apply entity defaults and append the record.
    ///
    /// Fails without touching the collection once the Id space is used up.
    pub fn create(&self, draft: T::Draft) -> impl Future<Output = Result<T>> + Send + 'static {
        let created = {
            let mut collection = self.lock();
            match collection.high_water.checked_add(1) {
                Some(id) => {
                    collection.high_water = id;
                    let record = T::from_draft(id, draft, Utc::now());
                    collection.records.push(record.clone());
                    Ok(record)
                }
                None => Err(EduboardError::InvalidInput(format!(
                    "{} Id space exhausted",
                    T::NAME
                ))),
            }
        };
        match &created {
            Ok(record) => tracing::debug!(entity = T::NAME, id = record.id(), "create"),
            Err(e) => tracing::warn!(entity = T::NAME, error = %e, "create rejected"),
        }
        self.resolve(created)
    }

    pub fn update(
        &self,
        id: u32,
        patch: T::Patch,
    ) -> impl Future<Output = Result<T>> + Send + 'static {
        let updated = {
            let mut collection = self.lock();
            match collection.records.iter_mut().find(|r| r.id() == id) {
                Some(record) => {
                    record.apply_patch(patch, Utc::now());
                    Ok(record.clone())
                }
                None => Err(EduboardError::not_found(T::NAME, id)),
            }
        };
        tracing::debug!(entity = T::NAME, id, ok = updated.is_ok(), "update");
        self.resolve(updated)
    }

    pub fn delete(&self, id: u32) -> impl Future<Output = Result<()>> + Send + 'static {
        let removed = {
            let mut collection = self.lock();
            match collection.records.iter().position(|r| r.id() == id) {
                Some(index) => {
                    collection.records.remove(index);
                    Ok(())
                }
                None => Err(EduboardError::not_found(T::NAME, id)),
            }
        };
        tracing::debug!(entity = T::NAME, id, ok = removed.is_ok(), "delete");
        self.resolve(removed)
    }

    fn lock(&self) -> MutexGuard<'_, Collection<T>> {
        // A panic while holding the lock cannot leave the Vec half-written,
        // so a poisoned guard is still usable.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn resolve<R: Send + 'static>(&self, value: R) -> impl Future<Output = R> + Send + 'static {
        let latency = self.latency;
        async move {
            if !latency.is_zero() {
                tokio::time::sleep(latency).await;
            }
            value
        }
    }
}

impl<T: Dated> Store<T> {
    /// Records whose date key lies in `[start, end]`, inclusive, in
    /// collection order. An inverted range yields nothing.
    pub fn get_by_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> impl Future<Output = Vec<T>> + Send + 'static {
        let matched: Vec<T> = if start > end {
            Vec::new()
        } else {
            self.lock()
                .records
                .iter()
                .filter(|r| r.date_key().is_some_and(|d| d >= start && d <= end))
                .cloned()
                .collect()
        };
        tracing::debug!(entity = T::NAME, %start, %end, count = matched.len(), "get_by_date_range");
        self.resolve(matched)
    }
}
