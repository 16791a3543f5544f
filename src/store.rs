//! Key-value persistence port and the typed record collections built on it
//!
//! Collections are stored whole: one key holds one JSON array. Every save
//! rewrites the full array, so there are no partial writes to reconcile.

use chrono::NaiveDate;
use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::{Arc, Mutex};

use crate::error::{TrackerError, TrackerResult};

/// ---------------------------------------------------------------------------
/// Persistence Port
/// ---------------------------------------------------------------------------

/// Minimal string key-value storage the tracker persists through
#[allow(async_fn_in_trait)]
pub trait KeyValueStore {
  /// Value stored under `key`, or None if nothing was ever written
  async fn read(&self, key: &str) -> TrackerResult<Option<String>>;

  /// Replace the value stored under `key`
  async fn write(&self, key: &str, value: &str) -> TrackerResult<()>;

  /// Drop `key` entirely (no-op when absent)
  async fn remove(&self, key: &str) -> TrackerResult<()>;
}

/// In-process store. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
  entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  fn lock(&self) -> TrackerResult<std::sync::MutexGuard<'_, HashMap<String, String>>> {
    self
      .entries
      .lock()
      .map_err(|_| TrackerError::Persistence("memory store lock poisoned".into()))
  }
}

impl KeyValueStore for MemoryStore {
  async fn read(&self, key: &str) -> TrackerResult<Option<String>> {
    Ok(self.lock()?.get(key).cloned())
  }

  async fn write(&self, key: &str, value: &str) -> TrackerResult<()> {
    self.lock()?.insert(key.to_string(), value.to_string());
    Ok(())
  }

  async fn remove(&self, key: &str) -> TrackerResult<()> {
    self.lock()?.remove(key);
    Ok(())
  }
}

/// ---------------------------------------------------------------------------
/// Typed Record Collections
/// ---------------------------------------------------------------------------

/// A record that belongs to a calendar date (the collection is ordered by it)
pub trait Dated {
  fn record_date(&self) -> NaiveDate;
}

/// Ordered collection of dated records persisted under a single key
#[derive(Debug, Clone)]
pub struct RecordStore<S, T> {
  store: S,
  key: String,
  _records: PhantomData<fn() -> T>,
}

impl<S, T> RecordStore<S, T>
where
  S: KeyValueStore,
  T: Dated + Serialize + DeserializeOwned,
{
  pub fn new(store: S, key: impl Into<String>) -> Self {
    Self {
      store,
      key: key.into(),
      _records: PhantomData,
    }
  }

  pub fn key(&self) -> &str {
    &self.key
  }

  /// Full collection, most recent first. Empty when nothing was saved yet.
  pub async fn load(&self) -> TrackerResult<Vec<T>> {
    let raw = match self.store.read(&self.key).await? {
      Some(raw) => raw,
      None => return Ok(Vec::new()),
    };

    let mut records: Vec<T> = serde_json::from_str(&raw).map_err(|e| {
      tracing::error!(key = %self.key, error = %e, "stored collection is unreadable");
      TrackerError::Serialization(format!("Collection '{}' is corrupt: {}", self.key, e))
    })?;
    sort_most_recent_first(&mut records);
    Ok(records)
  }

  /// Persist the whole collection, most recent first
  pub async fn save(&self, mut records: Vec<T>) -> TrackerResult<Vec<T>> {
    sort_most_recent_first(&mut records);
    let json = serde_json::to_string(&records)?;

    self.store.write(&self.key, &json).await.map_err(|e| {
      tracing::error!(key = %self.key, error = %e, "failed to persist collection");
      e
    })?;

    tracing::debug!(key = %self.key, count = records.len(), "collection saved");
    Ok(records)
  }
}

/// Stable sort: records sharing a date keep their relative order
fn sort_most_recent_first<T: Dated>(records: &mut [T]) {
  records.sort_by(|a, b| b.record_date().cmp(&a.record_date()));
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
