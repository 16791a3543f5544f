//! Typed repositories over the record store
//!
//! Each mutation reads the full collection, changes it and writes it back.
//! Nothing is cached between calls.

use chrono::{Local, NaiveDate};
use uuid::Uuid;

use crate::error::{TrackerError, TrackerResult};
use crate::models::{CycleEntry, SymptomEntry};
use crate::store::{KeyValueStore, RecordStore};

/// The user's current calendar date
pub fn today() -> NaiveDate {
  Local::now().date_naive()
}

fn rejected<T>(result: TrackerResult<T>, what: &str) -> TrackerResult<T> {
  if let Err(e) = &result {
    tracing::warn!(error = %e, "{} rejected", what);
  }
  result
}

/// ---------------------------------------------------------------------------
/// Cycle Repository
/// ---------------------------------------------------------------------------

/// Append-only history of cycles, most recent start first
#[derive(Debug, Clone)]
pub struct CycleRepository<S> {
  records: RecordStore<S, CycleEntry>,
}

impl<S: KeyValueStore> CycleRepository<S> {
  pub fn new(store: S, key: impl Into<String>) -> Self {
    Self {
      records: RecordStore::new(store, key),
    }
  }

  pub async fn list(&self) -> TrackerResult<Vec<CycleEntry>> {
    self.records.load().await
  }

  /// Append a completed or ongoing cycle
  pub async fn add(&self, entry: CycleEntry) -> TrackerResult<CycleEntry> {
    self.add_on(entry, today()).await
  }

  /// `add` with an explicit notion of "today"
  pub async fn add_on(&self, entry: CycleEntry, today: NaiveDate) -> TrackerResult<CycleEntry> {
    rejected(entry.validate(today), "cycle entry")?;

    let mut cycles = self.records.load().await?;
    if cycles.iter().any(|c| c.id == entry.id) {
      return rejected(
        Err(TrackerError::InvalidRange(format!("cycle {} already recorded", entry.id))),
        "cycle entry",
      );
    }

    cycles.push(entry.clone());
    self.records.save(cycles).await?;

    tracing::debug!(id = %entry.id, start = %entry.start_date, "cycle added");
    Ok(entry)
  }

  /// Record the end date of an ongoing cycle
  pub async fn close(&self, id: Uuid, end_date: NaiveDate) -> TrackerResult<CycleEntry> {
    self.close_on(id, end_date, today()).await
  }

  pub async fn close_on(
    &self,
    id: Uuid,
    end_date: NaiveDate,
    today: NaiveDate,
  ) -> TrackerResult<CycleEntry> {
    let mut cycles = self.records.load().await?;

    let cycle = cycles
      .iter_mut()
      .find(|c| c.id == id)
      .ok_or_else(|| TrackerError::NotFound(format!("cycle {}", id)))?;

    if let Some(existing) = cycle.end_date {
      return rejected(
        Err(TrackerError::InvalidRange(format!(
          "cycle {} already ended on {}",
          id, existing
        ))),
        "cycle closure",
      );
    }

    let closed = cycle.clone().with_end_date(end_date);
    rejected(closed.validate(today), "cycle closure")?;
    *cycle = closed.clone();

    self.records.save(cycles).await?;

    tracing::debug!(id = %id, end = %end_date, "cycle closed");
    Ok(closed)
  }
}

/// ---------------------------------------------------------------------------
/// Symptom Repository
/// ---------------------------------------------------------------------------

/// Daily symptom snapshots keyed by date, most recent first
#[derive(Debug, Clone)]
pub struct SymptomRepository<S> {
  records: RecordStore<S, SymptomEntry>,
}

impl<S: KeyValueStore> SymptomRepository<S> {
  pub fn new(store: S, key: impl Into<String>) -> Self {
    Self {
      records: RecordStore::new(store, key),
    }
  }

  pub async fn list(&self) -> TrackerResult<Vec<SymptomEntry>> {
    self.records.load().await
  }

  pub async fn get(&self, date: NaiveDate) -> TrackerResult<Option<SymptomEntry>> {
    Ok(self.records.load().await?.into_iter().find(|e| e.date == date))
  }

  /// Insert, or replace the entry recorded for the same date
  pub async fn upsert(&self, entry: SymptomEntry) -> TrackerResult<SymptomEntry> {
    self.upsert_on(entry, today()).await
  }

  pub async fn upsert_on(&self, entry: SymptomEntry, today: NaiveDate) -> TrackerResult<SymptomEntry> {
    rejected(entry.validate(today), "symptom entry")?;

    let mut entries = self.records.load().await?;
    match entries.iter_mut().find(|e| e.date == entry.date) {
      Some(existing) => {
        *existing = entry.clone();
        tracing::debug!(date = %entry.date, "symptom entry replaced");
      }
      None => {
        entries.push(entry.clone());
        tracing::debug!(date = %entry.date, "symptom entry added");
      }
    }

    self.records.save(entries).await?;
    Ok(entry)
  }

  /// Returns whether an entry existed for `date`
  pub async fn remove(&self, date: NaiveDate) -> TrackerResult<bool> {
    let mut entries = self.records.load().await?;
    let before = entries.len();
    entries.retain(|e| e.date != date);

    if entries.len() == before {
      return Ok(false);
    }

    self.records.save(entries).await?;
    tracing::debug!(date = %date, "symptom entry removed");
    Ok(true)
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
