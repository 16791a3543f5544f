use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use crate::commands::AppState;
use crate::error::TrackerResult;
use crate::models::{CycleEntry, Flow};
use crate::prediction::{CycleHistory, CyclePrediction, CycleStatus};
use crate::repository::today;
use crate::store::KeyValueStore;

/// ---------------------------------------------------------------------------
/// Cycle Log Commands
/// ---------------------------------------------------------------------------

/// Payload of `add_cycle` as sent by the shell
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCycle {
  pub start_date: NaiveDate,
  #[serde(default)]
  pub end_date: Option<NaiveDate>,
  #[serde(default)]
  pub flow: Option<Flow>,
  #[serde(default)]
  pub symptoms: Vec<String>,
  #[serde(default)]
  pub notes: Option<String>,
}

impl NewCycle {
  fn into_entry(self) -> CycleEntry {
    let mut entry = CycleEntry::new(self.start_date, self.flow.unwrap_or_default())
      .with_symptoms(self.symptoms);
    if let Some(end) = self.end_date {
      entry = entry.with_end_date(end);
    }
    if let Some(notes) = self.notes.filter(|n| !n.trim().is_empty()) {
      entry = entry.with_notes(notes);
    }
    entry
  }
}

pub async fn add_cycle<S: KeyValueStore>(
  state: &AppState<S>,
  cycle: NewCycle,
) -> TrackerResult<CycleEntry> {
  state.cycles.add(cycle.into_entry()).await
}

pub async fn close_cycle<S: KeyValueStore>(
  state: &AppState<S>,
  id: Uuid,
  end_date: NaiveDate,
) -> TrackerResult<CycleEntry> {
  state.cycles.close(id, end_date).await
}

/// Most recent start first
pub async fn list_cycles<S: KeyValueStore>(state: &AppState<S>) -> TrackerResult<Vec<CycleEntry>> {
  state.cycles.list().await
}

/// ---------------------------------------------------------------------------
/// Forecast Commands
/// ---------------------------------------------------------------------------

/// None until two cycles have been completed
pub async fn get_cycle_prediction<S: KeyValueStore>(
  state: &AppState<S>,
) -> TrackerResult<Option<CyclePrediction>> {
  let cycles = state.cycles.list().await?;
  Ok(CyclePrediction::compute(&cycles))
}

pub async fn get_cycle_history<S: KeyValueStore>(state: &AppState<S>) -> TrackerResult<CycleHistory> {
  let cycles = state.cycles.list().await?;
  Ok(CycleHistory::compute(&cycles))
}

pub async fn get_cycle_status<S: KeyValueStore>(
  state: &AppState<S>,
) -> TrackerResult<Option<CycleStatus>> {
  get_cycle_status_on(state, today()).await
}

/// `get_cycle_status` as seen on `today`
pub async fn get_cycle_status_on<S: KeyValueStore>(
  state: &AppState<S>,
  today: NaiveDate,
) -> TrackerResult<Option<CycleStatus>> {
  let cycles = state.cycles.list().await?;
  Ok(
    CyclePrediction::compute(&cycles)
      .and_then(|prediction| CycleStatus::compute(&prediction, &cycles, today)),
  )
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
