use chrono::NaiveDate;

use crate::analysis::SymptomStats;
use crate::commands::AppState;
use crate::error::TrackerResult;
use crate::models::SymptomEntry;
use crate::store::KeyValueStore;

/// ---------------------------------------------------------------------------
/// Daily Symptom Log Commands
/// ---------------------------------------------------------------------------

/// Insert the day's entry, replacing any earlier one for the same date
pub async fn save_symptom_entry<S: KeyValueStore>(
  state: &AppState<S>,
  entry: SymptomEntry,
) -> TrackerResult<SymptomEntry> {
  state.symptoms.upsert(entry).await
}

pub async fn get_symptom_entry<S: KeyValueStore>(
  state: &AppState<S>,
  date: NaiveDate,
) -> TrackerResult<Option<SymptomEntry>> {
  state.symptoms.get(date).await
}

/// Returns whether an entry existed for `date`
pub async fn delete_symptom_entry<S: KeyValueStore>(
  state: &AppState<S>,
  date: NaiveDate,
) -> TrackerResult<bool> {
  state.symptoms.remove(date).await
}

/// Most recent day first
pub async fn list_symptom_entries<S: KeyValueStore>(
  state: &AppState<S>,
) -> TrackerResult<Vec<SymptomEntry>> {
  state.symptoms.list().await
}

/// None while nothing has been logged
pub async fn get_symptom_stats<S: KeyValueStore>(
  state: &AppState<S>,
) -> TrackerResult<Option<SymptomStats>> {
  let entries = state.symptoms.list().await?;
  Ok(SymptomStats::compute(&entries))
}
