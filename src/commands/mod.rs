//! Entry points for the UI shell
//!
//! Every command re-reads the collections it needs; nothing is cached in
//! `AppState` besides the repository handles.

pub mod cycle;
pub mod insights;
pub mod symptom;

use crate::config::AppConfig;
use crate::db::{self, SqliteStore};
use crate::error::TrackerResult;
use crate::repository::{CycleRepository, SymptomRepository};
use crate::store::{KeyValueStore, MemoryStore};

pub use cycle::{
  add_cycle, close_cycle, get_cycle_history, get_cycle_prediction, get_cycle_status,
  get_cycle_status_on, list_cycles, NewCycle,
};
pub use insights::{get_insights, get_insights_on, get_recommendations, Insights};
pub use symptom::{
  delete_symptom_entry, get_symptom_entry, get_symptom_stats, list_symptom_entries,
  save_symptom_entry,
};

/// Shared state handed to every command
#[derive(Debug, Clone)]
pub struct AppState<S = SqliteStore> {
  pub cycles: CycleRepository<S>,
  pub symptoms: SymptomRepository<S>,
}

impl<S: KeyValueStore + Clone> AppState<S> {
  /// Both repositories over one store, under the configured keys
  pub fn new(store: S, config: &AppConfig) -> Self {
    Self {
      cycles: CycleRepository::new(store.clone(), config.cycle_key.clone()),
      symptoms: SymptomRepository::new(store, config.symptom_key.clone()),
    }
  }
}

impl AppState<MemoryStore> {
  /// Ephemeral state with default keys
  pub fn in_memory() -> Self {
    Self::new(MemoryStore::new(), &AppConfig::default())
  }
}

/// Open the database, run migrations and build the state
pub async fn initialize(config: &AppConfig) -> TrackerResult<AppState> {
  config.validate()?;
  let pool = db::initialize_db(config).await?;
  Ok(AppState::new(SqliteStore::new(pool), config))
}
