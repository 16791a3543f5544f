use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::analysis::SymptomStats;
use crate::commands::AppState;
use crate::error::TrackerResult;
use crate::prediction::{CyclePrediction, CycleStatus};
use crate::recommendations::{self, Advisory};
use crate::repository::today;
use crate::store::KeyValueStore;

/// ---------------------------------------------------------------------------
/// Insights Package
/// ---------------------------------------------------------------------------

/// Everything the dashboard shows, computed from one read of each collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insights {
  pub generated_on: NaiveDate,

  /// Absent with fewer than two completed cycles
  pub prediction: Option<CyclePrediction>,

  pub status: Option<CycleStatus>,

  /// Absent while no symptom entry exists
  pub symptom_stats: Option<SymptomStats>,

  pub advisories: Vec<Advisory>,
}

impl Insights {
  pub fn build(
    generated_on: NaiveDate,
    prediction: Option<CyclePrediction>,
    status: Option<CycleStatus>,
    symptom_stats: Option<SymptomStats>,
  ) -> Self {
    let advisories = recommendations::evaluate(prediction.as_ref(), symptom_stats.as_ref());
    Self {
      generated_on,
      prediction,
      status,
      symptom_stats,
      advisories,
    }
  }

  pub fn to_json(&self) -> TrackerResult<String> {
    Ok(serde_json::to_string_pretty(self)?)
  }
}

/// ---------------------------------------------------------------------------
/// Commands
/// ---------------------------------------------------------------------------

pub async fn get_recommendations<S: KeyValueStore>(
  state: &AppState<S>,
) -> TrackerResult<Vec<Advisory>> {
  let cycles = state.cycles.list().await?;
  let entries = state.symptoms.list().await?;

  let prediction = CyclePrediction::compute(&cycles);
  let stats = SymptomStats::compute(&entries);
  Ok(recommendations::evaluate(prediction.as_ref(), stats.as_ref()))
}

pub async fn get_insights<S: KeyValueStore>(state: &AppState<S>) -> TrackerResult<Insights> {
  get_insights_on(state, today()).await
}

/// `get_insights` as seen on `today`
pub async fn get_insights_on<S: KeyValueStore>(
  state: &AppState<S>,
  today: NaiveDate,
) -> TrackerResult<Insights> {
  let cycles = state.cycles.list().await?;
  let entries = state.symptoms.list().await?;

  let prediction = CyclePrediction::compute(&cycles);
  let status = prediction
    .as_ref()
    .and_then(|p| CycleStatus::compute(p, &cycles, today));
  let stats = SymptomStats::compute(&entries);

  let insights = Insights::build(today, prediction, status, stats);
  tracing::debug!(
    advisories = insights.advisories.len(),
    has_prediction = insights.prediction.is_some(),
    "insights assembled"
  );
  Ok(insights)
}
