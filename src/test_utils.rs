//! Test utilities and helpers for unit testing
//!
//! This module provides common test infrastructure including:
//! - Database setup/teardown
//! - Mock data factories
//! - Date helpers
//! - Helper assertions

use chrono::{Duration, NaiveDate};
use sqlx::SqlitePool;

use crate::analysis::SymptomStats;
use crate::models::{CycleEntry, Flow, SymptomEntry};
use crate::prediction::{CyclePrediction, LUTEAL_PHASE_DAYS};

/// ---------------------------------------------------------------------------
/// Database Test Utilities
/// ---------------------------------------------------------------------------

/// Create an in-memory SQLite database for testing
/// Runs all migrations and returns a ready-to-use pool
///
/// Uses max_connections(1) to prevent multiple pool connections from creating
/// isolated in-memory databases, which would cause intermittent test failures
pub async fn setup_test_db() -> SqlitePool {
  let pool = sqlx::sqlite::SqlitePoolOptions::new()
    .max_connections(1)
    .connect("sqlite::memory:")
    .await
    .expect("Failed to create in-memory database");

  sqlx::migrate!("./migrations")
    .run(&pool)
    .await
    .expect("Failed to run migrations");

  pool
}

/// Close a test database pool
pub async fn teardown_test_db(pool: SqlitePool) {
  pool.close().await;
}

/// ---------------------------------------------------------------------------
/// Date Helpers
/// ---------------------------------------------------------------------------

/// Parse a `YYYY-MM-DD` literal
pub fn date(s: &str) -> NaiveDate {
  NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("Invalid test date literal")
}

/// `n` consecutive days starting at `start`, oldest first
pub fn consecutive_days(start: &str, n: usize) -> Vec<NaiveDate> {
  let first = date(start);
  (0..n as i64).map(|i| first + Duration::days(i)).collect()
}

/// ---------------------------------------------------------------------------
/// Mock Data Factories
/// ---------------------------------------------------------------------------

/// Medium-flow cycle, ongoing when `end` is None
pub fn mock_cycle(start: &str, end: Option<&str>) -> CycleEntry {
  let entry = CycleEntry::new(date(start), Flow::Medium);
  match end {
    Some(end) => entry.with_end_date(date(end)),
    None => entry,
  }
}

/// Symptom-free day with average sleep
pub fn mock_symptom_entry(day: &str, mood: u8, energy: u8) -> SymptomEntry {
  SymptomEntry::new(date(day), mood, energy, 3)
}

/// Forecast with the given length and confidence, anchored on 2024-03-25
pub fn mock_prediction(cycle_length: i64, confidence: u8) -> CyclePrediction {
  let next_period = date("2024-03-25");
  CyclePrediction {
    next_period,
    ovulation: next_period - Duration::days(LUTEAL_PHASE_DAYS),
    cycle_length,
    confidence,
    cycles_used: 3,
  }
}

/// Statistics with flat sleep and no recorded symptom keys
pub fn mock_stats(average_intensity: f64, mood_trend: f64, energy_trend: f64) -> SymptomStats {
  SymptomStats {
    most_common: Vec::new(),
    frequencies: Vec::new(),
    average_intensity,
    mood_trend,
    energy_trend,
    sleep_trend: 0.0,
    entries_analyzed: 14,
  }
}

/// ---------------------------------------------------------------------------
/// Test Macros
/// ---------------------------------------------------------------------------

/// Assert two floats are approximately equal within a tolerance
#[macro_export]
macro_rules! assert_approx_eq {
  ($left:expr, $right:expr, $tolerance:expr) => {
    let diff = ($left - $right).abs();
    assert!(
      diff < $tolerance,
      "Values not approximately equal: {} vs {} (diff: {}, tolerance: {})",
      $left,
      $right,
      diff,
      $tolerance
    );
  };
}

/// ---------------------------------------------------------------------------
/// Tests for Test Utilities
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn test_setup_db_creates_schema() {
    let pool = setup_test_db().await;

    let tables: Vec<(String,)> =
      sqlx::query_as("SELECT name FROM sqlite_master WHERE type='table' AND name = 'records'")
        .fetch_all(&pool)
        .await
        .expect("Failed to query tables");

    assert_eq!(tables.len(), 1);

    teardown_test_db(pool).await;
  }

  #[test]
  fn test_date_helpers() {
    let days = consecutive_days("2024-02-28", 3);
    assert_eq!(days, vec![date("2024-02-28"), date("2024-02-29"), date("2024-03-01")]);
  }

  #[test]
  fn test_mock_factories_create_valid_data() {
    let today = date("2024-12-31");

    let cycle = mock_cycle("2024-01-01", Some("2024-01-05"));
    assert!(cycle.is_completed());
    assert!(cycle.validate(today).is_ok());
    assert!(!mock_cycle("2024-01-01", None).is_completed());

    let entry = mock_symptom_entry("2024-01-02", 4, 2);
    assert!(entry.validate(today).is_ok());
    assert!(entry.symptoms.is_empty());

    let prediction = mock_prediction(28, 95);
    assert_eq!(prediction.ovulation, date("2024-03-11"));
  }
}
