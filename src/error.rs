//! Error type shared by the repositories, stores and shell commands

use serde::Serialize;

/// Everything that can go wrong in the tracker core.
///
/// Serialises as `{"type": "...", "message": "..."}` so the shell can show it as-is.
/// Missing data is never an error: predictors and analyzers return `None` instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize)]
#[serde(tag = "type", content = "message")]
pub enum TrackerError {
  /// Date in the future, or otherwise not acceptable as a recorded date
  #[error("Invalid date: {0}")]
  InvalidDate(String),

  /// End date before start date, or closing an already closed cycle
  #[error("Invalid range: {0}")]
  InvalidRange(String),

  /// Mood/energy/sleep/intensity outside 1-5
  #[error("Invalid score: {0}")]
  InvalidScore(String),

  #[error("Not found: {0}")]
  NotFound(String),

  #[error("Persistence error: {0}")]
  Persistence(String),

  #[error("Serialization error: {0}")]
  Serialization(String),

  #[error("Configuration error: {0}")]
  Config(String),
}

pub type TrackerResult<T> = Result<T, TrackerError>;

impl From<sqlx::Error> for TrackerError {
  fn from(e: sqlx::Error) -> Self {
    TrackerError::Persistence(e.to_string())
  }
}

impl From<sqlx::migrate::MigrateError> for TrackerError {
  fn from(e: sqlx::migrate::MigrateError) -> Self {
    TrackerError::Persistence(format!("Migration failed: {}", e))
  }
}

impl From<serde_json::Error> for TrackerError {
  fn from(e: serde_json::Error) -> Self {
    TrackerError::Serialization(e.to_string())
  }
}
