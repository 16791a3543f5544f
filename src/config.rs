//! Runtime configuration read from the environment (and `.env` when present)

use std::env;

use crate::error::{TrackerError, TrackerResult};

/// ---------------------------------------------------------------------------
/// Configuration Constants
/// ---------------------------------------------------------------------------

pub const DATABASE_URL_VAR: &str = "CYCLE_INSIGHTS_DATABASE_URL";
pub const CYCLE_KEY_VAR: &str = "CYCLE_INSIGHTS_CYCLE_KEY";
pub const SYMPTOM_KEY_VAR: &str = "CYCLE_INSIGHTS_SYMPTOM_KEY";
pub const LOG_FILTER_VAR: &str = "RUST_LOG";

const DEFAULT_DATABASE_URL: &str = "sqlite://cycle-insights.db?mode=rwc";
const DEFAULT_CYCLE_KEY: &str = "cycles";
const DEFAULT_SYMPTOM_KEY: &str = "symptoms";
const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
  /// sqlx SQLite connection string
  pub database_url: String,
  /// Storage key of the cycle collection
  pub cycle_key: String,
  /// Storage key of the symptom collection
  pub symptom_key: String,
  /// tracing-subscriber EnvFilter directive
  pub log_filter: String,
}

impl Default for AppConfig {
  fn default() -> Self {
    Self {
      database_url: DEFAULT_DATABASE_URL.to_string(),
      cycle_key: DEFAULT_CYCLE_KEY.to_string(),
      symptom_key: DEFAULT_SYMPTOM_KEY.to_string(),
      log_filter: DEFAULT_LOG_FILTER.to_string(),
    }
  }
}

impl AppConfig {
  /// Load `.env` (if any), then read overrides from the process environment
  pub fn from_env() -> TrackerResult<Self> {
    dotenvy::dotenv().ok();

    let defaults = Self::default();
    let config = Self {
      database_url: env::var(DATABASE_URL_VAR).unwrap_or(defaults.database_url),
      cycle_key: env::var(CYCLE_KEY_VAR).unwrap_or(defaults.cycle_key),
      symptom_key: env::var(SYMPTOM_KEY_VAR).unwrap_or(defaults.symptom_key),
      log_filter: env::var(LOG_FILTER_VAR).unwrap_or(defaults.log_filter),
    };

    config.validate()?;
    Ok(config)
  }

  pub fn validate(&self) -> TrackerResult<()> {
    if self.database_url.trim().is_empty() {
      return Err(TrackerError::Config(format!("{} is empty", DATABASE_URL_VAR)));
    }
    if self.cycle_key.trim().is_empty() {
      return Err(TrackerError::Config(format!("{} is empty", CYCLE_KEY_VAR)));
    }
    if self.symptom_key.trim().is_empty() {
      return Err(TrackerError::Config(format!("{} is empty", SYMPTOM_KEY_VAR)));
    }
    if self.cycle_key == self.symptom_key {
      return Err(TrackerError::Config(format!(
        "cycle and symptom collections share the key '{}'",
        self.cycle_key
      )));
    }
    Ok(())
  }
}
