pub mod analysis;
pub mod commands;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod prediction;
pub mod recommendations;
pub mod repository;
pub mod store;

#[cfg(test)]
mod test_utils;

pub use commands::{initialize, AppState, Insights};
pub use config::AppConfig;
pub use error::{TrackerError, TrackerResult};

use tracing_subscriber::EnvFilter;

/// Install the global fmt subscriber. Later calls are ignored.
pub fn init_logging(filter: &str) {
  let env_filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));

  let _ = tracing_subscriber::fmt()
    .with_env_filter(env_filter)
    .with_target(true)
    .try_init();
}

/// Read configuration from the environment, start logging and open storage
pub async fn start() -> TrackerResult<AppState> {
  let config = AppConfig::from_env()?;
  init_logging(&config.log_filter);

  match initialize(&config).await {
    Ok(state) => {
      tracing::info!("Tracker ready");
      Ok(state)
    }
    Err(e) => {
      tracing::error!(error = %e, "Failed to initialize tracker");
      Err(e)
    }
  }
}
