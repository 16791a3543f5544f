use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

use crate::config::AppConfig;
use crate::error::TrackerResult;
use crate::store::KeyValueStore;

pub type DbPool = SqlitePool;

/// Open the connection pool and run migrations
pub async fn initialize_db(config: &AppConfig) -> TrackerResult<DbPool> {
  tracing::info!(url = %config.database_url, "Initializing database");

  let pool = SqlitePoolOptions::new()
    .max_connections(5)
    .connect(&config.database_url)
    .await?;

  sqlx::migrate!("./migrations").run(&pool).await?;

  tracing::info!("Database initialized successfully");

  Ok(pool)
}

/// Key-value port backed by the `records` table
#[derive(Debug, Clone)]
pub struct SqliteStore {
  pool: DbPool,
}

impl SqliteStore {
  pub fn new(pool: DbPool) -> Self {
    Self { pool }
  }

  pub fn pool(&self) -> &DbPool {
    &self.pool
  }
}

impl KeyValueStore for SqliteStore {
  async fn read(&self, key: &str) -> TrackerResult<Option<String>> {
    let value: Option<String> = sqlx::query_scalar("SELECT value FROM records WHERE key = ?1")
      .bind(key)
      .fetch_optional(&self.pool)
      .await?;
    Ok(value)
  }

  async fn write(&self, key: &str, value: &str) -> TrackerResult<()> {
    sqlx::query(
      r#"
      INSERT INTO records (key, value, updated_at)
      VALUES (?1, ?2, CURRENT_TIMESTAMP)
      ON CONFLICT(key) DO UPDATE SET
        value = excluded.value,
        updated_at = excluded.updated_at
      "#,
    )
    .bind(key)
    .bind(value)
    .execute(&self.pool)
    .await?;
    Ok(())
  }

  async fn remove(&self, key: &str) -> TrackerResult<()> {
    sqlx::query("DELETE FROM records WHERE key = ?1")
      .bind(key)
      .execute(&self.pool)
      .await?;
    Ok(())
  }
}
