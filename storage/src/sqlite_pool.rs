//! SQLite connection pool wrapper for the storage crate.

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use log::info;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::error::Result;

/// Pool sizing. Callers block up to `acquire_timeout` when every connection is busy.
#[derive(Debug, Clone)]
pub struct PoolSettings {
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 5,
            acquire_timeout: Duration::from_secs(30),
        }
    }
}

/// Manages a single SQLite pool; creates DB file if missing, enables foreign keys.
#[derive(Clone)]
pub struct SqlitePoolManager {
    pool: SqlitePool,
}

/// True for `sqlite::memory:` style URLs. Each in-memory connection is its own database.
pub(crate) fn is_memory_url(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

fn connect_options(database_url: &str) -> Result<SqliteConnectOptions> {
    let options = if database_url.starts_with("sqlite:") {
        SqliteConnectOptions::from_str(database_url)?
    } else {
        let path = database_url.strip_prefix("file:").unwrap_or(database_url);
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        SqliteConnectOptions::new().filename(path)
    };
    Ok(options.create_if_missing(true).foreign_keys(true))
}

impl SqlitePoolManager {
    /// Creates a pool for the given database URL (file path or in-memory) with default settings.
    pub async fn new(database_url: &str) -> Result<Self> {
        Self::with_settings(database_url, PoolSettings::default()).await
    }

    /// Creates a pool with explicit sizing. In-memory databases always get one long-lived connection.
    pub async fn with_settings(database_url: &str, settings: PoolSettings) -> Result<Self> {
        info!("Initializing SQLite pool: {}", database_url);

        let options = connect_options(database_url)?;
        let mut pool_options = SqlitePoolOptions::new().acquire_timeout(settings.acquire_timeout);
        if is_memory_url(database_url) {
            pool_options = pool_options
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        } else {
            pool_options = pool_options.max_connections(settings.max_connections.max(1));
        }

        let pool = pool_options.connect_with(options).await?;

        Ok(Self { pool })
    }

    /// Returns the underlying pool for running queries.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_memory_url() {
        assert!(is_memory_url("sqlite::memory:"));
        assert!(is_memory_url("sqlite://file.db?mode=memory"));
        assert!(!is_memory_url("sqlite://./data/bot.db"));
        assert!(!is_memory_url("bot.db"));
    }

    #[tokio::test]
    async fn test_file_url_creates_parent_dir() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("bot.db");
        let url = format!("file:{}", path.display());

        let manager = SqlitePoolManager::new(&url).await.expect("open pool");
        sqlx::query("SELECT 1")
            .execute(manager.pool())
            .await
            .expect("query");
        assert!(path.exists());
    }
}
