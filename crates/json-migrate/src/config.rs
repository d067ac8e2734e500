//! Migration configuration and the per-entity report.
//!
//! Defines [`MigrateConfig`] (read from env), [`EntityReport`] and [`MigrateReport`].

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use storage::PoolSettings;

/// Legacy JSON files the importer knows about, relative to the data directory.
pub const BOOKS_FILE: &str = "books.json";
pub const VIEWS_FILE: &str = "book_views.json";
pub const USERS_FILE: &str = "users.json";
pub const ADMINS_FILE: &str = "admins.json";
pub const FEEDBACK_FILE: &str = "feedback.json";

/// Migration config: target database, directory holding the legacy files, pool sizing.
#[derive(Debug, Clone)]
pub struct MigrateConfig {
    pub database_url: String,
    /// Directory with `books.json`, `users.json`, ...; backups go to `<data_dir>/backups`.
    pub data_dir: PathBuf,
    pub pool: PoolSettings,
}

impl MigrateConfig {
    /// Reads `DATABASE_URL` (required), `DATA_DIR` (default `data`) and the pool variables.
    pub fn from_env() -> Result<Self> {
        let database_url = std::env::var("DATABASE_URL")
            .context("DATABASE_URL environment variable not set")?;
        let data_dir = std::env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string());
        let defaults = PoolSettings::default();
        let max_connections = match std::env::var("DB_MAX_CONNECTIONS") {
            Ok(raw) => raw
                .parse()
                .with_context(|| format!("DB_MAX_CONNECTIONS is not a number: {}", raw))?,
            Err(_) => defaults.max_connections,
        };
        let acquire_timeout = match std::env::var("DB_ACQUIRE_TIMEOUT_SECS") {
            Ok(raw) => Duration::from_secs(
                raw.parse()
                    .with_context(|| format!("DB_ACQUIRE_TIMEOUT_SECS is not a number: {}", raw))?,
            ),
            Err(_) => defaults.acquire_timeout,
        };

        Ok(Self {
            database_url,
            data_dir: PathBuf::from(data_dir),
            pool: PoolSettings {
                max_connections,
                acquire_timeout,
            },
        })
    }

    pub fn backup_dir(&self) -> PathBuf {
        self.data_dir.join("backups")
    }
}

/// Added/skipped counts for one entity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EntityReport {
    pub added: usize,
    pub skipped: usize,
}

impl EntityReport {
    pub fn add(&mut self) {
        self.added += 1;
    }

    pub fn skip(&mut self) {
        self.skipped += 1;
    }

    pub fn skip_n(&mut self, n: usize) {
        self.skipped += n;
    }
}

/// Result of one migration run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrateReport {
    pub books: EntityReport,
    pub parts: EntityReport,
    pub views: EntityReport,
    pub users: EntityReport,
    pub admins: EntityReport,
    pub feedback: EntityReport,
    /// Backup copies written during this run.
    pub backups: Vec<PathBuf>,
}

impl MigrateReport {
    /// (label, counts) in the order they are printed.
    pub fn entities(&self) -> [(&'static str, EntityReport); 6] {
        [
            ("books", self.books),
            ("parts", self.parts),
            ("book views", self.views),
            ("users", self.users),
            ("admins", self.admins),
            ("feedback", self.feedback),
        ]
    }
}

impl fmt::Display for MigrateReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (label, counts) in self.entities() {
            writeln!(
                f,
                "{}: added {}, skipped {}",
                label, counts.added, counts.skipped
            )?;
        }
        Ok(())
    }
}
