//! Application settings on top of the base config: static admins, broadcast pacing,
//! contact handles and the legacy data directory.

use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use super::base::parse_var;

/// Settings read once at start from ADMINS, BROADCAST_DELAY_MS, ADMIN_USERNAME, CHANNEL_USERNAME and DATA_DIR.
#[derive(Debug, Clone)]
pub struct BotSettings {
    /// Static admin ids; the dynamic admins table is added on top at check time.
    pub admins: Vec<i64>,
    pub broadcast_delay_ms: u64,
    /// Contact handle without the leading `@`.
    pub admin_username: Option<String>,
    /// Channel handle without the leading `@`.
    pub channel_username: Option<String>,
    pub data_dir: PathBuf,
}

impl Default for BotSettings {
    fn default() -> Self {
        Self {
            admins: Vec::new(),
            broadcast_delay_ms: 50,
            admin_username: None,
            channel_username: None,
            data_dir: PathBuf::from("data"),
        }
    }
}

impl BotSettings {
    pub fn from_env() -> Result<Self> {
        let admins = match env::var("ADMINS") {
            Ok(raw) => parse_admin_ids(&raw)?,
            Err(_) => Vec::new(),
        };
        let broadcast_delay_ms = parse_var("BROADCAST_DELAY_MS", 50)?;
        let data_dir = env::var("DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data"));

        Ok(Self {
            admins,
            broadcast_delay_ms,
            admin_username: handle_var("ADMIN_USERNAME"),
            channel_username: handle_var("CHANNEL_USERNAME"),
            data_dir,
        })
    }

    pub fn broadcast_delay(&self) -> Duration {
        Duration::from_millis(self.broadcast_delay_ms)
    }
}

/// Parses a comma-separated id list. Blank entries are skipped; anything else that is not an integer is an error.
pub fn parse_admin_ids(raw: &str) -> Result<Vec<i64>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<i64>()
                .with_context(|| format!("ADMINS contains a non-numeric id: {}", s))
        })
        .collect()
}

fn handle_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|s| s.trim().trim_start_matches('@').to_string())
        .filter(|s| !s.is_empty())
}
