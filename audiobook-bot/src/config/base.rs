//! Base config: Telegram Bot connection, logging, database. Loaded from env.

use anyhow::{Context, Result};
use std::env;

/// Base config: Telegram-related, logging, database only.
#[derive(Debug, Clone)]
pub struct BaseConfig {
    /// BOT_TOKEN
    pub bot_token: String,
    /// TELEGRAM_API_URL or TELOXIDE_API_URL
    pub telegram_api_url: Option<String>,
    /// Log file path
    pub log_file: String,
    /// Catalog database URL (`sqlite:...`, `sqlite::memory:` or a file path)
    pub database_url: String,
    /// Pool size; in-memory databases always use one connection
    pub db_max_connections: u32,
    /// How long a store call waits for a free pooled connection
    pub db_acquire_timeout_secs: u64,
}

impl BaseConfig {
    /// Load from environment variables. `token` overrides BOT_TOKEN if provided.
    pub fn load(token: Option<String>) -> Result<Self> {
        let bot_token = match token {
            Some(t) => t,
            None => env::var("BOT_TOKEN").context("BOT_TOKEN not set")?,
        };
        let database_url = env::var("DATABASE_URL").context("DATABASE_URL not set")?;
        let log_file =
            env::var("LOG_FILE").unwrap_or_else(|_| "logs/audiobook-bot.log".to_string());
        let telegram_api_url = env::var("TELEGRAM_API_URL")
            .or_else(|_| env::var("TELOXIDE_API_URL"))
            .ok();
        let db_max_connections = parse_var("DB_MAX_CONNECTIONS", 5)?;
        let db_acquire_timeout_secs = parse_var("DB_ACQUIRE_TIMEOUT_SECS", 30)?;

        Ok(Self {
            bot_token,
            telegram_api_url,
            log_file,
            database_url,
            db_max_connections,
            db_acquire_timeout_secs,
        })
    }

    /// Validate config (e.g. telegram_api_url must be valid URL if set).
    pub fn validate(&self) -> Result<()> {
        if self.bot_token.trim().is_empty() {
            anyhow::bail!("BOT_TOKEN is empty");
        }
        if let Some(ref url_str) = self.telegram_api_url {
            if reqwest::Url::parse(url_str).is_err() {
                anyhow::bail!(
                    "TELEGRAM_API_URL (or TELOXIDE_API_URL) is set but not a valid URL: {}",
                    url_str
                );
            }
        }
        if self.db_max_connections == 0 {
            anyhow::bail!("DB_MAX_CONNECTIONS must be at least 1");
        }
        Ok(())
    }
}

/// Reads an optional numeric variable; a set but unparsable value is an error.
pub(crate) fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .with_context(|| format!("{} is not a valid number: {}", name, raw)),
        _ => Ok(default),
    }
}
