//! Telegram connection settings: bot token and an optional alternate Bot API URL
//! (e.g. a local `telegram-bot-api` server for large audio files).

use anyhow::{Context, Result};
use tracing::info;

/// Telegram connection settings.
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub telegram_api_url: Option<String>,
}

impl TelegramConfig {
    pub fn new(bot_token: impl Into<String>, telegram_api_url: Option<String>) -> Self {
        Self {
            bot_token: bot_token.into(),
            telegram_api_url,
        }
    }

    /// Creates the teloxide Bot, pointing it at the alternate API URL when one is set.
    pub fn build_bot(&self) -> Result<teloxide::Bot> {
        let bot = teloxide::Bot::new(self.bot_token.clone());
        match &self.telegram_api_url {
            Some(url) => {
                let url = reqwest::Url::parse(url)
                    .with_context(|| format!("Invalid TELEGRAM_API_URL: {}", url))?;
                info!(api_url = %url, "Using custom Telegram API URL");
                Ok(bot.set_api_url(url))
            }
            None => Ok(bot),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_bot_rejects_bad_api_url() {
        let config = TelegramConfig::new("test_token", Some("::not a url::".to_string()));
        assert!(config.build_bot().is_err());

        let config = TelegramConfig::new("test_token", Some("http://localhost:8081".to_string()));
        assert!(config.build_bot().is_ok());

        assert!(TelegramConfig::new("test_token", None).build_bot().is_ok());
    }
}
