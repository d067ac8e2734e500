//! CLI parser and config loading.

use anyhow::Result;
use audiobook_bot::BotConfig;
use clap::{Parser, Subcommand};
use json_migrate::MigrateConfig;

#[derive(Parser)]
#[command(name = "abot")]
#[command(about = "Audiobook bot CLI: run the bot, import the legacy JSON datastore", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the Telegram bot (config from env; token can override BOT_TOKEN).
    Run {
        #[arg(short, long)]
        token: Option<String>,
    },
    /// Import DATA_DIR/*.json into DATABASE_URL. Safe to re-run: existing rows are skipped.
    Migrate,
}

/// Load BotConfig from environment. If `token` is provided it overrides BOT_TOKEN.
pub fn load_config(token: Option<String>) -> Result<BotConfig> {
    BotConfig::load(token)
}

/// Load MigrateConfig from environment (DATABASE_URL, DATA_DIR).
pub fn load_migrate_config() -> Result<MigrateConfig> {
    MigrateConfig::from_env()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_run_with_token() {
        let cli = Cli::try_parse_from(["abot", "run", "--token", "abc"]).unwrap();
        match cli.command {
            Commands::Run { token } => assert_eq!(token.as_deref(), Some("abc")),
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn test_migrate_takes_no_flags() {
        assert!(matches!(
            Cli::try_parse_from(["abot", "migrate"]).unwrap().command,
            Commands::Migrate
        ));
        assert!(Cli::try_parse_from(["abot", "migrate", "--dry-run"]).is_err());
    }
}
