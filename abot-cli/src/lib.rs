//! # abot-cli
//!
//! Argument parsing and config loading for the `abot` binary.

pub mod cli;

pub use audiobook_bot::BotConfig;
pub use cli::{load_config, load_migrate_config, Cli, Commands};
pub use json_migrate::MigrateConfig;
