//! # abot-telegram
//!
//! Telegram transport layer: adapters to [`abot_core::Event`], the [`abot_core::Bot`] implementation,
//! minimal config, and the dispatcher runner. No catalog, session or flow logic lives here.

mod adapters;
mod bot_adapter;
mod config;
mod runner;

pub use adapters::{parse_command, TelegramCallbackWrapper, TelegramMessageWrapper, TelegramUserWrapper};
pub use bot_adapter::{to_inline_markup, TelegramBotAdapter};
pub use config::TelegramConfig;
pub use runner::run_dispatcher;
