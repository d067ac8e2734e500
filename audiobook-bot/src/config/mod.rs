//! Bot configuration: BaseConfig (Telegram + log + DB) + BotSettings (admins, broadcast, contact handles).

mod base;
mod bot_config;
mod settings;


pub use base::BaseConfig;
pub use bot_config::BotConfig;
pub use settings::{parse_admin_ids, BotSettings};
