//! # Audiobook bot
//!
//! Catalog browsing, admin conversation flows, broadcast, feedback and stats on top of
//! abot-core, handler-chain, abot-telegram and storage. Loads config from env and runs the dispatcher.

pub mod auth;
pub mod callback;
pub mod components;
pub mod config;
pub mod flows;
pub mod link;
pub mod logging;
pub mod menus;
pub mod router;
pub mod runner;
pub mod screens;
pub mod session;

pub use auth::AdminPolicy;
pub use callback::{Callback, PayloadError};
pub use components::{build_bot_components, build_handler_chain, build_router, build_stores, BotComponents};
pub use config::{BaseConfig, BotConfig, BotSettings};
pub use flows::{FlowState, Input, Step};
pub use link::is_valid_part_link;
pub use logging::EventLogHandler;
pub use router::{BotRouter, RouterSettings};
pub use runner::run_bot;
pub use screens::Screen;
pub use session::SessionStore;
