//! # abot-core
//!
//! Core types and traits for the audiobook bot: [`Bot`], [`Handler`], events, keyboards and media,
//! and tracing initialization. Transport-agnostic; used by abot-telegram, handler-chain and the app.

pub mod bot;
pub mod error;
pub mod keyboard;
pub mod logger;
pub mod types;

pub use bot::{parse_message_id, Bot};
pub use error::{BotError, Result};
pub use keyboard::{Button, Keyboard};
pub use logger::init_tracing;
pub use types::{
    Chat, Content, Event, EventKind, FileRef, Handler, HandlerResponse, Media, MediaKind, User,
};
