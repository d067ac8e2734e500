//! Bot abstraction for sending and editing messages.
//!
//! [`Bot`] is transport-agnostic; the Telegram implementation lives in `abot-telegram`.
//! Text is rendered as HTML by every implementation.

use crate::error::{BotError, Result};
use crate::keyboard::Keyboard;
use crate::types::{Chat, Media};
use async_trait::async_trait;

/// Abstraction for sending and editing messages. Implementations map to a transport (e.g. Telegram).
#[async_trait]
pub trait Bot: Send + Sync {
    /// Sends a text message with an optional inline keyboard and returns the new message id.
    async fn send_message(
        &self,
        chat: &Chat,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<String>;

    /// Replaces text and keyboard of an already-sent message. `message_id` is transport-specific (e.g. Telegram numeric string).
    async fn edit_message(
        &self,
        chat: &Chat,
        message_id: &str,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<()>;

    /// Sends one media attachment with optional caption and keyboard; returns the new message id.
    async fn send_media(
        &self,
        chat: &Chat,
        media: &Media,
        caption: Option<&str>,
        keyboard: Option<&Keyboard>,
    ) -> Result<String>;
}

/// Parses a message id string into an i32. Used by edit_message.
pub fn parse_message_id(s: &str) -> Result<i32> {
    s.parse()
        .map_err(|_| BotError::Transport(format!("Invalid message_id for edit: {}", s)))
}
