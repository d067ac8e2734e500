//! Wraps teloxide::Bot and implements [`abot_core::Bot`]. Production code sends messages via Telegram; tests substitute another Bot impl.

use abot_core::{parse_message_id, Bot as CoreBot, BotError, Chat, FileRef, Keyboard, Media, MediaKind, Result};
use async_trait::async_trait;
use teloxide::{
    prelude::*,
    types::{ChatId, FileId, InlineKeyboardButton, InlineKeyboardMarkup, InputFile, MessageId, ParseMode},
    ApiError, RequestError,
};

/// Thin wrapper around teloxide::Bot that implements abot-core's Bot trait.
pub struct TelegramBotAdapter {
    bot: teloxide::Bot,
}

/// Converts a core keyboard to callback-button markup.
pub fn to_inline_markup(keyboard: &Keyboard) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(keyboard.rows.iter().map(|row| {
        row.iter()
            .map(|b| InlineKeyboardButton::callback(b.label.clone(), b.payload.clone()))
            .collect::<Vec<_>>()
    }))
}

fn transport(e: RequestError) -> BotError {
    BotError::Transport(e.to_string())
}

fn input_file(file: &FileRef) -> Result<InputFile> {
    match file {
        FileRef::Id(id) => Ok(InputFile::file_id(FileId(id.clone()))),
        FileRef::Url(url) => {
            let url = reqwest::Url::parse(url)
                .map_err(|e| BotError::Transport(format!("Invalid media url {}: {}", url, e)))?;
            Ok(InputFile::url(url))
        }
    }
}

/// Applies HTML parse mode, optional caption and optional keyboard to a media request, then sends it.
macro_rules! send_captioned {
    ($req:expr, $caption:expr, $keyboard:expr) => {{
        let mut req = $req.parse_mode(ParseMode::Html);
        if let Some(caption) = $caption {
            req = req.caption(caption.to_string());
        }
        if let Some(keyboard) = $keyboard {
            req = req.reply_markup(to_inline_markup(keyboard));
        }
        req.await.map_err(transport)?
    }};
}

impl TelegramBotAdapter {
    /// Creates an adapter from an existing teloxide Bot.
    pub fn new(bot: teloxide::Bot) -> Self {
        Self { bot }
    }

    /// Returns the underlying teloxide::Bot for direct API use when needed.
    pub fn inner(&self) -> &teloxide::Bot {
        &self.bot
    }
}

#[async_trait]
impl CoreBot for TelegramBotAdapter {
    async fn send_message(
        &self,
        chat: &Chat,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<String> {
        let mut req = self
            .bot
            .send_message(ChatId(chat.id), text.to_string())
            .parse_mode(ParseMode::Html);
        if let Some(keyboard) = keyboard {
            req = req.reply_markup(to_inline_markup(keyboard));
        }
        let sent = req.await.map_err(transport)?;
        Ok(sent.id.to_string())
    }

    async fn edit_message(
        &self,
        chat: &Chat,
        message_id: &str,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<()> {
        let id = parse_message_id(message_id)?;
        let mut req = self
            .bot
            .edit_message_text(ChatId(chat.id), MessageId(id), text.to_string())
            .parse_mode(ParseMode::Html);
        if let Some(keyboard) = keyboard {
            req = req.reply_markup(to_inline_markup(keyboard));
        }
        match req.await {
            Ok(_) => Ok(()),
            // Re-rendering an unchanged menu is not a failure.
            Err(RequestError::Api(ApiError::MessageNotModified)) => Ok(()),
            Err(e) => Err(transport(e)),
        }
    }

    async fn send_media(
        &self,
        chat: &Chat,
        media: &Media,
        caption: Option<&str>,
        keyboard: Option<&Keyboard>,
    ) -> Result<String> {
        let chat_id = ChatId(chat.id);
        let file = input_file(&media.file)?;
        let sent = match media.kind {
            MediaKind::Photo => send_captioned!(self.bot.send_photo(chat_id, file), caption, keyboard),
            MediaKind::Document => {
                send_captioned!(self.bot.send_document(chat_id, file), caption, keyboard)
            }
            MediaKind::Audio => send_captioned!(self.bot.send_audio(chat_id, file), caption, keyboard),
            MediaKind::Voice => send_captioned!(self.bot.send_voice(chat_id, file), caption, keyboard),
            MediaKind::Video => send_captioned!(self.bot.send_video(chat_id, file), caption, keyboard),
        };
        Ok(sent.id.to_string())
    }
}
