//! RecordingBot and a router harness for flow tests.
//!
//! - `RecordingBot` implements `abot_core::Bot` in memory and records every send/edit.
//! - Chats listed in `failing_chats` reject every send; `fail_edits` / `fail_media` make those calls fail.
//! - `Harness` wires the router over an in-memory SQLite database shared by both stores.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use abot_core::{
    Bot, BotError, Chat, Content, Event, EventKind, Handler, Keyboard, Media, Result, User,
};
use async_trait::async_trait;
use audiobook_bot::{build_router, BaseConfig, BotConfig, BotRouter, BotSettings};
use chrono::Utc;
use storage::{CatalogRepository, IdentityRepository, SqlitePoolManager};

/// One outgoing call.
#[derive(Debug, Clone, PartialEq)]
pub enum Sent {
    Message {
        chat_id: i64,
        text: String,
        keyboard: Option<Keyboard>,
    },
    Edit {
        chat_id: i64,
        message_id: String,
        text: String,
        keyboard: Option<Keyboard>,
    },
    Media {
        chat_id: i64,
        media: Media,
        caption: Option<String>,
        keyboard: Option<Keyboard>,
    },
}

impl Sent {
    pub fn chat_id(&self) -> i64 {
        match self {
            Sent::Message { chat_id, .. } | Sent::Edit { chat_id, .. } | Sent::Media { chat_id, .. } => {
                *chat_id
            }
        }
    }

    /// Message text, or the caption for media.
    pub fn text(&self) -> &str {
        match self {
            Sent::Message { text, .. } | Sent::Edit { text, .. } => text,
            Sent::Media { caption, .. } => caption.as_deref().unwrap_or(""),
        }
    }

    pub fn keyboard(&self) -> Option<&Keyboard> {
        match self {
            Sent::Message { keyboard, .. }
            | Sent::Edit { keyboard, .. }
            | Sent::Media { keyboard, .. } => keyboard.as_ref(),
        }
    }
}

#[derive(Default)]
pub struct RecordingBot {
    sent: Mutex<Vec<Sent>>,
    next_id: AtomicI64,
    failing_chats: HashSet<i64>,
    fail_edits: bool,
    fail_media: bool,
}

impl RecordingBot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_for(chats: impl IntoIterator<Item = i64>) -> Self {
        Self {
            failing_chats: chats.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn with_failing_edits(mut self) -> Self {
        self.fail_edits = true;
        self
    }

    pub fn with_failing_media(mut self) -> Self {
        self.fail_media = true;
        self
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    pub fn last(&self) -> Sent {
        self.sent
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("nothing was sent")
    }

    pub fn last_text(&self) -> String {
        self.last().text().to_string()
    }

    pub fn last_keyboard(&self) -> Keyboard {
        self.last().keyboard().cloned().unwrap_or_default()
    }

    pub fn texts(&self) -> Vec<String> {
        self.sent().iter().map(|s| s.text().to_string()).collect()
    }

    pub fn sent_to(&self, chat_id: i64) -> Vec<Sent> {
        self.sent()
            .into_iter()
            .filter(|s| s.chat_id() == chat_id)
            .collect()
    }

    pub fn clear(&self) {
        self.sent.lock().unwrap().clear();
    }

    fn check_chat(&self, chat: &Chat) -> Result<()> {
        if self.failing_chats.contains(&chat.id) {
            Err(BotError::Transport(format!("chat {} blocked the bot", chat.id)))
        } else {
            Ok(())
        }
    }

    fn record(&self, sent: Sent) -> String {
        self.sent.lock().unwrap().push(sent);
        (self.next_id.fetch_add(1, Ordering::SeqCst) + 100).to_string()
    }
}

#[async_trait]
impl Bot for RecordingBot {
    async fn send_message(&self, chat: &Chat, text: &str, keyboard: Option<&Keyboard>) -> Result<String> {
        self.check_chat(chat)?;
        Ok(self.record(Sent::Message {
            chat_id: chat.id,
            text: text.to_string(),
            keyboard: keyboard.cloned(),
        }))
    }

    async fn edit_message(
        &self,
        chat: &Chat,
        message_id: &str,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<()> {
        if self.fail_edits {
            return Err(BotError::Transport("message can't be edited".to_string()));
        }
        self.check_chat(chat)?;
        self.record(Sent::Edit {
            chat_id: chat.id,
            message_id: message_id.to_string(),
            text: text.to_string(),
            keyboard: keyboard.cloned(),
        });
        Ok(())
    }

    async fn send_media(
        &self,
        chat: &Chat,
        media: &Media,
        caption: Option<&str>,
        keyboard: Option<&Keyboard>,
    ) -> Result<String> {
        if self.fail_media {
            return Err(BotError::Transport("wrong file identifier".to_string()));
        }
        self.check_chat(chat)?;
        Ok(self.record(Sent::Media {
            chat_id: chat.id,
            media: media.clone(),
            caption: caption.map(String::from),
            keyboard: keyboard.cloned(),
        }))
    }
}

pub fn test_config(static_admins: &[i64]) -> BotConfig {
    BotConfig {
        base: BaseConfig {
            bot_token: "test_token".to_string(),
            telegram_api_url: None,
            log_file: "logs/test.log".to_string(),
            database_url: "sqlite::memory:".to_string(),
            db_max_connections: 1,
            db_acquire_timeout_secs: 5,
        },
        settings: BotSettings {
            admins: static_admins.to_vec(),
            broadcast_delay_ms: 0,
            admin_username: Some("support".to_string()),
            channel_username: Some("kanal".to_string()),
            ..BotSettings::default()
        },
    }
}

pub fn user(id: i64) -> User {
    User {
        id,
        username: Some(format!("user{}", id)),
        first_name: Some(format!("Test{}", id)),
        last_name: None,
    }
}

fn event(user_id: i64, kind: EventKind) -> Event {
    Event {
        id: format!("evt-{}", user_id),
        user: user(user_id),
        chat: Chat::private(user_id),
        kind,
        created_at: Utc::now(),
    }
}

pub struct Harness {
    pub bot: Arc<RecordingBot>,
    pub catalog: Arc<CatalogRepository>,
    pub identity: Arc<IdentityRepository>,
    pub router: Arc<BotRouter>,
}

impl Harness {
    pub async fn new(static_admins: &[i64]) -> Self {
        Self::with_bot(RecordingBot::new(), static_admins).await
    }

    pub async fn with_bot(bot: RecordingBot, static_admins: &[i64]) -> Self {
        let pool = SqlitePoolManager::new("sqlite::memory:").await.unwrap();
        let catalog = Arc::new(CatalogRepository::from_pool(pool.clone()).await.unwrap());
        let identity = Arc::new(IdentityRepository::from_pool(pool).await.unwrap());
        let bot = Arc::new(bot);
        let router = build_router(
            &test_config(static_admins),
            bot.clone(),
            catalog.clone(),
            identity.clone(),
        );
        Self {
            bot,
            catalog,
            identity,
            router,
        }
    }

    pub async fn command(&self, user_id: i64, name: &str) {
        let kind = EventKind::Command {
            name: name.to_string(),
            args: String::new(),
        };
        self.router.handle(&event(user_id, kind)).await.unwrap();
    }

    pub async fn click(&self, user_id: i64, data: &str) {
        let kind = EventKind::Callback {
            data: data.to_string(),
            message_id: Some("1".to_string()),
        };
        self.router.handle(&event(user_id, kind)).await.unwrap();
    }

    pub async fn text(&self, user_id: i64, text: &str) {
        self.content(user_id, Content::Text(text.to_string())).await;
    }

    pub async fn content(&self, user_id: i64, content: Content) {
        let kind = EventKind::Message {
            message_id: "2".to_string(),
            content,
        };
        self.router.handle(&event(user_id, kind)).await.unwrap();
    }

    /// Current (flow, state) of the user's session.
    pub async fn session(&self, user_id: i64) -> Option<(&'static str, &'static str)> {
        self.router.sessions().describe(user_id).await
    }
}
