//! Core types: user, chat, inbound event, media, handler response, and Handler trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User identity (id, username, names).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl User {
    /// First and last name joined by a space; empty when neither is known.
    pub fn full_name(&self) -> String {
        [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Chat (channel or private) identity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Chat {
    pub id: i64,
    pub chat_type: String,
}

impl Chat {
    /// Private chat with a user; the chat id equals the user id.
    pub fn private(user_id: i64) -> Self {
        Self {
            id: user_id,
            chat_type: "private".to_string(),
        }
    }
}

/// Where a media file comes from: a platform file id (re-send) or a public URL.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum FileRef {
    Id(String),
    Url(String),
}

/// The five media kinds a broadcast may carry; audio parts are sent as [`MediaKind::Audio`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum MediaKind {
    Photo,
    Document,
    Audio,
    Voice,
    Video,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Photo => "photo",
            MediaKind::Document => "document",
            MediaKind::Audio => "audio",
            MediaKind::Voice => "voice",
            MediaKind::Video => "video",
        }
    }
}

/// A media attachment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Media {
    pub kind: MediaKind,
    pub file: FileRef,
}

/// Body of an inbound chat message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum Content {
    Text(String),
    Media {
        media: Media,
        caption: Option<String>,
    },
    /// Stickers, locations, polls and anything else the bot does not handle.
    Unsupported,
}

impl Content {
    pub fn text(&self) -> Option<&str> {
        match self {
            Content::Text(t) => Some(t.as_str()),
            _ => None,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Content::Text(_) => "text",
            Content::Media { media, .. } => media.kind.as_str(),
            Content::Unsupported => "unsupported",
        }
    }
}

/// What happened: a slash command, a button click with its opaque payload, or a plain message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum EventKind {
    Command {
        name: String,
        args: String,
    },
    Callback {
        data: String,
        /// Message carrying the clicked keyboard; target for in-place edits.
        message_id: Option<String>,
    },
    Message {
        message_id: String,
        content: Content,
    },
}

/// A single inbound chat event with its sender and chat.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub user: User,
    pub chat: Chat,
    pub kind: EventKind,
    pub created_at: DateTime<Utc>,
}

impl Event {
    /// Short label for logs.
    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            EventKind::Command { .. } => "command",
            EventKind::Callback { .. } => "callback",
            EventKind::Message { .. } => "message",
        }
    }
}

/// Handler result for the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerResponse {
    /// Pass to next handler.
    Continue,
    /// The event was handled; end the handle phase.
    Stop,
}

/// Single handler concept: optional before / handle / after. Chain runs all before → handle until Stop → all after (reverse).
#[async_trait]
pub trait Handler: Send + Sync {
    /// Runs before the handle phase. Return false to stop the chain.
    async fn before(&self, _event: &Event) -> crate::error::Result<bool> {
        Ok(true)
    }
    /// Processes the event. Return Stop to end the handle phase. Default: Continue.
    async fn handle(&self, _event: &Event) -> crate::error::Result<HandlerResponse> {
        Ok(HandlerResponse::Continue)
    }
    /// Runs after the handle phase (reverse order), with the final response.
    async fn after(
        &self,
        _event: &Event,
        _response: &HandlerResponse,
    ) -> crate::error::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_name_joins_known_parts() {
        let user = User {
            id: 1,
            username: None,
            first_name: Some("Ali".to_string()),
            last_name: Some("Valiyev".to_string()),
        };
        assert_eq!(user.full_name(), "Ali Valiyev");

        let first_only = User {
            last_name: None,
            ..user.clone()
        };
        assert_eq!(first_only.full_name(), "Ali");

        let nameless = User {
            first_name: None,
            last_name: None,
            ..user
        };
        assert_eq!(nameless.full_name(), "");
    }

    #[test]
    fn test_content_kind_name() {
        assert_eq!(Content::Text("hi".into()).kind_name(), "text");
        let voice = Content::Media {
            media: Media {
                kind: MediaKind::Voice,
                file: FileRef::Id("f1".into()),
            },
            caption: None,
        };
        assert_eq!(voice.kind_name(), "voice");
        assert!(voice.text().is_none());
        assert_eq!(Content::Unsupported.kind_name(), "unsupported");
    }
}
