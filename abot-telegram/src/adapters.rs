//! Adapters from Telegram (teloxide) types to abot_core types.
//! Depends only on teloxide and abot_core type definitions.

use abot_core::{Chat, Content, Event, EventKind, FileRef, Media, MediaKind, User};

/// Wraps a teloxide User for conversion to core [`User`].
pub struct TelegramUserWrapper<'a>(pub &'a teloxide::types::User);

impl<'a> TelegramUserWrapper<'a> {
    pub fn to_core(&self) -> User {
        User {
            id: self.0.id.0 as i64,
            username: self.0.username.clone(),
            first_name: Some(self.0.first_name.clone()),
            last_name: self.0.last_name.clone(),
        }
    }
}

fn to_core_chat(chat: &teloxide::types::Chat) -> Chat {
    let chat_type = if chat.is_private() {
        "private"
    } else if chat.is_supergroup() {
        "supergroup"
    } else if chat.is_group() {
        "group"
    } else if chat.is_channel() {
        "channel"
    } else {
        "unknown"
    };
    Chat {
        id: chat.id.0,
        chat_type: chat_type.to_string(),
    }
}

fn anonymous_user() -> User {
    User {
        id: 0,
        username: None,
        first_name: None,
        last_name: None,
    }
}

/// Splits `/name@bot args` into `("name", "args")`. Returns None when `text` is not a command.
pub fn parse_command(text: &str) -> Option<(String, String)> {
    let rest = text.strip_prefix('/')?;
    let (head, args) = match rest.split_once(char::is_whitespace) {
        Some((head, args)) => (head, args.trim()),
        None => (rest, ""),
    };
    let name = head.split('@').next().unwrap_or(head);
    if name.is_empty() {
        return None;
    }
    Some((name.to_lowercase(), args.to_string()))
}

/// Wraps a teloxide Message for conversion to a core [`Event`] (command or message).
pub struct TelegramMessageWrapper<'a>(pub &'a teloxide::types::Message);

impl<'a> TelegramMessageWrapper<'a> {
    pub fn to_core(&self) -> Event {
        let msg = self.0;
        let user = msg
            .from
            .as_ref()
            .map(|u| TelegramUserWrapper(u).to_core())
            .unwrap_or_else(anonymous_user);

        let kind = match msg.text().and_then(parse_command) {
            Some((name, args)) => EventKind::Command { name, args },
            None => EventKind::Message {
                message_id: msg.id.to_string(),
                content: self.content(),
            },
        };

        Event {
            id: msg.id.to_string(),
            user,
            chat: to_core_chat(&msg.chat),
            kind,
            created_at: chrono::Utc::now(),
        }
    }

    /// Text, one of the five supported media kinds (largest photo size), or Unsupported.
    fn content(&self) -> Content {
        let msg = self.0;
        if let Some(text) = msg.text() {
            return Content::Text(text.to_string());
        }
        let media = if let Some(photo) = msg.photo().and_then(|sizes| sizes.last()) {
            Some((MediaKind::Photo, photo.file.id.0.clone()))
        } else if let Some(doc) = msg.document() {
            Some((MediaKind::Document, doc.file.id.0.clone()))
        } else if let Some(audio) = msg.audio() {
            Some((MediaKind::Audio, audio.file.id.0.clone()))
        } else if let Some(voice) = msg.voice() {
            Some((MediaKind::Voice, voice.file.id.0.clone()))
        } else {
            msg.video()
                .map(|video| (MediaKind::Video, video.file.id.0.clone()))
        };
        match media {
            Some((kind, file_id)) => Content::Media {
                media: Media {
                    kind,
                    file: FileRef::Id(file_id),
                },
                caption: msg.caption().map(|c| c.to_string()),
            },
            None => Content::Unsupported,
        }
    }
}

/// Wraps a teloxide CallbackQuery for conversion to a core callback [`Event`].
pub struct TelegramCallbackWrapper<'a>(pub &'a teloxide::types::CallbackQuery);

impl<'a> TelegramCallbackWrapper<'a> {
    pub fn to_core(&self) -> Event {
        let q = self.0;
        let user = TelegramUserWrapper(&q.from).to_core();
        let chat = q
            .message
            .as_ref()
            .map(|m| to_core_chat(m.chat()))
            .unwrap_or_else(|| Chat::private(user.id));
        let message_id = q.message.as_ref().map(|m| m.id().to_string());

        Event {
            id: q.id.to_string(),
            user,
            chat,
            kind: EventKind::Callback {
                data: q.data.clone().unwrap_or_default(),
                message_id,
            },
            created_at: chrono::Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// **Test: TelegramUserWrapper converts teloxide User to core User with correct id, username, first_name, last_name.**
    #[test]
    fn test_telegram_user_wrapper_to_core() {
        let user = teloxide::types::User {
            id: teloxide::types::UserId(123),
            is_bot: false,
            first_name: "Test".to_string(),
            last_name: Some("User".to_string()),
            username: Some("testuser".to_string()),
            language_code: Some("en".to_string()),
            is_premium: false,
            added_to_attachment_menu: false,
        };

        let core_user = TelegramUserWrapper(&user).to_core();

        assert_eq!(core_user.id, 123);
        assert_eq!(core_user.username, Some("testuser".to_string()));
        assert_eq!(core_user.first_name, Some("Test".to_string()));
        assert_eq!(core_user.last_name, Some("User".to_string()));
    }

    #[test]
    fn test_parse_command() {
        assert_eq!(
            parse_command("/start"),
            Some(("start".to_string(), String::new()))
        );
        assert_eq!(
            parse_command("/Admin@audio_bot  extra args "),
            Some(("admin".to_string(), "extra args".to_string()))
        );
        assert_eq!(parse_command("hello"), None);
        assert_eq!(parse_command("/"), None);
    }
}
