//! Broadcast flow: collect one message, preview it, then fan it out to every registered user.
//! Each recipient is tried independently; failures are counted, never fatal.

use abot_core::{Bot, Chat, Keyboard, Media, MediaKind, Result};
use std::time::Duration;
use teloxide::utils::html::escape;
use tracing::{info, instrument, warn};

use super::{FlowContext, FlowState, Input, Step, StoreResultExt};
use crate::callback::Callback;
use crate::menus::button;
use crate::screens::{admin_home_button, Screen};

/// The message to fan out, already HTML-escaped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BroadcastPayload {
    Text(String),
    Media {
        media: Media,
        caption: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BroadcastState {
    AwaitingMessage,
    Confirming { payload: BroadcastPayload },
}

impl BroadcastState {
    pub fn name(&self) -> &'static str {
        match self {
            BroadcastState::AwaitingMessage => "awaiting_message",
            BroadcastState::Confirming { .. } => "confirming",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    pub total: usize,
    pub sent: usize,
    pub failed: usize,
}

impl BroadcastReport {
    pub fn text(&self) -> String {
        format!(
            "✅ Xabar yuborildi!\n\n👥 Umumiy foydalanuvchilar: {}\n📬 Yuborilganlar: {}\n❌ Xatoliklar: {}",
            self.total, self.sent, self.failed
        )
    }
}

/// Sends `payload` to each recipient in order, sleeping `delay` between sends.
#[instrument(skip(bot, recipients, payload), fields(total = recipients.len()))]
pub async fn deliver(
    bot: &dyn Bot,
    recipients: &[i64],
    payload: &BroadcastPayload,
    delay: Duration,
) -> BroadcastReport {
    let mut report = BroadcastReport {
        total: recipients.len(),
        ..Default::default()
    };
    for (i, &user_id) in recipients.iter().enumerate() {
        let chat = Chat::private(user_id);
        let result = match payload {
            BroadcastPayload::Text(text) => bot.send_message(&chat, text, None).await,
            BroadcastPayload::Media { media, caption } => {
                bot.send_media(&chat, media, caption.as_deref(), None).await
            }
        };
        match result {
            Ok(_) => report.sent += 1,
            Err(e) => {
                report.failed += 1;
                warn!(user_id = user_id, error = %e, "Broadcast delivery failed");
            }
        }
        if !delay.is_zero() && i + 1 < recipients.len() {
            tokio::time::sleep(delay).await;
        }
    }
    info!(sent = report.sent, failed = report.failed, "Broadcast finished");
    report
}

fn confirm_keyboard() -> Keyboard {
    Keyboard::new()
        .single(button("✅ Ha, yubor", Callback::ConfirmBroadcast))
        .single(button("❌ Bekor qilish", Callback::CancelBroadcast))
}

fn preview_prompt(kind: MediaKind) -> &'static str {
    match kind {
        MediaKind::Photo => "📸 Xabarni yuborishni tasdiqlaysizmi?",
        MediaKind::Document => "📄 Xabarni yuborishni tasdiqlaysizmi?",
        MediaKind::Audio => "🎵 Xabarni yuborishni tasdiqlaysizmi?",
        MediaKind::Voice => "🎙️ Xabarni yuborishni tasdiqlaysizmi?",
        MediaKind::Video => "🎥 Xabarni yuborishni tasdiqlaysizmi?",
    }
}

fn ask_message() -> Screen {
    Screen::new(
        "✍️ Yubormoqchi bo‘lgan xabaringizni (matn yoki media) kiriting:",
        Keyboard::new().single(button("❌ Bekor qilish", Callback::CancelBroadcast)),
    )
}

fn finished(text: &str) -> Screen {
    Screen::new(text, Keyboard::new().single(admin_home_button()))
}

pub async fn enter(ctx: &FlowContext<'_>) -> Result<Option<FlowState>> {
    ctx.show(&ask_message()).await?;
    Ok(Some(FlowState::Broadcast(BroadcastState::AwaitingMessage)))
}

pub async fn step(
    ctx: &FlowContext<'_>,
    state: BroadcastState,
    input: Input<'_>,
) -> Result<Step<BroadcastState>> {
    use BroadcastState::*;

    if let Input::Click(Callback::CancelBroadcast) = input {
        ctx.show(&finished("❌ Xabar yuborish bekor qilindi.")).await?;
        return Ok(Step::Done);
    }

    match (state, input) {
        (AwaitingMessage, Input::Text(text)) => {
            if text.trim().is_empty() {
                ctx.send(&ask_message()).await?;
                return Ok(Step::Next(AwaitingMessage));
            }
            let body = escape(text);
            ctx.send(&Screen::new(
                format!("📨 Matn yuborilsinmi?\n\n{}", body),
                confirm_keyboard(),
            ))
            .await?;
            Ok(Step::Next(Confirming {
                payload: BroadcastPayload::Text(body),
            }))
        }
        (AwaitingMessage, Input::Media { media, caption }) => {
            let caption = caption.filter(|c| !c.trim().is_empty()).map(escape);
            let prompt = preview_prompt(media.kind);
            let preview = match &caption {
                Some(c) => format!("{}\n\n{}", c, prompt),
                None => prompt.to_string(),
            };
            ctx.bot
                .send_media(ctx.chat, media, Some(&preview), Some(&confirm_keyboard()))
                .await?;
            Ok(Step::Next(Confirming {
                payload: BroadcastPayload::Media {
                    media: media.clone(),
                    caption,
                },
            }))
        }
        (AwaitingMessage, Input::Unsupported) => {
            ctx.send(&Screen::new(
                "❌ Ushbu turdagi fayl qo‘llab-quvvatlanmaydi.",
                Keyboard::new().single(button("❌ Bekor qilish", Callback::CancelBroadcast)),
            ))
            .await?;
            Ok(Step::Next(AwaitingMessage))
        }
        (AwaitingMessage, Input::Click(_)) => Ok(Step::Unhandled(AwaitingMessage)),

        (Confirming { payload }, Input::Click(Callback::ConfirmBroadcast)) => {
            let recipients: Vec<i64> = ctx
                .identity
                .list_users()
                .await
                .db()?
                .into_iter()
                .map(|u| u.id)
                .collect();
            info!(admin_id = ctx.user.id, recipients = recipients.len(), "Broadcast confirmed");
            let report = deliver(ctx.bot, &recipients, &payload, ctx.broadcast_delay).await;
            ctx.show(&Screen::new(
                report.text(),
                Keyboard::new()
                    .single(admin_home_button())
                    .single(button("📨 Yana yuborish", Callback::AdminBroadcast)),
            ))
            .await?;
            Ok(Step::Done)
        }
        (state @ Confirming { .. }, Input::Click(_)) => Ok(Step::Unhandled(state)),
        (state @ Confirming { .. }, _) => {
            ctx.send(&Screen::new(
                "👆 Yuborishni tasdiqlang yoki bekor qiling.",
                confirm_keyboard(),
            ))
            .await?;
            Ok(Step::Next(state))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_text() {
        let report = BroadcastReport {
            total: 5,
            sent: 3,
            failed: 2,
        };
        let text = report.text();
        assert!(text.contains("Umumiy foydalanuvchilar: 5"));
        assert!(text.contains("Yuborilganlar: 3"));
        assert!(text.contains("Xatoliklar: 2"));
    }

    #[test]
    fn test_every_media_kind_has_prompt() {
        for kind in [
            MediaKind::Photo,
            MediaKind::Document,
            MediaKind::Audio,
            MediaKind::Voice,
            MediaKind::Video,
        ] {
            assert!(preview_prompt(kind).ends_with("tasdiqlaysizmi?"));
        }
    }
}
