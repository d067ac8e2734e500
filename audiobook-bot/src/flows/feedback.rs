//! Feedback flow: one free-text message from any user, stored with name and username.

use abot_core::{Keyboard, Result};
use tracing::info;

use super::{FlowContext, FlowState, Input, Step, StoreResultExt};
use crate::callback::Callback;
use crate::menus::button;
use crate::screens::{home_button, Screen};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedbackState {
    AwaitingText,
}

impl FeedbackState {
    pub fn name(&self) -> &'static str {
        match self {
            FeedbackState::AwaitingText => "awaiting_text",
        }
    }
}

fn prompt_keyboard() -> Keyboard {
    Keyboard::new()
        .single(button("❌ Bekor qilish", Callback::CancelFeedback))
        .single(home_button())
}

pub async fn enter(ctx: &FlowContext<'_>) -> Result<Option<FlowState>> {
    ctx.show(&Screen::new(
        "💬 Fikringizni yozib yuboring. Taklif, tanqid yoki minnatdorchilik bo‘lishi mumkin.\n\n✍️ Yozib bo‘lgach, yuboring.\n\n👇 Pastdagi tugmalar orqali bekor qilishingiz yoki menyuga qaytishingiz mumkin.",
        prompt_keyboard(),
    ))
    .await?;
    Ok(Some(FlowState::Feedback(FeedbackState::AwaitingText)))
}

pub async fn step(
    ctx: &FlowContext<'_>,
    state: FeedbackState,
    input: Input<'_>,
) -> Result<Step<FeedbackState>> {
    match input {
        Input::Click(Callback::CancelFeedback) => {
            ctx.show(&Screen::new(
                "❌ Fikr bildirish bekor qilindi.\n\nQuyidagi tugma orqali asosiy menyuga qaytishingiz mumkin:",
                Keyboard::new().single(home_button()),
            ))
            .await?;
            Ok(Step::Done)
        }
        Input::Click(_) => Ok(Step::Unhandled(state)),
        Input::Text(text) => {
            let user = ctx.user;
            let name = user.full_name();
            let stored = ctx
                .identity
                .record_feedback(user.id, name.trim(), user.username.as_deref(), text)
                .await
                .db()?;
            if !stored {
                ctx.send(&Screen::new(
                    "❌ Fikr bo‘sh bo‘lmasin. Qayta yozib yuboring.",
                    prompt_keyboard(),
                ))
                .await?;
                return Ok(Step::Next(state));
            }
            info!(user_id = user.id, "Feedback received");
            ctx.send(&Screen::new("✅ Fikringiz uchun rahmat!", Keyboard::new()))
                .await?;
            ctx.send(&Screen::new(
                "Yana nimadir qilishni istaysizmi?",
                Keyboard::new().single(home_button()),
            ))
            .await?;
            Ok(Step::Done)
        }
        Input::Media { .. } | Input::Unsupported => {
            ctx.send(&Screen::new(
                "✍️ Iltimos, fikringizni matn ko‘rinishida yuboring.",
                prompt_keyboard(),
            ))
            .await?;
            Ok(Step::Next(state))
        }
    }
}
