//! Add-part flow: pick a book, then send any number of part links until finished.

use abot_core::{Keyboard, Result};
use storage::part_label;
use teloxide::utils::html::escape;
use tracing::info;

use super::{expect_buttons, FlowContext, FlowState, Input, Step, StoreResultExt};
use crate::callback::Callback;
use crate::link::{is_valid_part_link, PART_LINK_EXAMPLE};
use crate::menus::button;
use crate::screens::{self, admin_home_button, Screen};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddPartState {
    SelectingBook,
    AwaitingLink { book_id: String, added: usize },
}

impl AddPartState {
    pub fn name(&self) -> &'static str {
        match self {
            AddPartState::SelectingBook => "selecting_book",
            AddPartState::AwaitingLink { .. } => "awaiting_link",
        }
    }
}

fn link_keyboard() -> Keyboard {
    Keyboard::new()
        .single(button("🏁 Tugatish", Callback::CancelAddPart))
        .single(button("🔙 Ortga", Callback::AdminAddPart))
}

pub async fn enter(ctx: &FlowContext<'_>) -> Result<Option<FlowState>> {
    let books = ctx.catalog.list_books().await.db()?;
    if books.is_empty() {
        ctx.show(&screens::no_books_admin()).await?;
        return Ok(None);
    }
    ctx.show(&screens::book_picker(
        "➕ Qism qo‘shiladigan kitobni tanlang:",
        &books,
        Callback::AddPartBook,
    ))
    .await?;
    Ok(Some(FlowState::AddPart(AddPartState::SelectingBook)))
}

pub async fn step(
    ctx: &FlowContext<'_>,
    state: AddPartState,
    input: Input<'_>,
) -> Result<Step<AddPartState>> {
    use AddPartState::*;

    match (state, input) {
        (_, Input::Click(Callback::CancelAddPart)) => {
            ctx.show(&Screen::new(
                "✔️ Qism qo‘shish yakunlandi.",
                Keyboard::new().single(admin_home_button()),
            ))
            .await?;
            Ok(Step::Done)
        }
        (SelectingBook, Input::Click(Callback::AddPartBook(book_id))) => {
            let Some(book) = ctx.catalog.get_book(book_id).await.db()? else {
                ctx.show(&screens::not_found(Callback::AdminPanel)).await?;
                return Ok(Step::Done);
            };
            ctx.show(&Screen::new(
                format!(
                    "📖 <b>{}</b>\n\n🎧 Qism havolasini yuboring:\n<code>{}</code>",
                    escape(&book.title),
                    PART_LINK_EXAMPLE
                ),
                link_keyboard(),
            ))
            .await?;
            Ok(Step::Next(AwaitingLink {
                book_id: book.id,
                added: 0,
            }))
        }
        (state @ SelectingBook, input) => expect_buttons(ctx, state, input).await,

        (AwaitingLink { book_id, added }, Input::Text(text)) => {
            let link = text.trim();
            if !is_valid_part_link(link) {
                ctx.send(&Screen::new(
                    format!("❌ Noto‘g‘ri havola. <code>{}</code>", PART_LINK_EXAMPLE),
                    link_keyboard(),
                ))
                .await?;
                return Ok(Step::Next(AwaitingLink { book_id, added }));
            }
            if ctx.catalog.get_book(&book_id).await.db()?.is_none() {
                ctx.send(&screens::not_found(Callback::AdminPanel)).await?;
                return Ok(Step::Done);
            }
            let ordinal = ctx.catalog.list_parts(&book_id).await.db()?.len() + 1;
            let label = part_label(ordinal);
            ctx.catalog.add_part(&book_id, &label, link).await.db()?;
            info!(book_id = %book_id, ordinal = ordinal, "Part added");
            ctx.send(&Screen::new(
                format!("✅ Qism qo‘shildi. ({})", label),
                link_keyboard(),
            ))
            .await?;
            Ok(Step::Next(AwaitingLink {
                book_id,
                added: added + 1,
            }))
        }
        (state @ AwaitingLink { .. }, Input::Click(_)) => Ok(Step::Unhandled(state)),
        (state @ AwaitingLink { .. }, _) => {
            ctx.send(&Screen::new(
                format!(
                    "✍️ Havolani matn ko‘rinishida yuboring:\n<code>{}</code>",
                    PART_LINK_EXAMPLE
                ),
                link_keyboard(),
            ))
            .await?;
            Ok(Step::Next(state))
        }
    }
}
