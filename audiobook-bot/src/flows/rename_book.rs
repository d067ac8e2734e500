//! Rename-book flow: pick a book, send the new title.

use abot_core::{Keyboard, Result};
use teloxide::utils::html::escape;
use tracing::info;

use super::{expect_buttons, FlowContext, FlowState, Input, Step, StoreResultExt};
use crate::callback::Callback;
use crate::menus::button;
use crate::screens::{self, admin_home_button, Screen};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenameBookState {
    SelectingBook,
    AwaitingTitle { book_id: String },
}

impl RenameBookState {
    pub fn name(&self) -> &'static str {
        match self {
            RenameBookState::SelectingBook => "selecting_book",
            RenameBookState::AwaitingTitle { .. } => "awaiting_title",
        }
    }
}

fn back_keyboard() -> Keyboard {
    Keyboard::new().single(button("🔙 Ortga", Callback::AdminRenameBook))
}

pub async fn enter(ctx: &FlowContext<'_>) -> Result<Option<FlowState>> {
    let books = ctx.catalog.list_books().await.db()?;
    if books.is_empty() {
        ctx.show(&screens::no_books_admin()).await?;
        return Ok(None);
    }
    ctx.show(&screens::book_picker(
        "✏️ Nomini tahrirlamoqchi bo‘lgan kitobni tanlang:",
        &books,
        Callback::RenameBook,
    ))
    .await?;
    Ok(Some(FlowState::RenameBook(RenameBookState::SelectingBook)))
}

pub async fn step(
    ctx: &FlowContext<'_>,
    state: RenameBookState,
    input: Input<'_>,
) -> Result<Step<RenameBookState>> {
    use RenameBookState::*;

    match (state, input) {
        (SelectingBook, Input::Click(Callback::RenameBook(book_id))) => {
            let Some(book) = ctx.catalog.get_book(book_id).await.db()? else {
                ctx.show(&screens::not_found(Callback::AdminPanel)).await?;
                return Ok(Step::Done);
            };
            ctx.show(&Screen::new(
                format!(
                    "Yangi nomni yuboring.\n\nHozirgi nom: <b>{}</b>",
                    escape(&book.title)
                ),
                back_keyboard(),
            ))
            .await?;
            Ok(Step::Next(AwaitingTitle { book_id: book.id }))
        }
        (state @ SelectingBook, input) => expect_buttons(ctx, state, input).await,

        (AwaitingTitle { book_id }, Input::Text(text)) => {
            let title = text.trim();
            if title.is_empty() {
                ctx.send(&Screen::new(
                    "❌ Nomi bo‘sh bo‘lmasin. Qayta yuboring.",
                    back_keyboard(),
                ))
                .await?;
                return Ok(Step::Next(AwaitingTitle { book_id }));
            }
            if ctx.catalog.rename_book(&book_id, title).await.db()? {
                info!(book_id = %book_id, title = %title, "Book renamed");
                ctx.send(&Screen::new(
                    "✅ Kitob nomi yangilandi.",
                    Keyboard::new().single(admin_home_button()),
                ))
                .await?;
            } else {
                ctx.send(&screens::not_found(Callback::AdminPanel)).await?;
            }
            Ok(Step::Done)
        }
        (state @ AwaitingTitle { .. }, Input::Click(_)) => Ok(Step::Unhandled(state)),
        (state @ AwaitingTitle { .. }, _) => {
            ctx.send(&Screen::new(
                "✍️ Yangi nomni matn ko‘rinishida yuboring.",
                back_keyboard(),
            ))
            .await?;
            Ok(Step::Next(state))
        }
    }
}
