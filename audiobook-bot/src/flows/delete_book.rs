//! Delete-book flow: pick a book, confirm. Parts and genre links go with it.

use abot_core::{Keyboard, Result};
use teloxide::utils::html::escape;
use tracing::info;

use super::{expect_buttons, FlowContext, FlowState, Input, Step, StoreResultExt};
use crate::callback::Callback;
use crate::menus::button;
use crate::screens::{self, Screen};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteBookState {
    SelectingBook,
    Confirming { book_id: String },
}

impl DeleteBookState {
    pub fn name(&self) -> &'static str {
        match self {
            DeleteBookState::SelectingBook => "selecting_book",
            DeleteBookState::Confirming { .. } => "confirming",
        }
    }
}

pub async fn enter(ctx: &FlowContext<'_>) -> Result<Option<FlowState>> {
    let books = ctx.catalog.list_books().await.db()?;
    if books.is_empty() {
        ctx.show(&screens::no_books_admin()).await?;
        return Ok(None);
    }
    ctx.show(&screens::book_picker(
        "🗑 Qaysi kitobni o‘chirmoqchisiz?",
        &books,
        Callback::DeleteBook,
    ))
    .await?;
    Ok(Some(FlowState::DeleteBook(DeleteBookState::SelectingBook)))
}

pub async fn step(
    ctx: &FlowContext<'_>,
    state: DeleteBookState,
    input: Input<'_>,
) -> Result<Step<DeleteBookState>> {
    use DeleteBookState::*;

    match (state, input) {
        (SelectingBook, Input::Click(Callback::DeleteBook(book_id))) => {
            let Some(book) = ctx.catalog.get_book(book_id).await.db()? else {
                ctx.show(&screens::not_found(Callback::AdminListBooks)).await?;
                return Ok(Step::Done);
            };
            ctx.show(&Screen::new(
                format!("⚠️ <b>{}</b> kitobi o‘chirilsinmi?", escape(&book.title)),
                Keyboard::new()
                    .single(button("✅ Ha, o‘chirish", Callback::ConfirmDeleteBook))
                    .single(button("❌ Bekor qilish", Callback::AdminPanel)),
            ))
            .await?;
            Ok(Step::Next(Confirming { book_id: book.id }))
        }
        (Confirming { book_id }, Input::Click(Callback::ConfirmDeleteBook)) => {
            if ctx.catalog.delete_book(&book_id).await.db()? {
                info!(book_id = %book_id, "Book deleted");
                ctx.show(&Screen::with_back(
                    "✅ Kitob o‘chirildi.",
                    "🔙 Ortga",
                    Callback::AdminListBooks,
                ))
                .await?;
            } else {
                ctx.show(&screens::not_found(Callback::AdminListBooks)).await?;
            }
            Ok(Step::Done)
        }
        (state, input) => expect_buttons(ctx, state, input).await,
    }
}
