//! Delete-part flow: pick a book, pick a part by its current ordinal, confirm.

use abot_core::{Keyboard, Result};
use storage::part_label;
use tracing::info;

use super::{expect_buttons, FlowContext, FlowState, Input, Step, StoreResultExt};
use crate::callback::Callback;
use crate::menus::{button, two_column};
use crate::screens::{self, admin_home_button, Screen};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeletePartState {
    SelectingBook,
    SelectingPart { book_id: String },
    /// `ordinal` is 1-based, as displayed.
    Confirming { book_id: String, ordinal: usize },
}

impl DeletePartState {
    pub fn name(&self) -> &'static str {
        match self {
            DeletePartState::SelectingBook => "selecting_book",
            DeletePartState::SelectingPart { .. } => "selecting_part",
            DeletePartState::Confirming { .. } => "confirming",
        }
    }
}

fn outcome(text: &str) -> Screen {
    Screen::new(text, Keyboard::new().single(admin_home_button()))
}

pub async fn enter(ctx: &FlowContext<'_>) -> Result<Option<FlowState>> {
    let books = ctx.catalog.list_books().await.db()?;
    if books.is_empty() {
        ctx.show(&screens::no_books_admin()).await?;
        return Ok(None);
    }
    ctx.show(&screens::book_picker(
        "🗂 Qaysi kitobdan qism o‘chirmoqchisiz?",
        &books,
        Callback::DelPartBook,
    ))
    .await?;
    Ok(Some(FlowState::DeletePart(DeletePartState::SelectingBook)))
}

pub async fn step(
    ctx: &FlowContext<'_>,
    state: DeletePartState,
    input: Input<'_>,
) -> Result<Step<DeletePartState>> {
    use DeletePartState::*;

    match (state, input) {
        (SelectingBook, Input::Click(Callback::DelPartBook(book_id))) => {
            if ctx.catalog.get_book(book_id).await.db()?.is_none() {
                ctx.show(&screens::not_found(Callback::AdminPanel)).await?;
                return Ok(Step::Done);
            }
            let parts = ctx.catalog.list_parts(book_id).await.db()?;
            if parts.is_empty() {
                ctx.show(&outcome("📭 Bu kitobda hech qanday qism yo‘q.")).await?;
                return Ok(Step::Done);
            }
            let items = (0..parts.len())
                .map(|i| button(part_label(i + 1), Callback::DelPart(i)))
                .collect();
            ctx.show(&Screen::new(
                "🤔 Qaysi qismini o‘chirmoqchisiz?",
                two_column(items, vec![button("🔙 Ortga", Callback::AdminDeletePart)]),
            ))
            .await?;
            Ok(Step::Next(SelectingPart {
                book_id: book_id.clone(),
            }))
        }
        (SelectingPart { book_id }, Input::Click(Callback::DelPart(index))) => {
            let count = ctx.catalog.list_parts(&book_id).await.db()?.len();
            if *index >= count {
                ctx.show(&screens::not_found(Callback::AdminPanel)).await?;
                return Ok(Step::Done);
            }
            let ordinal = index + 1;
            ctx.show(&Screen::new(
                format!("⚠️ {} o‘chirilsinmi?", part_label(ordinal)),
                Keyboard::new()
                    .single(button("✅ Ha, o‘chirilsin", Callback::ConfirmDeletePart))
                    .single(button("❌ Bekor qilish", Callback::AdminPanel)),
            ))
            .await?;
            Ok(Step::Next(Confirming { book_id, ordinal }))
        }
        (Confirming { book_id, ordinal }, Input::Click(Callback::ConfirmDeletePart)) => {
            if ctx
                .catalog
                .delete_part_by_ordinal(&book_id, ordinal)
                .await
                .db()?
            {
                info!(book_id = %book_id, ordinal = ordinal, "Part deleted");
                ctx.show(&outcome("✅ Qism o‘chirildi.")).await?;
            } else {
                ctx.show(&outcome("❌ Xatolik.")).await?;
            }
            Ok(Step::Done)
        }
        (state, input) => expect_buttons(ctx, state, input).await,
    }
}
