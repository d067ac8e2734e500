//! Assign-genres flow: pick a book, toggle its genres, save the whole set at once.

use abot_core::{Keyboard, Result};
use std::collections::BTreeSet;
use storage::Genre;
use tracing::info;

use super::{expect_buttons, toggle, FlowContext, FlowState, Input, Step, StoreResultExt};
use crate::callback::Callback;
use crate::menus::{button, toggle_label, two_column};
use crate::screens::{self, admin_home_button, Screen};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignGenresState {
    SelectingBook,
    Toggling {
        book_id: String,
        selected: BTreeSet<i64>,
    },
}

impl AssignGenresState {
    pub fn name(&self) -> &'static str {
        match self {
            AssignGenresState::SelectingBook => "selecting_book",
            AssignGenresState::Toggling { .. } => "toggling",
        }
    }
}

pub fn toggle_screen(genres: &[Genre], selected: &BTreeSet<i64>) -> Screen {
    let items = genres
        .iter()
        .map(|g| {
            button(
                toggle_label(&g.name, selected.contains(&g.id)),
                Callback::ToggleBookGenre(g.id),
            )
        })
        .collect();
    Screen::new(
        "Tanlang: kitobga tegishli janr(lar)ni belgilang (bir nechtasini tanlash mumkin).",
        two_column(items, vec![button("💾 Saqlash", Callback::SaveBookGenres)])
            .single(button("🔙 Ortga", Callback::AdminAssignGenres)),
    )
}

pub async fn enter(ctx: &FlowContext<'_>) -> Result<Option<FlowState>> {
    let books = ctx.catalog.list_books().await.db()?;
    if books.is_empty() {
        ctx.show(&screens::no_books_admin()).await?;
        return Ok(None);
    }
    ctx.show(&screens::book_picker(
        "🏷 Janr belgilamoqchi bo‘lgan kitobni tanlang:",
        &books,
        Callback::AssignGenresBook,
    ))
    .await?;
    Ok(Some(FlowState::AssignGenres(AssignGenresState::SelectingBook)))
}

pub async fn step(
    ctx: &FlowContext<'_>,
    state: AssignGenresState,
    input: Input<'_>,
) -> Result<Step<AssignGenresState>> {
    use AssignGenresState::*;

    match (state, input) {
        (SelectingBook, Input::Click(Callback::AssignGenresBook(book_id))) => {
            if ctx.catalog.get_book(book_id).await.db()?.is_none() {
                ctx.show(&screens::not_found(Callback::AdminPanel)).await?;
                return Ok(Step::Done);
            }
            let genres = ctx.catalog.list_genres().await.db()?;
            if genres.is_empty() {
                ctx.show(&Screen::new(
                    "Hali hech qanday janr yaratilmagan. Avval janr yarating: 🏷 Janrlarni boshqarish.",
                    Keyboard::new()
                        .single(button("🏷 Janrlarni boshqarish", Callback::AdminManageGenres))
                        .single(admin_home_button()),
                ))
                .await?;
                return Ok(Step::Done);
            }
            let selected: BTreeSet<i64> = ctx
                .catalog
                .genres_for_book(book_id)
                .await
                .db()?
                .into_iter()
                .map(|g| g.id)
                .collect();
            ctx.show(&toggle_screen(&genres, &selected)).await?;
            Ok(Step::Next(Toggling {
                book_id: book_id.clone(),
                selected,
            }))
        }
        (Toggling { book_id, mut selected }, Input::Click(Callback::ToggleBookGenre(id))) => {
            toggle(&mut selected, *id);
            let genres = ctx.catalog.list_genres().await.db()?;
            ctx.show(&toggle_screen(&genres, &selected)).await?;
            Ok(Step::Next(Toggling { book_id, selected }))
        }
        (Toggling { book_id, selected }, Input::Click(Callback::SaveBookGenres)) => {
            if ctx.catalog.get_book(&book_id).await.db()?.is_none() {
                ctx.show(&screens::not_found(Callback::AdminPanel)).await?;
                return Ok(Step::Done);
            }
            let ids: Vec<i64> = selected.into_iter().collect();
            ctx.catalog.set_book_genres(&book_id, &ids).await.db()?;
            info!(book_id = %book_id, genres = ids.len(), "Book genres saved");
            ctx.show(&Screen::new(
                "✅ Janrlar muvaffaqiyatli saqlandi.",
                Keyboard::new().single(admin_home_button()),
            ))
            .await?;
            Ok(Step::Done)
        }
        (state, input) => expect_buttons(ctx, state, input).await,
    }
}
