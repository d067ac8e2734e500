//! Genre management: add a genre by name, or delete one after confirmation.
//! Deleting a genre only unlinks it from books.

use abot_core::{Keyboard, Result};
use teloxide::utils::html::escape;
use tracing::info;

use super::{expect_buttons, FlowContext, FlowState, Input, Step, StoreResultExt};
use crate::callback::Callback;
use crate::menus::{button, single_column};
use crate::screens::{self, Screen};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManageGenresState {
    AwaitingName,
    SelectingForDelete,
    Confirming { genre_id: i64 },
}

impl ManageGenresState {
    pub fn name(&self) -> &'static str {
        match self {
            ManageGenresState::AwaitingName => "awaiting_name",
            ManageGenresState::SelectingForDelete => "selecting_for_delete",
            ManageGenresState::Confirming { .. } => "confirming",
        }
    }
}

fn back_to_menu() -> abot_core::Button {
    button("🔙 Ortga", Callback::AdminManageGenres)
}

fn outcome(text: &str) -> Screen {
    Screen::new(
        text,
        Keyboard::new().single(button("🏷 Janr menyusi", Callback::AdminManageGenres)),
    )
}

pub async fn enter_add(ctx: &FlowContext<'_>) -> Result<Option<FlowState>> {
    ctx.show(&Screen::new(
        "🆕 Yangi janr nomini yuboring:",
        Keyboard::new().single(back_to_menu()),
    ))
    .await?;
    Ok(Some(FlowState::ManageGenres(ManageGenresState::AwaitingName)))
}

pub async fn enter_delete(ctx: &FlowContext<'_>) -> Result<Option<FlowState>> {
    let genres = ctx.catalog.list_genres().await.db()?;
    if genres.is_empty() {
        ctx.show(&outcome("ℹ️ O‘chiradigan janr yo‘q.")).await?;
        return Ok(None);
    }
    let items = genres
        .into_iter()
        .map(|g| button(g.name, Callback::DelGenre(g.id)))
        .collect();
    ctx.show(&Screen::new(
        "🗑 Qaysi janrni o‘chirmoqchisiz?",
        single_column(items, vec![back_to_menu()]),
    ))
    .await?;
    Ok(Some(FlowState::ManageGenres(
        ManageGenresState::SelectingForDelete,
    )))
}

pub async fn step(
    ctx: &FlowContext<'_>,
    state: ManageGenresState,
    input: Input<'_>,
) -> Result<Step<ManageGenresState>> {
    use ManageGenresState::*;

    match (state, input) {
        (AwaitingName, Input::Text(text)) => {
            let name = text.trim();
            if name.is_empty() {
                ctx.send(&Screen::new(
                    "❌ Janr nomi bo‘sh bo‘lmasin. Qayta yuboring.",
                    Keyboard::new().single(back_to_menu()),
                ))
                .await?;
                return Ok(Step::Next(AwaitingName));
            }
            if ctx.catalog.add_genre(name).await.db()? {
                info!(genre = %name, "Genre added");
                ctx.send(&outcome("✅ Janr qo‘shildi.")).await?;
            } else {
                ctx.send(&outcome("⚠️ Bu janr allaqachon mavjud.")).await?;
            }
            Ok(Step::Done)
        }
        (AwaitingName, Input::Click(_)) => Ok(Step::Unhandled(AwaitingName)),
        (AwaitingName, _) => {
            ctx.send(&Screen::new(
                "✍️ Janr nomini matn ko‘rinishida yuboring.",
                Keyboard::new().single(back_to_menu()),
            ))
            .await?;
            Ok(Step::Next(AwaitingName))
        }

        (SelectingForDelete, Input::Click(Callback::DelGenre(id))) => {
            let Some(genre) = ctx.catalog.get_genre(*id).await.db()? else {
                ctx.show(&screens::not_found(Callback::AdminManageGenres)).await?;
                return Ok(Step::Done);
            };
            ctx.show(&Screen::new(
                format!(
                    "⚠️ <b>{}</b>: ushbu janr o‘chirilsinmi? (Kitoblar o‘chmaydi, faqat bog‘lanishlar o‘chadi.)",
                    escape(&genre.name)
                ),
                Keyboard::new()
                    .single(button("✅ Ha, o‘chirilsin", Callback::ConfirmDeleteGenre))
                    .single(button("🔙 Ortga", Callback::AdminDeleteGenre)),
            ))
            .await?;
            Ok(Step::Next(Confirming { genre_id: genre.id }))
        }
        (Confirming { genre_id }, Input::Click(Callback::ConfirmDeleteGenre)) => {
            if ctx.catalog.delete_genre(genre_id).await.db()? {
                info!(genre_id = genre_id, "Genre deleted");
                ctx.show(&outcome("✅ Janr o‘chirildi.")).await?;
            } else {
                ctx.show(&screens::not_found(Callback::AdminManageGenres)).await?;
            }
            Ok(Step::Done)
        }
        (state, input) => expect_buttons(ctx, state, input).await,
    }
}
