//! Add-book flow: title → genre multi-select → part links → finish.
//!
//! The book row is created when the first valid part arrives (or on finish with no parts),
//! so a flow abandoned before that leaves nothing in the catalog.

use abot_core::{BotError, Keyboard, Result};
use std::collections::BTreeSet;
use storage::{part_label, Genre};
use teloxide::utils::html::escape;
use tracing::{info, warn};

use super::{expect_buttons, toggle, FlowContext, FlowState, Input, Step, StoreResultExt};
use crate::callback::Callback;
use crate::link::{is_valid_part_link, PART_LINK_EXAMPLE};
use crate::menus::{button, toggle_label, two_column};
use crate::screens::{admin_home_button, Screen};

const ID_ATTEMPTS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddBookState {
    AwaitingTitle,
    SelectingGenres {
        title: String,
        selected: BTreeSet<i64>,
    },
    AwaitingParts {
        title: String,
        genres: BTreeSet<i64>,
        /// Set once the book row exists.
        book_id: Option<String>,
        parts_added: usize,
    },
}

impl AddBookState {
    pub fn name(&self) -> &'static str {
        match self {
            AddBookState::AwaitingTitle => "awaiting_title",
            AddBookState::SelectingGenres { .. } => "selecting_genres",
            AddBookState::AwaitingParts { .. } => "awaiting_parts",
        }
    }
}

fn cancel_button() -> abot_core::Button {
    button("❌ Bekor qilish", Callback::CancelAddBook)
}

fn ask_title() -> Screen {
    Screen::new(
        "📖 Yangi kitob nomini yuboring:",
        Keyboard::new()
            .single(cancel_button())
            .single(button("🔙 Ortga", Callback::AdminPanel)),
    )
}

/// Genre multi-select, rendered from the live selection.
pub fn genre_picker(title: &str, genres: &[Genre], selected: &BTreeSet<i64>, toggled: bool) -> Screen {
    let items = genres
        .iter()
        .map(|g| {
            button(
                toggle_label(&g.name, selected.contains(&g.id)),
                Callback::ToggleGenre(g.id),
            )
        })
        .collect();
    let keyboard = two_column(
        items,
        vec![button("✅ Tugatdim (janrlar)", Callback::GenresDone)],
    )
    .single(cancel_button());
    let text = if toggled {
        "🏷 Tanlangan janrlar:".to_string()
    } else {
        format!(
            "📌 <b>{}</b> — janr(lar)ni tanlang (bir nechtasini tanlashingiz mumkin):",
            escape(title)
        )
    };
    Screen::new(text, keyboard)
}

fn parts_keyboard() -> Keyboard {
    Keyboard::new()
        .single(button("✅ Tugatdim", Callback::FinishAddBook))
        .single(cancel_button())
}

fn ask_parts() -> Screen {
    Screen::new(
        format!(
            "🎧 Endi qismlar havolasini yuboring (har birini alohida xabar bilan):\n<code>{}</code>",
            PART_LINK_EXAMPLE
        ),
        parts_keyboard(),
    )
}

fn ask_parts_without_genres(title: &str) -> Screen {
    Screen::new(
        format!(
            "✅ <b>{}</b> qabul qilindi.\nHozircha janr yo‘q. To‘g‘ridan-to‘g‘ri qismlar kiriting:\n<code>{}</code>",
            escape(title),
            PART_LINK_EXAMPLE
        ),
        parts_keyboard(),
    )
}

fn bad_link() -> Screen {
    Screen::new(
        format!("❌ Noto‘g‘ri format.\n<code>{}</code>", PART_LINK_EXAMPLE),
        parts_keyboard(),
    )
}

fn finished(text: &str) -> Screen {
    Screen::new(text, Keyboard::new().single(admin_home_button()))
}

pub async fn enter(ctx: &FlowContext<'_>) -> Result<Option<FlowState>> {
    ctx.show(&ask_title()).await?;
    Ok(Some(FlowState::AddBook(AddBookState::AwaitingTitle)))
}

/// Returns the draft's book id, creating the book (with its genres) on first use.
async fn ensure_book(
    ctx: &FlowContext<'_>,
    title: &str,
    genres: &BTreeSet<i64>,
    book_id: Option<String>,
) -> Result<String> {
    if let Some(id) = book_id {
        return Ok(id);
    }
    for _ in 0..ID_ATTEMPTS {
        let id = ctx.catalog.next_book_id().await.db()?;
        if ctx.catalog.create_book(&id, title).await.db()? {
            let genre_ids: Vec<i64> = genres.iter().copied().collect();
            ctx.catalog.set_book_genres(&id, &genre_ids).await.db()?;
            info!(book_id = %id, title = %title, genres = genre_ids.len(), "Book created");
            return Ok(id);
        }
        warn!(book_id = %id, "Book id already taken, allocating another");
    }
    Err(BotError::Database("could not allocate a book id".to_string()))
}

pub async fn step(
    ctx: &FlowContext<'_>,
    state: AddBookState,
    input: Input<'_>,
) -> Result<Step<AddBookState>> {
    use AddBookState::*;

    if let Input::Click(Callback::CancelAddBook) = input {
        ctx.show(&finished("❌ Kitob qo‘shish bekor qilindi.")).await?;
        return Ok(Step::Done);
    }

    match (state, input) {
        (AwaitingTitle, Input::Text(text)) => {
            let title = text.trim();
            if title.is_empty() {
                ctx.send(&Screen::new(
                    "❌ Kitob nomi bo‘sh bo‘lmasin. Qayta yuboring.",
                    Keyboard::new().single(cancel_button()),
                ))
                .await?;
                return Ok(Step::Next(AwaitingTitle));
            }
            let genres = ctx.catalog.list_genres().await.db()?;
            if genres.is_empty() {
                ctx.send(&ask_parts_without_genres(title)).await?;
                return Ok(Step::Next(AwaitingParts {
                    title: title.to_string(),
                    genres: BTreeSet::new(),
                    book_id: None,
                    parts_added: 0,
                }));
            }
            let selected = BTreeSet::new();
            ctx.send(&genre_picker(title, &genres, &selected, false)).await?;
            Ok(Step::Next(SelectingGenres {
                title: title.to_string(),
                selected,
            }))
        }
        (AwaitingTitle, Input::Click(_)) => Ok(Step::Unhandled(AwaitingTitle)),
        (AwaitingTitle, _) => {
            ctx.send(&ask_title()).await?;
            Ok(Step::Next(AwaitingTitle))
        }

        (SelectingGenres { title, mut selected }, Input::Click(Callback::ToggleGenre(id))) => {
            toggle(&mut selected, *id);
            let genres = ctx.catalog.list_genres().await.db()?;
            ctx.show(&genre_picker(&title, &genres, &selected, true)).await?;
            Ok(Step::Next(SelectingGenres { title, selected }))
        }
        (SelectingGenres { title, selected }, Input::Click(Callback::GenresDone)) => {
            ctx.show(&ask_parts()).await?;
            Ok(Step::Next(AwaitingParts {
                title,
                genres: selected,
                book_id: None,
                parts_added: 0,
            }))
        }
        (state @ SelectingGenres { .. }, input) => expect_buttons(ctx, state, input).await,

        (
            AwaitingParts {
                title,
                genres,
                book_id,
                parts_added,
            },
            Input::Text(text),
        ) => {
            let link = text.trim();
            if !is_valid_part_link(link) {
                ctx.send(&bad_link()).await?;
                return Ok(Step::Next(AwaitingParts {
                    title,
                    genres,
                    book_id,
                    parts_added,
                }));
            }
            let id = ensure_book(ctx, &title, &genres, book_id).await?;
            let existing = ctx.catalog.list_parts(&id).await.db()?.len();
            ctx.catalog
                .add_part(&id, &part_label(existing + 1), link)
                .await
                .db()?;
            info!(book_id = %id, ordinal = existing + 1, "Part added");
            ctx.send(&Screen::new(
                format!("🎧 Qism qo‘shildi. Jami: {}", existing + 1),
                parts_keyboard(),
            ))
            .await?;
            Ok(Step::Next(AwaitingParts {
                title,
                genres,
                book_id: Some(id),
                parts_added: parts_added + 1,
            }))
        }
        (
            AwaitingParts {
                title,
                genres,
                book_id,
                parts_added,
            },
            Input::Click(Callback::FinishAddBook),
        ) => {
            let id = ensure_book(ctx, &title, &genres, book_id).await?;
            info!(book_id = %id, parts = parts_added, "Add-book flow finished");
            ctx.show(&finished("✅ Kitob saqlandi!")).await?;
            Ok(Step::Done)
        }
        (state @ AwaitingParts { .. }, Input::Click(_)) => Ok(Step::Unhandled(state)),
        (state @ AwaitingParts { .. }, _) => {
            ctx.send(&bad_link()).await?;
            Ok(Step::Next(state))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_genre_picker_marks_selection() {
        let genres = vec![
            Genre {
                id: 1,
                name: "Roman".into(),
            },
            Genre {
                id: 2,
                name: "Tarix".into(),
            },
        ];
        let selected: BTreeSet<i64> = [2].into_iter().collect();
        let screen = genre_picker("Kitob", &genres, &selected, false);
        assert_eq!(screen.keyboard.find("toggle_genre_1").unwrap().label, "▫️ Roman");
        assert_eq!(screen.keyboard.find("toggle_genre_2").unwrap().label, "✅ Tarix");
        assert!(screen.keyboard.find("genres_done").is_some());
        assert!(screen.text.contains("<b>Kitob</b>"));
    }
}
