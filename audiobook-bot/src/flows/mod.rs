//! Conversation flows. Each flow is a tagged state enum plus a `step` function:
//! (state, input) → next state, end of flow, or "not mine" so the router can try the static menus.

pub mod add_book;
pub mod add_part;
pub mod assign_genres;
pub mod broadcast;
pub mod delete_book;
pub mod delete_part;
pub mod feedback;
pub mod manage_admins;
pub mod manage_genres;
pub mod rename_book;

use abot_core::{Bot, BotError, Chat, Media, Result, User};
use std::collections::BTreeSet;
use std::time::Duration;
use storage::{CatalogStore, IdentityStore};
use tracing::warn;

use crate::auth::AdminPolicy;
use crate::callback::Callback;
use crate::screens::{self, Screen};

/// One in-progress flow for one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowState {
    AddBook(add_book::AddBookState),
    AddPart(add_part::AddPartState),
    DeletePart(delete_part::DeletePartState),
    DeleteBook(delete_book::DeleteBookState),
    RenameBook(rename_book::RenameBookState),
    AssignGenres(assign_genres::AssignGenresState),
    ManageGenres(manage_genres::ManageGenresState),
    ManageAdmins(manage_admins::ManageAdminsState),
    Broadcast(broadcast::BroadcastState),
    Feedback(feedback::FeedbackState),
}

impl FlowState {
    pub fn flow_name(&self) -> &'static str {
        match self {
            FlowState::AddBook(_) => "add_book",
            FlowState::AddPart(_) => "add_part",
            FlowState::DeletePart(_) => "delete_part",
            FlowState::DeleteBook(_) => "delete_book",
            FlowState::RenameBook(_) => "rename_book",
            FlowState::AssignGenres(_) => "assign_genres",
            FlowState::ManageGenres(_) => "manage_genres",
            FlowState::ManageAdmins(_) => "manage_admins",
            FlowState::Broadcast(_) => "broadcast",
            FlowState::Feedback(_) => "feedback",
        }
    }

    pub fn state_name(&self) -> &'static str {
        match self {
            FlowState::AddBook(s) => s.name(),
            FlowState::AddPart(s) => s.name(),
            FlowState::DeletePart(s) => s.name(),
            FlowState::DeleteBook(s) => s.name(),
            FlowState::RenameBook(s) => s.name(),
            FlowState::AssignGenres(s) => s.name(),
            FlowState::ManageGenres(s) => s.name(),
            FlowState::ManageAdmins(s) => s.name(),
            FlowState::Broadcast(s) => s.name(),
            FlowState::Feedback(s) => s.name(),
        }
    }

    /// Menu a failed or finished flow returns to.
    pub fn parent(&self) -> Callback {
        match self {
            FlowState::Feedback(_) => Callback::Home,
            _ => Callback::AdminPanel,
        }
    }
}

/// What the user did.
#[derive(Debug, Clone, Copy)]
pub enum Input<'a> {
    Click(&'a Callback),
    Text(&'a str),
    Media {
        media: &'a Media,
        caption: Option<&'a str>,
    },
    Unsupported,
}

/// Outcome of one step.
#[derive(Debug, PartialEq, Eq)]
pub enum Step<S> {
    /// Keep the session in this state.
    Next(S),
    /// Flow finished or cancelled; the session is dropped.
    Done,
    /// Input does not belong to this state; the session is kept and the input routed elsewhere.
    Unhandled(S),
}

impl<S> Step<S> {
    pub fn map<T>(self, f: impl FnOnce(S) -> T) -> Step<T> {
        match self {
            Step::Next(s) => Step::Next(f(s)),
            Step::Done => Step::Done,
            Step::Unhandled(s) => Step::Unhandled(f(s)),
        }
    }
}

/// Everything a step may touch, borrowed for one event.
pub struct FlowContext<'a> {
    pub bot: &'a dyn Bot,
    pub catalog: &'a dyn CatalogStore,
    pub identity: &'a dyn IdentityStore,
    pub admins: &'a AdminPolicy,
    pub user: &'a User,
    pub chat: &'a Chat,
    /// Message that carried the pressed keyboard, if the event is a click.
    pub origin: Option<&'a str>,
    pub broadcast_delay: Duration,
}

impl FlowContext<'_> {
    /// Replaces the clicked menu in place; sends a new message when there is nothing to edit
    /// or the edit is refused (e.g. the menu was a media message).
    pub async fn show(&self, screen: &Screen) -> Result<()> {
        if let Some(message_id) = self.origin {
            match self
                .bot
                .edit_message(self.chat, message_id, &screen.text, keyboard(screen))
                .await
            {
                Ok(()) => return Ok(()),
                Err(e) => warn!(error = %e, message_id = %message_id, "Edit failed; sending new message"),
            }
        }
        self.send(screen).await
    }

    /// Always sends a new message.
    pub async fn send(&self, screen: &Screen) -> Result<()> {
        self.bot
            .send_message(self.chat, &screen.text, keyboard(screen))
            .await
            .map(|_| ())
    }
}

fn keyboard(screen: &Screen) -> Option<&abot_core::Keyboard> {
    if screen.keyboard.is_empty() {
        None
    } else {
        Some(&screen.keyboard)
    }
}

/// Maps store errors into the bot error type.
pub(crate) trait StoreResultExt<T> {
    fn db(self) -> Result<T>;
}

impl<T> StoreResultExt<T> for storage::Result<T> {
    fn db(self) -> Result<T> {
        self.map_err(|e| BotError::Database(e.to_string()))
    }
}

/// Set toggle: present ids are removed, absent ones added.
pub fn toggle(selected: &mut BTreeSet<i64>, id: i64) {
    if !selected.remove(&id) {
        selected.insert(id);
    }
}

/// For states that only take button presses: foreign clicks go back to the router, anything typed re-prompts.
pub(crate) async fn expect_buttons<S>(
    ctx: &FlowContext<'_>,
    state: S,
    input: Input<'_>,
) -> Result<Step<S>> {
    match input {
        Input::Click(_) => Ok(Step::Unhandled(state)),
        _ => {
            ctx.send(&screens::use_buttons()).await?;
            Ok(Step::Next(state))
        }
    }
}

/// Whether the button starts a flow.
pub fn is_entry(callback: &Callback) -> bool {
    matches!(
        callback,
        Callback::AdminAddBook
            | Callback::AdminAddPart
            | Callback::AdminDeletePart
            | Callback::AdminDeleteBook
            | Callback::AdminListBooks
            | Callback::AdminRenameBook
            | Callback::AdminAssignGenres
            | Callback::AdminAddGenre
            | Callback::AdminDeleteGenre
            | Callback::AdminAddAdmin
            | Callback::AdminDeleteAdmin
            | Callback::AdminBroadcast
            | Callback::Feedback
    )
}

/// Starts the flow for an entry button. `None` when the flow ends right away (e.g. nothing to pick from).
pub async fn enter(ctx: &FlowContext<'_>, callback: &Callback) -> Result<Option<FlowState>> {
    match callback {
        Callback::AdminAddBook => add_book::enter(ctx).await,
        Callback::AdminAddPart => add_part::enter(ctx).await,
        Callback::AdminDeletePart => delete_part::enter(ctx).await,
        Callback::AdminDeleteBook | Callback::AdminListBooks => delete_book::enter(ctx).await,
        Callback::AdminRenameBook => rename_book::enter(ctx).await,
        Callback::AdminAssignGenres => assign_genres::enter(ctx).await,
        Callback::AdminAddGenre => manage_genres::enter_add(ctx).await,
        Callback::AdminDeleteGenre => manage_genres::enter_delete(ctx).await,
        Callback::AdminAddAdmin => manage_admins::enter_add(ctx).await,
        Callback::AdminDeleteAdmin => manage_admins::enter_delete(ctx).await,
        Callback::AdminBroadcast => broadcast::enter(ctx).await,
        Callback::Feedback => feedback::enter(ctx).await,
        _ => Ok(None),
    }
}

/// Runs one transition of whichever flow the session is in.
pub async fn step(ctx: &FlowContext<'_>, state: FlowState, input: Input<'_>) -> Result<Step<FlowState>> {
    Ok(match state {
        FlowState::AddBook(s) => add_book::step(ctx, s, input).await?.map(FlowState::AddBook),
        FlowState::AddPart(s) => add_part::step(ctx, s, input).await?.map(FlowState::AddPart),
        FlowState::DeletePart(s) => delete_part::step(ctx, s, input).await?.map(FlowState::DeletePart),
        FlowState::DeleteBook(s) => delete_book::step(ctx, s, input).await?.map(FlowState::DeleteBook),
        FlowState::RenameBook(s) => rename_book::step(ctx, s, input).await?.map(FlowState::RenameBook),
        FlowState::AssignGenres(s) => {
            assign_genres::step(ctx, s, input).await?.map(FlowState::AssignGenres)
        }
        FlowState::ManageGenres(s) => {
            manage_genres::step(ctx, s, input).await?.map(FlowState::ManageGenres)
        }
        FlowState::ManageAdmins(s) => {
            manage_admins::step(ctx, s, input).await?.map(FlowState::ManageAdmins)
        }
        FlowState::Broadcast(s) => broadcast::step(ctx, s, input).await?.map(FlowState::Broadcast),
        FlowState::Feedback(s) => feedback::step(ctx, s, input).await?.map(FlowState::Feedback),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_is_involutive() {
        let mut selected: BTreeSet<i64> = [1, 3].into_iter().collect();
        let before = selected.clone();
        toggle(&mut selected, 2);
        assert!(selected.contains(&2));
        toggle(&mut selected, 2);
        assert_eq!(selected, before);

        toggle(&mut selected, 1);
        assert!(!selected.contains(&1));
        toggle(&mut selected, 1);
        assert_eq!(selected, before);
    }

    #[test]
    fn test_step_map_keeps_variant() {
        assert_eq!(Step::Next(1).map(|n| n + 1), Step::Next(2));
        assert_eq!(Step::Unhandled(1).map(|n| n * 10), Step::Unhandled(10));
        assert_eq!(Step::<i32>::Done.map(|n| n), Step::Done);
    }

    #[test]
    fn test_entries() {
        assert!(is_entry(&Callback::AdminAddBook));
        assert!(is_entry(&Callback::Feedback));
        assert!(!is_entry(&Callback::AdminPanel));
        assert!(!is_entry(&Callback::ToggleGenre(1)));
    }
}
