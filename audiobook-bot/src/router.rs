//! Event router: commands, button presses and messages go to the active flow first,
//! then to the static menus.

use abot_core::{
    Bot, Content, Event, EventKind, FileRef, Handler, HandlerResponse, Media, MediaKind, Result,
    User,
};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use storage::{part_label, CatalogStore, IdentityStore};
use tracing::{debug, error, info, instrument, warn};

use crate::auth::AdminPolicy;
use crate::callback::Callback;
use crate::flows::{self, FlowContext, FlowState, Input, Step, StoreResultExt};
use crate::screens;
use crate::session::SessionStore;

/// Recent feedback entries shown to admins.
const RECENT_FEEDBACK: i64 = 10;

/// Settings the router passes into screens and flows.
#[derive(Debug, Clone, Default)]
pub struct RouterSettings {
    pub broadcast_delay: Duration,
    pub admin_username: Option<String>,
    pub channel_username: Option<String>,
}

/// The bot's only business handler; sits at the end of the handler chain.
pub struct BotRouter {
    bot: Arc<dyn Bot>,
    catalog: Arc<dyn CatalogStore>,
    identity: Arc<dyn IdentityStore>,
    admins: AdminPolicy,
    sessions: Arc<SessionStore>,
    settings: RouterSettings,
}

/// Name used in greetings: first name, else username, else a generic word.
fn greeting_name(user: &User) -> String {
    user.first_name
        .clone()
        .filter(|s| !s.trim().is_empty())
        .or_else(|| user.username.clone())
        .unwrap_or_else(|| "foydalanuvchi".to_string())
}

/// Name stored for a registered user.
fn display_name(user: &User) -> String {
    let full = user.full_name();
    if full.trim().is_empty() {
        user.username.clone().unwrap_or_default()
    } else {
        full.trim().to_string()
    }
}

impl BotRouter {
    pub fn new(
        bot: Arc<dyn Bot>,
        catalog: Arc<dyn CatalogStore>,
        identity: Arc<dyn IdentityStore>,
        admins: AdminPolicy,
        settings: RouterSettings,
    ) -> Self {
        Self {
            bot,
            catalog,
            identity,
            admins,
            sessions: Arc::new(SessionStore::new()),
            settings,
        }
    }

    pub fn sessions(&self) -> Arc<SessionStore> {
        self.sessions.clone()
    }

    fn context<'a>(&'a self, event: &'a Event, origin: Option<&'a str>) -> FlowContext<'a> {
        FlowContext {
            bot: self.bot.as_ref(),
            catalog: self.catalog.as_ref(),
            identity: self.identity.as_ref(),
            admins: &self.admins,
            user: &event.user,
            chat: &event.chat,
            origin,
            broadcast_delay: self.settings.broadcast_delay,
        }
    }

    async fn home_screen(&self, user: &User) -> screens::Screen {
        let is_admin = self.admins.is_admin(user.id).await;
        screens::home(
            &greeting_name(user),
            is_admin,
            self.settings.channel_username.as_deref(),
        )
    }

    /// Runs one flow step and stores the follow-up state. Returns false when the flow did not take the input.
    async fn run_step(&self, ctx: &FlowContext<'_>, state: FlowState, input: Input<'_>) -> Result<bool> {
        let user_id = ctx.user.id;
        let flow = state.flow_name();
        let parent = state.parent();
        if parent == Callback::AdminPanel && !self.admins.is_admin(user_id).await {
            warn!(user_id = user_id, flow = flow, "Admin rights revoked; flow dropped");
            if matches!(input, Input::Click(_)) {
                return Ok(false);
            }
            ctx.show(&screens::no_access()).await?;
            return Ok(true);
        }
        match flows::step(ctx, state, input).await {
            Ok(Step::Next(next)) => {
                debug!(user_id = user_id, flow = flow, state = next.state_name(), "Flow advanced");
                self.sessions.put(user_id, next).await;
                Ok(true)
            }
            Ok(Step::Done) => {
                info!(user_id = user_id, flow = flow, "Flow finished");
                Ok(true)
            }
            Ok(Step::Unhandled(state)) => {
                self.sessions.put(user_id, state).await;
                Ok(false)
            }
            Err(e) => {
                error!(error = %e, user_id = user_id, flow = flow, "Flow step failed; flow aborted");
                ctx.show(&screens::failure(parent)).await?;
                Ok(true)
            }
        }
    }

    #[instrument(skip(self, event), fields(user_id = event.user.id))]
    async fn on_command(&self, event: &Event, name: &str) -> Result<()> {
        let ctx = self.context(event, None);
        match name {
            "start" => {
                self.sessions.clear(event.user.id).await;
                if let Err(e) = self
                    .identity
                    .register_user(event.user.id, &display_name(&event.user))
                    .await
                {
                    warn!(error = %e, "User registration failed");
                }
                ctx.send(&self.home_screen(&event.user).await).await
            }
            "admin" => {
                if !self.admins.is_admin(event.user.id).await {
                    return ctx.send(&screens::no_access()).await;
                }
                self.sessions.clear(event.user.id).await;
                ctx.send(&screens::admin_panel()).await
            }
            _ => ctx.send(&screens::command_hint()).await,
        }
    }

    #[instrument(skip(self, event, origin), fields(user_id = event.user.id))]
    async fn on_callback(&self, event: &Event, data: &str, origin: Option<&str>) -> Result<()> {
        let ctx = self.context(event, origin);
        let user_id = event.user.id;

        let callback = match data.parse::<Callback>() {
            Ok(cb) => cb,
            Err(e) => {
                warn!(error = %e, "Malformed callback payload");
                return ctx.show(&screens::not_found(Callback::Home)).await;
            }
        };

        if callback.requires_admin() && !self.admins.is_admin(user_id).await {
            warn!(callback = %callback, "Admin-only button pressed by non-admin");
            self.sessions.clear(user_id).await;
            return ctx.show(&screens::no_access()).await;
        }

        if flows::is_entry(&callback) {
            self.sessions.clear(user_id).await;
            return match flows::enter(&ctx, &callback).await {
                Ok(Some(state)) => {
                    info!(flow = state.flow_name(), "Flow started");
                    self.sessions.put(user_id, state).await;
                    Ok(())
                }
                Ok(None) => Ok(()),
                Err(e) => {
                    error!(error = %e, callback = %callback, "Flow entry failed");
                    let parent = if callback.requires_admin() {
                        Callback::AdminPanel
                    } else {
                        Callback::Home
                    };
                    ctx.show(&screens::failure(parent)).await
                }
            };
        }

        if matches!(
            callback,
            Callback::Home
                | Callback::AdminPanel
                | Callback::AdminManageGenres
                | Callback::AdminManageAdmins
        ) {
            self.sessions.clear(user_id).await;
        } else if let Some(state) = self.sessions.take(user_id).await {
            if self.run_step(&ctx, state, Input::Click(&callback)).await? {
                return Ok(());
            }
        }

        if let Err(e) = self.route_static(&ctx, &callback).await {
            error!(error = %e, callback = %callback, "Menu handler failed");
            return ctx.show(&screens::failure(Callback::Home)).await;
        }
        Ok(())
    }

    #[instrument(skip(self, event, content), fields(user_id = event.user.id))]
    async fn on_message(&self, event: &Event, content: &Content) -> Result<()> {
        let ctx = self.context(event, None);
        let Some(state) = self.sessions.take(event.user.id).await else {
            return ctx.send(&screens::command_hint()).await;
        };
        let input = match content {
            Content::Text(text) => Input::Text(text.as_str()),
            Content::Media { media, caption } => Input::Media {
                media,
                caption: caption.as_deref(),
            },
            Content::Unsupported => Input::Unsupported,
        };
        if !self.run_step(&ctx, state, input).await? {
            ctx.send(&screens::use_buttons()).await?;
        }
        Ok(())
    }

    /// Menus that live outside any flow.
    async fn route_static(&self, ctx: &FlowContext<'_>, callback: &Callback) -> Result<()> {
        match callback {
            Callback::Home => ctx.show(&self.home_screen(ctx.user).await).await,
            Callback::AdminPanel => ctx.show(&screens::admin_panel()).await,
            Callback::AdminContact => {
                ctx.show(&screens::contact(self.settings.admin_username.as_deref()))
                    .await
            }
            Callback::Books => self.show_books(ctx, 0).await,
            Callback::BooksPage(page) => self.show_books(ctx, *page).await,
            Callback::Book(book_id) => self.show_book(ctx, book_id).await,
            Callback::Part { book_id, index } => self.send_part(ctx, book_id, *index).await,
            Callback::Genres => {
                let genres = self.catalog.list_genres().await.db()?;
                ctx.show(&screens::genres(&genres)).await
            }
            Callback::Genre(genre_id) => {
                if self.catalog.get_genre(*genre_id).await.db()?.is_none() {
                    return ctx.show(&screens::not_found(Callback::Genres)).await;
                }
                let books = self.catalog.books_for_genre(*genre_id).await.db()?;
                ctx.show(&screens::genre_books(&books)).await
            }
            Callback::Stats => ctx.show(&screens::stats_menu()).await,
            Callback::StatUsers => {
                let count = self.identity.count_users().await.db()?;
                ctx.show(&screens::user_count(count)).await
            }
            Callback::StatBooks => {
                let views = self.identity.list_book_views().await.db()?;
                let books = self.catalog.list_books().await.db()?;
                ctx.show(&screens::book_stats(&views, &books)).await
            }
            Callback::AdminManageGenres => ctx.show(&screens::genre_menu()).await,
            Callback::AdminManageAdmins => ctx.show(&screens::admins_menu()).await,
            Callback::AdminViewFeedback => {
                let entries = self
                    .identity
                    .list_recent_feedback(RECENT_FEEDBACK)
                    .await
                    .db()?;
                ctx.show(&screens::recent_feedback(&entries)).await
            }
            Callback::AdminDedupeFeedback => {
                let removed = self.identity.deduplicate_feedback().await.db()?;
                info!(removed = removed, "Feedback deduplicated");
                ctx.show(&screens::dedupe_done(removed)).await
            }
            other => {
                debug!(callback = %other, "Flow button without an active flow");
                let parent = if other.requires_admin() {
                    Callback::AdminPanel
                } else {
                    Callback::Home
                };
                ctx.show(&screens::stale(parent)).await
            }
        }
    }

    async fn show_books(&self, ctx: &FlowContext<'_>, page: usize) -> Result<()> {
        let books = self.catalog.list_books().await.db()?;
        ctx.show(&screens::books_page(&books, page)).await
    }

    async fn show_book(&self, ctx: &FlowContext<'_>, book_id: &str) -> Result<()> {
        let Some(book) = self.catalog.get_book(book_id).await.db()? else {
            return ctx.show(&screens::not_found(Callback::Books)).await;
        };
        let parts = self.catalog.list_parts(&book.id).await.db()?;
        if let Err(e) = self.identity.increment_book_view(&book.title).await {
            warn!(error = %e, book_id = %book.id, "View counter update failed");
        }
        ctx.show(&screens::book_parts(&book, &parts)).await
    }

    async fn send_part(&self, ctx: &FlowContext<'_>, book_id: &str, index: usize) -> Result<()> {
        let parts = self.catalog.list_parts(book_id).await.db()?;
        let Some(part) = parts.get(index) else {
            return ctx.show(&screens::part_missing(book_id)).await;
        };
        let label = part_label(index + 1);
        let media = Media {
            kind: MediaKind::Audio,
            file: FileRef::Url(part.audio_url.clone()),
        };
        if let Err(e) = self
            .bot
            .send_media(ctx.chat, &media, Some(&label), None)
            .await
        {
            warn!(error = %e, book_id = %book_id, index = index, "Audio send failed; sending link");
            ctx.bot
                .send_message(ctx.chat, &screens::part_link(&label, &part.audio_url), None)
                .await?;
        }
        ctx.send(&screens::part_followup(book_id)).await
    }
}

#[async_trait]
impl Handler for BotRouter {
    async fn handle(&self, event: &Event) -> Result<HandlerResponse> {
        match &event.kind {
            EventKind::Command { name, .. } => self.on_command(event, name).await?,
            EventKind::Callback { data, message_id } => {
                self.on_callback(event, data, message_id.as_deref()).await?
            }
            EventKind::Message { content, .. } => self.on_message(event, content).await?,
        }
        Ok(HandlerResponse::Stop)
    }
}
