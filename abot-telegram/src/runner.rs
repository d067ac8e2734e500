//! Dispatcher runner: converts teloxide updates to core events and feeds them to the HandlerChain.
//! Updates from one chat are handled one at a time in arrival order; different chats run concurrently.

use anyhow::Result;
use handler_chain::HandlerChain;
use teloxide::prelude::*;
use teloxide::types::{CallbackQuery, Message};
use tracing::{error, info, instrument, warn};

use super::adapters::{TelegramCallbackWrapper, TelegramMessageWrapper};

async fn on_message(msg: Message, chain: HandlerChain) -> ResponseResult<()> {
    let event = TelegramMessageWrapper(&msg).to_core();
    info!(
        user_id = event.user.id,
        chat_id = event.chat.id,
        kind = event.kind_name(),
        "Received message"
    );
    if let Err(e) = chain.handle(&event).await {
        error!(error = %e, user_id = event.user.id, "Handler chain failed");
    }
    Ok(())
}

async fn on_callback(bot: Bot, q: CallbackQuery, chain: HandlerChain) -> ResponseResult<()> {
    if let Err(e) = bot.answer_callback_query(q.id.clone()).await {
        warn!(error = %e, "Failed to answer callback query");
    }
    let event = TelegramCallbackWrapper(&q).to_core();
    info!(
        user_id = event.user.id,
        chat_id = event.chat.id,
        data = ?q.data,
        "Received callback"
    );
    if let Err(e) = chain.handle(&event).await {
        error!(error = %e, user_id = event.user.id, "Handler chain failed");
    }
    Ok(())
}

/// Starts long polling with the given teloxide Bot and HandlerChain; returns on Ctrl-C.
#[instrument(skip(bot, handler_chain))]
pub async fn run_dispatcher(bot: teloxide::Bot, handler_chain: HandlerChain) -> Result<()> {
    match bot.get_me().await {
        Ok(me) => info!(username = ?me.user.username, "Bot connected"),
        Err(e) => warn!(error = %e, "get_me failed; continuing"),
    }

    let handler = dptree::entry()
        .branch(Update::filter_message().endpoint(on_message))
        .branch(Update::filter_callback_query().endpoint(on_callback));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![handler_chain])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    info!("Dispatcher stopped");
    Ok(())
}
