use anyhow::Result;
use abot_core::init_tracing;
use abot_telegram::run_dispatcher;
use tracing::{info, instrument};

use super::components::{build_bot_components, build_handler_chain, build_router};
use super::config::BotConfig;

/// Main entry: validate config, init logging, build components and handler chain, then run the dispatcher.
#[instrument(skip(config))]
pub async fn run_bot(config: BotConfig) -> Result<()> {
    config.validate()?;
    init_tracing(config.log_file())?;

    info!(
        database_url = %config.database_url(),
        static_admins = config.admins().len(),
        "Initializing bot"
    );

    let components = build_bot_components(&config).await?;
    let router = build_router(
        &config,
        components.bot_adapter.clone(),
        components.catalog.clone(),
        components.identity.clone(),
    );
    let handler_chain = build_handler_chain(router);

    info!("Bot started successfully");

    run_dispatcher(components.teloxide_bot, handler_chain).await
}
