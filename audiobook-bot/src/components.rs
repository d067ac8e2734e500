//! Component factory: builds stores, the transport and the handler chain from config.

use abot_core::Bot as CoreBot;
use abot_telegram::{TelegramBotAdapter, TelegramConfig};
use anyhow::{Context, Result};
use handler_chain::HandlerChain;
use std::sync::Arc;
use std::time::Duration;
use storage::{
    CatalogRepository, CatalogStore, IdentityRepository, IdentityStore, PoolSettings,
    SqlitePoolManager,
};
use tracing::{info, instrument};

use crate::auth::AdminPolicy;
use crate::config::BotConfig;
use crate::logging::EventLogHandler;
use crate::router::{BotRouter, RouterSettings};

/// Everything run_bot needs; produced by the component factory.
pub struct BotComponents {
    pub catalog: Arc<CatalogRepository>,
    pub identity: Arc<IdentityRepository>,
    pub teloxide_bot: teloxide::Bot,
    pub bot_adapter: Arc<dyn CoreBot>,
}

/// Opens one pool and puts both repositories on it.
#[instrument(skip(config))]
pub async fn build_stores(
    config: &BotConfig,
) -> Result<(Arc<CatalogRepository>, Arc<IdentityRepository>)> {
    let settings = PoolSettings {
        max_connections: config.base.db_max_connections,
        acquire_timeout: Duration::from_secs(config.base.db_acquire_timeout_secs),
    };
    let pool = SqlitePoolManager::with_settings(config.database_url(), settings)
        .await
        .with_context(|| format!("Failed to open database {}", config.database_url()))?;
    let catalog = CatalogRepository::from_pool(pool.clone())
        .await
        .context("Failed to initialize catalog storage")?;
    let identity = IdentityRepository::from_pool(pool)
        .await
        .context("Failed to initialize identity storage")?;
    info!(database_url = %config.database_url(), "Storage ready");
    Ok((Arc::new(catalog), Arc::new(identity)))
}

#[instrument(skip(config))]
pub async fn build_bot_components(config: &BotConfig) -> Result<BotComponents> {
    let (catalog, identity) = build_stores(config).await?;
    let telegram = TelegramConfig::new(
        config.bot_token(),
        config.telegram_api_url().map(String::from),
    );
    let teloxide_bot = telegram.build_bot()?;
    let bot_adapter: Arc<dyn CoreBot> = Arc::new(TelegramBotAdapter::new(teloxide_bot.clone()));
    Ok(BotComponents {
        catalog,
        identity,
        teloxide_bot,
        bot_adapter,
    })
}

/// Builds the router over any Bot and stores (tests pass in-memory ones).
pub fn build_router(
    config: &BotConfig,
    bot: Arc<dyn CoreBot>,
    catalog: Arc<dyn CatalogStore>,
    identity: Arc<dyn IdentityStore>,
) -> Arc<BotRouter> {
    let settings = config.settings();
    let admins = AdminPolicy::new(settings.admins.iter().copied(), identity.clone());
    let router_settings = RouterSettings {
        broadcast_delay: settings.broadcast_delay(),
        admin_username: settings.admin_username.clone(),
        channel_username: settings.channel_username.clone(),
    };
    Arc::new(BotRouter::new(bot, catalog, identity, admins, router_settings))
}

/// Builds the handler chain (event log → router).
pub fn build_handler_chain(router: Arc<BotRouter>) -> HandlerChain {
    HandlerChain::new()
        .add_handler(Arc::new(EventLogHandler))
        .add_handler(router)
}
