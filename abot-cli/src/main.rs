//! abot CLI: run the Telegram bot or import the legacy JSON datastore. Config from env and optional CLI args.

use abot_cli::{load_config, load_migrate_config, Cli, Commands};
use anyhow::Result;
use audiobook_bot::run_bot;
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { token } => {
            let config = load_config(token)?;
            run_bot(config).await
        }
        Commands::Migrate => handle_migrate().await,
    }
}

/// Handle the migrate command.
///
/// Initializes console tracing so per-file warnings are visible, runs the import and
/// prints one added/skipped line per entity.
async fn handle_migrate() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()))
        .with_target(false)
        .init();

    let config = load_migrate_config()?;
    println!(
        "Migrating {} into {}...",
        config.data_dir.display(),
        config.database_url
    );

    let report = json_migrate::migrate(&config).await?;

    print!("{}", report);
    if !report.backups.is_empty() {
        println!("Backups written to {}", config.backup_dir().display());
    }
    Ok(())
}
