//! Binary for the audiobook bot.

use anyhow::Result;
use audiobook_bot::{run_bot, BotConfig};
use clap::Parser;

#[derive(Parser)]
#[command(name = "audiobook-bot", about = "Audiobook catalog Telegram bot")]
struct Args {
    /// Overrides BOT_TOKEN
    #[arg(short, long)]
    token: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let config = BotConfig::load(args.token)?;
    run_bot(config).await
}
