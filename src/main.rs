use std::sync::Arc;

use anyhow::Result;
use dotenvy::dotenv;
use teloxide::prelude::*;

use reelgram::core::{config, init_logger, Config};
use reelgram::instagram::InstagramResolver;
use reelgram::storage::MysqlDownloadLog;
use reelgram::telegram::{create_bot, schema, setup_bot_commands, HandlerDeps};

/// Main entry point for the Telegram bot
///
/// # Errors
/// Returns an error if configuration is incomplete or bot creation fails;
/// nothing is served in that case.
#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env if present
    let _ = dotenv();

    init_logger();

    // Missing required credentials is fatal before the listening loop starts
    let config = Config::from_env()?;

    let bot = create_bot(&config.bot_token)?;
    setup_bot_commands(&bot).await?;

    let download_client = reqwest::Client::builder()
        .connect_timeout(config::network::connect_timeout())
        .read_timeout(config::network::read_timeout())
        .build()?;

    let deps = HandlerDeps {
        resolver: Arc::new(InstagramResolver::new()?),
        download_log: Arc::new(MysqlDownloadLog::new(config.db.clone())),
        http: download_client,
    };

    log::info!("Starting bot in long polling mode");
    log::info!("Ready to receive updates!");

    Dispatcher::builder(bot, schema(deps))
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    log::info!("Dispatcher shutdown gracefully");
    Ok(())
}
