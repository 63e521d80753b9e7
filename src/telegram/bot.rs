//! Bot instance creation and command registration

use reqwest::ClientBuilder;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;

use crate::core::config;

/// Bot commands enum with descriptions
#[derive(BotCommands, Clone, Debug)]
#[command(rename_rule = "lowercase", description = "I can:")]
pub enum Command {
    #[command(description = "greet and explain what to send")]
    Start,
    #[command(description = "show usage help")]
    Help,
}

/// Creates the Bot instance.
///
/// The underlying HTTP client carries the generous upload timeout so large
/// video attachments survive the send.
pub fn create_bot(token: &str) -> anyhow::Result<Bot> {
    let client = ClientBuilder::new().timeout(config::network::upload_timeout()).build()?;
    Ok(Bot::with_client(token, client))
}

/// Registers the command list in the Telegram UI.
pub async fn setup_bot_commands(bot: &Bot) -> Result<(), teloxide::RequestError> {
    use teloxide::types::BotCommand;

    bot.set_my_commands(vec![
        BotCommand::new("start", "greet and explain what to send"),
        BotCommand::new("help", "show usage help"),
    ])
    .await?;

    Ok(())
}
