//! Dispatcher schema and message handlers.
//!
//! Binds inbound updates to the relay pipeline. The same schema is used in
//! production and can be reused in integration tests.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use teloxide::dispatching::{UpdateFilterExt, UpdateHandler};
use teloxide::prelude::*;
use teloxide::types::InputFile;

use crate::core::error::AppResult;
use crate::instagram::MediaResolver;
use crate::pipeline::{run_relay, RelayOutcome, RelayRequest};
use crate::relay::VideoSink;
use crate::storage::DownloadLog;
use crate::telegram::bot::Command;

/// Error type for handlers
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Dependencies required by handlers
#[derive(Clone)]
pub struct HandlerDeps {
    pub resolver: Arc<dyn MediaResolver>,
    pub download_log: Arc<dyn DownloadLog>,
    /// Client used for media downloads (fixed connect/read timeouts).
    pub http: reqwest::Client,
}

const USAGE_HINT: &str =
    "Please send an Instagram post or reel link (e.g. https://www.instagram.com/reel/SHORTCODE/).";

/// `VideoSink` that replies with a video attachment in the requester's chat.
struct TelegramVideoSink {
    bot: Bot,
    chat_id: ChatId,
}

#[async_trait]
impl VideoSink for TelegramVideoSink {
    async fn send_video(&self, path: &Path) -> AppResult<()> {
        self.bot
            .send_video(self.chat_id, InputFile::file(path.to_path_buf()))
            .await?;
        Ok(())
    }
}

/// Creates the dispatcher schema for the bot.
pub fn schema(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    dptree::entry()
        .branch(command_handler())
        .branch(message_handler(deps))
}

/// Handler for /start and /help
fn command_handler() -> UpdateHandler<HandlerError> {
    Update::filter_message().branch(dptree::entry().filter_command::<Command>().endpoint(
        |bot: Bot, msg: Message, cmd: Command| async move {
            log::info!("Received command: {:?} from chat {}", cmd, msg.chat.id);
            let reply = match cmd {
                Command::Start => {
                    "Hi! Send me an Instagram video link and I'll download it \
                     and send it back. (Public posts only.)"
                }
                Command::Help => {
                    "Send an Instagram post or reel link; I'll reply with the \
                     video file and keep a record of the download."
                }
            };
            bot.send_message(msg.chat.id, reply).await?;
            Ok(())
        },
    ))
}

/// Handler for plain text messages carrying (hopefully) an Instagram link
fn message_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_message()
        .filter(|msg: Message| msg.text().is_some())
        .endpoint(move |bot: Bot, msg: Message| {
            let deps = deps.clone();
            async move {
                handle_text_message(&bot, &msg, &deps).await;
                Ok(())
            }
        })
}

async fn handle_text_message(bot: &Bot, msg: &Message, deps: &HandlerDeps) {
    let Some(text) = msg.text() else { return };
    let text = text.trim().to_string();
    let chat_id = msg.chat.id;

    let (user_id, user_handle) = match msg.from.as_ref() {
        Some(user) => (
            i64::try_from(user.id.0).unwrap_or(0),
            user.username.clone().unwrap_or_else(|| user.full_name()),
        ),
        None => (chat_id.0, String::new()),
    };

    // Acknowledge receipt before the (slow) resolution and download start
    if text.contains("instagram.com") {
        let _ = bot
            .send_message(chat_id, "Link received. Downloading the video... (public posts only)")
            .await;
    }

    let sink = TelegramVideoSink {
        bot: bot.clone(),
        chat_id,
    };
    let request = RelayRequest {
        text,
        user_id,
        user_handle,
    };
    let outcome = run_relay(
        &request,
        deps.resolver.as_ref(),
        &deps.http,
        &sink,
        deps.download_log.as_ref(),
    )
    .await;

    let reply = match outcome {
        RelayOutcome::UsageHint => USAGE_HINT.to_string(),
        RelayOutcome::ShortcodeMissing => {
            "Could not find a shortcode in that link. Please send the full Instagram post/reel URL.".to_string()
        }
        RelayOutcome::VideoNotFound => {
            "Video not found, or the post is private. Make sure the post is public.".to_string()
        }
        RelayOutcome::TransferFailed(detail) => format!("Something went wrong: {}", detail),
        RelayOutcome::Delivered { logged: true } => "Downloaded and recorded ✅".to_string(),
        RelayOutcome::Delivered { logged: false } => {
            "Video delivered, but recording it in the download history failed.".to_string()
        }
    };

    if let Err(e) = bot.send_message(chat_id, reply).await {
        log::error!("failed to send reply to chat {}: {}", chat_id, e);
    }
}
