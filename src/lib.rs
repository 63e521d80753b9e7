//! Reelgram — Telegram bot that relays Instagram videos into chat.
//!
//! Send the bot an Instagram post or reel link and it resolves the direct
//! video URL, downloads it to a temporary file, sends it back as a video
//! attachment and records the download in MySQL.
//!
//! # Module Structure
//!
//! - `core`: configuration, errors, logging
//! - `instagram`: shortcode parsing and video URL resolution
//! - `relay`: temp-file download and re-upload of the resolved video
//! - `storage`: the `downloads` table writer
//! - `pipeline`: the per-message relay state machine
//! - `telegram`: bot setup and dptree handlers

pub mod core;
pub mod instagram;
pub mod pipeline;
pub mod relay;
pub mod storage;
pub mod telegram;

// Re-export commonly used types for convenience
pub use crate::core::config::Config;
pub use crate::core::error::{AppError, AppResult};
pub use crate::instagram::{extract_shortcode, InstagramResolver, MediaResolver, ResolvedMedia};
pub use crate::pipeline::{run_relay, RelayOutcome, RelayRequest};
pub use crate::relay::{relay_video, VideoSink};
pub use crate::storage::{DownloadLog, DownloadRecord, MysqlDownloadLog};
