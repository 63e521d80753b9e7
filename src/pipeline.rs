//! The per-message relay pipeline.
//!
//! Each inbound message runs this state machine independently:
//! gate → parse link → resolve → relay → record. Any failure
//! short-circuits into an outcome the handler turns into a reply; no stage
//! result is cached or retried and no state survives across messages.

use crate::instagram::{extract_shortcode, MediaResolver};
use crate::relay::{relay_video, VideoSink};
use crate::storage::{DownloadLog, DownloadRecord};

/// What the handler should tell the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayOutcome {
    /// The text is not an Instagram link; reply with a usage hint.
    UsageHint,
    /// No shortcode could be extracted from the link.
    ShortcodeMissing,
    /// The post is private, missing or has no video.
    VideoNotFound,
    /// Download or upload failed; carries the failure detail.
    TransferFailed(String),
    /// Video delivered. `logged` is false when the downloads-table insert
    /// failed, which degrades the acknowledgement rather than hiding it.
    Delivered { logged: bool },
}

/// The inbound message, reduced to what the pipeline needs.
#[derive(Debug, Clone)]
pub struct RelayRequest {
    /// Trimmed message text; also recorded verbatim as the source URL.
    pub text: String,
    /// Telegram ID of the requester
    pub user_id: i64,
    /// Username, or full name when no username is set
    pub user_handle: String,
}

/// Run the full relay pipeline for one message.
pub async fn run_relay(
    request: &RelayRequest,
    resolver: &dyn MediaResolver,
    http: &reqwest::Client,
    sink: &dyn VideoSink,
    download_log: &dyn DownloadLog,
) -> RelayOutcome {
    if !request.text.contains("instagram.com") {
        return RelayOutcome::UsageHint;
    }

    let Some(shortcode) = extract_shortcode(&request.text) else {
        return RelayOutcome::ShortcodeMissing;
    };

    let Some(media) = resolver.resolve(&shortcode).await else {
        return RelayOutcome::VideoNotFound;
    };

    let filename = match relay_video(http, &media.video_url, sink).await {
        Ok(filename) => filename,
        Err(e) => {
            log::error!("relay failed for {}: {}", shortcode, e);
            return RelayOutcome::TransferFailed(e.to_string());
        }
    };

    let record = DownloadRecord {
        tg_user_id: request.user_id,
        tg_username: request.user_handle.clone(),
        instagram_url: request.text.clone(),
        filename,
    };
    let logged = match download_log.record(&record).await {
        Ok(()) => true,
        Err(e) => {
            log::error!("failed to record download for user {}: {}", request.user_id, e);
            false
        }
    };

    RelayOutcome::Delivered { logged }
}
