//! Shortcode extraction from Instagram URLs.

use lazy_regex::regex_captures;

/// Extract the post shortcode from a free-form Instagram URL.
///
/// Recognizes the content markers `/p/`, `/tv/`, `/reel/`, `/reels/` and
/// `/v/` and returns the path component that follows. URLs without a marker
/// degrade to the last non-empty path segment — the result may be garbage
/// for malformed input, which simply fails resolution downstream.
///
/// Returns `None` only when the URL has no path segments at all.
pub fn extract_shortcode(url: &str) -> Option<String> {
    if let Some((_, code)) = regex_captures!(r"(?:/p/|/tv/|/reel/|/reels/|/v/)([A-Za-z0-9_-]+)", url) {
        return Some(code.to_string());
    }

    // Some share links carry the shortcode as the final segment
    let last = url.trim_end_matches('/').rsplit('/').next()?;
    if last.is_empty() {
        return None;
    }
    Some(last.to_string())
}
