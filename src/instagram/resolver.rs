//! Media resolution via Instagram's internal GraphQL API.
//!
//! Calls the GraphQL endpoint directly to turn a shortcode into a direct,
//! time-limited video URL. Works for public posts and reels without login.
//! The `doc_id` is configurable via the `INSTAGRAM_DOC_ID` env var since
//! Instagram rotates it every few weeks.

use async_trait::async_trait;
use serde_json::Value;

use crate::core::error::{AppError, AppResult};

/// Instagram GraphQL API endpoint.
const GRAPHQL_ENDPOINT: &str = "https://www.instagram.com/api/graphql";

/// Instagram internal app ID (public, embedded in the web app).
const IG_APP_ID: &str = "936619743392459";

/// Facebook LSD token (anti-CSRF, public static value used by web scrapers).
const FB_LSD_TOKEN: &str = "AVqbxe3J_YA";

/// Facebook ASBD ID (public, embedded in the web app).
const FB_ASBD_ID: &str = "129477";

/// Default GraphQL `doc_id` for the shortcode media query.
const DEFAULT_DOC_ID: &str = "8845758582119845";

/// A resolved direct video URL. Consumed immediately by the relay,
/// never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedMedia {
    pub video_url: String,
}

/// Resolves a post shortcode to a direct video URL.
///
/// Every failure mode of the underlying collaborator (network error,
/// private or removed post, malformed shortcode, rate limiting) collapses
/// to `None`; callers cannot and should not distinguish the causes.
#[async_trait]
pub trait MediaResolver: Send + Sync {
    async fn resolve(&self, shortcode: &str) -> Option<ResolvedMedia>;
}

/// GraphQL-backed resolver for public Instagram posts.
pub struct InstagramResolver {
    client: reqwest::Client,
    endpoint: String,
    doc_id: String,
}

impl InstagramResolver {
    pub fn new() -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
            )
            .timeout(std::time::Duration::from_secs(30))
            .connect_timeout(std::time::Duration::from_secs(15))
            .build()?;

        Ok(Self {
            client,
            endpoint: GRAPHQL_ENDPOINT.to_string(),
            doc_id: std::env::var("INSTAGRAM_DOC_ID").unwrap_or_else(|_| DEFAULT_DOC_ID.to_string()),
        })
    }

    /// Fetch the shortcode media node from the GraphQL API.
    async fn fetch_shortcode_media(&self, shortcode: &str) -> AppResult<Value> {
        let variables = shortcode_variables(shortcode);
        let response = self
            .client
            .post(&self.endpoint)
            .header("X-IG-App-ID", IG_APP_ID)
            .header("X-FB-LSD", FB_LSD_TOKEN)
            .header("X-ASBD-ID", FB_ASBD_ID)
            .header("X-Requested-With", "XMLHttpRequest")
            .header("Referer", "https://www.instagram.com/")
            .header("Origin", "https://www.instagram.com")
            .form(&[
                ("doc_id", self.doc_id.as_str()),
                ("variables", variables.as_str()),
                ("lsd", FB_LSD_TOKEN),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::HttpStatus(response.status()));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| AppError::Download(format!("GraphQL returned non-JSON response: {}", e)))?;

        body.pointer("/data/xdt_shortcode_media")
            .or_else(|| body.pointer("/data/shortcode_media"))
            .cloned()
            .ok_or_else(|| {
                if let Some(message) = body.get("message").and_then(|v| v.as_str()) {
                    AppError::Download(format!("Post lookup failed: {}", message))
                } else {
                    AppError::Download("Post not found or media unavailable".to_string())
                }
            })
    }
}

/// Serialize the GraphQL `variables` form field.
///
/// The shortcode may come from the last-segment URL fallback and can
/// contain arbitrary text, so it has to be JSON-escaped properly.
fn shortcode_variables(shortcode: &str) -> String {
    serde_json::json!({ "shortcode": shortcode }).to_string()
}

/// Pick the direct video URL from a shortcode media node.
///
/// A plain video post yields its own `video_url`. A sidecar (carousel)
/// yields the first child node in given order that is itself a video.
/// Photo posts and carousels without videos yield `None`.
fn first_video_url(media: &Value) -> Option<String> {
    let is_video = media.get("is_video").and_then(|v| v.as_bool()).unwrap_or(false);
    if is_video {
        if let Some(url) = media.get("video_url").and_then(|v| v.as_str()) {
            return Some(url.to_string());
        }
    }

    media
        .pointer("/edge_sidecar_to_children/edges")
        .and_then(|v| v.as_array())?
        .iter()
        .find_map(|edge| {
            let node = edge.get("node")?;
            if !node.get("is_video").and_then(|v| v.as_bool()).unwrap_or(false) {
                return None;
            }
            node.get("video_url").and_then(|v| v.as_str()).map(String::from)
        })
}

#[async_trait]
impl MediaResolver for InstagramResolver {
    async fn resolve(&self, shortcode: &str) -> Option<ResolvedMedia> {
        match self.fetch_shortcode_media(shortcode).await {
            Ok(media) => {
                let resolved = first_video_url(&media).map(|video_url| ResolvedMedia { video_url });
                if resolved.is_none() {
                    log::info!("resolver: post {} has no video media", shortcode);
                }
                resolved
            }
            Err(e) => {
                log::warn!("resolver: lookup failed for {}: {}", shortcode, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn resolver_for(server: &MockServer) -> InstagramResolver {
        InstagramResolver {
            client: reqwest::Client::new(),
            endpoint: format!("{}/api/graphql", server.uri()),
            doc_id: "test-doc".to_string(),
        }
    }

    #[test]
    fn new_builds_a_client_instead_of_degrading() {
        let resolver = InstagramResolver::new().unwrap();
        assert_eq!(resolver.endpoint, GRAPHQL_ENDPOINT);
        assert!(!resolver.doc_id.is_empty());
    }

    #[test]
    fn variables_escape_hostile_shortcodes() {
        let variables = shortcode_variables(r#"a"b\c"#);
        let parsed: Value = serde_json::from_str(&variables).unwrap();
        assert_eq!(parsed["shortcode"], r#"a"b\c"#);
    }

    #[test]
    fn direct_video_post_yields_its_url() {
        let media = json!({
            "is_video": true,
            "video_url": "https://cdn.example/video.mp4",
            "display_url": "https://cdn.example/cover.jpg"
        });
        assert_eq!(first_video_url(&media), Some("https://cdn.example/video.mp4".to_string()));
    }

    #[test]
    fn photo_post_without_children_yields_none() {
        let media = json!({
            "is_video": false,
            "display_url": "https://cdn.example/photo.jpg"
        });
        assert_eq!(first_video_url(&media), None);
    }

    #[test]
    fn carousel_yields_first_video_child() {
        let media = json!({
            "is_video": false,
            "edge_sidecar_to_children": { "edges": [
                { "node": { "is_video": false, "display_url": "https://cdn.example/a.jpg" } },
                { "node": { "is_video": true, "video_url": "https://cdn.example/b.mp4" } },
                { "node": { "is_video": true, "video_url": "https://cdn.example/c.mp4" } }
            ]}
        });
        assert_eq!(first_video_url(&media), Some("https://cdn.example/b.mp4".to_string()));
    }

    #[test]
    fn carousel_of_images_yields_none() {
        let media = json!({
            "is_video": false,
            "edge_sidecar_to_children": { "edges": [
                { "node": { "is_video": false } },
                { "node": { "is_video": false } }
            ]}
        });
        assert_eq!(first_video_url(&media), None);
    }

    #[tokio::test]
    async fn resolve_returns_video_url_from_graphql_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/graphql"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "xdt_shortcode_media": {
                    "is_video": true,
                    "video_url": "https://cdn.example/reel.mp4"
                }}
            })))
            .mount(&server)
            .await;

        let resolved = resolver_for(&server).resolve("Cx1YzAbCDef").await;
        assert_eq!(
            resolved,
            Some(ResolvedMedia {
                video_url: "https://cdn.example/reel.mp4".to_string()
            })
        );
    }

    #[tokio::test]
    async fn resolve_collapses_not_found_to_none() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/graphql"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {},
                "message": "checkpoint_required"
            })))
            .mount(&server)
            .await;

        assert_eq!(resolver_for(&server).resolve("private").await, None);
    }

    #[tokio::test]
    async fn resolve_collapses_http_errors_to_none() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/graphql"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        assert_eq!(resolver_for(&server).resolve("anything").await, None);
    }

    #[tokio::test]
    async fn resolve_collapses_non_json_to_none() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/graphql"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
            .mount(&server)
            .await;

        assert_eq!(resolver_for(&server).resolve("anything").await, None);
    }
}
