use serde::{Deserialize, Serialize};
use url::Url;

pub const DEFAULT_CAPTURE_TITLE: &str = "Untitled";

const FAVICON_ENDPOINT: &str = "https://t2.gstatic.com/faviconV2";

/// Body of `POST /api/link`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureRequest {
    pub title: String,
    pub url: String,
    pub category_id: String,
    pub icon: String,
}

impl CaptureRequest {
    /// Builds the request for saving `target_url` into `category_id`.
    /// A missing or blank title falls back to [`DEFAULT_CAPTURE_TITLE`].
    pub fn new(category_id: &str, target_url: &str, page_title: Option<&str>) -> Self {
        let title = page_title
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_CAPTURE_TITLE);
        Self {
            title: title.to_string(),
            url: target_url.to_string(),
            category_id: category_id.to_string(),
            icon: favicon_url(target_url).unwrap_or_default(),
        }
    }
}

/// Save what was right-clicked, else the page itself.
pub fn resolve_target<'a>(link_url: Option<&'a str>, page_url: Option<&'a str>) -> Option<&'a str> {
    link_url
        .filter(|u| !u.trim().is_empty())
        .or_else(|| page_url.filter(|u| !u.trim().is_empty()))
}

/// Best-effort icon hint for `target`, derived from its origin.
/// Unparsable URLs and opaque origins yield `None`.
pub fn favicon_url(target: &str) -> Option<String> {
    let parsed = Url::parse(target).ok()?;
    let origin = parsed.origin();
    if !origin.is_tuple() {
        return None;
    }
    let mut icon = Url::parse(FAVICON_ENDPOINT).ok()?;
    icon.query_pairs_mut()
        .append_pair("client", "SOCIAL")
        .append_pair("type", "FAVICON")
        .append_pair("fallback_opts", "TYPE,SIZE,URL")
        .append_pair("url", &origin.ascii_serialization())
        .append_pair("size", "128");
    Some(icon.to_string())
}
