use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::TwitchError;

/// Wrapper for Twitch Helix list responses.
#[derive(Debug, Deserialize)]
pub struct HelixResponse<T> {
    pub data: Vec<T>,
}

#[derive(Debug, Deserialize)]
pub struct HelixPagination {
    #[serde(default)]
    pub cursor: Option<String>,
}

/// Envelope of GET /helix/clips. `data` may be absent or `null`.
#[derive(Debug, Deserialize)]
pub struct ClipsResponse {
    #[serde(default)]
    pub data: Option<Vec<Clip>>,
    #[serde(default)]
    pub pagination: Option<HelixPagination>,
}

/// User information from GET /helix/users.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TwitchUser {
    pub id: String,
    pub login: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub broadcaster_type: String,
    #[serde(default)]
    pub profile_image_url: String,
}

/// Clip information from GET /helix/clips.
///
/// Fields not modeled here are kept in `extra` and serialized back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clip {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub broadcaster_id: String,
    #[serde(default)]
    pub broadcaster_name: String,
    #[serde(default)]
    pub creator_name: String,
    #[serde(default)]
    pub view_count: u64,
    #[serde(default)]
    pub duration: f64,
    #[serde(default)]
    pub thumbnail_url: String,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Clip {
    /// Direct MP4 URL derived from the preview thumbnail.
    ///
    /// Thumbnails look like `.../<slug>-preview-480x272.jpg`; the video lives
    /// at `.../<slug>.mp4`. Returns `None` for any other shape.
    pub fn video_url(&self) -> Option<String> {
        let idx = self.thumbnail_url.rfind("-preview-")?;
        let dims = self.thumbnail_url[idx + "-preview-".len()..].strip_suffix(".jpg")?;
        let (w, h) = dims.split_once('x')?;
        let numeric = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
        if !numeric(w) || !numeric(h) {
            return None;
        }
        Some(format!("{}.mp4", &self.thumbnail_url[..idx]))
    }
}

/// One page of clips. The cursor is recorded but never followed.
#[derive(Debug, Clone, Default)]
pub struct ClipBatch {
    pub clips: Vec<Clip>,
    pub cursor: Option<String>,
}

/// Inclusive time range passed verbatim to the clips endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl DateWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, TwitchError> {
        if start > end {
            return Err(TwitchError::InvalidWindow);
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }
}
