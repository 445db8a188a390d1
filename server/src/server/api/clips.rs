use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use twitch_client::{ChannelRef, Clip, DateWindow, TwitchError};

use super::err_text;
use crate::app::SharedState;

type ApiResult<T> = Result<Json<T>, (StatusCode, String)>;

#[derive(Debug, Deserialize)]
pub struct ClipsQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub broadcaster_name: Option<String>,
    pub broadcaster_id: Option<String>,
}

/// Clip as served to the widget: every upstream field plus the MP4 source.
#[derive(Debug, Serialize)]
pub struct ClipView {
    #[serde(flatten)]
    pub clip: Clip,
    pub video_url: Option<String>,
}

impl From<Clip> for ClipView {
    fn from(mut clip: Clip) -> Self {
        // The derived field replaces any upstream key of the same name.
        clip.extra.remove("video_url");
        let video_url = clip.video_url();
        Self { clip, video_url }
    }
}

fn map_twitch_error(err: TwitchError) -> (StatusCode, String) {
    match err {
        TwitchError::ChannelNotFound(_) => err_text(404, &err.to_string()),
        TwitchError::InvalidWindow => err_text(400, &err.to_string()),
        other => err_text(500, &other.to_string()),
    }
}

/// Accepts RFC 3339 timestamps, offset-less timestamps (taken as UTC) and bare dates.
fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn required_date(value: Option<&str>, name: &str) -> Result<DateTime<Utc>, (StatusCode, String)> {
    let value = value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| err_text(400, &format!("{name} is required")))?;
    parse_date(value).ok_or_else(|| err_text(400, &format!("{name} is not a valid date: {value}")))
}

/// Name wins over id; with neither, fall back to the configured broadcaster.
fn channel_from_query(q: &ClipsQuery, default_id: Option<&str>) -> Option<ChannelRef> {
    let non_empty = |v: &Option<String>| {
        v.as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };

    non_empty(&q.broadcaster_name)
        .map(ChannelRef::Name)
        .or_else(|| non_empty(&q.broadcaster_id).map(ChannelRef::Id))
        .or_else(|| default_id.map(|id| ChannelRef::Id(id.to_string())))
}

/// GET /clips?start_date=...&end_date=...&broadcaster_name=...
pub async fn get_clips(
    State(state): State<SharedState>,
    Query(q): Query<ClipsQuery>,
) -> ApiResult<Vec<ClipView>> {
    let start = required_date(q.start_date.as_deref(), "start_date")?;
    let end = required_date(q.end_date.as_deref(), "end_date")?;
    let window = DateWindow::new(start, end).map_err(map_twitch_error)?;

    let channel = channel_from_query(&q, state.config().broadcaster_id.as_deref())
        .ok_or_else(|| err_text(400, "broadcaster_name or broadcaster_id is required"))?;

    let clips = state
        .clips()
        .get_clips(&channel, &window)
        .await
        .map_err(|err| {
            tracing::error!(channel = ?channel, error = %err, "Failed to get clips");
            map_twitch_error(err)
        })?;

    Ok(Json(clips.into_iter().map(ClipView::from).collect()))
}
