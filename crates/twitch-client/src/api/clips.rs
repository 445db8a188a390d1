use chrono::SecondsFormat;

use super::*;

/// Number of clips requested from Helix. Only the first page is ever read.
pub const CLIPS_PAGE_SIZE: u32 = 20;

impl TwitchApiClient {
    /// Get the first page of clips created by a broadcaster within a window.
    ///
    /// A response whose `data` list is missing or `null` yields an empty batch.
    pub async fn get_clips(
        &self,
        token: &Token,
        broadcaster_id: &str,
        window: &DateWindow,
    ) -> Result<ClipBatch, TwitchError> {
        let query = [
            ("broadcaster_id", broadcaster_id.to_string()),
            ("first", CLIPS_PAGE_SIZE.to_string()),
            (
                "started_at",
                window.start().to_rfc3339_opts(SecondsFormat::AutoSi, true),
            ),
            (
                "ended_at",
                window.end().to_rfc3339_opts(SecondsFormat::AutoSi, true),
            ),
        ];
        let body = self.authenticated_get("clips", &query, token).await?;
        let batch = parse_clips_body(&body)?;

        tracing::debug!(
            broadcaster_id,
            count = batch.clips.len(),
            has_more = batch.cursor.is_some(),
            "Fetched clips"
        );
        Ok(batch)
    }
}

pub(super) fn parse_clips_body(body: &str) -> Result<ClipBatch, TwitchError> {
    let resp: ClipsResponse = serde_json::from_str(body)
        .map_err(|e| TwitchError::MalformedResponse(format!("clips response: {e}")))?;

    Ok(ClipBatch {
        clips: resp.data.unwrap_or_default(),
        cursor: resp.pagination.and_then(|p| p.cursor),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_data_is_an_empty_batch() {
        let batch = parse_clips_body(r#"{"data": null}"#).unwrap();
        assert!(batch.clips.is_empty());
        assert!(batch.cursor.is_none());
    }

    #[test]
    fn missing_data_is_an_empty_batch() {
        let batch = parse_clips_body(r#"{"pagination": {}}"#).unwrap();
        assert!(batch.clips.is_empty());
    }

    #[test]
    fn non_json_body_is_malformed() {
        let err = parse_clips_body("<html>oops</html>").unwrap_err();
        assert!(matches!(err, TwitchError::MalformedResponse(_)));
    }

    #[test]
    fn wrong_list_type_is_malformed() {
        let err = parse_clips_body(r#"{"data": "nope"}"#).unwrap_err();
        assert!(matches!(err, TwitchError::MalformedResponse(_)));
    }

    #[test]
    fn cursor_is_kept() {
        let body = r#"{
            "data": [{
                "id": "AwkwardHelplessSalamanderSwiftRage",
                "title": "random1",
                "thumbnail_url": "https://clips-media-assets2.twitch.tv/157589949-preview-480x272.jpg",
                "created_at": "2017-11-30T22:34:18Z"
            }],
            "pagination": {"cursor": "eyJiIjpudWxsLCJhIjoiIn0"}
        }"#;
        let batch = parse_clips_body(body).unwrap();
        assert_eq!(batch.clips.len(), 1);
        assert_eq!(batch.clips[0].title, "random1");
        assert_eq!(batch.cursor.as_deref(), Some("eyJiIjpudWxsLCJhIjoiIn0"));
    }
}
