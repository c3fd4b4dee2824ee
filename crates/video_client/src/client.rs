use chrono::{DateTime, Utc};
use domain::wire::{VideoListResponse, VideoResource};
use domain::{ApiKey, Count, VideoId, VideoMetadata};
use reqwest::blocking::Client;
use tracing::{debug, warn};

use crate::{FetchError, VideoLookup};

/// Public Data API v3 root
pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

const REQUESTED_PARTS: &str = "snippet,statistics";

/// Client for `videos.list`.
///
/// Each lookup is one blocking request with no retries. Timeouts are left
/// to the transport defaults.
pub struct YouTubeClient {
    http: Client,
    api_key: ApiKey,
    base_url: String,
}

impl YouTubeClient {
    pub fn new(api_key: ApiKey) -> Result<Self, FetchError> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Point the client at another API root, e.g. a local stub service
    pub fn with_base_url(api_key: ApiKey, base_url: impl Into<String>) -> Result<Self, FetchError> {
        let http = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(FetchError::transport)?;

        Ok(Self {
            http,
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, id: &VideoId) -> Result<VideoMetadata, FetchError> {
        let url = format!("{}/videos", self.base_url);
        debug!(video_id = %id, url = %url, "requesting videos.list");

        let response = self
            .http
            .get(&url)
            .query(&[
                ("part", REQUESTED_PARTS),
                ("id", id.as_str()),
                ("key", self.api_key.expose()),
            ])
            .send()
            .map_err(FetchError::transport)?;

        let status = response.status();
        let body = response.text().map_err(FetchError::transport)?;

        if !status.is_success() {
            return Err(FetchError::from_api_response(id, status.as_u16(), &body));
        }

        let list: VideoListResponse = serde_json::from_str(&body)
            .map_err(|e| FetchError::Parse(format!("invalid videos.list body: {}", e)))?;

        let item = list
            .items
            .into_iter()
            .next()
            .ok_or_else(|| FetchError::NotFound(id.clone()))?;

        into_metadata(id, item)
    }
}

impl VideoLookup for YouTubeClient {
    fn fetch(&self, id: &VideoId) -> Result<VideoMetadata, FetchError> {
        let result = self.request(id);
        if let Err(e) = &result {
            warn!(video_id = %id, kind = ?e.kind(), error = %e, "video lookup failed");
        }
        result
    }
}

fn into_metadata(id: &VideoId, item: VideoResource) -> Result<VideoMetadata, FetchError> {
    let snippet = item
        .snippet
        .ok_or_else(|| FetchError::Parse(format!("video {} has no snippet", id)))?;

    let published_at = DateTime::parse_from_rfc3339(&snippet.published_at)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            FetchError::Parse(format!("invalid publishedAt '{}': {}", snippet.published_at, e))
        })?;

    let statistics = item.statistics.unwrap_or_default();

    Ok(VideoMetadata {
        id: id.clone(),
        title: snippet.title,
        channel_title: snippet.channel_title,
        published_at,
        view_count: statistics.view_count.as_deref().map(Count::from_api),
        like_count: statistics.like_count.as_deref().map(Count::from_api),
        comment_count: statistics.comment_count.as_deref().map(Count::from_api),
        tags: snippet.tags.unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FailureKind;
    use chrono::TimeZone;

    fn id() -> VideoId {
        VideoId::parse("dQw4w9WgXcQ").unwrap()
    }

    fn resource(json: &str) -> VideoResource {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_into_metadata_full_item() {
        let item = resource(
            r#"{
                "id": "dQw4w9WgXcQ",
                "snippet": {
                    "publishedAt": "2009-10-25T06:57:33Z",
                    "title": "Never Gonna Give You Up",
                    "channelTitle": "Rick Astley",
                    "tags": ["rick", "80s"]
                },
                "statistics": {"viewCount": "1600000000", "likeCount": "18000000", "commentCount": "2300000"}
            }"#,
        );
        let video = into_metadata(&id(), item).unwrap();
        assert_eq!(video.title, "Never Gonna Give You Up");
        assert_eq!(video.channel_title, "Rick Astley");
        assert_eq!(
            video.published_at,
            Utc.with_ymd_and_hms(2009, 10, 25, 6, 57, 33).unwrap()
        );
        assert_eq!(video.view_count, Some(Count::Exact(1_600_000_000)));
        assert_eq!(video.tags, vec!["rick", "80s"]);
    }

    #[test]
    fn test_into_metadata_hidden_counts_and_no_tags() {
        let item = resource(
            r#"{
                "id": "dQw4w9WgXcQ",
                "snippet": {"publishedAt": "2024-01-15T12:00:00Z", "title": "t", "channelTitle": "c"},
                "statistics": {"viewCount": "10"}
            }"#,
        );
        let video = into_metadata(&id(), item).unwrap();
        assert_eq!(video.view_count, Some(Count::Exact(10)));
        assert_eq!(video.like_count, None);
        assert_eq!(video.comment_count, None);
        assert!(video.tags.is_empty());
    }

    #[test]
    fn test_into_metadata_missing_statistics() {
        let item = resource(
            r#"{"id": "dQw4w9WgXcQ",
                "snippet": {"publishedAt": "2024-01-15T12:00:00Z", "title": "t", "channelTitle": "c"}}"#,
        );
        let video = into_metadata(&id(), item).unwrap();
        assert!(video.view_count.is_none());
    }

    #[test]
    fn test_into_metadata_rejects_bad_timestamp_and_missing_snippet() {
        let bad_time = resource(
            r#"{"id": "dQw4w9WgXcQ",
                "snippet": {"publishedAt": "yesterday", "title": "t", "channelTitle": "c"}}"#,
        );
        assert_eq!(into_metadata(&id(), bad_time).unwrap_err().kind(), FailureKind::Parse);

        let no_snippet = resource(r#"{"id": "dQw4w9WgXcQ"}"#);
        assert_eq!(into_metadata(&id(), no_snippet).unwrap_err().kind(), FailureKind::Parse);
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = YouTubeClient::with_base_url(ApiKey::new("k"), "http://127.0.0.1:1/v3/").unwrap();
        assert_eq!(client.base_url(), "http://127.0.0.1:1/v3");
    }
}
