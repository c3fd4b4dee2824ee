use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod wire;

/// Length of every video identifier issued by the platform
pub const VIDEO_ID_LEN: usize = 11;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is not an 11-character video identifier")]
pub struct InvalidVideoId(pub String);

/// Identifier of a single video, e.g. `dQw4w9WgXcQ`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VideoId(String);

impl VideoId {
    /// Accepts exactly 11 characters of `[A-Za-z0-9_-]`
    pub fn parse(raw: &str) -> Result<Self, InvalidVideoId> {
        let valid = raw.len() == VIDEO_ID_LEN
            && raw
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
        if valid {
            Ok(Self(raw.to_string()))
        } else {
            Err(InvalidVideoId(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for VideoId {
    type Error = InvalidVideoId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<VideoId> for String {
    fn from(id: VideoId) -> Self {
        id.0
    }
}

/// A statistics counter as reported by the API.
///
/// The API transmits counters as decimal strings. Anything that does not
/// parse as a non-negative integer is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Count {
    Exact(u64),
    Raw(String),
}

impl Count {
    pub fn from_api(text: &str) -> Self {
        match text.parse::<u64>() {
            Ok(n) => Count::Exact(n),
            Err(_) => Count::Raw(text.to_string()),
        }
    }
}

impl fmt::Display for Count {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Count::Exact(n) => write!(f, "{}", n),
            Count::Raw(s) => f.write_str(s),
        }
    }
}

/// Metadata of one video, assembled from the snippet and statistics facets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoMetadata {
    pub id: VideoId,
    pub title: String,
    pub channel_title: String,
    pub published_at: DateTime<Utc>,
    pub view_count: Option<Count>,
    pub like_count: Option<Count>,
    pub comment_count: Option<Count>,
    pub tags: Vec<String>,
}

/// Data API key.
///
/// Injected once at startup. `Debug` is redacted so the key cannot leak
/// through logs.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Value shipped in sample configuration
    pub const PLACEHOLDER: &'static str = "YOUR_API_KEY";

    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_placeholder(&self) -> bool {
        let key = self.0.trim();
        key.is_empty() || key == Self::PLACEHOLDER
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}
