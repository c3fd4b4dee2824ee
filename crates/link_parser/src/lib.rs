//! Video identifier extraction from user-pasted links.
//!
//! Recognised shapes, tried in this order:
//! - `youtube.com/shorts/<id>`
//! - `youtube.com/watch?v=<id>`
//! - `youtu.be/<id>`
//!
//! Matching is a substring search, so schemes, `www.`/`m.` prefixes and
//! trailing query parameters are all accepted.

use domain::VideoId;
use regex::Regex;

lazy_static::lazy_static! {
    static ref LINK_PATTERNS: [Regex; 3] = [
        Regex::new(r"youtube\.com/shorts/([a-zA-Z0-9_-]{11})").unwrap(),
        Regex::new(r"youtube\.com/watch\?v=([a-zA-Z0-9_-]{11})").unwrap(),
        Regex::new(r"youtu\.be/([a-zA-Z0-9_-]{11})").unwrap(),
    ];
}

/// Returns the identifier of the first matching pattern, or `None`.
///
/// The platform is not consulted; the identifier may still refer to a
/// video that does not exist.
pub fn extract_video_id(text: &str) -> Option<VideoId> {
    LINK_PATTERNS
        .iter()
        .filter_map(|re| re.captures(text))
        .filter_map(|caps| caps.get(1))
        .find_map(|m| VideoId::parse(m.as_str()).ok())
}
