//! Blocking client for the Data API v3 `videos.list` endpoint.

mod client;
mod error;

pub use client::{DEFAULT_BASE_URL, YouTubeClient};
pub use error::{FailureKind, FetchError};

use domain::{VideoId, VideoMetadata};

/// Source of video metadata
pub trait VideoLookup {
    /// Fetch snippet and statistics for one video.
    ///
    /// A video the platform does not know is `FetchError::NotFound`.
    fn fetch(&self, id: &VideoId) -> Result<VideoMetadata, FetchError>;
}

impl<T: VideoLookup + ?Sized> VideoLookup for &T {
    fn fetch(&self, id: &VideoId) -> Result<VideoMetadata, FetchError> {
        (**self).fetch(id)
    }
}
