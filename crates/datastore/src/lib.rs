use chrono::{TimeZone, Utc};
use domain::{Count, VideoId, VideoMetadata};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Repository trait for data access abstraction
pub trait Repository: Send + Sync {
    /// Get a video by ID
    fn get_video(&self, id: &str) -> Option<VideoMetadata>;

    /// Get all videos
    fn get_videos(&self) -> Vec<VideoMetadata>;

    /// Add or replace a video
    fn add_video(&self, video: VideoMetadata);
}

/// In-memory implementation of the Repository trait
pub struct InMemoryRepository {
    videos: Arc<RwLock<HashMap<String, VideoMetadata>>>,
}

impl InMemoryRepository {
    /// Create a new in-memory repository with sample videos
    pub fn new() -> Self {
        let repo = Self::empty();
        repo.populate_sample_data();
        repo
    }

    /// Create a repository without any videos
    pub fn empty() -> Self {
        Self {
            videos: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    fn populate_sample_data(&self) {
        let samples = [
            (
                "dQw4w9WgXcQ",
                "Rick Astley - Never Gonna Give You Up (Official Music Video)",
                "Rick Astley",
                Utc.with_ymd_and_hms(2009, 10, 25, 6, 57, 33),
                Some("1600000000"),
                Some("18000000"),
                Some("2300000"),
                vec!["rick astley", "never gonna give you up", "80s"],
            ),
            (
                "jNQXAC9IVRw",
                "Me at the zoo",
                "jawed",
                Utc.with_ymd_and_hms(2005, 4, 24, 3, 31, 52),
                Some("350000000"),
                None,
                Some("10000000"),
                vec![],
            ),
        ];

        for (id, title, channel, published, views, likes, comments, tags) in samples {
            // Fixed literals: both always resolve
            let (Ok(id), Some(published_at)) = (VideoId::parse(id), published.single()) else {
                continue;
            };
            self.add_video(VideoMetadata {
                id,
                title: title.to_string(),
                channel_title: channel.to_string(),
                published_at,
                view_count: views.map(Count::from_api),
                like_count: likes.map(Count::from_api),
                comment_count: comments.map(Count::from_api),
                tags: tags.into_iter().map(String::from).collect(),
            });
        }
    }
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Repository for InMemoryRepository {
    fn get_video(&self, id: &str) -> Option<VideoMetadata> {
        self.videos
            .read()
            .expect("Failed to acquire read lock on videos")
            .get(id)
            .cloned()
    }

    fn get_videos(&self) -> Vec<VideoMetadata> {
        self.videos
            .read()
            .expect("Failed to acquire read lock on videos")
            .values()
            .cloned()
            .collect()
    }

    fn add_video(&self, video: VideoMetadata) {
        self.videos
            .write()
            .expect("Failed to acquire write lock on videos")
            .insert(video.id.to_string(), video);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_data_is_seeded() {
        let repo = InMemoryRepository::new();
        assert_eq!(repo.get_videos().len(), 2);

        let zoo = repo.get_video("jNQXAC9IVRw").unwrap();
        assert_eq!(zoo.channel_title, "jawed");
        assert!(zoo.like_count.is_none());
        assert!(zoo.tags.is_empty());
    }

    #[test]
    fn test_add_video_replaces_existing() {
        let repo = InMemoryRepository::empty();
        assert!(repo.get_video("dQw4w9WgXcQ").is_none());

        let mut video = InMemoryRepository::new().get_video("dQw4w9WgXcQ").unwrap();
        repo.add_video(video.clone());
        video.title = "Renamed".to_string();
        repo.add_video(video);

        assert_eq!(repo.get_videos().len(), 1);
        assert_eq!(repo.get_video("dQw4w9WgXcQ").unwrap().title, "Renamed");
    }
}
