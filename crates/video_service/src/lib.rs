use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::SecondsFormat;
use datastore::Repository;
use domain::VideoMetadata;
use domain::wire::{
    ApiErrorBody, ApiErrorDetail, ApiErrorItem, ErrorEnvelope, PageInfo, VideoListResponse,
    VideoResource, VideoSnippet, VideoStatistics,
};
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{debug, error};

/// Path the videos endpoint is mounted under, relative to the server root
pub const API_ROOT: &str = "/youtube/v3";

/// Behaviour switches for the stub endpoint
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// The only key the service accepts
    pub api_key: String,
    /// Answer every request with a quota error
    pub quota_exceeded: bool,
}

impl ServiceConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            quota_exceeded: false,
        }
    }
}

#[derive(Clone)]
struct AppState {
    config: Arc<ServiceConfig>,
    repo: Arc<dyn Repository>,
}

#[derive(Debug, Deserialize)]
pub struct VideosListParams {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub part: String,
    #[serde(default)]
    pub key: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Parts {
    snippet: bool,
    statistics: bool,
}

fn requested_parts(part: &str) -> Parts {
    let parts: Vec<&str> = part.split(',').map(|s| s.trim()).collect();
    Parts {
        snippet: parts.contains(&"snippet"),
        statistics: parts.contains(&"statistics"),
    }
}

fn to_resource(video: VideoMetadata, parts: Parts) -> VideoResource {
    let id = video.id.to_string();
    VideoResource {
        kind: "youtube#video".to_string(),
        etag: format!("etag-{}", id),
        snippet: parts.snippet.then(|| VideoSnippet {
            published_at: video.published_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            channel_id: String::new(),
            title: video.title,
            description: String::new(),
            channel_title: video.channel_title,
            tags: (!video.tags.is_empty()).then_some(video.tags),
        }),
        statistics: parts.statistics.then(|| VideoStatistics {
            view_count: video.view_count.map(|c| c.to_string()),
            like_count: video.like_count.map(|c| c.to_string()),
            comment_count: video.comment_count.map(|c| c.to_string()),
        }),
        id,
    }
}

fn error_response(status: StatusCode, message: &str, domain: &str, reason: &str) -> Response {
    let envelope = ErrorEnvelope {
        error: ApiErrorBody {
            code: status.as_u16(),
            message: message.to_string(),
            status: None,
            errors: vec![ApiErrorItem {
                message: message.to_string(),
                domain: domain.to_string(),
                reason: reason.to_string(),
            }],
            details: Vec::new(),
        },
    };
    (status, Json(envelope)).into_response()
}

fn invalid_key_response() -> Response {
    let message = "API key not valid. Please pass a valid API key.";
    let mut envelope = ErrorEnvelope {
        error: ApiErrorBody {
            code: 400,
            message: message.to_string(),
            status: Some("INVALID_ARGUMENT".to_string()),
            errors: vec![ApiErrorItem {
                message: message.to_string(),
                domain: "global".to_string(),
                reason: "badRequest".to_string(),
            }],
            details: Vec::new(),
        },
    };
    envelope.error.details.push(ApiErrorDetail {
        type_url: "type.googleapis.com/google.rpc.ErrorInfo".to_string(),
        reason: Some("API_KEY_INVALID".to_string()),
    });
    (StatusCode::BAD_REQUEST, Json(envelope)).into_response()
}

async fn videos_list(
    State(state): State<AppState>,
    Query(params): Query<VideosListParams>,
) -> Response {
    debug!(id = %params.id, part = %params.part, "videos.list");

    if params.key.as_deref() != Some(state.config.api_key.as_str()) {
        return invalid_key_response();
    }

    if state.config.quota_exceeded {
        return error_response(
            StatusCode::FORBIDDEN,
            "The request cannot be completed because you have exceeded your quota.",
            "youtube.quota",
            "quotaExceeded",
        );
    }

    if params.part.trim().is_empty() {
        return error_response(
            StatusCode::BAD_REQUEST,
            "Required parameter: part",
            "global",
            "required",
        );
    }

    let parts = requested_parts(&params.part);

    // Unknown ids are silently skipped, as the real endpoint does
    let items: Vec<VideoResource> = params
        .id
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .filter_map(|id| state.repo.get_video(id))
        .map(|video| to_resource(video, parts))
        .collect();

    let count = items.len() as i32;
    let response = VideoListResponse {
        kind: "youtube#videoListResponse".to_string(),
        etag: "etag-list-1".to_string(),
        page_info: Some(PageInfo {
            total_results: count,
            results_per_page: count,
        }),
        items,
    };

    (StatusCode::OK, Json(response)).into_response()
}

// Create the router for the video API
pub fn create_router(config: ServiceConfig, repo: Arc<dyn Repository>) -> Router {
    let state = AppState {
        config: Arc::new(config),
        repo,
    };
    Router::new()
        .route(&format!("{}/videos", API_ROOT), get(videos_list))
        .with_state(state)
}

/// Serve `router` on an ephemeral localhost port from a background thread.
///
/// The thread owns its own runtime, so blocking callers (and blocking HTTP
/// clients) can use the returned address directly.
pub fn spawn(router: Router) -> std::io::Result<SocketAddr> {
    let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
    listener.set_nonblocking(true)?;
    let addr = listener.local_addr()?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    std::thread::spawn(move || {
        runtime.block_on(async move {
            let listener = match tokio::net::TcpListener::from_std(listener) {
                Ok(listener) => listener,
                Err(e) => {
                    error!(error = %e, "failed to register stub listener");
                    return;
                }
            };
            if let Err(e) = axum::serve(listener, router).await {
                error!(error = %e, "stub video service stopped");
            }
        });
    });

    Ok(addr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use datastore::InMemoryRepository;

    #[test]
    fn test_requested_parts() {
        assert_eq!(
            requested_parts("snippet, statistics"),
            Parts { snippet: true, statistics: true }
        );
        assert_eq!(
            requested_parts("statistics"),
            Parts { snippet: false, statistics: true }
        );
        assert_eq!(
            requested_parts("contentDetails"),
            Parts { snippet: false, statistics: false }
        );
    }

    #[test]
    fn test_to_resource_matches_api_shape() {
        let video = InMemoryRepository::new().get_video("jNQXAC9IVRw").unwrap();
        let resource = to_resource(video, Parts { snippet: true, statistics: true });
        let json = serde_json::to_value(&resource).unwrap();

        assert_eq!(json["id"], "jNQXAC9IVRw");
        assert_eq!(json["snippet"]["publishedAt"], "2005-04-24T03:31:52Z");
        assert_eq!(json["snippet"]["channelTitle"], "jawed");
        assert!(json["snippet"].get("tags").is_none());
        assert_eq!(json["statistics"]["viewCount"], "350000000");
        assert!(json["statistics"].get("likeCount").is_none());
    }

    #[test]
    fn test_to_resource_honours_parts() {
        let video = InMemoryRepository::new().get_video("dQw4w9WgXcQ").unwrap();
        let resource = to_resource(video, Parts { snippet: false, statistics: true });
        assert!(resource.snippet.is_none());
        assert!(resource.statistics.is_some());
    }
}
