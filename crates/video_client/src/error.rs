use domain::VideoId;
use domain::wire::ErrorEnvelope;
use thiserror::Error;

const QUOTA_REASONS: &[&str] = &[
    "quotaExceeded",
    "dailyLimitExceeded",
    "rateLimitExceeded",
    "userRateLimitExceeded",
    "RATE_LIMIT_EXCEEDED",
];

const AUTH_REASONS: &[&str] = &[
    "keyInvalid",
    "keyExpired",
    "forbidden",
    "unauthorized",
    "accessNotConfigured",
    "ipRefererBlocked",
    "API_KEY_INVALID",
    "API_KEY_SERVICE_BLOCKED",
    "SERVICE_DISABLED",
];

const NOT_FOUND_REASONS: &[&str] = &["videoNotFound"];

fn matches_any(reasons: &[&str], known: &[&str]) -> bool {
    reasons.iter().any(|r| known.iter().any(|k| k == r))
}

/// Coarse classification of a failed lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    NotFound,
    Auth,
    Quota,
    Transport,
    Parse,
    Api,
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("video {0} not found")]
    NotFound(VideoId),

    #[error("authorization failed: {0}")]
    Auth(String),

    #[error("quota exceeded: {0}")]
    Quota(String),

    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("unexpected response: {0}")]
    Parse(String),

    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },
}

impl FetchError {
    pub fn kind(&self) -> FailureKind {
        match self {
            FetchError::NotFound(_) => FailureKind::NotFound,
            FetchError::Auth(_) => FailureKind::Auth,
            FetchError::Quota(_) => FailureKind::Quota,
            FetchError::Transport(_) => FailureKind::Transport,
            FetchError::Parse(_) => FailureKind::Parse,
            FetchError::Api { .. } => FailureKind::Api,
        }
    }

    /// Request URLs carry the API key, so they are stripped from the error
    pub(crate) fn transport(err: reqwest::Error) -> Self {
        FetchError::Transport(err.without_url())
    }

    /// Classify a non-success HTTP response from its status and error envelope
    pub(crate) fn from_api_response(id: &VideoId, status: u16, body: &str) -> Self {
        let envelope = serde_json::from_str::<ErrorEnvelope>(body).ok();

        let message = envelope
            .as_ref()
            .map(|e| e.error.message.clone())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| format!("HTTP {}", status));

        let reasons: Vec<&str> = envelope
            .as_ref()
            .map(|e| e.error.reasons().collect())
            .unwrap_or_default();

        // Quota errors are 403s too, so they go first
        if matches_any(&reasons, QUOTA_REASONS) {
            FetchError::Quota(message)
        } else if status == 401 || status == 403 || matches_any(&reasons, AUTH_REASONS) {
            FetchError::Auth(message)
        } else if matches_any(&reasons, NOT_FOUND_REASONS) {
            FetchError::NotFound(id.clone())
        } else {
            FetchError::Api { status, message }
        }
    }
}
