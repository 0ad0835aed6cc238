use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::storyboard::StoryboardError;

/// Failure of a single call to an upstream provider.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// Network failure, timeout, or an unreadable body.
    #[error("{provider} request failed: {source}")]
    Transport {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The provider answered with a non-success status.
    #[error("{provider} returned HTTP {status}: {message}")]
    Status {
        provider: &'static str,
        status: u16,
        message: String,
    },

    /// The body was not the JSON shape the provider documents.
    #[error("{provider} response could not be decoded: {message}")]
    Decode {
        provider: &'static str,
        message: String,
    },

    /// Well-formed response without the expected content.
    #[error("{provider} response did not contain generated content")]
    Extraction { provider: &'static str },
}

impl ProviderError {
    pub fn transport(provider: &'static str, source: reqwest::Error) -> Self {
        Self::Transport { provider, source }
    }

    pub fn decode(provider: &'static str, message: impl Into<String>) -> Self {
        Self::Decode {
            provider,
            message: message.into(),
        }
    }

    /// Upstream HTTP status, when the provider answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Application-level error type for HTTP handlers.
///
/// Implements [`IntoResponse`] to produce `{ "error", "code" }` JSON bodies.
/// Provider details are logged, never returned to the client.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A rejected request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Nothing could be produced for an otherwise valid request.
    #[error("Not found: {0}")]
    NotFound(String),

    /// An optional feature without the configuration it needs.
    #[error("Unavailable: {0}")]
    Unavailable(String),

    /// The request ran past its deadline.
    #[error("Timed out: {0}")]
    Timeout(String),

    /// An upstream provider call failed.
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<StoryboardError> for AppError {
    fn from(err: StoryboardError) -> Self {
        AppError::NotFound(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Unavailable(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, "UNAVAILABLE", msg.clone())
            }
            AppError::Timeout(msg) => (StatusCode::REQUEST_TIMEOUT, "TIMEOUT", msg.clone()),
            AppError::Provider(err) => classify_provider_error(err),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Map a provider failure onto the status the client sees.
///
/// - Upstream 401 maps to 401 (bad credentials on our side).
/// - Upstream 429 maps to 429.
/// - Everything else maps to 500 with a sanitized message.
fn classify_provider_error(err: &ProviderError) -> (StatusCode, &'static str, String) {
    tracing::error!(error = %err, "Upstream provider failure");

    match err.status() {
        Some(401) => (
            StatusCode::UNAUTHORIZED,
            "UNAUTHORIZED",
            "Invalid API credentials for the upstream provider".to_string(),
        ),
        Some(429) => (
            StatusCode::TOO_MANY_REQUESTS,
            "RATE_LIMITED",
            "Upstream rate limit exceeded, please try again later".to_string(),
        ),
        _ => {
            let message = match err {
                ProviderError::Extraction { .. } => {
                    "Could not extract content from the provider response"
                }
                _ => "The upstream provider request failed",
            };
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "UPSTREAM_ERROR",
                message.to_string(),
            )
        }
    }
}
