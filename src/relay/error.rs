//! Relay error types.

use axum::{
    extract::multipart::{MultipartError, MultipartRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Errors raised while forwarding an upload to the upstream service.
///
/// Variants exist for logs and metrics. At the HTTP boundary every one of
/// them becomes the same failure payload.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The upstream URL could not be parsed.
    #[error("invalid upstream URL `{url}`: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The HTTP client could not be constructed.
    #[error("failed to build upstream client: {0}")]
    Client(#[source] reqwest::Error),

    /// Connect, send or timeout failure before a status was received.
    #[error("upstream request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// Upstream answered with something other than 200.
    #[error("upstream returned status {0}")]
    Status(StatusCode),

    /// Upstream answered 200 but the body could not be read.
    #[error("failed to read upstream body: {0}")]
    Body(#[source] reqwest::Error),
}

impl RelayError {
    /// Short label used as the `outcome` metric dimension.
    pub fn kind(&self) -> &'static str {
        match self {
            RelayError::InvalidUrl { .. } | RelayError::Client(_) => "setup",
            RelayError::Transport(e) if e.is_timeout() => "timeout",
            RelayError::Transport(_) => "transport",
            RelayError::Status(_) => "status",
            RelayError::Body(_) => "body",
        }
    }
}

/// Rejection of a client upload before anything is sent upstream.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("expected multipart/form-data: {0}")]
    NotMultipart(#[from] MultipartRejection),

    #[error("malformed multipart body: {0}")]
    Malformed(#[from] MultipartError),

    #[error("missing `file` field")]
    MissingFile,
}

#[derive(Serialize)]
struct DetailBody {
    detail: String,
}

impl IntoResponse for UploadError {
    fn into_response(self) -> Response {
        let status = match &self {
            UploadError::Malformed(e) if e.status() == StatusCode::PAYLOAD_TOO_LARGE => {
                StatusCode::PAYLOAD_TOO_LARGE
            }
            _ => StatusCode::UNPROCESSABLE_ENTITY,
        };
        tracing::debug!(status = %status, error = %self, "Rejected upload");
        (
            status,
            Json(DetailBody {
                detail: self.to_string(),
            }),
        )
            .into_response()
    }
}
