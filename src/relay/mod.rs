//! Image relay subsystem.
//!
//! # Data Flow
//! ```text
//! multipart request
//!     → upload.rs (take the `file` field, read once)
//!     → client.rs (re-encode as multipart, single POST upstream)
//!     → result.rs (Success → image/png bytes, Failure → error JSON)
//! ```
//!
//! # Design Decisions
//! - Exactly one upstream call per request; no retry, no backoff
//! - Every upstream failure collapses into one outcome at the boundary
//! - The caller always sees 200; the payload shape carries the outcome

pub mod client;
pub mod error;
pub mod result;
pub mod upload;

use std::time::Instant;

pub use client::UpstreamClient;
pub use error::{RelayError, UploadError};
pub use result::{RelayResult, FAILURE_MESSAGE, IMAGE_MEDIA_TYPE};
pub use upload::{Upload, FILE_FIELD};

use crate::observability::metrics;

/// Forwards uploads to the upstream service.
#[derive(Debug, Clone)]
pub struct Relay {
    upstream: UpstreamClient,
}

impl Relay {
    pub fn new(upstream: UpstreamClient) -> Self {
        Self { upstream }
    }

    /// Forward one upload and turn the upstream answer into a [`RelayResult`].
    pub async fn handle_proxy_upload(&self, upload: Upload) -> RelayResult {
        let start = Instant::now();
        let upload_bytes = upload.len();
        let file_name = upload.file_name.clone().unwrap_or_default();

        tracing::debug!(
            file_name = %file_name,
            content_type = upload.content_type.as_deref().unwrap_or(""),
            upload_bytes,
            upstream = %self.upstream.url(),
            "Forwarding upload"
        );

        match self.upstream.forward(upload).await {
            Ok(body) => {
                tracing::info!(
                    file_name = %file_name,
                    response_bytes = body.len(),
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Image upload succeeded"
                );
                metrics::record_relay("success", start);
                RelayResult::Success(body)
            }
            Err(err) => {
                match &err {
                    RelayError::Status(status) => tracing::warn!(
                        file_name = %file_name,
                        status = status.as_u16(),
                        "Image upload failed"
                    ),
                    other => tracing::warn!(
                        file_name = %file_name,
                        error = %other,
                        "Image upload failed"
                    ),
                }
                metrics::record_relay(err.kind(), start);
                RelayResult::Failure(err)
            }
        }
    }
}
