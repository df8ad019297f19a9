//! Relay outcome and its HTTP encoding.

use axum::{
    body::Bytes,
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::relay::error::RelayError;

/// Message returned to the caller whenever the upstream call fails.
pub const FAILURE_MESSAGE: &str = "이미지 업로드 실패";

/// Media type stamped on every relayed image, whatever the upstream sent.
pub const IMAGE_MEDIA_TYPE: &str = "image/png";

/// Outcome of one relay.
///
/// Both variants are answered with `200 OK`; callers tell them apart by the
/// payload, not the status.
#[derive(Debug)]
pub enum RelayResult {
    /// Upstream answered 200; its body, untouched.
    Success(Bytes),
    /// Any other status or a transport failure.
    Failure(RelayError),
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
}

impl IntoResponse for RelayResult {
    fn into_response(self) -> Response {
        match self {
            RelayResult::Success(body) => (
                [(header::CONTENT_TYPE, HeaderValue::from_static(IMAGE_MEDIA_TYPE))],
                body,
            )
                .into_response(),
            RelayResult::Failure(_) => Json(ErrorBody {
                error: FAILURE_MESSAGE,
            })
            .into_response(),
        }
    }
}
