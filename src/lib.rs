//! Image upload relay.
//!
//! Accepts a multipart image upload on `POST /proxy/img`, forwards it to a
//! fixed ingestion service and hands the service's bytes back as
//! `image/png`. Upstream failures are reported as `200 OK` with an
//! `{"error": ...}` body.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod relay;

pub use config::RelayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use relay::{Relay, RelayResult, Upload};
