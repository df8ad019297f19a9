//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! HTTP layer and relay produce:
//!     → logging.rs (structured tracing events, per-request spans)
//!     → metrics.rs (relay outcome counters and latency histogram)
//!
//! Consumers:
//!     → stdout (text or JSON lines)
//!     → Prometheus scrape endpoint (optional)
//! ```
//!
//! # Design Decisions
//! - `RUST_LOG` wins over the configured level when set
//! - Request ID is attached to the request span, so every event carries it
//! - Metrics are recorded through the `metrics` facade and are no-ops until
//!   an exporter is installed

pub mod logging;
pub mod metrics;
