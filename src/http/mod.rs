//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, trace span)
//!     → cors.rs (preflight answered here; headers added to every response)
//!     → relay handler (POST /proxy/img)
//!     → Send to client
//! ```

pub mod cors;
pub mod server;

pub use cors::build_cors_layer;
pub use server::{build_router, AppState, HttpServer, ServerError, PROXY_ROUTE, X_REQUEST_ID};
