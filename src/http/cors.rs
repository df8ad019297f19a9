//! Cross-origin policy.
//!
//! Built once at startup from [`CorsConfig`]. With the default config the
//! layer mirrors the request's origin, method and headers back and allows
//! credentials. Browsers reject a literal `*` when credentials are allowed.

use axum::http::{header::InvalidHeaderValue, HeaderValue};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

use crate::config::CorsConfig;

/// Origin entry meaning "any origin".
pub const ANY_ORIGIN: &str = "*";

pub fn build_cors_layer(config: &CorsConfig) -> Result<CorsLayer, InvalidHeaderValue> {
    let origin = if config.allowed_origins.iter().any(|o| o == ANY_ORIGIN) {
        AllowOrigin::mirror_request()
    } else {
        let origins = config
            .allowed_origins
            .iter()
            .map(|o| o.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()?;
        AllowOrigin::list(origins)
    };

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(config.allow_credentials))
}
