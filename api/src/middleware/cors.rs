//! CORS middleware configuration for cross-origin requests.
//!
//! Only the configured front-end origins may call the API. Preflight requests
//! are answered by the middleware on every path.

use actix_cors::Cors;
use actix_web::http::{header, Method};

use ov_shared::config::CorsConfig;

/// Creates a CORS middleware instance from configuration.
///
/// With no configured origins every cross-origin request is rejected.
pub fn create_cors(config: &CorsConfig) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(vec![
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::ACCEPT,
            header::CONTENT_TYPE,
            header::ORIGIN,
            header::HeaderName::from_static("x-requested-with"),
        ])
        .max_age(config.max_age);

    if config.allow_credentials {
        cors = cors.supports_credentials();
    }

    for origin in &config.allowed_origins {
        tracing::debug!(origin = %origin, "Adding allowed origin");
        cors = cors.allowed_origin(origin);
    }

    if config.allowed_origins.is_empty() {
        tracing::warn!("No CORS origins configured; cross-origin requests will be rejected");
    }

    cors
}
