//! CORS policy.

use axum::http::Method;
use tower_http::cors::{Any, CorsLayer};

/// Any origin and header; the methods the API serves plus DELETE and PATCH.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_headers(Any)
        .allow_methods([
            Method::GET,
            Method::PUT,
            Method::POST,
            Method::DELETE,
            Method::PATCH,
        ])
}
