//! Middleware for CORS and request logging.

mod cors;
mod logging;

pub use cors::cors_layer;
pub use logging::{logging_middleware, redact_body};
