//! Request/response logging with password redaction.

use std::net::SocketAddr;
use std::time::Instant;

use axum::{
    body::{Body, HttpBody},
    extract::ConnectInfo,
    http::{header, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use http_body_util::LengthLimitError;
use serde_json::Value;
use tracing::info;

use common::AppError;

/// Requests with a larger body get `413` before reaching a handler.
const MAX_REQUEST_BODY_BYTES: usize = 2 * 1024 * 1024;

const REDACTED: &str = "[REDACTED]";

/// Log every request and its outcome.
///
/// `TraceLayer` owns the span; this only emits events inside it.
pub async fn logging_middleware(
    connect_info: Option<ConnectInfo<SocketAddr>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let ip = client_ip(&request, connect_info);

    let (parts, body) = request.into_parts();
    let bytes = match axum::body::to_bytes(body, MAX_REQUEST_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(e) => return body_error(e).into_response(),
    };

    info!(
        method = %method,
        path = %path,
        ip = %ip,
        body = %redact_body(&bytes),
        "Incoming request"
    );

    let request = Request::from_parts(parts, Body::from(bytes));
    let response = next.run(request).await;

    let size = response
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .or_else(|| response.body().size_hint().exact())
        .unwrap_or(0);

    info!(
        method = %method,
        path = %path,
        status = response.status().as_u16(),
        size,
        duration_ms = start.elapsed().as_millis() as u64,
        "Request completed"
    );

    response
}

fn body_error(err: axum::Error) -> AppError {
    let inner = err.into_inner();
    if inner.downcast_ref::<LengthLimitError>().is_some() {
        AppError::payload_too_large(format!(
            "request body exceeds {} bytes",
            MAX_REQUEST_BODY_BYTES
        ))
    } else {
        AppError::bad_request(format!("failed to read body: {}", inner))
    }
}

/// Render a request body for logs with every `password` value masked.
///
/// Non-JSON bodies are summarised by length only.
pub fn redact_body(bytes: &[u8]) -> String {
    if bytes.is_empty() {
        return String::new();
    }

    match serde_json::from_slice::<Value>(bytes) {
        Ok(mut value) => {
            mask_passwords(&mut value);
            value.to_string()
        }
        Err(_) => format!("<{} bytes>", bytes.len()),
    }
}

fn mask_passwords(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (key, field) in map.iter_mut() {
                if key.eq_ignore_ascii_case("password") {
                    *field = Value::String(REDACTED.to_string());
                } else {
                    mask_passwords(field);
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(mask_passwords),
        _ => {}
    }
}

fn client_ip(request: &Request<Body>, connect_info: Option<ConnectInfo<SocketAddr>>) -> String {
    if let Some(forwarded) = request
        .headers()
        .get("X-Forwarded-For")
        .and_then(|h| h.to_str().ok())
    {
        if let Some(ip) = forwarded.split(',').next() {
            return ip.trim().to_string();
        }
    }

    connect_info
        .map(|ci| ci.0.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, middleware, routing::post, Router};
    use tower::ServiceExt;

    fn echo_app() -> Router {
        Router::new()
            .route("/", post(|body: String| async move { body }))
            .layer(middleware::from_fn(logging_middleware))
    }

    fn post_bytes(len: usize) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/")
            .body(Body::from(vec![b'a'; len]))
            .unwrap()
    }

    #[tokio::test]
    async fn test_oversized_body_is_payload_too_large() {
        let response = echo_app()
            .oneshot(post_bytes(MAX_REQUEST_BODY_BYTES + 1))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_body_within_limit_reaches_handler() {
        let response = echo_app().oneshot(post_bytes(1024)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(body.len(), 1024);
    }

    #[test]
    fn test_redact_body_masks_password() {
        let body = br#"{"name":"John","password":"secret123"}"#;
        let logged = redact_body(body);
        assert!(logged.contains(REDACTED));
        assert!(logged.contains("John"));
        assert!(!logged.contains("secret123"));
    }

    #[test]
    fn test_redact_body_masks_nested_password() {
        let body = br#"{"users":[{"Password":"hunter2"}]}"#;
        assert!(!redact_body(body).contains("hunter2"));
    }

    #[test]
    fn test_redact_body_non_json() {
        assert_eq!(redact_body(b"password=plain"), "<14 bytes>");
        assert_eq!(redact_body(b""), "");
    }

    #[test]
    fn test_client_ip_prefers_forwarded_header() {
        let request = Request::builder()
            .header("X-Forwarded-For", "203.0.113.7, 10.0.0.1")
            .body(Body::empty())
            .unwrap();
        let peer = ConnectInfo(SocketAddr::from(([127, 0, 0, 1], 4000)));
        assert_eq!(client_ip(&request, Some(peer)), "203.0.113.7");
    }

    #[test]
    fn test_client_ip_falls_back_to_peer() {
        let request = Request::builder().body(Body::empty()).unwrap();
        assert_eq!(client_ip(&request, None), "unknown");

        let peer = ConnectInfo(SocketAddr::from(([192, 168, 1, 2], 4000)));
        assert_eq!(client_ip(&request, Some(peer)), "192.168.1.2");
    }
}
