//! MailerClient and ReqwestClient against a local mock server.

use std::sync::Arc;

use httpmock::prelude::*;
use serde_json::json;

use common::{AppError, HttpClientConfig};
use user_service_lib::config::MailerConfig;
use user_service_lib::infra::{HttpClient, HttpRequest, ReqwestClient};
use user_service_lib::repository::{MailerClient, MailerRepository};

fn mailer_for(base_url: String) -> MailerClient {
    let http = ReqwestClient::new(&HttpClientConfig {
        timeout_ms: 2_000,
        connect_timeout_ms: 500,
    })
    .unwrap();
    MailerClient::new(Arc::new(http), &MailerConfig { base_url })
}

#[tokio::test]
async fn test_available_email() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(Method::GET)
            .path("/email-availability")
            .query_param("email", "john.doe@example.com")
            .header("content-type", "application/json");
        then.status(200).json_body(json!({"available": true}));
    });

    let available = mailer_for(server.base_url())
        .check_email_availability("john.doe@example.com")
        .await
        .unwrap();

    assert!(available);
    mock.assert();
}

#[tokio::test]
async fn test_taken_email() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(Method::GET).path("/email-availability");
        then.status(200).json_body(json!({"available": false}));
    });

    let available = mailer_for(server.base_url())
        .check_email_availability("taken@example.com")
        .await
        .unwrap();

    assert!(!available);
}

#[tokio::test]
async fn test_non_success_status_means_unavailable() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(Method::GET).path("/email-availability");
        then.status(503).body("maintenance");
    });

    let available = mailer_for(server.base_url())
        .check_email_availability("john.doe@example.com")
        .await
        .unwrap();

    assert!(!available);
}

#[tokio::test]
async fn test_malformed_body_is_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(Method::GET).path("/email-availability");
        then.status(200).body("not json");
    });

    let result = mailer_for(server.base_url())
        .check_email_availability("john.doe@example.com")
        .await;

    assert!(result.is_err());
}

#[tokio::test]
async fn test_trailing_slash_in_base_url() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(Method::GET).path("/email-availability");
        then.status(200).json_body(json!({"available": true}));
    });

    mailer_for(format!("{}/", server.base_url()))
        .check_email_availability("a@example.com")
        .await
        .unwrap();

    mock.assert();
}

#[tokio::test]
async fn test_unreachable_mailer_is_error() {
    let err = mailer_for("http://127.0.0.1:1".to_string())
        .check_email_availability("john.doe@example.com")
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::ServiceUnavailable(_)));
}

#[tokio::test]
async fn test_reqwest_client_posts_json() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(Method::POST)
            .path("/echo")
            .header("x-trace", "abc")
            .json_body(json!({"name": "John"}));
        then.status(201).body("created");
    });

    let client = ReqwestClient::new(&HttpClientConfig::default()).unwrap();
    let response = client
        .send(
            HttpRequest::post(format!("{}/echo", server.base_url()))
                .header("x-trace", "abc")
                .json(json!({"name": "John"})),
        )
        .await
        .unwrap();

    assert_eq!(response.status, 201);
    assert!(response.is_success());
    assert_eq!(response.text(), "created");
    mock.assert();
}
