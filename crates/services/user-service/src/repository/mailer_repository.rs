//! Email availability lookups against the external mailer service.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::MailerConfig;
use crate::infra::http_client::{HttpClient, HttpRequest, APPLICATION_JSON, CONTENT_TYPE};
use common::AppResult;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

const EMAIL_AVAILABILITY_PATH: &str = "/email-availability";

#[derive(Debug, Deserialize)]
struct AvailabilityResponse {
    available: bool,
}

/// Mailer service operations.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait MailerRepository: Send + Sync {
    /// Ask the mailer whether `email` can be registered.
    ///
    /// A non-2xx answer means "not available". Transport failures and
    /// malformed bodies are errors.
    async fn check_email_availability(&self, email: &str) -> AppResult<bool>;
}

/// `MailerRepository` over an outbound HTTP client.
pub struct MailerClient {
    client: Arc<dyn HttpClient>,
    base_url: String,
}

impl MailerClient {
    pub fn new(client: Arc<dyn HttpClient>, config: &MailerConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    fn availability_request(&self, email: &str) -> HttpRequest {
        HttpRequest::get(format!("{}{}", self.base_url, EMAIL_AVAILABILITY_PATH))
            .header(CONTENT_TYPE, APPLICATION_JSON)
            .query("email", email)
    }
}

#[async_trait]
impl MailerRepository for MailerClient {
    async fn check_email_availability(&self, email: &str) -> AppResult<bool> {
        let response = self.client.send(self.availability_request(email)).await?;

        if !response.is_success() {
            tracing::info!(
                status = response.status,
                "Mailer rejected availability check, treating email as unavailable"
            );
            return Ok(false);
        }

        let body: AvailabilityResponse = response.json()?;
        Ok(body.available)
    }
}
