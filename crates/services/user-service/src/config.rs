//! User service configuration.

use std::env;

use common::{CacheConfig, DatabaseConfig, HttpClientConfig, LoggerConfig, ServerConfig};

use crate::usecase::UpdateMode;

/// External mailer service settings.
#[derive(Debug, Clone)]
pub struct MailerConfig {
    /// Scheme and host of the mailer API, e.g. `https://api.example.com`
    pub base_url: String,
}

impl MailerConfig {
    pub fn from_env() -> Self {
        Self {
            base_url: env::var("MAILER_BASE_URL").unwrap_or_else(|_| Self::default().base_url),
        }
    }
}

impl Default for MailerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://api.example.com".to_string(),
        }
    }
}

/// User service configuration.
#[derive(Debug, Clone, Default)]
pub struct UserServiceConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub cache: CacheConfig,
    pub http_client: HttpClientConfig,
    pub logger: LoggerConfig,
    pub mailer: MailerConfig,
    /// Behaviour of `PUT /api/v1/users`
    pub update_mode: UpdateMode,
}

impl UserServiceConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            server: ServerConfig::from_env(),
            database: DatabaseConfig::from_env(),
            cache: CacheConfig::from_env(),
            http_client: HttpClientConfig::from_env(),
            logger: LoggerConfig::from_env(),
            mailer: MailerConfig::from_env(),
            update_mode: env::var("USER_UPDATE_MODE")
                .ok()
                .and_then(|mode| mode.parse().ok())
                .unwrap_or_default(),
        }
    }
}
