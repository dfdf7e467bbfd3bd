//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};

use common::{AppError, AppResult};
use domain::User;
use user_service_lib::repository::{MailerRepository, UserCacheRepository};

/// Single-connection in-memory SQLite with the users table.
pub async fn sqlite() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::connect(options).await.unwrap();
    db.execute_unprepared(
        "CREATE TABLE users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            email TEXT NOT NULL,
            pass TEXT NOT NULL
        )",
    )
    .await
    .unwrap();
    db
}

pub fn user(name: &str, email: &str) -> User {
    User::new(name, email, "$argon2id$fixture")
}

/// Mailer that treats a fixed set of addresses as taken.
#[derive(Default)]
pub struct FakeMailer {
    pub taken: Vec<String>,
    pub fail: bool,
}

impl FakeMailer {
    pub fn taking(emails: &[&str]) -> Self {
        Self {
            taken: emails.iter().map(|e| e.to_string()).collect(),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            taken: Vec::new(),
            fail: true,
        }
    }
}

#[async_trait]
impl MailerRepository for FakeMailer {
    async fn check_email_availability(&self, email: &str) -> AppResult<bool> {
        if self.fail {
            return Err(AppError::service_unavailable("mailer unreachable"));
        }
        Ok(!self.taken.iter().any(|taken| taken == email))
    }
}

/// In-process user cache that records invalidations.
#[derive(Default)]
pub struct FakeUserCache {
    pub entries: Mutex<HashMap<u64, User>>,
    pub invalidated: Mutex<Vec<u64>>,
}

#[async_trait]
impl UserCacheRepository for FakeUserCache {
    async fn set_user(&self, user: &User) -> AppResult<()> {
        self.entries.lock().unwrap().insert(user.id, user.clone());
        Ok(())
    }

    async fn get_user(&self, id: u64) -> AppResult<Option<User>> {
        Ok(self.entries.lock().unwrap().get(&id).cloned())
    }

    async fn invalidate(&self, ids: &[u64]) -> AppResult<()> {
        let mut entries = self.entries.lock().unwrap();
        for id in ids {
            entries.remove(id);
        }
        self.invalidated.lock().unwrap().extend_from_slice(ids);
        Ok(())
    }
}
