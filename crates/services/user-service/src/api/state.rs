//! Application state for dependency injection.

use std::sync::Arc;

use crate::infra::Database;
use crate::usecase::UserUsecase;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserUsecase>,
    /// Pinged by the health check; `None` when running without a store.
    pub database: Option<Database>,
}

impl AppState {
    pub fn new(users: Arc<dyn UserUsecase>) -> Self {
        Self {
            users,
            database: None,
        }
    }

    pub fn with_database(mut self, database: Database) -> Self {
        self.database = Some(database);
        self
    }
}
