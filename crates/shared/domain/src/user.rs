//! User domain entity and related types.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// User domain entity.
///
/// `id` is zero until the store assigns one on save. After creation,
/// `password` holds an Argon2 hash. Every field is serialized, since this
/// is also the cached representation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub password: String,
}

impl User {
    /// Create a user that has not been persisted yet.
    pub fn new(name: impl Into<String>, email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            id: 0,
            name: name.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    /// Fail unless the store has assigned an identifier.
    pub fn ensure_persisted(&self) -> DomainResult<()> {
        if self.id == 0 {
            return Err(DomainError::validation("user id is required"));
        }
        Ok(())
    }
}

/// User response (safe to return to client)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UserResponse {
    /// Unique user identifier
    pub id: u64,
    /// User display name
    pub name: String,
    /// User email address
    pub email: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
        }
    }
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}
