//! Repository layer for data access.

pub mod entities;
mod mailer_repository;
mod user_cache_repository;
mod user_repository;

pub use mailer_repository::{MailerClient, MailerRepository};
pub use user_cache_repository::{UserCacheRepository, UserCacheStore};
pub use user_repository::{TransactionalUserRepository, UserRepository, UserStore};

#[cfg(any(test, feature = "test-utils"))]
pub use mailer_repository::MockMailerRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_cache_repository::MockUserCacheRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
