//! Usecase layer - business rules over the repositories.

mod user_usecase;

pub use user_usecase::{UpdateMode, UserManager, UserUsecase};

#[cfg(any(test, feature = "test-utils"))]
pub use user_usecase::MockUserUsecase;
