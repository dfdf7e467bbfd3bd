//! User usecase - registration, bulk update and lookup.

use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::infra::TxOptions;
use crate::repository::{
    MailerRepository, TransactionalUserRepository, UserCacheRepository, UserRepository,
};
use common::{AppError, AppResult};
use domain::{Password, User, ATOMIC_PLACEHOLDER_NAME, EMAIL_IN_USE_MESSAGE};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// What `update_user_info` writes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UpdateMode {
    /// Rename every stored user to the placeholder name in one transaction.
    #[default]
    RenameAll,
    /// Update only the user identified by the request.
    ById,
}

impl FromStr for UpdateMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "rename_all" => Ok(UpdateMode::RenameAll),
            "by_id" => Ok(UpdateMode::ById),
            other => Err(format!("unknown update mode: {}", other)),
        }
    }
}

/// User usecase trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserUsecase: Send + Sync {
    /// Register a user whose email the mailer reports as available.
    async fn create_user(&self, user: User) -> AppResult<User>;

    /// Apply an update inside a single transaction.
    async fn update_user_info(&self, user: User) -> AppResult<()>;

    /// Look up a user by id.
    async fn get_user_info(&self, id: u64) -> AppResult<User>;
}

/// Concrete implementation of UserUsecase.
pub struct UserManager<R> {
    repo: Arc<R>,
    mailer: Arc<dyn MailerRepository>,
    cache: Option<Arc<dyn UserCacheRepository>>,
    update_mode: UpdateMode,
    /// Bumped after every committed update, before its cache invalidation.
    generation: AtomicU64,
}

impl<R: TransactionalUserRepository> UserManager<R> {
    pub fn new(repo: Arc<R>, mailer: Arc<dyn MailerRepository>) -> Self {
        Self {
            repo,
            mailer,
            cache: None,
            update_mode: UpdateMode::default(),
            generation: AtomicU64::new(0),
        }
    }

    /// Serve lookups through `cache`.
    pub fn with_cache(mut self, cache: Arc<dyn UserCacheRepository>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn with_update_mode(mut self, mode: UpdateMode) -> Self {
        self.update_mode = mode;
        self
    }

    async fn rename_all(&self) -> AppResult<Vec<u64>> {
        self.repo
            .atomic(TxOptions::default(), |repo| {
                Box::pin(async move {
                    let users = repo.get_all().await?;
                    let mut touched = Vec::with_capacity(users.len());

                    for mut user in users {
                        user.name = ATOMIC_PLACEHOLDER_NAME.to_string();
                        repo.update_by_id(&user).await?;
                        touched.push(user.id);
                    }

                    Ok::<_, AppError>(touched)
                })
            })
            .await
    }

    async fn update_one(&self, update: User) -> AppResult<Vec<u64>> {
        update.ensure_persisted()?;

        // Empty password keeps the stored hash
        let password = if update.password.is_empty() {
            None
        } else {
            Some(Password::hash(&update.password)?.into_string())
        };

        self.repo
            .atomic(TxOptions::default(), move |repo| {
                Box::pin(async move {
                    let mut stored = repo.get_by_id(update.id).await?;
                    stored.name = update.name;
                    stored.email = update.email;
                    if let Some(hash) = password {
                        stored.password = hash;
                    }

                    repo.update_by_id(&stored).await?;
                    Ok::<_, AppError>(vec![stored.id])
                })
            })
            .await
    }

    async fn invalidate_cached(&self, ids: &[u64]) {
        let Some(cache) = &self.cache else {
            return;
        };
        if ids.is_empty() {
            return;
        }

        if let Err(e) = cache.invalidate(ids).await {
            warn!(count = ids.len(), error = %e, "Failed to invalidate cached users");
        }
    }

    /// Cache `user`, read while the generation was `seen`.
    ///
    /// A row read before an update committed must not outlive that update's
    /// invalidation, so the write is skipped once the generation moves, and
    /// undone when it moves while the write is in flight.
    async fn populate_cache(&self, user: &User, seen: u64) {
        let Some(cache) = &self.cache else {
            return;
        };

        if self.generation.load(Ordering::SeqCst) != seen {
            debug!(user_id = user.id, "Update committed during lookup, not caching");
            return;
        }

        if let Err(e) = cache.set_user(user).await {
            warn!(user_id = user.id, error = %e, "Cache write failed");
            return;
        }

        if self.generation.load(Ordering::SeqCst) != seen {
            self.invalidate_cached(&[user.id]).await;
        }
    }
}

/// Keep client-facing kinds, fold everything else into an internal error.
fn classify(context: &str, err: AppError) -> AppError {
    match err {
        AppError::NotFound => AppError::NotFound,
        AppError::Validation(msg) => AppError::Validation(msg),
        other => AppError::internal(format!("{}: {}", context, other)),
    }
}

#[async_trait]
impl<R> UserUsecase for UserManager<R>
where
    R: TransactionalUserRepository,
{
    async fn create_user(&self, mut user: User) -> AppResult<User> {
        let available = self
            .mailer
            .check_email_availability(&user.email)
            .await
            .map_err(|e| AppError::internal(format!("failed to check email availability: {}", e)))?;

        if !available {
            return Err(AppError::conflict(EMAIL_IN_USE_MESSAGE));
        }

        user.password = Password::hash(&user.password)?.into_string();

        let saved = self
            .repo
            .save(user)
            .await
            .map_err(|e| AppError::internal(format!("failed to save user: {}", e)))?;

        info!(user_id = saved.id, "User created");
        Ok(saved)
    }

    async fn update_user_info(&self, user: User) -> AppResult<()> {
        let touched = match self.update_mode {
            UpdateMode::RenameAll => self.rename_all().await,
            UpdateMode::ById => self.update_one(user).await,
        }
        .map_err(|e| classify("failed to update user info", e))?;

        info!(count = touched.len(), mode = ?self.update_mode, "Users updated");
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.invalidate_cached(&touched).await;
        Ok(())
    }

    async fn get_user_info(&self, id: u64) -> AppResult<User> {
        if let Some(cache) = &self.cache {
            match cache.get_user(id).await {
                Ok(Some(user)) => return Ok(user),
                Ok(None) => {}
                Err(e) => warn!(user_id = id, error = %e, "Cache read failed"),
            }
        }

        let seen = self.generation.load(Ordering::SeqCst);
        let user = self
            .repo
            .get_by_id(id)
            .await
            .map_err(|e| classify(&format!("failed to get user {}", id), e))?;

        self.populate_cache(&user, seen).await;
        Ok(user)
    }
}
