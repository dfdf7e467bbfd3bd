//! User repository backed by SeaORM.

use async_trait::async_trait;
use futures::future::BoxFuture;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection,
    DatabaseTransaction, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use crate::infra::{TransactionScoped, TxOptions, WithTransaction};
use common::{AppError, AppResult, OptionExt};
use domain::User;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User persistence operations.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new row and return the user with its generated id.
    async fn save(&self, user: User) -> AppResult<User>;

    /// Overwrite name, email and password of the row with `user.id`.
    ///
    /// Matching zero rows is not an error.
    async fn update_by_id(&self, user: &User) -> AppResult<()>;

    /// Fetch one user; `AppError::NotFound` when no row matches.
    async fn get_by_id(&self, id: u64) -> AppResult<User>;

    /// Fetch every user, ordered by id.
    async fn get_all(&self) -> AppResult<Vec<User>>;
}

/// Repository that can run a group of operations atomically.
///
/// Not mockable (generic method); tests use a passthrough impl or SQLite.
#[async_trait]
pub trait TransactionalUserRepository: UserRepository {
    /// Repository handed to `atomic` closures, bound to the open transaction.
    type Scoped: UserRepository;

    /// Run `f` inside one transaction: commit on `Ok`, roll back on `Err`.
    async fn atomic<F, T>(&self, options: TxOptions, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(&'a Self::Scoped) -> BoxFuture<'a, AppResult<T>> + Send,
        T: Send;
}

/// SeaORM user repository over any connection handle.
///
/// `UserStore<DatabaseConnection>` runs against the pool,
/// `UserStore<DatabaseTransaction>` against an open transaction.
pub struct UserStore<C = DatabaseConnection> {
    conn: C,
}

impl<C> UserStore<C> {
    pub fn new(conn: C) -> Self {
        Self { conn }
    }
}

impl TransactionScoped for UserStore<DatabaseTransaction> {
    fn bind(txn: DatabaseTransaction) -> Self {
        Self::new(txn)
    }

    fn release(self) -> DatabaseTransaction {
        self.conn
    }
}

/// Ids above `i64::MAX` cannot exist in the table.
fn row_id(id: u64) -> Option<i64> {
    i64::try_from(id).ok()
}

#[async_trait]
impl<C> UserRepository for UserStore<C>
where
    C: ConnectionTrait + Send + Sync,
{
    async fn save(&self, user: User) -> AppResult<User> {
        let active_model = ActiveModel {
            name: Set(user.name),
            email: Set(user.email),
            password: Set(user.password),
            ..Default::default()
        };

        let model = active_model.insert(&self.conn).await?;
        tracing::debug!(user_id = model.id, "User saved");
        Ok(User::from(model))
    }

    async fn update_by_id(&self, user: &User) -> AppResult<()> {
        let Some(id) = row_id(user.id) else {
            return Ok(());
        };

        let result = UserEntity::update_many()
            .col_expr(user::Column::Name, Expr::value(user.name.clone()))
            .col_expr(user::Column::Email, Expr::value(user.email.clone()))
            .col_expr(user::Column::Password, Expr::value(user.password.clone()))
            .filter(user::Column::Id.eq(id))
            .exec(&self.conn)
            .await?;

        if result.rows_affected == 0 {
            tracing::debug!(user_id = user.id, "Update matched no rows");
        }
        Ok(())
    }

    async fn get_by_id(&self, id: u64) -> AppResult<User> {
        let Some(id) = row_id(id) else {
            return Err(AppError::NotFound);
        };

        UserEntity::find_by_id(id)
            .one(&self.conn)
            .await?
            .map(User::from)
            .ok_or_not_found()
    }

    async fn get_all(&self) -> AppResult<Vec<User>> {
        let models = UserEntity::find()
            .order_by_asc(user::Column::Id)
            .all(&self.conn)
            .await?;

        Ok(models.into_iter().map(User::from).collect())
    }
}

#[async_trait]
impl<C> TransactionalUserRepository for UserStore<C>
where
    C: ConnectionTrait + TransactionTrait + Send + Sync,
{
    type Scoped = UserStore<DatabaseTransaction>;

    async fn atomic<F, T>(&self, options: TxOptions, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(&'a Self::Scoped) -> BoxFuture<'a, AppResult<T>> + Send,
        T: Send,
    {
        self.conn
            .with_transaction::<Self::Scoped, F, T>(options, f)
            .await
    }
}
