//! Transaction scoping over SeaORM connections.
//!
//! Repositories are generic over their connection handle. The pooled and the
//! transactional variant are the same struct: `with_transaction` binds a fresh
//! `DatabaseTransaction` into a scoped repository, hands it to the closure, then
//! takes the transaction back to commit or roll back.

use async_trait::async_trait;
use futures::future::BoxFuture;
use sea_orm::{AccessMode, DatabaseTransaction, IsolationLevel, TransactionTrait};

use common::AppResult;

/// Options applied when a transaction begins.
///
/// `None` leaves the store's own default in place.
#[derive(Debug, Clone, Default)]
pub struct TxOptions {
    pub isolation: Option<IsolationLevel>,
    pub access_mode: Option<AccessMode>,
}

/// A repository that can be bound to a transaction and released from it.
pub trait TransactionScoped: Send + Sync + Sized {
    fn bind(txn: DatabaseTransaction) -> Self;

    fn release(self) -> DatabaseTransaction;
}

/// `with_transaction` for every SeaORM connection handle.
///
/// Called on a `DatabaseTransaction` it opens a savepoint.
#[async_trait]
pub trait WithTransaction: TransactionTrait + Send + Sync {
    /// Run `f` against a transaction-scoped `S`.
    ///
    /// Commits when `f` returns `Ok`, rolls back when it returns `Err`. A commit
    /// failure is returned; a rollback failure is logged and the closure's
    /// error is returned.
    async fn with_transaction<S, F, T>(&self, options: TxOptions, f: F) -> AppResult<T>
    where
        S: TransactionScoped,
        F: for<'a> FnOnce(&'a S) -> BoxFuture<'a, AppResult<T>> + Send,
        T: Send,
    {
        let txn = self
            .begin_with_config(options.isolation, options.access_mode)
            .await?;

        let scoped = S::bind(txn);
        let outcome = f(&scoped).await;
        let txn = scoped.release();

        match outcome {
            Ok(value) => {
                txn.commit().await?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(err)
            }
        }
    }
}

impl<C> WithTransaction for C where C: TransactionTrait + Send + Sync {}
