//! UserStore against in-memory SQLite.

mod support;

use futures::FutureExt;

use common::AppError;
use domain::User;
use user_service_lib::infra::TxOptions;
use user_service_lib::repository::{TransactionalUserRepository, UserRepository, UserStore};

use support::{sqlite, user};

#[tokio::test]
async fn test_save_assigns_id_and_get_by_id_reads_back() {
    let store = UserStore::new(sqlite().await);

    let saved = store
        .save(user("John Doe", "john.doe@example.com"))
        .await
        .unwrap();
    assert!(saved.id > 0);

    let found = store.get_by_id(saved.id).await.unwrap();
    assert_eq!(found, saved);
    assert_eq!(found.password, "$argon2id$fixture");
}

#[tokio::test]
async fn test_get_by_id_missing_is_not_found() {
    let store = UserStore::new(sqlite().await);

    let err = store.get_by_id(999).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound));

    let err = store.get_by_id(u64::MAX).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound));
}

#[tokio::test]
async fn test_get_all_orders_by_id() {
    let store = UserStore::new(sqlite().await);
    for name in ["Carol", "Alice", "Bob"] {
        store
            .save(user(name, &format!("{}@example.com", name.to_lowercase())))
            .await
            .unwrap();
    }

    let names: Vec<_> = store
        .get_all()
        .await
        .unwrap()
        .into_iter()
        .map(|u| u.name)
        .collect();
    assert_eq!(names, ["Carol", "Alice", "Bob"]);
}

#[tokio::test]
async fn test_update_by_id_overwrites_fields() {
    let store = UserStore::new(sqlite().await);
    let mut saved = store.save(user("Old", "old@example.com")).await.unwrap();

    saved.name = "New".to_string();
    saved.email = "new@example.com".to_string();
    store.update_by_id(&saved).await.unwrap();

    assert_eq!(store.get_by_id(saved.id).await.unwrap(), saved);
}

#[tokio::test]
async fn test_update_by_id_missing_row_is_noop() {
    let store = UserStore::new(sqlite().await);

    let ghost = User {
        id: 42,
        ..user("Ghost", "ghost@example.com")
    };
    store.update_by_id(&ghost).await.unwrap();

    assert!(store.get_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_atomic_commits_on_ok() {
    let store = UserStore::new(sqlite().await);

    let ids = store
        .atomic(TxOptions::default(), |repo| {
            async move {
                let a = repo.save(user("A", "a@example.com")).await?;
                let b = repo.save(user("B", "b@example.com")).await?;
                Ok::<_, AppError>(vec![a.id, b.id])
            }
            .boxed()
        })
        .await
        .unwrap();

    assert_eq!(ids.len(), 2);
    assert_eq!(store.get_all().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_atomic_rolls_back_every_write_on_err() {
    let store = UserStore::new(sqlite().await);
    let existing = store.save(user("Keep", "keep@example.com")).await.unwrap();

    let existing_id = existing.id;

    let err = store
        .atomic(TxOptions::default(), move |repo| {
            async move {
                repo.save(user("Lost", "lost@example.com")).await?;
                let mut renamed = repo.get_by_id(existing_id).await?;
                renamed.name = "Changed".to_string();
                repo.update_by_id(&renamed).await?;
                Err::<(), _>(AppError::internal("abort after two writes"))
            }
            .boxed()
        })
        .await
        .unwrap_err();

    assert!(err.to_string().contains("abort after two writes"));

    let all = store.get_all().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].name, "Keep");
}

#[tokio::test]
async fn test_nested_atomic_rolls_back_only_inner_scope() {
    let store = UserStore::new(sqlite().await);

    store
        .atomic(TxOptions::default(), |outer| {
            async move {
                outer.save(user("Outer", "outer@example.com")).await?;

                let inner = outer
                    .atomic(TxOptions::default(), |repo| {
                        async move {
                            repo.save(user("Inner", "inner@example.com")).await?;
                            Err::<(), _>(AppError::internal("inner failure"))
                        }
                        .boxed()
                    })
                    .await;
                assert!(inner.is_err());

                Ok::<_, AppError>(())
            }
            .boxed()
        })
        .await
        .unwrap();

    let names: Vec<_> = store
        .get_all()
        .await
        .unwrap()
        .into_iter()
        .map(|u| u.name)
        .collect();
    assert_eq!(names, ["Outer"]);
}
