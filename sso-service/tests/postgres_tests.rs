//! Adapter tests against a live Postgres.
//!
//! Run with `cargo test -- --ignored` and `DATABASE_URL` pointing at a server
//! whose user may create databases.

mod common;

use std::sync::Arc;

use common::TestDb;
use sso_service::domain::identity::errors::StorageError;
use sso_service::domain::identity::models::AppId;
use sso_service::domain::identity::models::EmailAddress;
use sso_service::domain::identity::models::UserId;
use sso_service::domain::identity::ports::AppRegistry;
use sso_service::domain::identity::ports::CredentialStore;
use sso_service::outbound::repositories::PostgresAppRegistry;
use sso_service::outbound::repositories::PostgresCredentialStore;

fn email(s: &str) -> EmailAddress {
    EmailAddress::new(s).unwrap()
}

#[tokio::test]
#[ignore = "requires Postgres"]
async fn test_save_and_find_user() {
    let db = TestDb::new().await;
    let store = PostgresCredentialStore::new(db.pool.clone());

    let user_id = store.save_user(&email("a@x.com"), "digest").await.unwrap();
    let user = store.find_by_email(&email("a@x.com")).await.unwrap();

    assert_eq!(user.id, user_id);
    assert_eq!(user.email.as_str(), "a@x.com");
    assert_eq!(user.password_hash, "digest");
    assert!(!store.is_admin(&user_id).await.unwrap());
}

#[tokio::test]
#[ignore = "requires Postgres"]
async fn test_duplicate_email_rejected() {
    let db = TestDb::new().await;
    let store = PostgresCredentialStore::new(db.pool.clone());

    store.save_user(&email("a@x.com"), "digest").await.unwrap();
    let err = store.save_user(&email("a@x.com"), "other").await.unwrap_err();

    assert_eq!(err, StorageError::EmailAlreadyExists("a@x.com".to_string()));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ignore = "requires Postgres"]
async fn test_concurrent_saves_keep_one_row() {
    let db = TestDb::new().await;
    let store = Arc::new(PostgresCredentialStore::new(db.pool.clone()));

    let handles: Vec<_> = (0..5)
        .map(|_| {
            let store = Arc::clone(&store);
            tokio::spawn(async move { store.save_user(&email("a@x.com"), "digest").await })
        })
        .collect();

    let mut created = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => created += 1,
            Err(err) => assert!(matches!(err, StorageError::EmailAlreadyExists(_))),
        }
    }
    assert_eq!(created, 1);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(&db.pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
#[ignore = "requires Postgres"]
async fn test_missing_user() {
    let db = TestDb::new().await;
    let store = PostgresCredentialStore::new(db.pool.clone());

    assert!(matches!(
        store.find_by_email(&email("b@x.com")).await,
        Err(StorageError::UserNotFound(_))
    ));
    assert!(matches!(
        store.is_admin(&UserId::new()).await,
        Err(StorageError::UserNotFound(_))
    ));
}

#[tokio::test]
#[ignore = "requires Postgres"]
async fn test_admin_flag() {
    let db = TestDb::new().await;
    let store = PostgresCredentialStore::new(db.pool.clone());

    let user_id = store.save_user(&email("a@x.com"), "digest").await.unwrap();
    sqlx::query("UPDATE users SET is_admin = TRUE WHERE id = $1")
        .bind(user_id.0)
        .execute(&db.pool)
        .await
        .unwrap();

    assert!(store.is_admin(&user_id).await.unwrap());
}

#[tokio::test]
#[ignore = "requires Postgres"]
async fn test_app_lookup() {
    let db = TestDb::new().await;
    db.insert_app(1, "app-one", "app-1-secret").await;
    let registry = PostgresAppRegistry::new(db.pool.clone());

    let app = registry.lookup(AppId(1)).await.unwrap();
    assert_eq!(app.id, AppId(1));
    assert_eq!(app.name, "app-one");
    assert_eq!(app.secret.as_bytes(), b"app-1-secret");

    assert_eq!(
        registry.lookup(AppId(2)).await.unwrap_err(),
        StorageError::AppNotFound(AppId(2))
    );
}
