mod common;

use std::sync::Arc;

use auth::TokenIssuer;
use common::test_service;
use common::APP1_ID;
use common::APP1_SECRET;
use common::APP2_ID;
use common::APP2_SECRET;
use sso_service::domain::identity::errors::AuthError;
use sso_service::domain::identity::errors::ErrorKind;
use sso_service::domain::identity::ports::AuthServicePort;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_registration_with_same_email() {
    const ATTEMPTS: usize = 8;

    let (service, store) = test_service();
    let service = Arc::new(service);

    let handles: Vec<_> = (0..ATTEMPTS)
        .map(|i| {
            let service = Arc::clone(&service);
            tokio::spawn(async move { service.register("a@x.com", &format!("pw{}", i)).await })
        })
        .collect();

    let mut created = 0;
    let mut rejected = 0;
    for handle in handles {
        match handle.await.expect("task panicked") {
            Ok(_) => created += 1,
            Err(err) => {
                assert_eq!(err.kind(), ErrorKind::AlreadyExists);
                rejected += 1;
            }
        }
    }

    assert_eq!(created, 1);
    assert_eq!(rejected, ATTEMPTS - 1);
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn test_register_then_login_per_app() {
    let (service, _store) = test_service();

    let user_id = service.register("a@x.com", "pw1").await.unwrap();

    let first = service.login("a@x.com", "pw1", APP1_ID).await.unwrap();
    let second = service.login("a@x.com", "pw1", APP2_ID).await.unwrap();

    let issuer = TokenIssuer::new();
    let claims = issuer.verify(&first, APP1_SECRET.as_bytes()).unwrap();
    assert_eq!(claims.sub, user_id.to_string());
    assert_eq!(claims.app_id, APP1_ID);

    let claims = issuer.verify(&second, APP2_SECRET.as_bytes()).unwrap();
    assert_eq!(claims.sub, user_id.to_string());
    assert_eq!(claims.app_id, APP2_ID);

    assert!(issuer.verify(&first, APP2_SECRET.as_bytes()).is_err());
    assert!(issuer.verify(&second, APP1_SECRET.as_bytes()).is_err());
}

#[tokio::test]
async fn test_failed_register_has_no_side_effect() {
    let (service, store) = test_service();

    assert!(matches!(
        service.register("", "pw").await,
        Err(AuthError::InvalidArgument(_))
    ));
    assert!(matches!(
        service.register("a@x.com", "").await,
        Err(AuthError::InvalidArgument(_))
    ));
    assert!(store.is_empty().await);

    service.register("a@x.com", "pw1").await.unwrap();
    assert!(matches!(
        service.register("a@x.com", "pw2").await,
        Err(AuthError::AlreadyExists(_))
    ));

    // The first password still wins
    assert!(service.login("a@x.com", "pw1", APP1_ID).await.is_ok());
    assert!(matches!(
        service.login("a@x.com", "pw2", APP1_ID).await,
        Err(AuthError::InvalidCredentials)
    ));
}

#[tokio::test]
async fn test_login_failures() {
    let (service, _store) = test_service();

    service.register("a@x.com", "pw1").await.unwrap();

    let wrong_password = service.login("a@x.com", "pw2", APP1_ID).await.unwrap_err();
    let unknown_email = service.login("b@x.com", "pw1", APP1_ID).await.unwrap_err();
    let malformed_email = service.login("nobody", "pw1", APP1_ID).await.unwrap_err();

    assert_eq!(wrong_password.kind(), ErrorKind::InvalidCredentials);
    assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    assert_eq!(wrong_password.to_string(), malformed_email.to_string());

    assert_eq!(
        service.login("a@x.com", "pw1", 0).await.unwrap_err().kind(),
        ErrorKind::InvalidArgument
    );
    assert_eq!(
        service.login("a@x.com", "pw1", 77).await.unwrap_err().kind(),
        ErrorKind::InvalidApp
    );
}

#[tokio::test]
async fn test_admin_flag_defaults_to_false() {
    let (service, store) = test_service();

    let user_id = service.register("a@x.com", "pw1").await.unwrap();
    assert!(!service.is_admin(&user_id).await.unwrap());

    store.grant_admin(&user_id).await.unwrap();
    assert!(service.is_admin(&user_id).await.unwrap());

    let other = service.register("b@x.com", "pw2").await.unwrap();
    assert!(!service.is_admin(&other).await.unwrap());
}
