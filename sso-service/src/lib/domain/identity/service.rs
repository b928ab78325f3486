use std::future::Future;
use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use chrono::Duration;
use tracing::Instrument;
use tracing::Span;

use crate::identity::errors::AuthError;
use crate::identity::errors::StorageError;
use crate::identity::models::AppId;
use crate::identity::models::EmailAddress;
use crate::identity::models::Password;
use crate::identity::models::User;
use crate::identity::models::UserId;
use crate::identity::ports::AppRegistry;
use crate::identity::ports::AuthServicePort;
use crate::identity::ports::CredentialStore;

const REGISTER: &str = "register";
const LOGIN: &str = "login";
const IS_ADMIN: &str = "is_admin";

/// Domain service implementation for sign-on operations.
///
/// Concrete implementation of AuthServicePort with dependency injection.
/// Holds no mutable state; every call is an independent transaction against
/// the injected store and registry.
pub struct AuthService<CS, AR>
where
    CS: CredentialStore,
    AR: AppRegistry,
{
    credential_store: Arc<CS>,
    app_registry: Arc<AR>,
    password_hasher: auth::PasswordHasher,
    token_issuer: auth::TokenIssuer,
    token_ttl: Duration,
    span: Span,
}

impl<CS, AR> AuthService<CS, AR>
where
    CS: CredentialStore,
    AR: AppRegistry,
{
    /// Create a new auth service with injected dependencies.
    ///
    /// # Arguments
    /// * `credential_store` - User persistence implementation
    /// * `app_registry` - App lookup implementation
    /// * `token_ttl` - Lifetime of minted tokens
    pub fn new(credential_store: Arc<CS>, app_registry: Arc<AR>, token_ttl: Duration) -> Self {
        Self {
            credential_store,
            app_registry,
            password_hasher: auth::PasswordHasher::new(),
            token_issuer: auth::TokenIssuer::new(),
            token_ttl,
            span: tracing::info_span!("auth_service"),
        }
    }

    /// Replace the span every operation span is parented to.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Replace the default Argon2 cost.
    pub fn with_password_hasher(mut self, password_hasher: auth::PasswordHasher) -> Self {
        self.password_hasher = password_hasher;
        self
    }

    /// Run one operation inside its span and log how it failed, if it did.
    async fn traced<T, F>(&self, span: Span, work: F) -> Result<T, AuthError>
    where
        F: Future<Output = Result<T, AuthError>>,
    {
        async move {
            let result = work.await;
            match &result {
                Err(AuthError::Internal { operation, source }) => {
                    let detail = format!("{:#}", source);
                    tracing::error!(operation = *operation, error = %detail, "Operation failed");
                }
                Err(e) => tracing::warn!(error = %e, "Operation rejected"),
                Ok(_) => {}
            }
            result
        }
        .instrument(span)
        .await
    }

    // Argon2 is CPU bound, keep it off the async workers.
    async fn hash_password(&self, password: Password) -> Result<String, AuthError> {
        let hasher = self.password_hasher.clone();

        tokio::task::spawn_blocking(move || hasher.hash(password.expose()))
            .await
            .map_err(|e| AuthError::internal(REGISTER, e))?
            .map_err(|e| AuthError::internal(REGISTER, e))
    }

    /// Check a password against a stored digest.
    ///
    /// Without a digest the check still runs against a decoy and reports a
    /// mismatch, so unknown users cost as much as wrong passwords.
    async fn verify_password(
        &self,
        password: Password,
        password_hash: Option<String>,
    ) -> Result<bool, AuthError> {
        let hasher = self.password_hasher.clone();

        tokio::task::spawn_blocking(move || match password_hash {
            Some(hash) => hasher.verify(password.expose(), &hash),
            None => {
                hasher.verify_decoy(password.expose());
                Ok(false)
            }
        })
        .await
        .map_err(|e| AuthError::internal(LOGIN, e))?
        .map_err(|e| AuthError::internal(LOGIN, anyhow::Error::new(e).context("stored digest")))
    }

    async fn find_user(&self, email: &str) -> Result<Option<User>, AuthError> {
        // A malformed address cannot be registered, so it is just an unknown user
        let Ok(email) = EmailAddress::new(email) else {
            return Ok(None);
        };

        match self.credential_store.find_by_email(&email).await {
            Ok(user) => Ok(Some(user)),
            Err(StorageError::UserNotFound(_)) => Ok(None),
            Err(e) => Err(AuthError::internal(
                LOGIN,
                anyhow::Error::new(e).context("looking up user by email"),
            )),
        }
    }
}

#[async_trait]
impl<CS, AR> AuthServicePort for AuthService<CS, AR>
where
    CS: CredentialStore,
    AR: AppRegistry,
{
    async fn register(&self, email: &str, password: &str) -> Result<UserId, AuthError> {
        let span = tracing::info_span!(parent: &self.span, "register", email = %email);

        self.traced(span, async move {
            let email = EmailAddress::new(email)?;
            let password = Password::new(password)?;

            let password_hash = self.hash_password(password).await?;

            let user_id = self
                .credential_store
                .save_user(&email, &password_hash)
                .await
                .map_err(|e| match e {
                    StorageError::EmailAlreadyExists(email) => AuthError::AlreadyExists(email),
                    other => AuthError::internal(
                        REGISTER,
                        anyhow::Error::new(other).context("saving user"),
                    ),
                })?;

            tracing::info!(user_id = %user_id, "User registered");
            Ok(user_id)
        })
        .await
    }

    async fn login(
        &self,
        email: &str,
        password: &str,
        app_id: i32,
    ) -> Result<String, AuthError> {
        let span = tracing::info_span!(parent: &self.span, "login", email = %email, app_id);

        self.traced(span, async move {
            if email.is_empty() {
                return Err(AuthError::InvalidArgument("email is required".to_string()));
            }
            let password = Password::new(password)?;
            let app_id = AppId::new(app_id)?;

            let user = self.find_user(email).await?;
            let matched = self
                .verify_password(password, user.as_ref().map(|u| u.password_hash.clone()))
                .await?;
            let user = match user {
                Some(user) if matched => user,
                _ => return Err(AuthError::InvalidCredentials),
            };

            let app = self.app_registry.lookup(app_id).await.map_err(|e| match e {
                StorageError::AppNotFound(id) => AuthError::InvalidApp(id),
                other => {
                    AuthError::internal(LOGIN, anyhow::Error::new(other).context("looking up app"))
                }
            })?;

            let token = self
                .token_issuer
                .mint(
                    &user.id.to_string(),
                    user.email.as_str(),
                    app.id.0,
                    app.secret.as_bytes(),
                    self.token_ttl,
                )
                .context("minting token")
                .map_err(|e| AuthError::internal(LOGIN, e))?;

            tracing::info!(user_id = %user.id, "User logged in");
            Ok(token)
        })
        .await
    }

    async fn is_admin(&self, user_id: &UserId) -> Result<bool, AuthError> {
        let span = tracing::info_span!(parent: &self.span, "is_admin", user_id = %user_id);

        self.traced(span, async move {
            if user_id.is_nil() {
                return Err(AuthError::InvalidArgument("user_id is required".to_string()));
            }

            let is_admin = self
                .credential_store
                .is_admin(user_id)
                .await
                .map_err(|e| match e {
                    StorageError::UserNotFound(id) => AuthError::NotFound(id),
                    other => AuthError::internal(
                        IS_ADMIN,
                        anyhow::Error::new(other).context("reading admin flag"),
                    ),
                })?;

            tracing::debug!(is_admin, "Checked admin flag");
            Ok(is_admin)
        })
        .await
    }
}
