use async_trait::async_trait;

use crate::identity::errors::AuthError;
use crate::identity::errors::StorageError;
use crate::identity::models::App;
use crate::identity::models::AppId;
use crate::identity::models::EmailAddress;
use crate::identity::models::User;
use crate::identity::models::UserId;

/// Port for sign-on operations consumed by transports.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Register a new user.
    ///
    /// Stricter than a presence check: the email must also be a well-formed
    /// RFC 5322 address, so login never sees a stored address it could not
    /// have accepted.
    ///
    /// # Arguments
    /// * `email` - Email address, unique across all users
    /// * `password` - Plaintext password (hashed before storage)
    ///
    /// # Returns
    /// Identifier of the created user
    ///
    /// # Errors
    /// * `InvalidArgument` - Email or password empty, or email malformed
    /// * `AlreadyExists` - Email is already registered
    /// * `Internal` - Hashing or storage failed
    async fn register(&self, email: &str, password: &str) -> Result<UserId, AuthError>;

    /// Verify credentials and mint a token scoped to an app.
    ///
    /// # Arguments
    /// * `email` - Email address of the user
    /// * `password` - Plaintext password
    /// * `app_id` - App the token is requested for
    ///
    /// # Returns
    /// Signed token string
    ///
    /// # Errors
    /// * `InvalidArgument` - Email or password empty, or app_id zero
    /// * `InvalidCredentials` - Unknown email or wrong password
    /// * `InvalidApp` - App is not registered
    /// * `Internal` - Storage, hashing or signing failed
    async fn login(&self, email: &str, password: &str, app_id: i32)
        -> Result<String, AuthError>;

    /// Report whether a user holds the admin flag.
    ///
    /// # Errors
    /// * `InvalidArgument` - Identifier is the nil UUID
    /// * `NotFound` - No user with this identifier
    /// * `Internal` - Storage failed
    async fn is_admin(&self, user_id: &UserId) -> Result<bool, AuthError>;
}

/// Persistence operations for user credentials.
#[async_trait]
pub trait CredentialStore: Send + Sync + 'static {
    /// Insert a new user with a freshly generated identifier.
    ///
    /// Uniqueness of `email` is enforced atomically by the store itself.
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `DatabaseError` - Database operation failed
    async fn save_user(
        &self,
        email: &EmailAddress,
        password_hash: &str,
    ) -> Result<UserId, StorageError>;

    /// Retrieve user by email address.
    ///
    /// # Errors
    /// * `UserNotFound` - No user with this email
    /// * `DatabaseError` - Database operation failed
    async fn find_by_email(&self, email: &EmailAddress) -> Result<User, StorageError>;

    /// Read the admin flag of a user.
    ///
    /// # Errors
    /// * `UserNotFound` - No user with this identifier
    /// * `DatabaseError` - Database operation failed
    async fn is_admin(&self, user_id: &UserId) -> Result<bool, StorageError>;
}

/// Read-only lookup of registered apps.
#[async_trait]
pub trait AppRegistry: Send + Sync + 'static {
    /// Resolve an app and its signing secret.
    ///
    /// # Errors
    /// * `AppNotFound` - App is not registered
    /// * `DatabaseError` - Database operation failed
    async fn lookup(&self, app_id: AppId) -> Result<App, StorageError>;
}
