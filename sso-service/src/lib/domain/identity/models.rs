use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::identity::errors::AuthError;

/// Registered end-user.
///
/// The password hash never leaves the credential store and the service.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub email: EmailAddress,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// User unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Generate a new random user ID.
    ///
    /// # Returns
    /// UserId with random UUID v4
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a user ID from string.
    ///
    /// # Errors
    /// * `InvalidArgument` - String is empty or not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, AuthError> {
        if s.is_empty() {
            return Err(AuthError::InvalidArgument("user_id is required".to_string()));
        }

        Uuid::parse_str(s)
            .map(UserId)
            .map_err(|e| AuthError::InvalidArgument(format!("Invalid user ID: {}", e)))
    }

    /// True for the all-zero UUID, which is never assigned to a user.
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Non-empty and RFC 5322 compliant.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated email address.
    ///
    /// # Errors
    /// * `InvalidArgument` - Email is empty or does not conform to RFC 5322
    pub fn new(email: impl Into<String>) -> Result<Self, AuthError> {
        let email = email.into();
        if email.is_empty() {
            return Err(AuthError::InvalidArgument("email is required".to_string()));
        }

        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email))
            .map_err(|e| AuthError::InvalidArgument(format!("Invalid email: {}", e)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Plaintext password supplied by a caller.
///
/// Only guarantees the password is non-empty. `Debug` is redacted.
#[derive(Clone)]
pub struct Password(String);

impl Password {
    /// # Errors
    /// * `InvalidArgument` - Password is empty
    pub fn new(password: impl Into<String>) -> Result<Self, AuthError> {
        let password = password.into();
        if password.is_empty() {
            return Err(AuthError::InvalidArgument(
                "password is required".to_string(),
            ));
        }
        Ok(Self(password))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

/// Calling application identifier. Zero is reserved as "missing".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AppId(pub i32);

impl AppId {
    /// # Errors
    /// * `InvalidArgument` - Identifier is zero
    pub fn new(id: i32) -> Result<Self, AuthError> {
        if id == 0 {
            return Err(AuthError::InvalidArgument("app_id is required".to_string()));
        }
        Ok(Self(id))
    }
}

impl fmt::Display for AppId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Token signing secret of an app. Never logged; `Debug` is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct AppSecret(String);

impl AppSecret {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Debug for AppSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AppSecret(***)")
    }
}

/// Client application registered with the sign-on service.
#[derive(Debug, Clone)]
pub struct App {
    pub id: AppId,
    pub name: String,
    pub secret: AppSecret,
}
