use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Identity claims carried by an app-scoped token.
///
/// `sub`, `iat` and `exp` follow RFC 7519; `email` and `app_id` are private
/// claims naming the authenticated user and the app the token was minted for.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (user identifier)
    pub sub: String,

    /// Email address of the subject
    pub email: String,

    /// App the token is scoped to
    pub app_id: i32,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Create claims for a user logging into an app.
    ///
    /// # Arguments
    /// * `subject` - Unique user identifier
    /// * `email` - User email address
    /// * `app_id` - Identifier of the app the token is minted for
    /// * `issued_at` - Issue instant
    /// * `ttl` - Lifetime of the token
    pub fn for_app(
        subject: impl ToString,
        email: impl Into<String>,
        app_id: i32,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Self {
        let expiration = issued_at + ttl;

        Self {
            sub: subject.to_string(),
            email: email.into(),
            app_id,
            iat: issued_at.timestamp(),
            exp: expiration.timestamp(),
        }
    }

    /// Lifetime of the token in seconds.
    pub fn ttl_seconds(&self) -> i64 {
        self.exp - self.iat
    }
}
