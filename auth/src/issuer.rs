use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;

use crate::jwt::Claims;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;

/// Mints and verifies app-scoped identity tokens.
///
/// Holds no key material: every call is keyed by the secret of the app the
/// token belongs to, so a token minted for one app never verifies under
/// another app's secret.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenIssuer;

impl TokenIssuer {
    pub fn new() -> Self {
        Self
    }

    /// Mint a token issued now.
    ///
    /// # Arguments
    /// * `subject` - User identifier
    /// * `email` - User email address
    /// * `app_id` - App the token is scoped to
    /// * `secret` - Signing secret of that app
    /// * `ttl` - Token lifetime
    ///
    /// # Errors
    /// * `EncodingFailed` - Signing failed
    pub fn mint(
        &self,
        subject: &str,
        email: &str,
        app_id: i32,
        secret: &[u8],
        ttl: Duration,
    ) -> Result<String, JwtError> {
        self.mint_at(subject, email, app_id, secret, ttl, Utc::now())
    }

    /// Mint a token with an explicit issue instant.
    pub fn mint_at(
        &self,
        subject: &str,
        email: &str,
        app_id: i32,
        secret: &[u8],
        ttl: Duration,
        issued_at: DateTime<Utc>,
    ) -> Result<String, JwtError> {
        let claims = Claims::for_app(subject, email, app_id, issued_at, ttl);
        JwtHandler::new(secret).encode(&claims)
    }

    /// Verify a token against an app secret and return its claims.
    ///
    /// # Errors
    /// * `InvalidSignature` - Token was not signed with `secret`
    /// * `TokenExpired` - Token lifetime has elapsed
    /// * `DecodingFailed` - Token is malformed
    pub fn verify(&self, token: &str, secret: &[u8]) -> Result<Claims, JwtError> {
        JwtHandler::new(secret).decode(token)
    }

    /// Read the `app_id` a token claims without verifying it.
    ///
    /// Lets a holder of several app secrets pick the one to pass to
    /// [`verify`](Self::verify).
    ///
    /// # Errors
    /// * `DecodingFailed` - Token is malformed
    pub fn claimed_app_id(&self, token: &str) -> Result<i32, JwtError> {
        JwtHandler::decode_unverified::<Claims>(token).map(|claims| claims.app_id)
    }
}
