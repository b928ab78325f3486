//! Authentication utilities library
//!
//! Provides the credential and token primitives of the sign-on service:
//! - Password hashing (Argon2id)
//! - App-scoped JWT minting and verification (HS256)
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! let is_valid = hasher.verify("my_password", &hash).unwrap();
//! assert!(is_valid);
//! ```
//!
//! ## App-scoped Tokens
//! ```
//! use auth::TokenIssuer;
//! use chrono::Duration;
//!
//! let issuer = TokenIssuer::new();
//! let token = issuer
//!     .mint("user123", "alice@example.com", 1, b"app-secret", Duration::hours(1))
//!     .unwrap();
//! let claims = issuer.verify(&token, b"app-secret").unwrap();
//! assert_eq!(claims.app_id, 1);
//! assert!(issuer.verify(&token, b"other-app-secret").is_err());
//! ```

pub mod issuer;
pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use issuer::TokenIssuer;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use password::PasswordError;
pub use password::PasswordHasher;
