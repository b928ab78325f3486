use thiserror::Error;

use crate::identity::models::AppId;

/// Errors returned by credential store and app registry adapters.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorageError {
    #[error("Email already exists: {0}")]
    EmailAlreadyExists(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("App not found: {0}")]
    AppNotFound(AppId),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

/// Fieldless discriminant of [`AuthError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidArgument,
    InvalidCredentials,
    AlreadyExists,
    InvalidApp,
    NotFound,
    Internal,
}

/// Top-level error for all sign-on operations
#[derive(Debug, Error)]
pub enum AuthError {
    // Rejected before any side effect
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // Unknown email and wrong password are deliberately the same error
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User already exists: {0}")]
    AlreadyExists(String),

    #[error("Invalid app_id: {0}")]
    InvalidApp(AppId),

    #[error("User not found: {0}")]
    NotFound(String),

    #[error("{operation}: internal error")]
    Internal {
        operation: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

impl AuthError {
    pub fn internal(operation: &'static str, source: impl Into<anyhow::Error>) -> Self {
        AuthError::Internal {
            operation,
            source: source.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            AuthError::InvalidCredentials => ErrorKind::InvalidCredentials,
            AuthError::AlreadyExists(_) => ErrorKind::AlreadyExists,
            AuthError::InvalidApp(_) => ErrorKind::InvalidApp,
            AuthError::NotFound(_) => ErrorKind::NotFound,
            AuthError::Internal { .. } => ErrorKind::Internal,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use anyhow::Context;

    use super::*;

    #[test]
    fn test_internal_keeps_root_cause() {
        let root: anyhow::Result<()> =
            Err(StorageError::DatabaseError("connection reset".to_string()).into());
        let err = AuthError::internal("register", root.context("saving user").unwrap_err());

        assert_eq!(err.kind(), ErrorKind::Internal);
        assert_eq!(err.to_string(), "register: internal error");

        assert_eq!(err.source().map(|s| s.to_string()), Some("saving user".to_string()));

        let AuthError::Internal { source, .. } = err else {
            unreachable!()
        };
        assert_eq!(
            source.root_cause().downcast_ref::<StorageError>(),
            Some(&StorageError::DatabaseError("connection reset".to_string()))
        );
    }
}
