use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::identity::errors::StorageError;
use crate::identity::models::App;
use crate::identity::models::AppId;
use crate::identity::models::EmailAddress;
use crate::identity::models::User;
use crate::identity::models::UserId;
use crate::identity::ports::AppRegistry;
use crate::identity::ports::CredentialStore;

#[derive(Debug, Default)]
struct Users {
    by_email: HashMap<EmailAddress, User>,
    /// user_id -> admin flag
    admin_flags: HashMap<UserId, bool>,
}

/// Credential store kept in process memory.
///
/// The uniqueness check and the insert happen under one write lock, which
/// gives the same all-or-nothing behaviour as a unique index.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCredentialStore {
    users: Arc<RwLock<Users>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the admin flag of an existing user.
    ///
    /// # Errors
    /// * `UserNotFound` - No user with this identifier
    pub async fn grant_admin(&self, user_id: &UserId) -> Result<(), StorageError> {
        let mut users = self.users.write().await;
        let is_admin = users
            .admin_flags
            .get_mut(user_id)
            .ok_or_else(|| StorageError::UserNotFound(user_id.to_string()))?;
        *is_admin = true;
        Ok(())
    }

    /// Number of stored users.
    pub async fn len(&self) -> usize {
        self.users.read().await.by_email.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn save_user(
        &self,
        email: &EmailAddress,
        password_hash: &str,
    ) -> Result<UserId, StorageError> {
        let mut users = self.users.write().await;

        if users.by_email.contains_key(email) {
            return Err(StorageError::EmailAlreadyExists(email.as_str().to_string()));
        }

        let user = User {
            id: UserId::new(),
            email: email.clone(),
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
        };
        let user_id = user.id;

        users.admin_flags.insert(user_id, false);
        users.by_email.insert(email.clone(), user);

        Ok(user_id)
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<User, StorageError> {
        self.users
            .read()
            .await
            .by_email
            .get(email)
            .cloned()
            .ok_or_else(|| StorageError::UserNotFound(email.as_str().to_string()))
    }

    async fn is_admin(&self, user_id: &UserId) -> Result<bool, StorageError> {
        self.users
            .read()
            .await
            .admin_flags
            .get(user_id)
            .copied()
            .ok_or_else(|| StorageError::UserNotFound(user_id.to_string()))
    }
}

/// App registry backed by a fixed set of apps.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAppRegistry {
    apps: Arc<HashMap<AppId, App>>,
}

impl InMemoryAppRegistry {
    pub fn new(apps: impl IntoIterator<Item = App>) -> Self {
        Self {
            apps: Arc::new(apps.into_iter().map(|app| (app.id, app)).collect()),
        }
    }
}

#[async_trait]
impl AppRegistry for InMemoryAppRegistry {
    async fn lookup(&self, app_id: AppId) -> Result<App, StorageError> {
        self.apps
            .get(&app_id)
            .cloned()
            .ok_or(StorageError::AppNotFound(app_id))
    }
}
