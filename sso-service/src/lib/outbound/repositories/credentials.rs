use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;
use sqlx::Row;
use uuid::Uuid;

use crate::identity::errors::StorageError;
use crate::identity::models::EmailAddress;
use crate::identity::models::User;
use crate::identity::models::UserId;
use crate::identity::ports::CredentialStore;

const EMAIL_UNIQUE_CONSTRAINT: &str = "users_email_key";

pub struct PostgresCredentialStore {
    pool: PgPool,
}

impl PostgresCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for PostgresCredentialStore {
    async fn save_user(
        &self,
        email: &EmailAddress,
        password_hash: &str,
    ) -> Result<UserId, StorageError> {
        let user_id = UserId::new();

        // Single autocommit statement: the unique index decides the race
        sqlx::query(
            r#"
            INSERT INTO users (id, email, password_hash)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(user_id.0)
        .bind(email.as_str())
        .bind(password_hash)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation()
                    && db_err.constraint() == Some(EMAIL_UNIQUE_CONSTRAINT)
                {
                    return StorageError::EmailAlreadyExists(email.as_str().to_string());
                }
            }
            StorageError::DatabaseError(e.to_string())
        })?;

        Ok(user_id)
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<User, StorageError> {
        let row = sqlx::query(
            r#"
            SELECT id, email, password_hash, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::DatabaseError(e.to_string()))?
        .ok_or_else(|| StorageError::UserNotFound(email.as_str().to_string()))?;

        let id: Uuid = row
            .try_get("id")
            .map_err(|e| StorageError::DatabaseError(e.to_string()))?;
        let stored_email: String = row
            .try_get("email")
            .map_err(|e| StorageError::DatabaseError(e.to_string()))?;
        let password_hash: String = row
            .try_get("password_hash")
            .map_err(|e| StorageError::DatabaseError(e.to_string()))?;
        let created_at: DateTime<Utc> = row
            .try_get("created_at")
            .map_err(|e| StorageError::DatabaseError(e.to_string()))?;

        Ok(User {
            id: UserId(id),
            email: EmailAddress::new(stored_email)
                .map_err(|e| StorageError::DatabaseError(e.to_string()))?,
            password_hash,
            created_at,
        })
    }

    async fn is_admin(&self, user_id: &UserId) -> Result<bool, StorageError> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT is_admin
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::DatabaseError(e.to_string()))?
        .ok_or_else(|| StorageError::UserNotFound(user_id.to_string()))
    }
}
