use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::Row;

use crate::identity::errors::StorageError;
use crate::identity::models::App;
use crate::identity::models::AppId;
use crate::identity::models::AppSecret;
use crate::identity::ports::AppRegistry;

/// Reads apps from the `apps` table. Apps are provisioned out of band.
pub struct PostgresAppRegistry {
    pool: PgPool,
}

impl PostgresAppRegistry {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AppRegistry for PostgresAppRegistry {
    async fn lookup(&self, app_id: AppId) -> Result<App, StorageError> {
        let row = sqlx::query(
            r#"
            SELECT id, name, secret
            FROM apps
            WHERE id = $1
            "#,
        )
        .bind(app_id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::DatabaseError(e.to_string()))?
        .ok_or(StorageError::AppNotFound(app_id))?;

        let decode = |e: sqlx::Error| StorageError::DatabaseError(e.to_string());

        Ok(App {
            id: AppId(row.try_get("id").map_err(decode)?),
            name: row.try_get("name").map_err(decode)?,
            secret: AppSecret::new(row.try_get::<String, _>("secret").map_err(decode)?),
        })
    }
}
