use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::identity::models::UserId;
use crate::inbound::http::router::AppState;

pub async fn is_admin(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<ApiSuccess<IsAdminResponseData>, ApiError> {
    let user_id = UserId::from_string(&user_id)?;

    let is_admin = state.auth_service.is_admin(&user_id).await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        IsAdminResponseData {
            user_id: user_id.to_string(),
            is_admin,
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IsAdminResponseData {
    pub user_id: String,
    pub is_admin: bool,
}
