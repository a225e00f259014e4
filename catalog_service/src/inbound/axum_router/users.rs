use axum::{Extension, Json};
use serde::Serialize;

use super::error::ErrorResponse;
use crate::domain::models::User;

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct SyncUserResponse {
    pub status: &'static str,
    pub user: User,
}

/// Returns the caller as registered by the authentication middleware
#[utoipa::path(
    get,
    path = "/sync-user",
    responses(
        (status = 200, body = SyncUserResponse),
        (status = 401, body = ErrorResponse),
        (status = 500, body = ErrorResponse),
    )
)]
#[tracing::instrument(skip_all, fields(user_id = %user.id))]
pub async fn sync_user(Extension(user): Extension<User>) -> Json<SyncUserResponse> {
    Json(SyncUserResponse {
        status: "synced",
        user,
    })
}
