use axum::extract::{Path, State};
use axum::Json;
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::Authorization;
use axum_extra::TypedHeader;
use serde::Deserialize;

use crate::domain::{Role, Session};
use crate::routing;
use crate::state::AppState;

use super::error::ApiError;
use super::response::ApiResponse;
use super::authorize;

type MaybeBearer = Option<TypedHeader<Authorization<Bearer>>>;

fn token(bearer: &MaybeBearer) -> Option<&str> {
    bearer.as_ref().map(|h| h.token())
}

/// GET /api/users - admin only
pub async fn list(
    State(state): State<AppState>,
    bearer: MaybeBearer,
) -> Result<Json<ApiResponse<Vec<Session>>>, ApiError> {
    authorize(&state, token(&bearer), routing::USERS)?;
    let users = state.sessions.directory().list().await;
    let count = users.len();
    Ok(Json(ApiResponse::success(users).with_count(count)))
}

#[derive(Debug, Deserialize)]
pub struct RoleChange {
    pub role: Role,
}

/// PUT /api/users/:id/role - admin only
pub async fn update_role(
    State(state): State<AppState>,
    bearer: MaybeBearer,
    Path(user_id): Path<u32>,
    Json(change): Json<RoleChange>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    authorize(&state, token(&bearer), routing::USERS)?;
    if !state.sessions.directory().update_role(user_id, change.role).await {
        return Err(ApiError::NotFound(format!("user {user_id}")));
    }
    Ok(Json(ApiResponse::success(())))
}

/// DELETE /api/users/:id - admin only
pub async fn remove(
    State(state): State<AppState>,
    bearer: MaybeBearer,
    Path(user_id): Path<u32>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    authorize(&state, token(&bearer), routing::USERS)?;
    if !state.sessions.directory().delete(user_id).await {
        return Err(ApiError::NotFound(format!("user {user_id}")));
    }
    Ok(Json(ApiResponse::success(())))
}
