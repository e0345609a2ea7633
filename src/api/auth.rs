use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::Session;
use crate::state::AppState;

use super::error::ApiError;
use super::response::ApiResponse;

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub session: Session,
    /// Opaque bearer token for subsequent requests. Also persisted behind
    /// the session store.
    pub token: String,
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    request.validate()?;
    let (session, token) = state
        .sessions
        .login_with_token(&request.email, &request.password)
        .await?;
    Ok(Json(ApiResponse::success(LoginResponse { session, token })))
}

/// POST /api/auth/logout - idempotent
pub async fn logout(State(state): State<AppState>) -> Result<Json<ApiResponse<()>>, ApiError> {
    state.sessions.logout().await?;
    Ok(Json(ApiResponse::success(())))
}

/// GET /api/auth/session - restore the persisted session, if any.
///
/// Always 200: an absent, malformed, or expired token is simply `null`
/// data, matching the silent-failure contract of session restore.
pub async fn session(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Option<Session>>>, ApiError> {
    let session = state.sessions.restore_session().await?;
    Ok(Json(ApiResponse::success(session)))
}
