//! User management endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use tracing::debug;
use validator::Validate;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, PatchUserApiRequest, UserApiRequest, UserResponse};

/// GET /users
pub async fn list_users(
    State(state): State<AppState>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    debug!("Listing all users");

    let users = state.user_service.list().await?;

    Ok(Json(users.iter().map(UserResponse::from).collect()))
}

/// GET /users/{user_id}
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    debug!(user_id = %user_id, "Getting user");

    let user = state.user_service.get(&user_id).await?;

    Ok(Json(UserResponse::from(&user)))
}

/// POST /users
pub async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<UserApiRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let request = request.normalized();
    request.validate()?;

    let user = state.user_service.create(request.into()).await?;
    debug!(user_id = %user.id(), "Created user");

    Ok((StatusCode::CREATED, Json(UserResponse::from(&user))))
}

/// PUT /users/{user_id}
pub async fn update_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(request): Json<UserApiRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    debug!(user_id = %user_id, "Replacing user");

    let request = request.normalized();
    request.validate()?;

    let user = state.user_service.update(&user_id, request.into()).await?;

    Ok(Json(UserResponse::from(&user)))
}

/// PATCH /users/{user_id}
pub async fn patch_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(request): Json<PatchUserApiRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    debug!(user_id = %user_id, "Patching user email");

    let request = request.normalized();
    request.validate()?;

    let user = state
        .user_service
        .update_email(&user_id, request.into())
        .await?;

    Ok(Json(UserResponse::from(&user)))
}

/// DELETE /users/{user_id}
pub async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    debug!(user_id = %user_id, "Deleting user");

    let user = state.user_service.delete(&user_id).await?;

    Ok(Json(UserResponse::from(&user)))
}
