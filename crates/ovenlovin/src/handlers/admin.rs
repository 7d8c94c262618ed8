//! Admin-only handlers: user management and dashboard counts.

use std::str::FromStr;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use ovenlovin_auth::CurrentUser;
use ovenlovin_core::user::{Role, User};

use crate::{
    handlers::{
        authz::require_admin,
        error::{error_response, not_found, storage_error},
    },
    state::AppState,
};

/// Request payload for changing a user's role.
#[derive(Debug, Deserialize)]
pub struct UpdateRole {
    pub role: String,
}

/// Dashboard counts.
#[derive(Debug, Serialize)]
pub struct AdminStats {
    pub users: u64,
    pub recipes: u64,
    pub vendors: u64,
}

/// List all users (GET /api/admin/users). Password hashes are never
/// serialized.
pub async fn list_users(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<User>>, Response> {
    require_admin(&user).map_err(IntoResponse::into_response)?;

    let users = state.users.list_users().await.map_err(storage_error)?;
    Ok(Json(users))
}

/// Change a user's role (PATCH /api/admin/users/{id}/role).
pub async fn update_user_role(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateRole>,
) -> Result<StatusCode, Response> {
    require_admin(&user).map_err(IntoResponse::into_response)?;

    let role = Role::from_str(&payload.role)
        .map_err(|e| error_response(StatusCode::BAD_REQUEST, e))?;

    if state
        .users
        .get_user(id)
        .await
        .map_err(storage_error)?
        .is_none()
    {
        return Err(not_found("User", id));
    }

    state
        .users
        .update_user_role(id, role)
        .await
        .map_err(storage_error)?;

    tracing::info!(user_id = %id, role = %role, "Updated user role");

    Ok(StatusCode::NO_CONTENT)
}

/// Delete a user and their sessions (DELETE /api/admin/users/{id}).
pub async fn delete_user(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, Response> {
    require_admin(&user).map_err(IntoResponse::into_response)?;

    state.users.delete_user(id).await.map_err(storage_error)?;

    if let Err(err) = state.auth.sessions.delete_user_sessions(id).await {
        tracing::warn!(user_id = %id, error = %err, "Failed to delete user sessions");
    }

    tracing::info!(user_id = %id, "Deleted user");

    Ok(StatusCode::NO_CONTENT)
}

/// Dashboard counts (GET /api/admin/stats).
pub async fn admin_stats(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<AdminStats>, Response> {
    require_admin(&user).map_err(IntoResponse::into_response)?;

    let users = state.users.count_users().await.map_err(storage_error)?;
    let recipes = state.recipes.count_recipes().await.map_err(storage_error)?;
    let vendors = state.vendors.count_vendors().await.map_err(storage_error)?;

    Ok(Json(AdminStats {
        users,
        recipes,
        vendors,
    }))
}
