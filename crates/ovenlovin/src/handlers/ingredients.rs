//! Ingredient listing handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use uuid::Uuid;

use ovenlovin_auth::CurrentUser;
use ovenlovin_core::pantry::Ingredient;

use crate::{
    handlers::{
        authz::{require_owner_or_admin, require_vendor},
        error::{not_found, storage_error},
    },
    models::{CreateIngredient, UpdateIngredient},
    state::AppState,
};

/// Create a listing under the caller's vendor (POST /api/ingredients).
/// Requires the VENDOR role.
pub async fn create_ingredient(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(payload): Json<CreateIngredient>,
) -> Result<(StatusCode, Json<Ingredient>), Response> {
    require_vendor(&user).map_err(IntoResponse::into_response)?;

    let vendor = state
        .vendors
        .get_vendor_by_owner(&user.email)
        .await
        .map_err(storage_error)?
        .ok_or_else(|| not_found("Vendor", &user.email))?;

    let ingredient = payload.into_ingredient(&vendor);
    state
        .ingredients
        .create_ingredient(&ingredient)
        .await
        .map_err(storage_error)?;

    tracing::info!(ingredient_id = %ingredient.id, vendor_id = %vendor.id, name = %ingredient.name, "Created ingredient");

    Ok((StatusCode::CREATED, Json(ingredient)))
}

/// Update a listing (PATCH /api/ingredients/{id}). Owning vendor or admin.
pub async fn update_ingredient(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateIngredient>,
) -> Result<Json<Ingredient>, Response> {
    let mut ingredient = state
        .ingredients
        .get_ingredient(id)
        .await
        .map_err(storage_error)?
        .ok_or_else(|| not_found("Ingredient", id))?;

    require_owner_or_admin(&user, &ingredient.owner, "ingredient", id)
        .map_err(IntoResponse::into_response)?;

    payload.apply_to(&mut ingredient);
    state
        .ingredients
        .update_ingredient(&ingredient)
        .await
        .map_err(storage_error)?;

    Ok(Json(ingredient))
}

/// Delete a listing (DELETE /api/ingredients/{id}). Owning vendor or admin.
pub async fn delete_ingredient(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, Response> {
    let ingredient = state
        .ingredients
        .get_ingredient(id)
        .await
        .map_err(storage_error)?
        .ok_or_else(|| not_found("Ingredient", id))?;

    require_owner_or_admin(&user, &ingredient.owner, "ingredient", id)
        .map_err(IntoResponse::into_response)?;

    state
        .ingredients
        .delete_ingredient(id)
        .await
        .map_err(storage_error)?;

    tracing::info!(ingredient_id = %id, "Deleted ingredient");

    Ok(StatusCode::NO_CONTENT)
}
