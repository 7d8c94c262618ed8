//! Favorite toggle handler.

use axum::{
    extract::{Path, State},
    response::Response,
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use ovenlovin_auth::CurrentUser;

use crate::{
    handlers::error::{not_found, storage_error},
    state::AppState,
};

#[derive(Debug, Serialize)]
pub struct FavoriteStatus {
    pub favorited: bool,
}

/// Toggle a favorite (PUT /api/recipes/{id}/favorite).
///
/// Toggling twice returns the join row to its original state.
pub async fn toggle_favorite(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(recipe_id): Path<Uuid>,
) -> Result<Json<FavoriteStatus>, Response> {
    if state
        .recipes
        .get_recipe(recipe_id)
        .await
        .map_err(storage_error)?
        .is_none()
    {
        return Err(not_found("Recipe", recipe_id));
    }

    let favorited = state
        .favorites
        .is_favorited(user.id, recipe_id)
        .await
        .map_err(storage_error)?;

    if favorited {
        state
            .favorites
            .remove_favorite(user.id, recipe_id)
            .await
            .map_err(storage_error)?;
    } else {
        state
            .favorites
            .add_favorite(user.id, recipe_id)
            .await
            .map_err(storage_error)?;
    }

    tracing::debug!(user_id = %user.id, recipe_id = %recipe_id, favorited = !favorited, "Toggled favorite");

    Ok(Json(FavoriteStatus {
        favorited: !favorited,
    }))
}
