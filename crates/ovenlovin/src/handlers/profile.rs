//! Profile handlers: the caller's account plus their contributed and
//! favorited recipes.

use std::collections::HashSet;

use axum::{extract::State, response::Response, Json};
use serde::Serialize;
use uuid::Uuid;

use ovenlovin_auth::CurrentUser;
use ovenlovin_core::storage::RepositoryError;
use ovenlovin_core::user::User;

use crate::{
    handlers::error::storage_error,
    handlers::recipes::{rating_for, RecipeSummary},
    models::UpdateProfile,
    state::AppState,
};

/// Profile page data.
#[derive(Debug, Serialize)]
pub struct ProfileData {
    pub user: User,
    /// Recipes the user contributed, with rating summaries.
    pub recipes: Vec<RecipeSummary>,
    /// Recipes the user favorited, with rating summaries.
    pub favorites: Vec<RecipeSummary>,
}

/// Get the caller's profile (GET /api/profile).
pub async fn get_profile(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<ProfileData>, Response> {
    let contributed = state
        .recipes
        .list_recipes_by_owner(&user.email)
        .await
        .map_err(storage_error)?;
    let favorite_recipes = state
        .recipes
        .list_favorite_recipes(user.id)
        .await
        .map_err(storage_error)?;
    let favorited: HashSet<Uuid> = favorite_recipes.iter().map(|recipe| recipe.id).collect();

    let mut recipes = Vec::new();
    for recipe in contributed {
        let rating = rating_for(&state, recipe.id).await.map_err(storage_error)?;
        recipes.push(RecipeSummary {
            is_favorited: favorited.contains(&recipe.id),
            rating,
            recipe,
        });
    }

    let mut favorites = Vec::new();
    for recipe in favorite_recipes {
        let rating = rating_for(&state, recipe.id).await.map_err(storage_error)?;
        favorites.push(RecipeSummary {
            is_favorited: true,
            rating,
            recipe,
        });
    }

    Ok(Json(ProfileData {
        user,
        recipes,
        favorites,
    }))
}

/// Update the caller's profile (PATCH /api/profile).
///
/// Changing the email to one another account holds is a conflict.
pub async fn update_profile(
    CurrentUser(mut user): CurrentUser,
    State(state): State<AppState>,
    Json(payload): Json<UpdateProfile>,
) -> Result<Json<User>, Response> {
    if let Some(new_email) = payload.new_email() {
        if new_email != user.email
            && state
                .users
                .get_user_by_email(&new_email)
                .await
                .map_err(storage_error)?
                .is_some()
        {
            return Err(storage_error(RepositoryError::AlreadyExists {
                entity_type: "User",
                id: new_email,
            }));
        }
    }

    payload.apply_to(&mut user);
    state.users.update_user(&user).await.map_err(storage_error)?;

    tracing::info!(user_id = %user.id, "Updated profile");

    Ok(Json(user))
}
