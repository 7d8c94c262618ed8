//! Recipe CRUD and ingredient cross-reference handlers.
//!
//! These handlers use repository trait objects for database access. Ratings
//! are derived from reviews on every read, never stored.

use std::collections::{HashMap, HashSet};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use ovenlovin_auth::{CurrentUser, OptionalUser};
use ovenlovin_core::pantry::{
    match_ingredients, parse_ingredient_lines, IngredientMatch, VendorListing,
};
use ovenlovin_core::recipe::{recipe_matches_search, RatingSummary, Recipe, Review};
use ovenlovin_core::storage::RepositoryError;

use crate::{
    blob::pathname_for_url,
    handlers::{
        authz::require_owner_or_admin,
        error::{error_response, not_found, storage_error},
    },
    models::{CreateRecipe, UpdateRecipe},
    state::AppState,
};

/// Query parameters for listing recipes.
#[derive(Debug, Deserialize)]
pub struct ListRecipesQuery {
    /// Case-insensitive search over name, ingredients, tags, and dietary
    /// restrictions.
    pub search: Option<String>,
}

/// A recipe decorated with its derived rating and favorite status.
#[derive(Debug, Serialize)]
pub struct RecipeSummary {
    #[serde(flatten)]
    pub recipe: Recipe,
    pub rating: RatingSummary,
    pub is_favorited: bool,
}

/// Recipe detail data: the recipe, its reviews, and the rating summary.
#[derive(Debug, Serialize)]
pub struct RecipeDetail {
    #[serde(flatten)]
    pub recipe: Recipe,
    pub rating: RatingSummary,
    pub reviews: Vec<Review>,
}

/// Derives the rating summary for a recipe from its current reviews.
pub(crate) async fn rating_for(
    state: &AppState,
    recipe_id: Uuid,
) -> Result<RatingSummary, RepositoryError> {
    let reviews = state.reviews.list_reviews_for_recipe(recipe_id).await?;
    let ratings: Vec<i32> = reviews.iter().map(|review| review.rating).collect();
    Ok(RatingSummary::from_ratings(&ratings))
}

/// List recipes, newest first (GET /api/recipes).
///
/// Anonymous callers see `is_favorited: false` everywhere.
pub async fn list_recipes(
    OptionalUser(user): OptionalUser,
    State(state): State<AppState>,
    Query(query): Query<ListRecipesQuery>,
) -> Result<Json<Vec<RecipeSummary>>, Response> {
    let recipes = state.recipes.list_recipes().await.map_err(storage_error)?;

    let favorited: HashSet<Uuid> = match &user {
        Some(user) => state
            .favorites
            .favorited_recipe_ids(user.id)
            .await
            .map_err(storage_error)?
            .into_iter()
            .collect(),
        None => HashSet::new(),
    };

    let term = query.search.unwrap_or_default();
    let mut summaries = Vec::new();
    for recipe in recipes {
        if !recipe_matches_search(&recipe, &term) {
            continue;
        }
        let rating = rating_for(&state, recipe.id).await.map_err(storage_error)?;
        summaries.push(RecipeSummary {
            is_favorited: favorited.contains(&recipe.id),
            rating,
            recipe,
        });
    }

    Ok(Json(summaries))
}

/// Create a new recipe (POST /api/recipes).
///
/// The owner is always the session user, never the request body.
pub async fn create_recipe(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(payload): Json<CreateRecipe>,
) -> Result<(StatusCode, Json<serde_json::Value>), Response> {
    let recipe = payload.into_recipe(&user.email).ok_or_else(|| {
        error_response(StatusCode::BAD_REQUEST, "A recipe name is required")
    })?;

    state
        .recipes
        .create_recipe(&recipe)
        .await
        .map_err(storage_error)?;

    tracing::info!(recipe_id = %recipe.id, name = %recipe.name, owner = %recipe.owner, "Created recipe");

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "id": recipe.id })),
    ))
}

/// Get a recipe with its reviews and rating (GET /api/recipes/{id}).
pub async fn get_recipe(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RecipeDetail>, Response> {
    let recipe = state
        .recipes
        .get_recipe(id)
        .await
        .map_err(storage_error)?
        .ok_or_else(|| not_found("Recipe", id))?;

    let reviews = state
        .reviews
        .list_reviews_for_recipe(id)
        .await
        .map_err(storage_error)?;
    let ratings: Vec<i32> = reviews.iter().map(|review| review.rating).collect();

    Ok(Json(RecipeDetail {
        recipe,
        rating: RatingSummary::from_ratings(&ratings),
        reviews,
    }))
}

/// Update a recipe (PATCH /api/recipes/{id}). Owner or admin only.
pub async fn update_recipe(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateRecipe>,
) -> Result<Json<Recipe>, Response> {
    let mut recipe = state
        .recipes
        .get_recipe(id)
        .await
        .map_err(storage_error)?
        .ok_or_else(|| not_found("Recipe", id))?;

    require_owner_or_admin(&user, &recipe.owner, "recipe", id)
        .map_err(IntoResponse::into_response)?;

    payload.apply_to(&mut recipe);
    state
        .recipes
        .update_recipe(&recipe)
        .await
        .map_err(storage_error)?;

    tracing::info!(recipe_id = %id, "Updated recipe");

    Ok(Json(recipe))
}

/// Delete a recipe (DELETE /api/recipes/{id}). Owner or admin only.
///
/// Removes the recipe's reviews and favorites first. A locally stored image
/// blob is deleted best-effort afterwards: failures are logged and swallowed
/// so the deletion still succeeds.
pub async fn delete_recipe(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, Response> {
    let recipe = state
        .recipes
        .get_recipe(id)
        .await
        .map_err(storage_error)?
        .ok_or_else(|| not_found("Recipe", id))?;

    require_owner_or_admin(&user, &recipe.owner, "recipe", id)
        .map_err(IntoResponse::into_response)?;

    state
        .reviews
        .delete_reviews_for_recipe(id)
        .await
        .map_err(storage_error)?;
    state
        .favorites
        .delete_favorites_for_recipe(id)
        .await
        .map_err(storage_error)?;
    state
        .recipes
        .delete_recipe(id)
        .await
        .map_err(storage_error)?;

    tracing::info!(recipe_id = %id, "Deleted recipe");

    // External image URLs are skipped; only blobs this app stored are cleaned up.
    if let Some(pathname) = pathname_for_url(&recipe.image) {
        if let Err(err) = state.blobs.delete(pathname).await {
            tracing::warn!(recipe_id = %id, pathname = %pathname, error = %err, "Failed to delete recipe image blob");
        }
        if let Err(err) = state.images.delete_images_by_url(&recipe.image).await {
            tracing::warn!(recipe_id = %id, url = %recipe.image, error = %err, "Failed to delete recipe image record");
        }
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Cross-reference a recipe's ingredient text against available vendor
/// listings (GET /api/recipes/{id}/ingredient-matches).
pub async fn ingredient_matches(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<IngredientMatch>>, Response> {
    let recipe = state
        .recipes
        .get_recipe(id)
        .await
        .map_err(storage_error)?
        .ok_or_else(|| not_found("Recipe", id))?;

    let available = state
        .ingredients
        .list_available_ingredients()
        .await
        .map_err(storage_error)?;
    let vendor_names: HashMap<Uuid, String> = state
        .vendors
        .list_vendors()
        .await
        .map_err(storage_error)?
        .into_iter()
        .map(|vendor| (vendor.id, vendor.name))
        .collect();

    let listings: Vec<VendorListing> = available
        .into_iter()
        .filter_map(|ingredient| match vendor_names.get(&ingredient.vendor_id) {
            Some(name) => Some(VendorListing {
                vendor_name: name.clone(),
                ingredient,
            }),
            None => {
                tracing::warn!(ingredient_id = %ingredient.id, vendor_id = %ingredient.vendor_id, "Ingredient references missing vendor");
                None
            }
        })
        .collect();

    let lines = parse_ingredient_lines(&recipe.ingredients);
    Ok(Json(match_ingredients(&lines, &listings)))
}
