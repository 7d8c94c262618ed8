//! Review handlers.
//!
//! Reviews can be posted without signing in; the author's email is only
//! recorded for signed-in reviewers, and only those reviews can be deleted
//! by their authors.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use ovenlovin_auth::{CurrentUser, OptionalUser};
use ovenlovin_core::recipe::{RatingSummary, Review};

use crate::{
    handlers::{
        authz::{require_admin, require_owner_or_admin},
        error::{error_response, not_found, storage_error},
    },
    models::CreateReview,
    state::AppState,
};

/// Reviews for a recipe with the derived rating summary.
#[derive(Debug, Serialize)]
pub struct ReviewList {
    pub rating: RatingSummary,
    pub reviews: Vec<Review>,
}

/// Request payload for the admin bulk delete.
#[derive(Debug, Deserialize)]
pub struct BulkDeleteReviews {
    pub ids: Vec<Uuid>,
}

/// List reviews for a recipe, newest first (GET /api/recipes/{id}/reviews).
pub async fn list_reviews(
    State(state): State<AppState>,
    Path(recipe_id): Path<Uuid>,
) -> Result<Json<ReviewList>, Response> {
    if state
        .recipes
        .get_recipe(recipe_id)
        .await
        .map_err(storage_error)?
        .is_none()
    {
        return Err(not_found("Recipe", recipe_id));
    }

    let reviews = state
        .reviews
        .list_reviews_for_recipe(recipe_id)
        .await
        .map_err(storage_error)?;
    let ratings: Vec<i32> = reviews.iter().map(|review| review.rating).collect();

    Ok(Json(ReviewList {
        rating: RatingSummary::from_ratings(&ratings),
        reviews,
    }))
}

/// Post a review on a recipe (POST /api/recipes/{id}/reviews).
///
/// Works signed out; a blank reviewer name falls back to `Anonymous`.
pub async fn create_review(
    OptionalUser(user): OptionalUser,
    State(state): State<AppState>,
    Path(recipe_id): Path<Uuid>,
    Json(payload): Json<CreateReview>,
) -> Result<(StatusCode, Json<Review>), Response> {
    if !(1..=5).contains(&payload.rating) {
        return Err(error_response(
            StatusCode::BAD_REQUEST,
            "Rating must be between 1 and 5",
        ));
    }

    if state
        .recipes
        .get_recipe(recipe_id)
        .await
        .map_err(storage_error)?
        .is_none()
    {
        return Err(not_found("Recipe", recipe_id));
    }

    let review = payload.into_review(recipe_id, user.map(|u| u.email));
    state
        .reviews
        .create_review(&review)
        .await
        .map_err(storage_error)?;

    tracing::info!(review_id = %review.id, recipe_id = %recipe_id, rating = review.rating, "Created review");

    Ok((StatusCode::CREATED, Json(review)))
}

/// Delete a review (DELETE /api/reviews/{id}). Review author or admin only.
///
/// Reviews posted while signed out have no recorded author, so only admins
/// can remove them.
pub async fn delete_review(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, Response> {
    let review = state
        .reviews
        .get_review(id)
        .await
        .map_err(storage_error)?
        .ok_or_else(|| not_found("Review", id))?;

    require_owner_or_admin(&user, review.owner.as_deref().unwrap_or(""), "review", id)
        .map_err(IntoResponse::into_response)?;

    state.reviews.delete_review(id).await.map_err(storage_error)?;

    tracing::info!(review_id = %id, "Deleted review");

    Ok(StatusCode::NO_CONTENT)
}

/// Bulk delete reviews (POST /api/reviews/bulk-delete). Admin only.
///
/// An empty id list is a no-op success.
pub async fn bulk_delete_reviews(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(payload): Json<BulkDeleteReviews>,
) -> Result<StatusCode, Response> {
    require_admin(&user).map_err(IntoResponse::into_response)?;

    state
        .reviews
        .delete_reviews(&payload.ids)
        .await
        .map_err(storage_error)?;

    tracing::info!(count = payload.ids.len(), "Bulk deleted reviews");

    Ok(StatusCode::NO_CONTENT)
}
