use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use ovenlovin_core::recipe::Review;
use ovenlovin_core::serde::deserialize_optional_string;

/// Request payload for posting a review on a recipe.
#[derive(Debug, Deserialize)]
pub struct CreateReview {
    /// Display name; blank or absent falls back to `Anonymous`.
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub reviewer: Option<String>,
    pub rating: i32,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub comment: Option<String>,
}

impl CreateReview {
    /// Converts the request into a review of the given recipe. The owner
    /// email is recorded when the author was signed in.
    pub fn into_review(self, recipe_id: Uuid, owner: Option<String>) -> Review {
        Review {
            id: Uuid::new_v4(),
            recipe_id,
            reviewer: self.reviewer.unwrap_or_else(|| "Anonymous".to_string()),
            owner,
            rating: self.rating,
            comment: self.comment.unwrap_or_default(),
            created_at: Utc::now(),
        }
    }
}
