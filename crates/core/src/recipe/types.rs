use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A community-submitted recipe.
///
/// Ingredients and steps are free text as entered by the author; tags and
/// dietary restrictions are normalized string lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: Uuid,
    pub name: String,
    /// Image URL; empty when the recipe has no image.
    pub image: String,
    pub ingredients: String,
    pub steps: String,
    pub tags: Vec<String>,
    pub dietary_restrictions: Vec<String>,
    /// Email of the submitting user.
    pub owner: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Recipe {
    /// Creates a new recipe owned by the given user email.
    pub fn new(name: impl Into<String>, owner: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            image: String::new(),
            ingredients: String::new(),
            steps: String::new(),
            tags: Vec::new(),
            dietary_restrictions: Vec::new(),
            owner: owner.into(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// A star rating with an optional comment left on a recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: Uuid,
    pub recipe_id: Uuid,
    /// Display name chosen by the reviewer; `Anonymous` when left blank.
    pub reviewer: String,
    /// Email of the signed-in author, if the review was left while signed in.
    pub owner: Option<String>,
    pub rating: i32,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}
