use chrono::Utc;
use serde::Deserialize;

use ovenlovin_core::recipe::Recipe;
use ovenlovin_core::serde::deserialize_optional_string;

/// Splits a comma-separated tag string into trimmed, non-empty tags.
fn split_tags(tags: &str) -> Vec<String> {
    tags.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// Request payload for creating a recipe.
///
/// Tags arrive as a single comma-separated string, matching the submission
/// form; dietary restrictions arrive as a list.
#[derive(Debug, Deserialize)]
pub struct CreateRecipe {
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub ingredients: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub steps: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub tags: Option<String>,
    #[serde(default)]
    pub dietary_restrictions: Vec<String>,
}

impl CreateRecipe {
    /// Converts the request into a recipe owned by the given user email.
    /// Returns None when the name is missing or blank.
    pub fn into_recipe(self, owner: &str) -> Option<Recipe> {
        let name = self.name?;
        let mut recipe = Recipe::new(name, owner);
        recipe.image = self.image.unwrap_or_default();
        recipe.ingredients = self.ingredients.unwrap_or_default();
        recipe.steps = self.steps.unwrap_or_default();
        recipe.tags = self.tags.as_deref().map(split_tags).unwrap_or_default();
        recipe.dietary_restrictions = self.dietary_restrictions;
        Some(recipe)
    }
}

/// Request payload for updating a recipe. Absent fields keep their
/// current values.
#[derive(Debug, Deserialize)]
pub struct UpdateRecipe {
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub ingredients: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub steps: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub tags: Option<String>,
    #[serde(default)]
    pub dietary_restrictions: Option<Vec<String>>,
}

impl UpdateRecipe {
    /// Applies the provided fields to an existing recipe and bumps its
    /// updated_at timestamp.
    pub fn apply_to(self, recipe: &mut Recipe) {
        if let Some(name) = self.name {
            recipe.name = name;
        }
        if let Some(image) = self.image {
            recipe.image = image;
        }
        if let Some(ingredients) = self.ingredients {
            recipe.ingredients = ingredients;
        }
        if let Some(steps) = self.steps {
            recipe.steps = steps;
        }
        if let Some(tags) = self.tags {
            recipe.tags = split_tags(&tags);
        }
        if let Some(dietary) = self.dietary_restrictions {
            recipe.dietary_restrictions = dietary;
        }
        recipe.updated_at = Utc::now();
    }
}
