use super::Recipe;

/// Case-insensitive substring search over a recipe's name, ingredient text,
/// tags, and dietary restrictions.
///
/// An empty or whitespace-only term matches every recipe.
pub fn recipe_matches_search(recipe: &Recipe, term: &str) -> bool {
    let normalized = term.trim().to_lowercase();
    if normalized.is_empty() {
        return true;
    }

    if recipe.name.to_lowercase().contains(&normalized) {
        return true;
    }

    if recipe.ingredients.to_lowercase().contains(&normalized) {
        return true;
    }

    if recipe
        .tags
        .iter()
        .any(|tag| tag.to_lowercase().contains(&normalized))
    {
        return true;
    }

    recipe
        .dietary_restrictions
        .iter()
        .any(|restriction| restriction.to_lowercase().contains(&normalized))
}
