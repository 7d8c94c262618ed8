//! JSON seed loader for environment bootstrap.
//!
//! A seed file enumerates default accounts, vendors, ingredient listings,
//! and recipes. Applying it is idempotent: users are upserted by email,
//! vendors by owner, recipes by (name, owner), and ingredients by name
//! within their vendor. Listings referencing an unknown vendor are skipped
//! with a warning.

use std::str::FromStr;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use ovenlovin_auth::hash_password;
use ovenlovin_core::pantry::{Ingredient, Vendor};
use ovenlovin_core::recipe::Recipe;
use ovenlovin_core::user::{Role, User};

use crate::state::AppState;

fn default_available() -> bool {
    true
}

/// Root of the seed file.
#[derive(Debug, Deserialize)]
pub struct SeedConfig {
    #[serde(default)]
    pub accounts: Vec<SeedAccount>,
    #[serde(default)]
    pub vendors: Vec<SeedVendor>,
    #[serde(default)]
    pub ingredients: Vec<SeedIngredient>,
    #[serde(default)]
    pub recipes: Vec<SeedRecipe>,
}

#[derive(Debug, Deserialize)]
pub struct SeedAccount {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub dietary_restrictions: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct SeedVendor {
    pub owner: String,
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub hours: String,
}

#[derive(Debug, Deserialize)]
pub struct SeedIngredient {
    /// Display name of the vendor listing this ingredient.
    pub vendor: String,
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub size: String,
    #[serde(default = "default_available")]
    pub available: bool,
}

#[derive(Debug, Deserialize)]
pub struct SeedRecipe {
    pub name: String,
    pub owner: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub ingredients: String,
    #[serde(default)]
    pub steps: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub dietary_restrictions: Vec<String>,
}

/// Reads and applies a seed file at startup.
pub async fn apply_seed_file(state: &AppState, path: &str) -> Result<()> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read seed file {path}"))?;
    let config: SeedConfig = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse seed file {path}"))?;

    apply_seed(state, config).await
}

/// Applies a parsed seed configuration.
pub async fn apply_seed(state: &AppState, config: SeedConfig) -> Result<()> {
    let mut created_users = 0usize;
    for account in config.accounts {
        let email = account.email.trim().to_lowercase();
        if state.users.get_user_by_email(&email).await?.is_some() {
            continue;
        }

        let role = match &account.role {
            Some(role) => Role::from_str(role)
                .map_err(|e| anyhow::anyhow!("Seed account {email}: {e}"))?,
            None => Role::User,
        };
        let password_hash = hash_password(&account.password)
            .map_err(|e| anyhow::anyhow!("Seed account {email}: failed to hash password: {e}"))?;

        let mut user = User::new(&email, password_hash)
            .with_role(role)
            .with_dietary_restrictions(account.dietary_restrictions);
        if let Some(name) = account.name {
            user = user.with_name(name);
        }
        state.users.create_user(&user).await?;
        created_users += 1;
    }

    let mut created_vendors = 0usize;
    for seed in config.vendors {
        if state.vendors.get_vendor_by_owner(&seed.owner).await?.is_some() {
            continue;
        }
        let vendor = Vendor::new(&seed.owner, &seed.name, &seed.address, &seed.hours);
        state.vendors.create_vendor(&vendor).await?;
        created_vendors += 1;
    }

    let mut created_ingredients = 0usize;
    for seed in config.ingredients {
        let Some(vendor) = state.vendors.get_vendor_by_name(&seed.vendor).await? else {
            tracing::warn!(vendor = %seed.vendor, ingredient = %seed.name, "Seed ingredient references unknown vendor, skipping");
            continue;
        };

        let existing = state
            .ingredients
            .list_ingredients_for_vendor(vendor.id)
            .await?;
        if existing
            .iter()
            .any(|listing| listing.name.eq_ignore_ascii_case(&seed.name))
        {
            continue;
        }

        let ingredient = Ingredient {
            id: Uuid::new_v4(),
            vendor_id: vendor.id,
            owner: vendor.owner.clone(),
            name: seed.name,
            price: seed.price,
            size: seed.size,
            available: seed.available,
            created_at: Utc::now(),
        };
        state.ingredients.create_ingredient(&ingredient).await?;
        created_ingredients += 1;
    }

    let mut created_recipes = 0usize;
    for seed in config.recipes {
        let existing = state.recipes.list_recipes_by_owner(&seed.owner).await?;
        if existing.iter().any(|recipe| recipe.name == seed.name) {
            continue;
        }

        let mut recipe = Recipe::new(&seed.name, &seed.owner);
        recipe.image = seed.image;
        recipe.ingredients = seed.ingredients;
        recipe.steps = seed.steps;
        recipe.tags = seed.tags;
        recipe.dietary_restrictions = seed.dietary_restrictions;
        state.recipes.create_recipe(&recipe).await?;
        created_recipes += 1;
    }

    tracing::info!(
        users = created_users,
        vendors = created_vendors,
        ingredients = created_ingredients,
        recipes = created_recipes,
        "Applied seed"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_config() -> SeedConfig {
        serde_json::from_value(serde_json::json!({
            "accounts": [
                {"email": "admin@foo.com", "password": "changeme", "role": "ADMIN"},
                {"email": "foodmart@foo.com", "password": "changeme", "role": "VENDOR"},
                {"email": "john@foo.com", "password": "changeme", "name": "John",
                 "dietary_restrictions": ["Vegetarian"]}
            ],
            "vendors": [
                {"owner": "foodmart@foo.com", "name": "Foodmart",
                 "address": "123 Main St", "hours": "9-5"}
            ],
            "ingredients": [
                {"vendor": "Foodmart", "name": "Mozzarella", "price": 4.5, "size": "8 oz"},
                {"vendor": "Nowhere Grocers", "name": "Saffron", "price": 12.0}
            ],
            "recipes": [
                {"name": "The Grinch", "owner": "john@foo.com",
                 "ingredients": "Green Eggs, Ham", "tags": ["Holiday"]}
            ]
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn seed_creates_entities_and_skips_unknown_vendor() {
        let state = AppState::new_in_memory().await;

        apply_seed(&state, sample_config()).await.unwrap();

        assert_eq!(state.users.count_users().await.unwrap(), 3);
        assert_eq!(state.vendors.count_vendors().await.unwrap(), 1);
        assert_eq!(state.recipes.count_recipes().await.unwrap(), 1);

        let admin = state
            .users
            .get_user_by_email("admin@foo.com")
            .await
            .unwrap()
            .unwrap();
        assert!(admin.role.is_admin());

        // The Saffron listing referenced an unknown vendor and was skipped.
        let vendor = state
            .vendors
            .get_vendor_by_name("Foodmart")
            .await
            .unwrap()
            .unwrap();
        let listings = state
            .ingredients
            .list_ingredients_for_vendor(vendor.id)
            .await
            .unwrap();
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].name, "Mozzarella");
    }

    #[tokio::test]
    async fn seed_is_idempotent() {
        let state = AppState::new_in_memory().await;

        apply_seed(&state, sample_config()).await.unwrap();
        apply_seed(&state, sample_config()).await.unwrap();

        assert_eq!(state.users.count_users().await.unwrap(), 3);
        assert_eq!(state.vendors.count_vendors().await.unwrap(), 1);
        assert_eq!(state.recipes.count_recipes().await.unwrap(), 1);

        let vendor = state
            .vendors
            .get_vendor_by_name("Foodmart")
            .await
            .unwrap()
            .unwrap();
        let listings = state
            .ingredients
            .list_ingredients_for_vendor(vendor.id)
            .await
            .unwrap();
        assert_eq!(listings.len(), 1);
    }

    #[tokio::test]
    async fn seed_passwords_are_hashed() {
        let state = AppState::new_in_memory().await;
        apply_seed(&state, sample_config()).await.unwrap();

        let user = state
            .users
            .get_user_by_email("john@foo.com")
            .await
            .unwrap()
            .unwrap();
        assert_ne!(user.password_hash, "changeme");
        assert!(ovenlovin_auth::verify_password("changeme", &user.password_hash));
    }

    #[tokio::test]
    async fn seed_rejects_unknown_role() {
        let state = AppState::new_in_memory().await;
        let config: SeedConfig = serde_json::from_value(serde_json::json!({
            "accounts": [{"email": "x@foo.com", "password": "pw", "role": "SUPERUSER"}]
        }))
        .unwrap();

        assert!(apply_seed(&state, config).await.is_err());
    }
}
