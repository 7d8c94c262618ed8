//! SQLite repository implementation.
//!
//! Implements the repository traits from `ovenlovin_core::storage` using SQLite.

use async_trait::async_trait;
use tokio_rusqlite::Connection;
use uuid::Uuid;

use ovenlovin_core::media::UploadedImage;
use ovenlovin_core::pantry::{Ingredient, Vendor};
use ovenlovin_core::recipe::{Recipe, Review};
use ovenlovin_core::storage::{
    FavoriteRepository, ImageRepository, IngredientRepository, RecipeRepository, RepositoryError,
    Result, ReviewRepository, SiteStats, UserRepository, VendorRepository, VisitRepository,
};
use ovenlovin_core::user::{Role, User};

use super::conversions::{
    format_datetime, role_to_string, row_to_image, row_to_ingredient, row_to_recipe, row_to_review,
    row_to_user, row_to_vendor, string_list_to_json,
};
use super::error::{map_tokio_rusqlite_error, map_tokio_rusqlite_error_with_id};
use super::schema;

/// Helper to wrap rusqlite errors for tokio_rusqlite closures.
fn wrap_err(e: rusqlite::Error) -> tokio_rusqlite::Error {
    tokio_rusqlite::Error::Rusqlite(e)
}

/// SQLite-based repository implementation.
///
/// Provides async access to SQLite storage for all entity types.
pub struct SqliteRepository {
    conn: Connection,
}

impl SqliteRepository {
    /// Creates a new repository with a file-based database.
    ///
    /// The database file will be created if it doesn't exist.
    /// Schema tables are created automatically.
    pub async fn new(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    /// Creates a new repository with an in-memory database.
    ///
    /// Useful for testing - data is lost when the connection is dropped.
    pub async fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    /// Initialize the database schema.
    async fn init_schema(conn: &Connection) -> Result<()> {
        conn.call(|conn| {
            conn.execute_batch(schema::CREATE_TABLES)
                .map_err(wrap_err)?;
            Ok(())
        })
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }
}

// ============================================================================
// UserRepository implementation
// ============================================================================

#[async_trait]
impl UserRepository for SqliteRepository {
    async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
        let id_str = id.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(schema::SELECT_USER_BY_ID).map_err(wrap_err)?;
                match stmt.query_row([&id_str], row_to_user) {
                    Ok(user) => Ok(Some(user)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(wrap_err(e)),
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "User", id.to_string()))
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let email = email.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_USER_BY_EMAIL)
                    .map_err(wrap_err)?;
                match stmt.query_row([&email], row_to_user) {
                    Ok(user) => Ok(Some(user)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(wrap_err(e)),
                }
            })
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        self.conn
            .call(|conn| {
                let mut stmt = conn.prepare(schema::SELECT_ALL_USERS).map_err(wrap_err)?;
                let rows = stmt.query_map([], row_to_user).map_err(wrap_err)?;

                let mut users = Vec::new();
                for row_result in rows {
                    users.push(row_result.map_err(wrap_err)?);
                }
                Ok(users)
            })
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }

    async fn create_user(&self, user: &User) -> Result<()> {
        let id = user.id.to_string();
        let email = user.email.clone();
        let password_hash = user.password_hash.clone();
        let role = role_to_string(&user.role).to_string();
        let name = user.name.clone();
        let image = user.image.clone();
        let dietary = string_list_to_json(&user.dietary_restrictions)?;
        let created_at = format_datetime(&user.created_at);
        let updated_at = format_datetime(&user.updated_at);
        let user_email = user.email.clone();

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_USER,
                    rusqlite::params![
                        id,
                        email,
                        password_hash,
                        role,
                        name,
                        image,
                        dietary,
                        created_at,
                        updated_at
                    ],
                )
                .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "User", user_email))
    }

    async fn update_user(&self, user: &User) -> Result<()> {
        let id = user.id.to_string();
        let email = user.email.clone();
        let name = user.name.clone();
        let image = user.image.clone();
        let dietary = string_list_to_json(&user.dietary_restrictions)?;
        let updated_at = format_datetime(&user.updated_at);
        let user_id = user.id.to_string();

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(
                        schema::UPDATE_USER,
                        rusqlite::params![id, email, name, image, dietary, updated_at],
                    )
                    .map_err(wrap_err)?;
                if rows == 0 {
                    Err(wrap_err(rusqlite::Error::QueryReturnedNoRows))
                } else {
                    Ok(())
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "User", user_id))
    }

    async fn update_user_role(&self, id: Uuid, role: Role) -> Result<()> {
        let id_str = id.to_string();
        let role_str = role_to_string(&role).to_string();
        let updated_at = format_datetime(&chrono::Utc::now());

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(
                        schema::UPDATE_USER_ROLE,
                        rusqlite::params![id_str, role_str, updated_at],
                    )
                    .map_err(wrap_err)?;
                if rows == 0 {
                    Err(wrap_err(rusqlite::Error::QueryReturnedNoRows))
                } else {
                    Ok(())
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "User", id.to_string()))
    }

    async fn update_user_password(&self, id: Uuid, password_hash: &str) -> Result<()> {
        let id_str = id.to_string();
        let password_hash = password_hash.to_string();
        let updated_at = format_datetime(&chrono::Utc::now());

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(
                        schema::UPDATE_USER_PASSWORD,
                        rusqlite::params![id_str, password_hash, updated_at],
                    )
                    .map_err(wrap_err)?;
                if rows == 0 {
                    Err(wrap_err(rusqlite::Error::QueryReturnedNoRows))
                } else {
                    Ok(())
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "User", id.to_string()))
    }

    async fn delete_user(&self, id: Uuid) -> Result<()> {
        let id_str = id.to_string();

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(schema::DELETE_USER, [&id_str])
                    .map_err(wrap_err)?;
                if rows == 0 {
                    Err(wrap_err(rusqlite::Error::QueryReturnedNoRows))
                } else {
                    Ok(())
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "User", id.to_string()))
    }

    async fn count_users(&self) -> Result<u64> {
        self.conn
            .call(|conn| {
                conn.query_row(schema::COUNT_USERS, [], |row| row.get::<_, i64>(0))
                    .map_err(wrap_err)
            })
            .await
            .map(|n| n.max(0) as u64)
            .map_err(|e| map_tokio_rusqlite_error(e, "User"))
    }
}

// ============================================================================
// RecipeRepository implementation
// ============================================================================

#[async_trait]
impl RecipeRepository for SqliteRepository {
    async fn get_recipe(&self, id: Uuid) -> Result<Option<Recipe>> {
        let id_str = id.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_RECIPE_BY_ID)
                    .map_err(wrap_err)?;
                match stmt.query_row([&id_str], row_to_recipe) {
                    Ok(recipe) => Ok(Some(recipe)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(wrap_err(e)),
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Recipe", id.to_string()))
    }

    async fn list_recipes(&self) -> Result<Vec<Recipe>> {
        self.conn
            .call(|conn| {
                let mut stmt = conn.prepare(schema::SELECT_ALL_RECIPES).map_err(wrap_err)?;
                let rows = stmt.query_map([], row_to_recipe).map_err(wrap_err)?;

                let mut recipes = Vec::new();
                for row_result in rows {
                    recipes.push(row_result.map_err(wrap_err)?);
                }
                Ok(recipes)
            })
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }

    async fn list_recipes_by_owner(&self, owner: &str) -> Result<Vec<Recipe>> {
        let owner = owner.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_RECIPES_BY_OWNER)
                    .map_err(wrap_err)?;
                let rows = stmt.query_map([&owner], row_to_recipe).map_err(wrap_err)?;

                let mut recipes = Vec::new();
                for row_result in rows {
                    recipes.push(row_result.map_err(wrap_err)?);
                }
                Ok(recipes)
            })
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }

    async fn list_favorite_recipes(&self, user_id: Uuid) -> Result<Vec<Recipe>> {
        let user_id_str = user_id.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_FAVORITE_RECIPES)
                    .map_err(wrap_err)?;
                let rows = stmt
                    .query_map([&user_id_str], row_to_recipe)
                    .map_err(wrap_err)?;

                let mut recipes = Vec::new();
                for row_result in rows {
                    recipes.push(row_result.map_err(wrap_err)?);
                }
                Ok(recipes)
            })
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }

    async fn create_recipe(&self, recipe: &Recipe) -> Result<()> {
        let id = recipe.id.to_string();
        let name = recipe.name.clone();
        let image = recipe.image.clone();
        let ingredients = recipe.ingredients.clone();
        let steps = recipe.steps.clone();
        let tags = string_list_to_json(&recipe.tags)?;
        let dietary = string_list_to_json(&recipe.dietary_restrictions)?;
        let owner = recipe.owner.clone();
        let created_at = format_datetime(&recipe.created_at);
        let updated_at = format_datetime(&recipe.updated_at);
        let recipe_id = recipe.id.to_string();

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_RECIPE,
                    rusqlite::params![
                        id,
                        name,
                        image,
                        ingredients,
                        steps,
                        tags,
                        dietary,
                        owner,
                        created_at,
                        updated_at
                    ],
                )
                .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Recipe", recipe_id))
    }

    async fn update_recipe(&self, recipe: &Recipe) -> Result<()> {
        let id = recipe.id.to_string();
        let name = recipe.name.clone();
        let image = recipe.image.clone();
        let ingredients = recipe.ingredients.clone();
        let steps = recipe.steps.clone();
        let tags = string_list_to_json(&recipe.tags)?;
        let dietary = string_list_to_json(&recipe.dietary_restrictions)?;
        let updated_at = format_datetime(&recipe.updated_at);
        let recipe_id = recipe.id.to_string();

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(
                        schema::UPDATE_RECIPE,
                        rusqlite::params![
                            id,
                            name,
                            image,
                            ingredients,
                            steps,
                            tags,
                            dietary,
                            updated_at
                        ],
                    )
                    .map_err(wrap_err)?;
                if rows == 0 {
                    Err(wrap_err(rusqlite::Error::QueryReturnedNoRows))
                } else {
                    Ok(())
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Recipe", recipe_id))
    }

    async fn delete_recipe(&self, id: Uuid) -> Result<()> {
        let id_str = id.to_string();

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(schema::DELETE_RECIPE, [&id_str])
                    .map_err(wrap_err)?;
                if rows == 0 {
                    Err(wrap_err(rusqlite::Error::QueryReturnedNoRows))
                } else {
                    Ok(())
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Recipe", id.to_string()))
    }

    async fn count_recipes(&self) -> Result<u64> {
        self.conn
            .call(|conn| {
                conn.query_row(schema::COUNT_RECIPES, [], |row| row.get::<_, i64>(0))
                    .map_err(wrap_err)
            })
            .await
            .map(|n| n.max(0) as u64)
            .map_err(|e| map_tokio_rusqlite_error(e, "Recipe"))
    }
}

// ============================================================================
// ReviewRepository implementation
// ============================================================================

#[async_trait]
impl ReviewRepository for SqliteRepository {
    async fn get_review(&self, id: Uuid) -> Result<Option<Review>> {
        let id_str = id.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_REVIEW_BY_ID)
                    .map_err(wrap_err)?;
                match stmt.query_row([&id_str], row_to_review) {
                    Ok(review) => Ok(Some(review)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(wrap_err(e)),
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Review", id.to_string()))
    }

    async fn list_reviews_for_recipe(&self, recipe_id: Uuid) -> Result<Vec<Review>> {
        let recipe_id_str = recipe_id.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_REVIEWS_BY_RECIPE)
                    .map_err(wrap_err)?;
                let rows = stmt
                    .query_map([&recipe_id_str], row_to_review)
                    .map_err(wrap_err)?;

                let mut reviews = Vec::new();
                for row_result in rows {
                    reviews.push(row_result.map_err(wrap_err)?);
                }
                Ok(reviews)
            })
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }

    async fn create_review(&self, review: &Review) -> Result<()> {
        let id = review.id.to_string();
        let recipe_id = review.recipe_id.to_string();
        let reviewer = review.reviewer.clone();
        let owner = review.owner.clone();
        let rating = review.rating;
        let comment = review.comment.clone();
        let created_at = format_datetime(&review.created_at);
        let review_id = review.id.to_string();

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_REVIEW,
                    rusqlite::params![id, recipe_id, reviewer, owner, rating, comment, created_at],
                )
                .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Review", review_id))
    }

    async fn delete_review(&self, id: Uuid) -> Result<()> {
        let id_str = id.to_string();

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(schema::DELETE_REVIEW, [&id_str])
                    .map_err(wrap_err)?;
                if rows == 0 {
                    Err(wrap_err(rusqlite::Error::QueryReturnedNoRows))
                } else {
                    Ok(())
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Review", id.to_string()))
    }

    async fn delete_reviews(&self, ids: &[Uuid]) -> Result<()> {
        if ids.is_empty() {
            return Ok(());
        }

        let id_strs: Vec<String> = ids.iter().map(Uuid::to_string).collect();

        self.conn
            .call(move |conn| {
                let placeholders = vec!["?"; id_strs.len()].join(", ");
                let sql = format!("DELETE FROM reviews WHERE id IN ({placeholders})");
                conn.execute(&sql, rusqlite::params_from_iter(id_strs.iter()))
                    .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Review"))
    }

    async fn delete_reviews_for_recipe(&self, recipe_id: Uuid) -> Result<()> {
        let recipe_id_str = recipe_id.to_string();

        self.conn
            .call(move |conn| {
                conn.execute(schema::DELETE_REVIEWS_BY_RECIPE, [&recipe_id_str])
                    .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Review"))
    }
}

// ============================================================================
// FavoriteRepository implementation
// ============================================================================

#[async_trait]
impl FavoriteRepository for SqliteRepository {
    async fn is_favorited(&self, user_id: Uuid, recipe_id: Uuid) -> Result<bool> {
        let user_id_str = user_id.to_string();
        let recipe_id_str = recipe_id.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(schema::SELECT_FAVORITE).map_err(wrap_err)?;
                match stmt.query_row([&user_id_str, &recipe_id_str], |row| row.get::<_, i64>(0)) {
                    Ok(_) => Ok(true),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(false),
                    Err(e) => Err(wrap_err(e)),
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Favorite"))
    }

    async fn favorited_recipe_ids(&self, user_id: Uuid) -> Result<Vec<Uuid>> {
        let user_id_str = user_id.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_FAVORITE_RECIPE_IDS)
                    .map_err(wrap_err)?;
                let rows = stmt
                    .query_map([&user_id_str], |row| row.get::<_, String>(0))
                    .map_err(wrap_err)?;

                let mut ids = Vec::new();
                for row_result in rows {
                    let id_str = row_result.map_err(wrap_err)?;
                    let id = id_str.parse::<Uuid>().map_err(|e| {
                        wrap_err(rusqlite::Error::FromSqlConversionFailure(
                            0,
                            rusqlite::types::Type::Text,
                            Box::new(e),
                        ))
                    })?;
                    ids.push(id);
                }
                Ok(ids)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Favorite"))
    }

    async fn add_favorite(&self, user_id: Uuid, recipe_id: Uuid) -> Result<()> {
        let user_id_str = user_id.to_string();
        let recipe_id_str = recipe_id.to_string();
        let created_at = format_datetime(&chrono::Utc::now());
        let favorite_id = format!("{user_id}:{recipe_id}");

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_FAVORITE,
                    rusqlite::params![user_id_str, recipe_id_str, created_at],
                )
                .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Favorite", favorite_id))
    }

    async fn remove_favorite(&self, user_id: Uuid, recipe_id: Uuid) -> Result<()> {
        let user_id_str = user_id.to_string();
        let recipe_id_str = recipe_id.to_string();
        let favorite_id = format!("{user_id}:{recipe_id}");

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(schema::DELETE_FAVORITE, [&user_id_str, &recipe_id_str])
                    .map_err(wrap_err)?;
                if rows == 0 {
                    Err(wrap_err(rusqlite::Error::QueryReturnedNoRows))
                } else {
                    Ok(())
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Favorite", favorite_id))
    }

    async fn delete_favorites_for_recipe(&self, recipe_id: Uuid) -> Result<()> {
        let recipe_id_str = recipe_id.to_string();

        self.conn
            .call(move |conn| {
                conn.execute(schema::DELETE_FAVORITES_BY_RECIPE, [&recipe_id_str])
                    .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Favorite"))
    }
}

// ============================================================================
// VendorRepository implementation
// ============================================================================

#[async_trait]
impl VendorRepository for SqliteRepository {
    async fn get_vendor(&self, id: Uuid) -> Result<Option<Vendor>> {
        let id_str = id.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_VENDOR_BY_ID)
                    .map_err(wrap_err)?;
                match stmt.query_row([&id_str], row_to_vendor) {
                    Ok(vendor) => Ok(Some(vendor)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(wrap_err(e)),
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Vendor", id.to_string()))
    }

    async fn get_vendor_by_owner(&self, owner: &str) -> Result<Option<Vendor>> {
        let owner = owner.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_VENDOR_BY_OWNER)
                    .map_err(wrap_err)?;
                match stmt.query_row([&owner], row_to_vendor) {
                    Ok(vendor) => Ok(Some(vendor)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(wrap_err(e)),
                }
            })
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }

    async fn get_vendor_by_name(&self, name: &str) -> Result<Option<Vendor>> {
        let name = name.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_VENDOR_BY_NAME)
                    .map_err(wrap_err)?;
                match stmt.query_row([&name], row_to_vendor) {
                    Ok(vendor) => Ok(Some(vendor)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(wrap_err(e)),
                }
            })
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }

    async fn list_vendors(&self) -> Result<Vec<Vendor>> {
        self.conn
            .call(|conn| {
                let mut stmt = conn.prepare(schema::SELECT_ALL_VENDORS).map_err(wrap_err)?;
                let rows = stmt.query_map([], row_to_vendor).map_err(wrap_err)?;

                let mut vendors = Vec::new();
                for row_result in rows {
                    vendors.push(row_result.map_err(wrap_err)?);
                }
                Ok(vendors)
            })
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }

    async fn create_vendor(&self, vendor: &Vendor) -> Result<()> {
        let id = vendor.id.to_string();
        let owner = vendor.owner.clone();
        let name = vendor.name.clone();
        let address = vendor.address.clone();
        let hours = vendor.hours.clone();
        let created_at = format_datetime(&vendor.created_at);
        let updated_at = format_datetime(&vendor.updated_at);
        let vendor_id = vendor.id.to_string();

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_VENDOR,
                    rusqlite::params![id, owner, name, address, hours, created_at, updated_at],
                )
                .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Vendor", vendor_id))
    }

    async fn update_vendor(&self, vendor: &Vendor) -> Result<()> {
        let id = vendor.id.to_string();
        let name = vendor.name.clone();
        let address = vendor.address.clone();
        let hours = vendor.hours.clone();
        let updated_at = format_datetime(&vendor.updated_at);
        let vendor_id = vendor.id.to_string();

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(
                        schema::UPDATE_VENDOR,
                        rusqlite::params![id, name, address, hours, updated_at],
                    )
                    .map_err(wrap_err)?;
                if rows == 0 {
                    Err(wrap_err(rusqlite::Error::QueryReturnedNoRows))
                } else {
                    Ok(())
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Vendor", vendor_id))
    }

    async fn delete_vendor(&self, id: Uuid) -> Result<()> {
        let id_str = id.to_string();

        // Delete the vendor's ingredients first, then the vendor itself.
        self.conn
            .call(move |conn| {
                let tx = conn.transaction().map_err(wrap_err)?;
                tx.execute(schema::DELETE_INGREDIENTS_BY_VENDOR, [&id_str])
                    .map_err(wrap_err)?;
                let rows = tx
                    .execute(schema::DELETE_VENDOR, [&id_str])
                    .map_err(wrap_err)?;
                if rows == 0 {
                    return Err(wrap_err(rusqlite::Error::QueryReturnedNoRows));
                }
                tx.commit().map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Vendor", id.to_string()))
    }

    async fn count_vendors(&self) -> Result<u64> {
        self.conn
            .call(|conn| {
                conn.query_row(schema::COUNT_VENDORS, [], |row| row.get::<_, i64>(0))
                    .map_err(wrap_err)
            })
            .await
            .map(|n| n.max(0) as u64)
            .map_err(|e| map_tokio_rusqlite_error(e, "Vendor"))
    }
}

// ============================================================================
// IngredientRepository implementation
// ============================================================================

#[async_trait]
impl IngredientRepository for SqliteRepository {
    async fn get_ingredient(&self, id: Uuid) -> Result<Option<Ingredient>> {
        let id_str = id.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_INGREDIENT_BY_ID)
                    .map_err(wrap_err)?;
                match stmt.query_row([&id_str], row_to_ingredient) {
                    Ok(ingredient) => Ok(Some(ingredient)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(wrap_err(e)),
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Ingredient", id.to_string()))
    }

    async fn list_ingredients_for_vendor(&self, vendor_id: Uuid) -> Result<Vec<Ingredient>> {
        let vendor_id_str = vendor_id.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_INGREDIENTS_BY_VENDOR)
                    .map_err(wrap_err)?;
                let rows = stmt
                    .query_map([&vendor_id_str], row_to_ingredient)
                    .map_err(wrap_err)?;

                let mut ingredients = Vec::new();
                for row_result in rows {
                    ingredients.push(row_result.map_err(wrap_err)?);
                }
                Ok(ingredients)
            })
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }

    async fn list_available_ingredients(&self) -> Result<Vec<Ingredient>> {
        self.conn
            .call(|conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_AVAILABLE_INGREDIENTS)
                    .map_err(wrap_err)?;
                let rows = stmt.query_map([], row_to_ingredient).map_err(wrap_err)?;

                let mut ingredients = Vec::new();
                for row_result in rows {
                    ingredients.push(row_result.map_err(wrap_err)?);
                }
                Ok(ingredients)
            })
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }

    async fn create_ingredient(&self, ingredient: &Ingredient) -> Result<()> {
        let id = ingredient.id.to_string();
        let vendor_id = ingredient.vendor_id.to_string();
        let owner = ingredient.owner.clone();
        let name = ingredient.name.clone();
        let price = ingredient.price;
        let size = ingredient.size.clone();
        let available = ingredient.available;
        let created_at = format_datetime(&ingredient.created_at);
        let ingredient_id = ingredient.id.to_string();

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_INGREDIENT,
                    rusqlite::params![id, vendor_id, owner, name, price, size, available, created_at],
                )
                .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Ingredient", ingredient_id))
    }

    async fn update_ingredient(&self, ingredient: &Ingredient) -> Result<()> {
        let id = ingredient.id.to_string();
        let name = ingredient.name.clone();
        let price = ingredient.price;
        let size = ingredient.size.clone();
        let available = ingredient.available;
        let ingredient_id = ingredient.id.to_string();

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(
                        schema::UPDATE_INGREDIENT,
                        rusqlite::params![id, name, price, size, available],
                    )
                    .map_err(wrap_err)?;
                if rows == 0 {
                    Err(wrap_err(rusqlite::Error::QueryReturnedNoRows))
                } else {
                    Ok(())
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Ingredient", ingredient_id))
    }

    async fn delete_ingredient(&self, id: Uuid) -> Result<()> {
        let id_str = id.to_string();

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(schema::DELETE_INGREDIENT, [&id_str])
                    .map_err(wrap_err)?;
                if rows == 0 {
                    Err(wrap_err(rusqlite::Error::QueryReturnedNoRows))
                } else {
                    Ok(())
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Ingredient", id.to_string()))
    }
}

// ============================================================================
// ImageRepository implementation
// ============================================================================

#[async_trait]
impl ImageRepository for SqliteRepository {
    async fn get_image(&self, id: Uuid) -> Result<Option<UploadedImage>> {
        let id_str = id.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(schema::SELECT_IMAGE_BY_ID).map_err(wrap_err)?;
                match stmt.query_row([&id_str], row_to_image) {
                    Ok(image) => Ok(Some(image)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(wrap_err(e)),
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "UploadedImage", id.to_string()))
    }

    async fn list_images_by_owner(&self, owner: &str) -> Result<Vec<UploadedImage>> {
        let owner = owner.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_IMAGES_BY_OWNER)
                    .map_err(wrap_err)?;
                let rows = stmt.query_map([&owner], row_to_image).map_err(wrap_err)?;

                let mut images = Vec::new();
                for row_result in rows {
                    images.push(row_result.map_err(wrap_err)?);
                }
                Ok(images)
            })
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }

    async fn create_image(&self, image: &UploadedImage) -> Result<()> {
        let id = image.id.to_string();
        let url = image.url.clone();
        let pathname = image.pathname.clone();
        let size = image.size as i64;
        let owner = image.owner.clone();
        let created_at = format_datetime(&image.created_at);
        let image_id = image.id.to_string();

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_IMAGE,
                    rusqlite::params![id, url, pathname, size, owner, created_at],
                )
                .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "UploadedImage", image_id))
    }

    async fn delete_image(&self, id: Uuid) -> Result<()> {
        let id_str = id.to_string();

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(schema::DELETE_IMAGE, [&id_str])
                    .map_err(wrap_err)?;
                if rows == 0 {
                    Err(wrap_err(rusqlite::Error::QueryReturnedNoRows))
                } else {
                    Ok(())
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "UploadedImage", id.to_string()))
    }

    async fn delete_images_by_url(&self, url: &str) -> Result<()> {
        let url = url.to_string();

        self.conn
            .call(move |conn| {
                conn.execute(schema::DELETE_IMAGES_BY_URL, [&url])
                    .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "UploadedImage"))
    }
}

// ============================================================================
// VisitRepository implementation
// ============================================================================

#[async_trait]
impl VisitRepository for SqliteRepository {
    async fn record_visit_and_count(&self, path: &str) -> Result<SiteStats> {
        let path = path.to_string();
        let visited_at = format_datetime(&chrono::Utc::now());

        // Insert and counts run inside one transaction so the returned
        // snapshot includes the visit just recorded.
        self.conn
            .call(move |conn| {
                let tx = conn.transaction().map_err(wrap_err)?;
                tx.execute(schema::INSERT_VISIT, rusqlite::params![path, visited_at])
                    .map_err(wrap_err)?;

                let recipes: i64 = tx
                    .query_row(schema::COUNT_RECIPES, [], |row| row.get(0))
                    .map_err(wrap_err)?;
                let users: i64 = tx
                    .query_row(schema::COUNT_USERS, [], |row| row.get(0))
                    .map_err(wrap_err)?;
                let visits: i64 = tx
                    .query_row(schema::COUNT_VISITS, [], |row| row.get(0))
                    .map_err(wrap_err)?;

                tx.commit().map_err(wrap_err)?;

                Ok(SiteStats {
                    recipes: recipes.max(0) as u64,
                    users: users.max(0) as u64,
                    visits: visits.max(0) as u64,
                })
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "PageVisit"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn repo() -> SqliteRepository {
        SqliteRepository::new_in_memory().await.unwrap()
    }

    fn user(email: &str) -> User {
        User::new(email, "hash")
    }

    #[tokio::test]
    async fn user_create_and_get_round_trip() {
        let repo = repo().await;
        let user = user("john@foo.com").with_name("John");

        repo.create_user(&user).await.unwrap();

        let fetched = repo.get_user(user.id).await.unwrap().unwrap();
        assert_eq!(fetched.email, "john@foo.com");
        assert_eq!(fetched.name, "John");
        assert_eq!(fetched.role, Role::User);

        let by_email = repo.get_user_by_email("john@foo.com").await.unwrap();
        assert!(by_email.is_some());
    }

    #[tokio::test]
    async fn duplicate_email_is_already_exists() {
        let repo = repo().await;
        repo.create_user(&user("john@foo.com")).await.unwrap();

        let result = repo.create_user(&user("john@foo.com")).await;
        assert!(matches!(
            result,
            Err(RepositoryError::AlreadyExists { .. })
        ));
    }

    #[tokio::test]
    async fn update_role_persists() {
        let repo = repo().await;
        let user = user("admin@foo.com");
        repo.create_user(&user).await.unwrap();

        repo.update_user_role(user.id, Role::Admin).await.unwrap();

        let fetched = repo.get_user(user.id).await.unwrap().unwrap();
        assert_eq!(fetched.role, Role::Admin);
    }

    #[tokio::test]
    async fn delete_missing_user_is_not_found() {
        let repo = repo().await;
        let result = repo.delete_user(Uuid::new_v4()).await;
        assert!(matches!(result, Err(RepositoryError::NotFound { .. })));
    }

    #[tokio::test]
    async fn recipe_round_trip_keeps_lists() {
        let repo = repo().await;
        let mut recipe = Recipe::new("The Grinch", "john@foo.com");
        recipe.ingredients = "Green Eggs, Ham".to_string();
        recipe.tags = vec!["Holiday".to_string(), "Breakfast".to_string()];
        recipe.dietary_restrictions = vec!["Vegetarian".to_string()];

        repo.create_recipe(&recipe).await.unwrap();

        let fetched = repo.get_recipe(recipe.id).await.unwrap().unwrap();
        assert_eq!(fetched.tags, recipe.tags);
        assert_eq!(fetched.dietary_restrictions, recipe.dietary_restrictions);
    }

    #[tokio::test]
    async fn favorites_add_check_remove() {
        let repo = repo().await;
        let user = user("fan@foo.com");
        repo.create_user(&user).await.unwrap();
        let recipe = Recipe::new("Overnight Oats", "emma43@hawaii.edu");
        repo.create_recipe(&recipe).await.unwrap();

        assert!(!repo.is_favorited(user.id, recipe.id).await.unwrap());

        repo.add_favorite(user.id, recipe.id).await.unwrap();
        assert!(repo.is_favorited(user.id, recipe.id).await.unwrap());
        assert_eq!(
            repo.favorited_recipe_ids(user.id).await.unwrap(),
            vec![recipe.id]
        );
        assert_eq!(
            repo.list_favorite_recipes(user.id).await.unwrap().len(),
            1
        );

        repo.remove_favorite(user.id, recipe.id).await.unwrap();
        assert!(!repo.is_favorited(user.id, recipe.id).await.unwrap());
    }

    #[tokio::test]
    async fn duplicate_favorite_is_already_exists() {
        let repo = repo().await;
        let user = user("fan@foo.com");
        repo.create_user(&user).await.unwrap();
        let recipe = Recipe::new("Overnight Oats", "emma43@hawaii.edu");
        repo.create_recipe(&recipe).await.unwrap();

        repo.add_favorite(user.id, recipe.id).await.unwrap();
        let result = repo.add_favorite(user.id, recipe.id).await;
        assert!(matches!(
            result,
            Err(RepositoryError::AlreadyExists { .. })
        ));
    }

    #[tokio::test]
    async fn vendor_delete_cascades_to_ingredients() {
        let repo = repo().await;
        let vendor = Vendor::new("foodmart@foo.com", "Foodmart", "123 Main St", "9-5");
        repo.create_vendor(&vendor).await.unwrap();

        let ingredient = Ingredient {
            id: Uuid::new_v4(),
            vendor_id: vendor.id,
            owner: vendor.owner.clone(),
            name: "Mozzarella".to_string(),
            price: 4.50,
            size: "8 oz".to_string(),
            available: true,
            created_at: chrono::Utc::now(),
        };
        repo.create_ingredient(&ingredient).await.unwrap();

        repo.delete_vendor(vendor.id).await.unwrap();

        assert!(repo.get_vendor(vendor.id).await.unwrap().is_none());
        assert!(repo.get_ingredient(ingredient.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_vendor_owner_is_already_exists() {
        let repo = repo().await;
        let first = Vendor::new("foodmart@foo.com", "Foodmart", "123 Main St", "9-5");
        repo.create_vendor(&first).await.unwrap();

        let second = Vendor::new("foodmart@foo.com", "Other Name", "456 Side St", "9-5");
        let result = repo.create_vendor(&second).await;
        assert!(matches!(
            result,
            Err(RepositoryError::AlreadyExists { .. })
        ));
    }

    #[tokio::test]
    async fn available_ingredients_excludes_unavailable() {
        let repo = repo().await;
        let vendor = Vendor::new("foodmart@foo.com", "Foodmart", "123 Main St", "9-5");
        repo.create_vendor(&vendor).await.unwrap();

        for (name, available) in [("Eggs", true), ("Ham", false)] {
            let ingredient = Ingredient {
                id: Uuid::new_v4(),
                vendor_id: vendor.id,
                owner: vendor.owner.clone(),
                name: name.to_string(),
                price: 2.0,
                size: "1".to_string(),
                available,
                created_at: chrono::Utc::now(),
            };
            repo.create_ingredient(&ingredient).await.unwrap();
        }

        let available = repo.list_available_ingredients().await.unwrap();
        assert_eq!(available.len(), 1);
        assert_eq!(available[0].name, "Eggs");
    }

    #[tokio::test]
    async fn reviews_bulk_delete() {
        let repo = repo().await;
        let recipe = Recipe::new("Mug Cake", "mia@foo.com");
        repo.create_recipe(&recipe).await.unwrap();

        let mut ids = Vec::new();
        for rating in [5, 4, 3] {
            let review = Review {
                id: Uuid::new_v4(),
                recipe_id: recipe.id,
                reviewer: "Anonymous".to_string(),
                owner: None,
                rating,
                comment: String::new(),
                created_at: chrono::Utc::now(),
            };
            repo.create_review(&review).await.unwrap();
            ids.push(review.id);
        }

        repo.delete_reviews(&ids[..2]).await.unwrap();

        let remaining = repo.list_reviews_for_recipe(recipe.id).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].rating, 3);
    }

    #[tokio::test]
    async fn visit_counter_counts_inserted_visit() {
        let repo = repo().await;

        let first = repo.record_visit_and_count("/").await.unwrap();
        assert_eq!(first.visits, 1);

        let second = repo.record_visit_and_count("/").await.unwrap();
        assert_eq!(second.visits, 2);
        assert_eq!(second.recipes, 0);
        assert_eq!(second.users, 0);
    }
}
