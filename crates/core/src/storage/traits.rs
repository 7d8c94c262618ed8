use async_trait::async_trait;
use uuid::Uuid;

use crate::media::UploadedImage;
use crate::pantry::{Ingredient, Vendor};
use crate::recipe::{Recipe, Review};
use crate::user::{Role, User};

use super::{Result, SiteStats};

/// Repository for user account operations.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Gets a user by their ID.
    async fn get_user(&self, id: Uuid) -> Result<Option<User>>;

    /// Gets a user by their email address.
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Lists all users.
    async fn list_users(&self) -> Result<Vec<User>>;

    /// Creates a new user.
    async fn create_user(&self, user: &User) -> Result<()>;

    /// Updates a user's profile fields (name, email, image, dietary restrictions).
    async fn update_user(&self, user: &User) -> Result<()>;

    /// Updates a user's role.
    async fn update_user_role(&self, id: Uuid, role: Role) -> Result<()>;

    /// Replaces a user's password hash.
    async fn update_user_password(&self, id: Uuid, password_hash: &str) -> Result<()>;

    /// Deletes a user by their ID.
    async fn delete_user(&self, id: Uuid) -> Result<()>;

    /// Counts all users.
    async fn count_users(&self) -> Result<u64>;
}

/// Repository for recipe operations.
#[async_trait]
pub trait RecipeRepository: Send + Sync {
    /// Gets a recipe by its ID.
    async fn get_recipe(&self, id: Uuid) -> Result<Option<Recipe>>;

    /// Lists all recipes, newest first.
    async fn list_recipes(&self) -> Result<Vec<Recipe>>;

    /// Lists recipes contributed by the given owner email.
    async fn list_recipes_by_owner(&self, owner: &str) -> Result<Vec<Recipe>>;

    /// Lists recipes the given user has favorited.
    async fn list_favorite_recipes(&self, user_id: Uuid) -> Result<Vec<Recipe>>;

    /// Creates a new recipe.
    async fn create_recipe(&self, recipe: &Recipe) -> Result<()>;

    /// Updates an existing recipe.
    async fn update_recipe(&self, recipe: &Recipe) -> Result<()>;

    /// Deletes a recipe by its ID.
    async fn delete_recipe(&self, id: Uuid) -> Result<()>;

    /// Counts all recipes.
    async fn count_recipes(&self) -> Result<u64>;
}

/// Repository for review operations.
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// Gets a review by its ID.
    async fn get_review(&self, id: Uuid) -> Result<Option<Review>>;

    /// Lists reviews for a recipe, newest first.
    async fn list_reviews_for_recipe(&self, recipe_id: Uuid) -> Result<Vec<Review>>;

    /// Creates a new review.
    async fn create_review(&self, review: &Review) -> Result<()>;

    /// Deletes a review by its ID.
    async fn delete_review(&self, id: Uuid) -> Result<()>;

    /// Deletes a batch of reviews by ID. Missing IDs are ignored.
    async fn delete_reviews(&self, ids: &[Uuid]) -> Result<()>;

    /// Deletes all reviews for a recipe.
    async fn delete_reviews_for_recipe(&self, recipe_id: Uuid) -> Result<()>;
}

/// Repository for favorite (user-recipe bookmark) operations.
#[async_trait]
pub trait FavoriteRepository: Send + Sync {
    /// Returns true if the user has favorited the recipe.
    async fn is_favorited(&self, user_id: Uuid, recipe_id: Uuid) -> Result<bool>;

    /// Lists the recipe IDs the user has favorited.
    async fn favorited_recipe_ids(&self, user_id: Uuid) -> Result<Vec<Uuid>>;

    /// Adds a favorite. Adding an existing favorite is an error.
    async fn add_favorite(&self, user_id: Uuid, recipe_id: Uuid) -> Result<()>;

    /// Removes a favorite.
    async fn remove_favorite(&self, user_id: Uuid, recipe_id: Uuid) -> Result<()>;

    /// Deletes all favorites referencing a recipe.
    async fn delete_favorites_for_recipe(&self, recipe_id: Uuid) -> Result<()>;
}

/// Repository for vendor operations.
#[async_trait]
pub trait VendorRepository: Send + Sync {
    /// Gets a vendor by its ID.
    async fn get_vendor(&self, id: Uuid) -> Result<Option<Vendor>>;

    /// Gets a vendor by its owner's email.
    async fn get_vendor_by_owner(&self, owner: &str) -> Result<Option<Vendor>>;

    /// Gets a vendor by its display name.
    async fn get_vendor_by_name(&self, name: &str) -> Result<Option<Vendor>>;

    /// Lists all vendors.
    async fn list_vendors(&self) -> Result<Vec<Vendor>>;

    /// Creates a new vendor.
    async fn create_vendor(&self, vendor: &Vendor) -> Result<()>;

    /// Updates an existing vendor.
    async fn update_vendor(&self, vendor: &Vendor) -> Result<()>;

    /// Deletes a vendor and all of its ingredient listings.
    async fn delete_vendor(&self, id: Uuid) -> Result<()>;

    /// Counts all vendors.
    async fn count_vendors(&self) -> Result<u64>;
}

/// Repository for vendor ingredient listings.
#[async_trait]
pub trait IngredientRepository: Send + Sync {
    /// Gets an ingredient by its ID.
    async fn get_ingredient(&self, id: Uuid) -> Result<Option<Ingredient>>;

    /// Lists all ingredients for a vendor.
    async fn list_ingredients_for_vendor(&self, vendor_id: Uuid) -> Result<Vec<Ingredient>>;

    /// Lists all currently available ingredients across vendors.
    async fn list_available_ingredients(&self) -> Result<Vec<Ingredient>>;

    /// Creates a new ingredient listing.
    async fn create_ingredient(&self, ingredient: &Ingredient) -> Result<()>;

    /// Updates an existing ingredient listing.
    async fn update_ingredient(&self, ingredient: &Ingredient) -> Result<()>;

    /// Deletes an ingredient listing.
    async fn delete_ingredient(&self, id: Uuid) -> Result<()>;
}

/// Repository for uploaded image metadata.
#[async_trait]
pub trait ImageRepository: Send + Sync {
    /// Gets an uploaded image by its ID.
    async fn get_image(&self, id: Uuid) -> Result<Option<UploadedImage>>;

    /// Lists images uploaded by the given owner, newest first.
    async fn list_images_by_owner(&self, owner: &str) -> Result<Vec<UploadedImage>>;

    /// Records a newly uploaded image.
    async fn create_image(&self, image: &UploadedImage) -> Result<()>;

    /// Deletes an image record by its ID.
    async fn delete_image(&self, id: Uuid) -> Result<()>;

    /// Deletes any image records with the given URL.
    async fn delete_images_by_url(&self, url: &str) -> Result<()>;
}

/// Repository for page-visit counters.
#[async_trait]
pub trait VisitRepository: Send + Sync {
    /// Records a visit to the given path and returns the current site
    /// counters, all within a single transaction.
    async fn record_visit_and_count(&self, path: &str) -> Result<SiteStats>;
}
