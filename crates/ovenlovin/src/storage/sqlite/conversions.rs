//! SQLite row conversion functions.
//!
//! Pure functions for converting between SQLite rows and domain types.
//! These are testable in isolation without database access.

use chrono::{DateTime, Utc};
use rusqlite::Row;
use uuid::Uuid;

use ovenlovin_core::media::UploadedImage;
use ovenlovin_core::pantry::{Ingredient, Vendor};
use ovenlovin_core::recipe::{Recipe, Review};
use ovenlovin_core::storage::RepositoryError;
use ovenlovin_core::user::{Role, User};

// ============================================================================
// User conversions
// ============================================================================

/// Convert a SQLite row to a User.
///
/// Expected columns: id, email, password_hash, role, name, image,
/// dietary_restrictions, created_at, updated_at
pub fn row_to_user(row: &Row) -> rusqlite::Result<User> {
    let id: String = row.get(0)?;
    let email: String = row.get(1)?;
    let password_hash: String = row.get(2)?;
    let role_str: String = row.get(3)?;
    let name: String = row.get(4)?;
    let image: Option<String> = row.get(5)?;
    let dietary_json: String = row.get(6)?;
    let created_at: String = row.get(7)?;
    let updated_at: String = row.get(8)?;

    Ok(User {
        id: parse_uuid(&id)?,
        email,
        password_hash,
        role: parse_role(&role_str)?,
        name,
        image,
        dietary_restrictions: json_to_string_list_internal(&dietary_json)?,
        created_at: parse_datetime(&created_at)?,
        updated_at: parse_datetime(&updated_at)?,
    })
}

/// Serialize Role to its stored string form.
pub fn role_to_string(role: &Role) -> &'static str {
    match role {
        Role::User => "USER",
        Role::Vendor => "VENDOR",
        Role::Admin => "ADMIN",
    }
}

// ============================================================================
// Recipe conversions
// ============================================================================

/// Convert a SQLite row to a Recipe.
///
/// Expected columns: id, name, image, ingredients, steps, tags,
/// dietary_restrictions, owner, created_at, updated_at
pub fn row_to_recipe(row: &Row) -> rusqlite::Result<Recipe> {
    let id: String = row.get(0)?;
    let name: String = row.get(1)?;
    let image: String = row.get(2)?;
    let ingredients: String = row.get(3)?;
    let steps: String = row.get(4)?;
    let tags_json: String = row.get(5)?;
    let dietary_json: String = row.get(6)?;
    let owner: String = row.get(7)?;
    let created_at: String = row.get(8)?;
    let updated_at: String = row.get(9)?;

    Ok(Recipe {
        id: parse_uuid(&id)?,
        name,
        image,
        ingredients,
        steps,
        tags: json_to_string_list_internal(&tags_json)?,
        dietary_restrictions: json_to_string_list_internal(&dietary_json)?,
        owner,
        created_at: parse_datetime(&created_at)?,
        updated_at: parse_datetime(&updated_at)?,
    })
}

// ============================================================================
// Review conversions
// ============================================================================

/// Convert a SQLite row to a Review.
///
/// Expected columns: id, recipe_id, reviewer, owner, rating, comment, created_at
pub fn row_to_review(row: &Row) -> rusqlite::Result<Review> {
    let id: String = row.get(0)?;
    let recipe_id: String = row.get(1)?;
    let reviewer: String = row.get(2)?;
    let owner: Option<String> = row.get(3)?;
    let rating: i32 = row.get(4)?;
    let comment: String = row.get(5)?;
    let created_at: String = row.get(6)?;

    Ok(Review {
        id: parse_uuid(&id)?,
        recipe_id: parse_uuid(&recipe_id)?,
        reviewer,
        owner,
        rating,
        comment,
        created_at: parse_datetime(&created_at)?,
    })
}

// ============================================================================
// Vendor and ingredient conversions
// ============================================================================

/// Convert a SQLite row to a Vendor.
///
/// Expected columns: id, owner, name, address, hours, created_at, updated_at
pub fn row_to_vendor(row: &Row) -> rusqlite::Result<Vendor> {
    let id: String = row.get(0)?;
    let owner: String = row.get(1)?;
    let name: String = row.get(2)?;
    let address: String = row.get(3)?;
    let hours: String = row.get(4)?;
    let created_at: String = row.get(5)?;
    let updated_at: String = row.get(6)?;

    Ok(Vendor {
        id: parse_uuid(&id)?,
        owner,
        name,
        address,
        hours,
        created_at: parse_datetime(&created_at)?,
        updated_at: parse_datetime(&updated_at)?,
    })
}

/// Convert a SQLite row to an Ingredient.
///
/// Expected columns: id, vendor_id, owner, name, price, size, available, created_at
pub fn row_to_ingredient(row: &Row) -> rusqlite::Result<Ingredient> {
    let id: String = row.get(0)?;
    let vendor_id: String = row.get(1)?;
    let owner: String = row.get(2)?;
    let name: String = row.get(3)?;
    let price: f64 = row.get(4)?;
    let size: String = row.get(5)?;
    let available: bool = row.get(6)?;
    let created_at: String = row.get(7)?;

    Ok(Ingredient {
        id: parse_uuid(&id)?,
        vendor_id: parse_uuid(&vendor_id)?,
        owner,
        name,
        price,
        size,
        available,
        created_at: parse_datetime(&created_at)?,
    })
}

// ============================================================================
// Uploaded image conversions
// ============================================================================

/// Convert a SQLite row to an UploadedImage.
///
/// Expected columns: id, url, pathname, size, owner, created_at
pub fn row_to_image(row: &Row) -> rusqlite::Result<UploadedImage> {
    let id: String = row.get(0)?;
    let url: String = row.get(1)?;
    let pathname: String = row.get(2)?;
    let size: i64 = row.get(3)?;
    let owner: String = row.get(4)?;
    let created_at: String = row.get(5)?;

    Ok(UploadedImage {
        id: parse_uuid(&id)?,
        url,
        pathname,
        size: size.max(0) as u64,
        owner,
        created_at: parse_datetime(&created_at)?,
    })
}

// ============================================================================
// Helper functions
// ============================================================================

/// Serialize a string list to its stored JSON form.
pub fn string_list_to_json(list: &[String]) -> Result<String, RepositoryError> {
    serde_json::to_string(list).map_err(|e| RepositoryError::Serialization(e.to_string()))
}

/// Deserialize a string list from its stored JSON form.
pub fn json_to_string_list(json: &str) -> Result<Vec<String>, RepositoryError> {
    serde_json::from_str(json).map_err(|e| RepositoryError::Serialization(e.to_string()))
}

/// Internal version that returns rusqlite::Result for use in row conversions.
fn json_to_string_list_internal(json: &str) -> rusqlite::Result<Vec<String>> {
    serde_json::from_str(json).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })
}

/// Parse a UUID from string.
fn parse_uuid(s: &str) -> rusqlite::Result<Uuid> {
    Uuid::parse_str(s).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })
}

/// Parse a datetime from RFC 3339 string.
fn parse_datetime(s: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
        })
}

/// Parse Role from its stored string form.
fn parse_role(s: &str) -> rusqlite::Result<Role> {
    s.parse::<Role>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(std::io::Error::new(std::io::ErrorKind::InvalidData, e)),
        )
    })
}

/// Format a DateTime<Utc> for SQLite storage (RFC 3339).
pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}
