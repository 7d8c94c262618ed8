use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A vendor storefront owned by a single account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vendor {
    pub id: Uuid,
    /// Email of the owning account; unique across vendors.
    pub owner: String,
    pub name: String,
    pub address: String,
    pub hours: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Vendor {
    pub fn new(
        owner: impl Into<String>,
        name: impl Into<String>,
        address: impl Into<String>,
        hours: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            owner: owner.into(),
            name: name.into(),
            address: address.into(),
            hours: hours.into(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// An ingredient listed by a vendor with price and availability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: Uuid,
    pub vendor_id: Uuid,
    /// Email of the vendor's owning account.
    pub owner: String,
    pub name: String,
    pub price: f64,
    pub size: String,
    pub available: bool,
    pub created_at: DateTime<Utc>,
}

/// An available ingredient listing joined with its vendor's name,
/// as consumed by the recipe matcher.
#[derive(Debug, Clone, PartialEq)]
pub struct VendorListing {
    pub ingredient: Ingredient,
    pub vendor_name: String,
}

/// A vendor listing matched against a parsed recipe ingredient line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingMatch {
    pub ingredient_id: Uuid,
    pub ingredient_name: String,
    pub vendor_id: Uuid,
    pub vendor_name: String,
    pub price: f64,
    pub size: String,
}

/// Match result for one cleaned ingredient line from a recipe.
///
/// An empty `matches` list means no vendor listing matched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IngredientMatch {
    pub term: String,
    pub matches: Vec<ListingMatch>,
}
