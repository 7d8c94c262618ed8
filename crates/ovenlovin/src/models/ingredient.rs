use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use ovenlovin_core::pantry::{Ingredient, Vendor};

fn default_available() -> bool {
    true
}

/// Request payload for a vendor creating an ingredient listing.
#[derive(Debug, Deserialize)]
pub struct CreateIngredient {
    pub name: String,
    pub price: f64,
    pub size: String,
    #[serde(default = "default_available")]
    pub available: bool,
}

impl CreateIngredient {
    /// Converts the request into a listing under the given vendor.
    pub fn into_ingredient(self, vendor: &Vendor) -> Ingredient {
        Ingredient {
            id: Uuid::new_v4(),
            vendor_id: vendor.id,
            owner: vendor.owner.clone(),
            name: self.name,
            price: self.price,
            size: self.size,
            available: self.available,
            created_at: Utc::now(),
        }
    }
}

/// Request payload for updating an ingredient listing. Absent fields keep
/// their current values.
#[derive(Debug, Deserialize)]
pub struct UpdateIngredient {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub available: Option<bool>,
}

impl UpdateIngredient {
    pub fn apply_to(self, ingredient: &mut Ingredient) {
        if let Some(name) = self.name {
            ingredient.name = name;
        }
        if let Some(price) = self.price {
            ingredient.price = price;
        }
        if let Some(size) = self.size {
            ingredient.size = size;
        }
        if let Some(available) = self.available {
            ingredient.available = available;
        }
    }
}
