mod matcher;
mod types;

pub use matcher::{match_ingredients, parse_ingredient_lines};
pub use types::{Ingredient, IngredientMatch, ListingMatch, Vendor, VendorListing};
