mod rating;
mod search;
mod types;

pub use rating::{average_rating, RatingSummary};
pub use search::recipe_matches_search;
pub use types::{Recipe, Review};
