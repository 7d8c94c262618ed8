pub mod admin;
pub mod authz;
pub mod error;
pub mod favorites;
pub mod health;
pub mod ingredients;
pub mod pages;
pub mod profile;
pub mod recipes;
pub mod reviews;
pub mod uploads;
pub mod vendors;

pub use error::AppError;
