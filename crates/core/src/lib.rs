pub mod auth;
pub mod media;
pub mod pantry;
pub mod recipe;
pub mod serde;
pub mod storage;
pub mod user;
