//! Credential authentication for ovenlovin.
//!
//! Provides email + password signup and login, server-side sessions stored
//! in SQLite, and axum extractors for the authenticated user.

mod config;
mod error;
mod extractors;
mod handlers;
mod password;
mod sessions;
mod state;

pub use config::AuthConfig;
pub use error::AuthError;
pub use extractors::{CurrentUser, OptionalUser};
pub use handlers::auth_routes;
pub use password::{hash_password, verify_password};
pub use sessions::SessionStore;
pub use state::AuthState;
