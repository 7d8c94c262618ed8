//! Application state with repository-based storage.
//!
//! Shared state cloned into every request handler: repository trait objects
//! over the SQLite backend, the auth state, and the blob store for uploads.

use std::sync::Arc;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use ovenlovin_auth::{AuthConfig, AuthState, SessionStore};
use ovenlovin_core::storage::{
    FavoriteRepository, ImageRepository, IngredientRepository, RecipeRepository, ReviewRepository,
    UserRepository, VendorRepository, VisitRepository,
};

use crate::blob::{BlobStore, FsBlobStore};
use crate::config::Config;
use crate::storage::SqliteRepository;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub recipes: Arc<dyn RecipeRepository>,
    pub reviews: Arc<dyn ReviewRepository>,
    pub favorites: Arc<dyn FavoriteRepository>,
    pub vendors: Arc<dyn VendorRepository>,
    pub ingredients: Arc<dyn IngredientRepository>,
    pub images: Arc<dyn ImageRepository>,
    pub visits: Arc<dyn VisitRepository>,
    /// Blob store backing `/uploads/`.
    pub blobs: Arc<dyn BlobStore>,
    pub auth: AuthState,
    /// Directory the static file layer serves blobs from.
    pub uploads_dir: String,
}

/// Lets auth extractors pull their state out of the application state.
impl AsRef<AuthState> for AppState {
    fn as_ref(&self) -> &AuthState {
        &self.auth
    }
}

impl AppState {
    /// Creates application state backed by SQLite storage and a filesystem
    /// blob store, per the given configuration.
    pub async fn new(config: &Config) -> Result<Self, anyhow::Error> {
        let repo = Arc::new(SqliteRepository::new(&config.sqlite_path).await?);

        let session_pool = SqlitePoolOptions::new()
            .connect_with(
                SqliteConnectOptions::new()
                    .filename(&config.sessions_path)
                    .create_if_missing(true),
            )
            .await?;
        let sessions = SessionStore::new(session_pool);
        sessions.migrate().await?;

        let auth = AuthState::new(Arc::new(sessions), repo.clone(), AuthConfig::from_env());
        let blobs = Arc::new(FsBlobStore::new(&config.uploads_dir));

        Ok(Self::build(repo, blobs, auth, &config.uploads_dir))
    }

    fn build(
        repo: Arc<SqliteRepository>,
        blobs: Arc<dyn BlobStore>,
        auth: AuthState,
        uploads_dir: &str,
    ) -> Self {
        Self {
            users: repo.clone(),
            recipes: repo.clone(),
            reviews: repo.clone(),
            favorites: repo.clone(),
            vendors: repo.clone(),
            ingredients: repo.clone(),
            images: repo.clone(),
            visits: repo,
            blobs,
            auth,
            uploads_dir: uploads_dir.to_string(),
        }
    }

    /// Creates application state with in-memory storage and a temporary
    /// blob directory. Nothing survives the returned state.
    #[cfg(test)]
    pub async fn new_in_memory() -> Self {
        let repo = Arc::new(SqliteRepository::new_in_memory().await.unwrap());

        let session_pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        let sessions = SessionStore::new(session_pool);
        sessions.migrate().await.unwrap();

        let auth = AuthState::new(Arc::new(sessions), repo.clone(), AuthConfig::from_env());

        let uploads_dir = std::env::temp_dir()
            .join(format!("ovenlovin-test-{}", uuid::Uuid::new_v4()))
            .to_string_lossy()
            .into_owned();
        let blobs = Arc::new(FsBlobStore::new(&uploads_dir));

        Self::build(repo, blobs, auth, &uploads_dir)
    }
}
