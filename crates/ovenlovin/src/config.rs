use std::env;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the SQLite database file (default: "ovenlovin.db")
    pub sqlite_path: String,
    /// Path to the SQLite sessions database file (default: "ovenlovin_sessions.db")
    pub sessions_path: String,
    /// Directory where uploaded image blobs are stored (default: "uploads")
    pub uploads_dir: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `SQLITE_PATH` - SQLite database path (default: "ovenlovin.db")
    /// - `SESSIONS_PATH` - Session database path (default: "ovenlovin_sessions.db")
    /// - `UPLOADS_DIR` - Upload blob directory (default: "uploads")
    pub fn from_env() -> Self {
        Self {
            sqlite_path: env::var("SQLITE_PATH").unwrap_or_else(|_| "ovenlovin.db".to_string()),
            sessions_path: env::var("SESSIONS_PATH")
                .unwrap_or_else(|_| "ovenlovin_sessions.db".to_string()),
            uploads_dir: env::var("UPLOADS_DIR").unwrap_or_else(|_| "uploads".to_string()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
