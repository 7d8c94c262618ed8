use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Metadata for an image stored in the blob store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadedImage {
    pub id: Uuid,
    /// Public URL the image is served from.
    pub url: String,
    /// Path within the blob store, e.g. `recipes/<id>.webp`.
    pub pathname: String,
    /// Stored size in bytes (after transcoding).
    pub size: u64,
    /// Email of the uploading user.
    pub owner: String,
    pub created_at: DateTime<Utc>,
}

impl UploadedImage {
    pub fn new(
        url: impl Into<String>,
        pathname: impl Into<String>,
        size: u64,
        owner: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            url: url.into(),
            pathname: pathname.into(),
            size,
            owner: owner.into(),
            created_at: Utc::now(),
        }
    }
}
