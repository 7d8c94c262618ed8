//! Blob storage for uploaded images.
//!
//! Stored blobs are served under `/uploads/` by the static file layer, so
//! `put` returns a URL of the form `/uploads/<pathname>`.

pub mod processing;

use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Prefix under which blobs are publicly served.
pub const URL_PREFIX: &str = "/uploads/";

/// Storage for opaque image blobs addressed by pathname.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Stores bytes under the given pathname and returns the public URL.
    async fn put(&self, pathname: &str, data: &[u8]) -> std::io::Result<String>;

    /// Deletes the blob with the given pathname. Deleting a missing blob
    /// is not an error.
    async fn delete(&self, pathname: &str) -> std::io::Result<()>;
}

/// Returns the blob pathname for a URL served by this application,
/// or None for external URLs.
pub fn pathname_for_url(url: &str) -> Option<&str> {
    url.strip_prefix(URL_PREFIX).filter(|p| !p.is_empty())
}

/// Filesystem-backed blob store rooted at the uploads directory.
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve a pathname inside the root, rejecting traversal segments.
    fn resolve(&self, pathname: &str) -> std::io::Result<PathBuf> {
        let relative = Path::new(pathname);
        let escapes_root = relative.components().any(|c| {
            !matches!(
                c,
                std::path::Component::Normal(_) | std::path::Component::CurDir
            )
        });
        if escapes_root {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("Invalid blob pathname: {pathname}"),
            ));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn put(&self, pathname: &str, data: &[u8]) -> std::io::Result<String> {
        let path = self.resolve(pathname)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, data).await?;
        Ok(format!("{URL_PREFIX}{pathname}"))
    }

    async fn delete(&self, pathname: &str) -> std::io::Result<()> {
        let path = self.resolve(pathname)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> FsBlobStore {
        let dir = std::env::temp_dir().join(format!("ovenlovin-blob-{}", uuid::Uuid::new_v4()));
        FsBlobStore::new(dir)
    }

    #[tokio::test]
    async fn put_returns_uploads_url_and_writes_file() {
        let store = temp_store();
        let url = store.put("recipes/test.webp", b"bytes").await.unwrap();
        assert_eq!(url, "/uploads/recipes/test.webp");

        let on_disk = store.root.join("recipes/test.webp");
        assert_eq!(tokio::fs::read(on_disk).await.unwrap(), b"bytes");
    }

    #[tokio::test]
    async fn delete_missing_blob_is_ok() {
        let store = temp_store();
        store.delete("recipes/never-existed.webp").await.unwrap();
    }

    #[tokio::test]
    async fn delete_removes_blob() {
        let store = temp_store();
        store.put("recipes/gone.webp", b"bytes").await.unwrap();
        store.delete("recipes/gone.webp").await.unwrap();
        assert!(!store.root.join("recipes/gone.webp").exists());
    }

    #[tokio::test]
    async fn traversal_pathnames_are_rejected() {
        let store = temp_store();
        assert!(store.put("../escape.webp", b"bytes").await.is_err());
        assert!(store.put("/etc/passwd", b"bytes").await.is_err());
    }

    #[test]
    fn pathname_for_url_strips_prefix() {
        assert_eq!(
            pathname_for_url("/uploads/recipes/a.webp"),
            Some("recipes/a.webp")
        );
        assert_eq!(pathname_for_url("https://images.unsplash.com/photo"), None);
        assert_eq!(pathname_for_url("/uploads/"), None);
    }
}
