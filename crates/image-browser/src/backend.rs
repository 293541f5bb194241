//! Backends the browser controller scans folders through
//!
//! A node running inside the server process uses [`LocalBackend`] and talks
//! to the filesystem directly. A remote front-end uses the HTTP backend from
//! `image-browser-http`, which calls the two browser endpoints.

use async_trait::async_trait;

use crate::error::{Result, ServeError};
use crate::listing::FolderListing;
use crate::policy::FolderPolicy;
use crate::scanner::scan_folder;
use crate::server::{serve_image, ServedImage};
use crate::sort::SortMode;

/// Source of folder listings and image bytes
#[async_trait]
pub trait ImageBrowserBackend: Send + Sync {
    /// List the images of `folder_path` in `sort_mode` order
    async fn list_images(&self, folder_path: &str, sort_mode: SortMode) -> Result<FolderListing>;

    /// Fetch one image; `Ok(None)` when it cannot be served
    async fn fetch_image(&self, folder_path: &str, filename: &str) -> Result<Option<ServedImage>>;
}

/// In-process backend reading the local filesystem
///
/// Listing tokens are absolute file paths.
#[derive(Debug, Clone, Default)]
pub struct LocalBackend {
    policy: FolderPolicy,
}

impl LocalBackend {
    pub fn new(policy: FolderPolicy) -> Self {
        Self { policy }
    }
}

#[async_trait]
impl ImageBrowserBackend for LocalBackend {
    async fn list_images(&self, folder_path: &str, sort_mode: SortMode) -> Result<FolderListing> {
        let images = scan_folder(&self.policy, folder_path, sort_mode).await;
        Ok(FolderListing::from_scan(&images, |image| {
            image.path.display().to_string()
        }))
    }

    async fn fetch_image(&self, folder_path: &str, filename: &str) -> Result<Option<ServedImage>> {
        match serve_image(&self.policy, folder_path, filename).await {
            Ok(image) => Ok(Some(image)),
            Err(ServeError::NotFound) => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_local_backend_lists_absolute_paths() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("b.png"), b"b").unwrap();
        std::fs::write(dir.path().join("a.jpg"), b"a").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"n").unwrap();

        let backend = LocalBackend::default();
        let folder = dir.path().to_string_lossy().to_string();
        let listing = backend.list_images(&folder, SortMode::NameAsc).await.unwrap();

        let names: Vec<&str> = listing.filenames().collect();
        assert_eq!(names, vec!["a.jpg", "b.png"]);

        let token = listing.token("a.jpg").unwrap();
        assert!(std::path::Path::new(token).is_absolute());
        assert!(token.ends_with("a.jpg"));
    }

    #[tokio::test]
    async fn test_local_backend_fetch() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("a.png"), b"png-bytes").unwrap();

        let backend = LocalBackend::default();
        let folder = dir.path().to_string_lossy().to_string();

        let image = backend.fetch_image(&folder, "a.png").await.unwrap().unwrap();
        assert_eq!(image.bytes, b"png-bytes");
        assert_eq!(image.content_type, "image/png");

        assert!(backend
            .fetch_image(&folder, "../a.png")
            .await
            .unwrap()
            .is_none());
        assert!(backend
            .fetch_image(&folder, "missing.png")
            .await
            .unwrap()
            .is_none());
    }
}
