//! Folder access policy
//!
//! Folder paths arrive from the client untrusted. The policy canonicalizes
//! them and, when roots are configured, only admits folders below one of
//! those roots.

use std::path::{Path, PathBuf};

use tokio::fs;

/// Which folders the browser may list and serve from
#[derive(Debug, Clone, Default)]
pub struct FolderPolicy {
    /// Canonical allowed roots; only consulted when `restricted`
    allowed_roots: Vec<PathBuf>,
    restricted: bool,
}

impl FolderPolicy {
    /// Any existing directory may be browsed
    pub fn unrestricted() -> Self {
        Self::default()
    }

    /// Only directories inside `roots` may be browsed
    ///
    /// Roots that cannot be canonicalized are skipped with a warning; the
    /// policy stays restricted even if none survive.
    pub fn with_roots<I, P>(roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let allowed_roots = roots
            .into_iter()
            .filter_map(|root| match std::fs::canonicalize(root.as_ref()) {
                Ok(canonical) => Some(canonical),
                Err(e) => {
                    log::warn!(
                        "FolderPolicy: ignoring allowed root {:?}: {}",
                        root.as_ref(),
                        e
                    );
                    None
                }
            })
            .collect();

        Self {
            allowed_roots,
            restricted: true,
        }
    }

    pub fn is_restricted(&self) -> bool {
        self.restricted
    }

    /// Canonical roots in effect
    pub fn allowed_roots(&self) -> &[PathBuf] {
        &self.allowed_roots
    }

    fn admits(&self, canonical: &Path) -> bool {
        !self.restricted
            || self
                .allowed_roots
                .iter()
                .any(|root| canonical.starts_with(root))
    }

    /// Resolve a client-supplied folder path to a canonical directory
    ///
    /// Returns `None` for empty input, missing paths, non-directories and
    /// folders outside the allowed roots.
    pub async fn resolve_folder(&self, folder: &str) -> Option<PathBuf> {
        let folder = folder.trim();
        if folder.is_empty() || folder.contains('\0') {
            return None;
        }

        let canonical = fs::canonicalize(folder).await.ok()?;
        let metadata = fs::metadata(&canonical).await.ok()?;
        if !metadata.is_dir() {
            log::debug!("FolderPolicy: {:?} is not a directory", canonical);
            return None;
        }

        if !self.admits(&canonical) {
            log::warn!("FolderPolicy: {:?} is outside the allowed roots", canonical);
            return None;
        }

        Some(canonical)
    }
}
