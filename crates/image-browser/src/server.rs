//! Image server
//!
//! Resolves a `(folder, filename)` pair supplied by the client and returns the
//! file's bytes. Both values are untrusted: the filename must be a single
//! plain path component and the resolved file must stay inside the folder.
//! Nothing is cached; every call reads from disk.

use std::path::{Component, Path, PathBuf};

use tokio::fs;

use crate::error::ServeError;
use crate::media;
use crate::policy::FolderPolicy;

/// Bytes of one served image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServedImage {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// True when `filename` is exactly one normal path component
fn is_plain_filename(filename: &str) -> bool {
    if filename.is_empty()
        || filename.contains('\0')
        || filename.contains('/')
        || filename.contains('\\')
    {
        return false;
    }

    let mut components = Path::new(filename).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

/// Resolve the on-disk path of an image inside `folder`
pub async fn resolve_image_path(
    policy: &FolderPolicy,
    folder: &str,
    filename: &str,
) -> Result<PathBuf, ServeError> {
    if !is_plain_filename(filename) {
        log::warn!("Image server: rejected filename {:?}", filename);
        return Err(ServeError::NotFound);
    }
    if !media::is_image_file(filename) {
        return Err(ServeError::NotFound);
    }

    let dir = policy
        .resolve_folder(folder)
        .await
        .ok_or(ServeError::NotFound)?;

    // Canonicalizing the candidate also catches symlinks pointing outside
    let candidate = fs::canonicalize(dir.join(filename))
        .await
        .map_err(|_| ServeError::NotFound)?;
    if !candidate.starts_with(&dir) {
        log::warn!(
            "Image server: {:?} resolves outside {:?}",
            filename,
            dir
        );
        return Err(ServeError::NotFound);
    }

    let metadata = fs::metadata(&candidate)
        .await
        .map_err(|_| ServeError::NotFound)?;
    if !metadata.is_file() {
        return Err(ServeError::NotFound);
    }

    Ok(candidate)
}

/// Read an image for display
pub async fn serve_image(
    policy: &FolderPolicy,
    folder: &str,
    filename: &str,
) -> Result<ServedImage, ServeError> {
    let path = resolve_image_path(policy, folder, filename).await?;
    let content_type = media::content_type(filename).ok_or(ServeError::NotFound)?;

    let bytes = fs::read(&path).await.map_err(|e| {
        log::warn!("Image server: failed to read {:?}: {}", path, e);
        ServeError::NotFound
    })?;

    log::debug!("Image server: {} bytes from {:?}", bytes.len(), path);

    Ok(ServedImage {
        filename: filename.to_string(),
        content_type: content_type.to_string(),
        bytes,
    })
}
