//! Folder scanner
//!
//! Lists the image files of one folder and orders them by a [`SortMode`].
//! Failures never surface as errors: a folder that cannot be listed is
//! simply a folder without images.

use std::path::PathBuf;
use std::time::SystemTime;

use tokio::fs;

use crate::media;
use crate::policy::FolderPolicy;
use crate::sort::SortMode;

/// One image file found by a scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedImage {
    /// File name within the folder
    pub filename: String,
    /// Full path of the file
    pub path: PathBuf,
    pub modified: SystemTime,
    /// Creation time; equals `modified` where the platform has no birth time
    pub created: SystemTime,
}

/// Scan a folder for images, ordered by `sort_mode`
///
/// Only regular files with a recognized image extension are returned.
/// Symlinks are followed but must resolve inside the folder, the same rule
/// the image server applies, so every listed file can also be served. Entries whose names are not valid UTF-8 are
/// skipped. The scan has no side effects beyond reading metadata.
pub async fn scan_folder(
    policy: &FolderPolicy,
    folder: &str,
    sort_mode: SortMode,
) -> Vec<ScannedImage> {
    let Some(dir) = policy.resolve_folder(folder).await else {
        log::debug!("scan_folder: '{}' is not a browsable folder", folder);
        return Vec::new();
    };

    let mut entries = match fs::read_dir(&dir).await {
        Ok(entries) => entries,
        Err(e) => {
            log::warn!("scan_folder: failed to read {:?}: {}", dir, e);
            return Vec::new();
        }
    };

    let mut images = Vec::new();
    loop {
        let entry = match entries.next_entry().await {
            Ok(Some(entry)) => entry,
            Ok(None) => break,
            Err(e) => {
                log::warn!("scan_folder: error while listing {:?}: {}", dir, e);
                break;
            }
        };

        let Ok(filename) = entry.file_name().into_string() else {
            continue;
        };
        if !media::is_image_file(&filename) {
            continue;
        }

        let path = entry.path();
        match fs::canonicalize(&path).await {
            Ok(target) if target.starts_with(&dir) => {}
            Ok(target) => {
                log::debug!("scan_folder: {:?} resolves outside to {:?}", path, target);
                continue;
            }
            Err(e) => {
                log::debug!("scan_folder: skipping {:?}: {}", path, e);
                continue;
            }
        }
        let metadata = match fs::metadata(&path).await {
            Ok(metadata) if metadata.is_file() => metadata,
            Ok(_) => continue,
            Err(e) => {
                log::debug!("scan_folder: skipping {:?}: {}", path, e);
                continue;
            }
        };

        let modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);
        let created = metadata.created().unwrap_or(modified);

        images.push(ScannedImage {
            filename,
            path,
            modified,
            created,
        });
    }

    images.sort_by(|a, b| sort_mode.compare(a, b));

    log::debug!(
        "scan_folder: {} images in {:?} ({})",
        images.len(),
        dir,
        sort_mode
    );

    images
}
