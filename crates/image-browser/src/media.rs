//! Recognized image file types

use std::path::Path;

/// Extensions (lowercase) of files the browser lists and serves
pub const IMAGE_EXTENSIONS: &[&str] = &["jpeg", "jpg", "png", "tiff", "gif", "bmp", "webp"];

/// Lowercased extension of a path, if any
fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}

/// Whether a file name carries a recognized image extension (case-insensitive)
pub fn is_image_file(path: impl AsRef<Path>) -> bool {
    extension(path.as_ref())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

/// MIME type for a recognized image file
pub fn content_type(path: impl AsRef<Path>) -> Option<&'static str> {
    let ext = extension(path.as_ref())?;
    let mime = match ext.as_str() {
        "jpeg" | "jpg" => "image/jpeg",
        "png" => "image/png",
        "tiff" => "image/tiff",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "webp" => "image/webp",
        _ => return None,
    };
    Some(mime)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_image_file() {
        assert!(is_image_file("a.png"));
        assert!(is_image_file("photo.JPEG"));
        assert!(is_image_file("/tmp/dir/scan.TiFf"));
        assert!(!is_image_file("notes.txt"));
        assert!(!is_image_file("png"));
        assert!(!is_image_file("archive.png.zip"));
    }

    #[test]
    fn test_content_type() {
        assert_eq!(content_type("a.JPG"), Some("image/jpeg"));
        assert_eq!(content_type("a.webp"), Some("image/webp"));
        assert_eq!(content_type("a.svg"), None);
        assert_eq!(content_type("noext"), None);
    }

    #[test]
    fn test_every_listed_extension_has_content_type() {
        for ext in IMAGE_EXTENSIONS {
            let name = format!("file.{}", ext);
            assert!(content_type(&name).is_some(), "missing mime for {}", ext);
        }
    }
}
