//! In-memory files with a declared media type.
//!
//! An [`ImageFile`] is what a file picker hands over: a name, the type the
//! uploader *claims* the bytes are, and the bytes. The claim is checked
//! before anything is decoded; the bytes are trusted only once the decoder
//! accepts them.

use std::path::Path;

/// A named byte buffer tagged with its declared MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub name: String,
    pub media_type: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    pub fn new(name: impl Into<String>, media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            bytes,
        }
    }

    /// Read a file from disk, declaring its media type from the extension.
    pub fn read(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self {
            name,
            media_type: media_type_for_path(path).to_string(),
            bytes,
        })
    }

    /// Whether the declared media type is an image type.
    pub fn is_image(&self) -> bool {
        is_image_media_type(&self.media_type)
    }
}

/// `image/*`, compared case-insensitively. Parameters (`;charset=...`) are ignored.
pub fn is_image_media_type(media_type: &str) -> bool {
    let essence = media_type.split(';').next().unwrap_or("").trim();
    essence
        .get(..6)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("image/"))
        && essence.len() > 6
}

/// Declared media type for a path, derived from its extension only.
pub fn media_type_for_path(path: &Path) -> &'static str {
    if let Ok(format) = image::ImageFormat::from_path(path) {
        return format.to_mime_type();
    }
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("txt") | Some("md") | Some("csv") => "text/plain",
        Some("json") => "application/json",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_media_types() {
        assert!(is_image_media_type("image/jpeg"));
        assert!(is_image_media_type("IMAGE/PNG"));
        assert!(is_image_media_type("image/svg+xml; charset=utf-8"));
    }

    #[test]
    fn non_image_media_types() {
        assert!(!is_image_media_type("text/plain"));
        assert!(!is_image_media_type("application/octet-stream"));
        assert!(!is_image_media_type("image/"));
        assert!(!is_image_media_type(""));
        assert!(!is_image_media_type("video/image"));
    }

    #[test]
    fn media_type_from_extension() {
        assert_eq!(media_type_for_path(Path::new("a/photo.JPG")), "image/jpeg");
        assert_eq!(media_type_for_path(Path::new("scan.tiff")), "image/tiff");
        assert_eq!(media_type_for_path(Path::new("notes.txt")), "text/plain");
        assert_eq!(
            media_type_for_path(Path::new("no_extension")),
            "application/octet-stream"
        );
    }

    #[test]
    fn read_from_disk_declares_type() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("readme.txt");
        std::fs::write(&path, "hello").unwrap();

        let file = ImageFile::read(&path).unwrap();
        assert_eq!(file.name, "readme.txt");
        assert_eq!(file.media_type, "text/plain");
        assert_eq!(file.bytes, b"hello");
        assert!(!file.is_image());
    }
}
