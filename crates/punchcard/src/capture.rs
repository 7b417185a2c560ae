//! Core photo types for punchcard.
//!
//! This module defines the binary payload produced by a capture or upload
//! and submitted to the clock-in endpoint.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// How a photo was acquired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhotoSource {
    /// A still frame taken from the live camera feed.
    Camera,
    /// An image file selected from local storage.
    Upload,
}

impl std::fmt::Display for PhotoSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Camera => write!(f, "camera"),
            Self::Upload => write!(f, "upload"),
        }
    }
}

/// A captured attendance photo.
///
/// The payload is owned exclusively by the workflow that produced it and is
/// replaced wholesale on a new capture, never mutated in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Photo {
    /// File name sent to the service.
    pub file_name: String,

    /// MIME type of the payload.
    pub mime: String,

    /// The raw image bytes.
    pub bytes: Vec<u8>,

    /// How the photo was acquired.
    pub source: PhotoSource,

    /// When the photo was acquired.
    pub captured_at: DateTime<Utc>,

    /// BLAKE3 hash of the payload, for logging and deduplication.
    pub content_hash: String,
}

impl Photo {
    /// Create a photo with an explicit MIME type and file name.
    ///
    /// Automatically computes the content hash and sets the capture time
    /// to now.
    #[must_use]
    pub fn new(
        bytes: Vec<u8>,
        mime: impl Into<String>,
        file_name: impl Into<String>,
        source: PhotoSource,
    ) -> Self {
        let content_hash = Self::compute_hash(&bytes);
        Self {
            file_name: file_name.into(),
            mime: mime.into(),
            bytes,
            source,
            captured_at: Utc::now(),
            content_hash,
        }
    }

    /// Create a JPEG photo named `attendance-{timestamp}.jpg`.
    #[must_use]
    pub fn jpeg(bytes: Vec<u8>, source: PhotoSource) -> Self {
        let file_name = format!("attendance-{}.jpg", Utc::now().timestamp_millis());
        Self::new(bytes, "image/jpeg", file_name, source)
    }

    /// Load an image file from local storage as an upload.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is not an image type or cannot be read.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();
        let Some(mime) = mime_for_extension(ext) else {
            return Err(Error::capture_failed(format!(
                "{} is not an image file",
                path.display()
            )));
        };
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("attendance.jpg")
            .to_string();
        let bytes = std::fs::read(path)?;
        Ok(Self::new(bytes, mime, file_name, PhotoSource::Upload))
    }

    /// Compute the BLAKE3 hash of the given payload.
    #[must_use]
    pub fn compute_hash(bytes: &[u8]) -> String {
        blake3::hash(bytes).to_hex().to_string()
    }

    /// Get the length of the payload in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Check if the payload is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Map a file extension to an image MIME type.
fn mime_for_extension(ext: &str) -> Option<&'static str> {
    match ext.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "bmp" => Some("image/bmp"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_photo_source_display() {
        assert_eq!(PhotoSource::Camera.to_string(), "camera");
        assert_eq!(PhotoSource::Upload.to_string(), "upload");
    }

    #[test]
    fn test_photo_jpeg() {
        let photo = Photo::jpeg(vec![1, 2, 3], PhotoSource::Camera);

        assert_eq!(photo.mime, "image/jpeg");
        assert!(photo.file_name.starts_with("attendance-"));
        assert!(photo.file_name.ends_with(".jpg"));
        assert_eq!(photo.source, PhotoSource::Camera);
        assert_eq!(photo.len(), 3);
        assert!(!photo.content_hash.is_empty());
    }

    #[test]
    fn test_photo_hash_consistency() {
        let hash1 = Photo::compute_hash(b"frame");
        let hash2 = Photo::compute_hash(b"frame");
        assert_eq!(hash1, hash2);

        let different = Photo::compute_hash(b"other frame");
        assert_ne!(hash1, different);
    }

    #[test]
    fn test_photo_is_empty() {
        let empty = Photo::jpeg(Vec::new(), PhotoSource::Camera);
        assert!(empty.is_empty());

        let not_empty = Photo::jpeg(vec![0xff], PhotoSource::Camera);
        assert!(!not_empty.is_empty());
    }

    #[test]
    fn test_from_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("me.png");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(b"pngbytes").unwrap();

        let photo = Photo::from_file(&path).unwrap();
        assert_eq!(photo.mime, "image/png");
        assert_eq!(photo.file_name, "me.png");
        assert_eq!(photo.bytes, b"pngbytes");
        assert_eq!(photo.source, PhotoSource::Upload);
    }

    #[test]
    fn test_from_file_rejects_non_image() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("notes.txt");
        std::fs::write(&path, "hello").unwrap();

        let err = Photo::from_file(&path).unwrap_err();
        assert!(err.to_string().contains("not an image"));
    }

    #[test]
    fn test_from_file_missing() {
        let err = Photo::from_file("/nonexistent/me.jpg").unwrap_err();
        assert!(matches!(err, crate::error::Error::Io(_)));
    }

    #[test]
    fn test_mime_for_extension() {
        assert_eq!(mime_for_extension("jpg"), Some("image/jpeg"));
        assert_eq!(mime_for_extension("JPEG"), Some("image/jpeg"));
        assert_eq!(mime_for_extension("png"), Some("image/png"));
        assert_eq!(mime_for_extension("txt"), None);
        assert_eq!(mime_for_extension(""), None);
    }
}
