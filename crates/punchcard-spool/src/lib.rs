//! Spool-directory frame source for punchcard.
//!
//! An external grabber (a cron job running `fswebcam`, a kiosk script, a
//! CCTV export) drops still images into a spool directory; this crate picks
//! the newest usable frame out of it. It knows nothing about the attendance
//! workflow — the `punchcard` crate wraps it behind its camera traits.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use thiserror::Error;
use tracing::debug;

/// File extensions treated as frames. Anything else in the spool is ignored.
const FRAME_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Errors produced while reading the spool.
#[derive(Debug, Error)]
pub enum SpoolError {
    /// The spool directory does not exist or is not a directory.
    #[error("spool directory {path} is not available: {message}")]
    Unavailable {
        /// The configured spool path.
        path: PathBuf,
        /// Description of what went wrong.
        message: String,
    },

    /// The spool contains no frame files at all.
    #[error("no frame available in spool {path}")]
    NoFrame {
        /// The configured spool path.
        path: PathBuf,
    },

    /// The newest frame is older than the configured freshness window.
    #[error("newest frame {path} is stale ({age_secs}s old)")]
    StaleFrame {
        /// Path of the rejected frame.
        path: PathBuf,
        /// Age of the frame in seconds.
        age_secs: u64,
    },

    /// The newest frame is empty or below the minimum size.
    #[error("frame {path} is too small ({len} bytes)")]
    ShortFrame {
        /// Path of the rejected frame.
        path: PathBuf,
        /// Actual file length.
        len: u64,
    },

    /// File system access failed.
    #[error("I/O error in spool: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for spool operations.
pub type Result<T> = std::result::Result<T, SpoolError>;

/// A frame read from the spool.
#[derive(Debug, Clone)]
pub struct SpoolFrame {
    /// The raw image bytes.
    pub bytes: Vec<u8>,
    /// Where the frame came from.
    pub path: PathBuf,
    /// When the frame file was last modified.
    pub modified: SystemTime,
}

/// A spool-directory camera.
///
/// `check()` verifies the directory is usable (the "device open" step);
/// `latest_frame()` returns the newest frame that passes the size and
/// freshness checks.
#[derive(Debug, Clone)]
pub struct SpoolCamera {
    dir: PathBuf,
    min_frame_bytes: u64,
    max_frame_age: Option<Duration>,
}

impl SpoolCamera {
    /// Create a camera over the given spool directory.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            min_frame_bytes: 1,
            max_frame_age: None,
        }
    }

    /// Reject frames smaller than this many bytes.
    #[must_use]
    pub fn with_min_frame_bytes(mut self, min: u64) -> Self {
        self.min_frame_bytes = min;
        self
    }

    /// Reject frames older than this.
    #[must_use]
    pub fn with_max_frame_age(mut self, age: Option<Duration>) -> Self {
        self.max_frame_age = age;
        self
    }

    /// The spool directory this camera reads from.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Verify the spool directory exists and is readable.
    ///
    /// # Errors
    ///
    /// Returns [`SpoolError::Unavailable`] if the directory is missing,
    /// is not a directory, or cannot be listed.
    pub fn check(&self) -> Result<()> {
        let meta = fs::metadata(&self.dir).map_err(|e| SpoolError::Unavailable {
            path: self.dir.clone(),
            message: e.to_string(),
        })?;
        if !meta.is_dir() {
            return Err(SpoolError::Unavailable {
                path: self.dir.clone(),
                message: "not a directory".to_string(),
            });
        }
        fs::read_dir(&self.dir).map_err(|e| SpoolError::Unavailable {
            path: self.dir.clone(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Read the newest usable frame from the spool.
    ///
    /// # Errors
    ///
    /// Returns an error if the spool is unavailable, empty, or its newest
    /// frame fails the size or freshness checks.
    pub fn latest_frame(&self) -> Result<SpoolFrame> {
        self.check()?;

        let mut newest: Option<(PathBuf, SystemTime, u64)> = None;
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let path = entry.path();
            if !is_frame_file(&path) {
                continue;
            }
            let meta = entry.metadata()?;
            if !meta.is_file() {
                continue;
            }
            let modified = meta.modified()?;
            let replace = match &newest {
                Some((_, best, _)) => modified > *best,
                None => true,
            };
            if replace {
                newest = Some((path, modified, meta.len()));
            }
        }

        let Some((path, modified, len)) = newest else {
            return Err(SpoolError::NoFrame {
                path: self.dir.clone(),
            });
        };

        if len < self.min_frame_bytes {
            return Err(SpoolError::ShortFrame { path, len });
        }

        if let Some(max_age) = self.max_frame_age {
            let age = SystemTime::now()
                .duration_since(modified)
                .unwrap_or(Duration::ZERO);
            if age > max_age {
                return Err(SpoolError::StaleFrame {
                    path,
                    age_secs: age.as_secs(),
                });
            }
        }

        debug!(frame = %path.display(), len, "reading spool frame");
        let bytes = fs::read(&path)?;
        Ok(SpoolFrame {
            bytes,
            path,
            modified,
        })
    }
}

/// Check whether a path looks like a frame file.
fn is_frame_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            FRAME_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;

    fn write_frame(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
        let path = dir.join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(bytes).unwrap();
        path
    }

    fn set_modified(path: &Path, when: SystemTime) {
        let file = File::options().write(true).open(path).unwrap();
        file.set_modified(when).unwrap();
    }

    #[test]
    fn test_is_frame_file() {
        assert!(is_frame_file(Path::new("a.jpg")));
        assert!(is_frame_file(Path::new("a.JPEG")));
        assert!(is_frame_file(Path::new("a.png")));
        assert!(!is_frame_file(Path::new("a.txt")));
        assert!(!is_frame_file(Path::new("noext")));
    }

    #[test]
    fn test_check_missing_dir() {
        let camera = SpoolCamera::new("/nonexistent/spool");
        let err = camera.check().unwrap_err();
        assert!(matches!(err, SpoolError::Unavailable { .. }));
    }

    #[test]
    fn test_check_not_a_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let file = write_frame(tmp.path(), "frame.jpg", b"x");
        let camera = SpoolCamera::new(&file);
        let err = camera.check().unwrap_err();
        assert!(err.to_string().contains("not a directory"));
    }

    #[test]
    fn test_empty_spool_has_no_frame() {
        let tmp = tempfile::tempdir().unwrap();
        let camera = SpoolCamera::new(tmp.path());
        let err = camera.latest_frame().unwrap_err();
        assert!(matches!(err, SpoolError::NoFrame { .. }));
    }

    #[test]
    fn test_non_frame_files_ignored() {
        let tmp = tempfile::tempdir().unwrap();
        write_frame(tmp.path(), "notes.txt", b"not a frame");
        let camera = SpoolCamera::new(tmp.path());
        let err = camera.latest_frame().unwrap_err();
        assert!(matches!(err, SpoolError::NoFrame { .. }));
    }

    #[test]
    fn test_latest_frame_returns_bytes() {
        let tmp = tempfile::tempdir().unwrap();
        write_frame(tmp.path(), "frame.jpg", b"jpegbytes");
        let camera = SpoolCamera::new(tmp.path());
        let frame = camera.latest_frame().unwrap();
        assert_eq!(frame.bytes, b"jpegbytes");
        assert!(frame.path.ends_with("frame.jpg"));
    }

    #[test]
    fn test_newest_frame_wins() {
        let tmp = tempfile::tempdir().unwrap();
        let old = write_frame(tmp.path(), "old.jpg", b"old");
        let new = write_frame(tmp.path(), "new.jpg", b"new");
        set_modified(&old, SystemTime::now() - Duration::from_secs(600));
        set_modified(&new, SystemTime::now());

        let camera = SpoolCamera::new(tmp.path());
        let frame = camera.latest_frame().unwrap();
        assert_eq!(frame.bytes, b"new");
    }

    #[test]
    fn test_short_frame_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        write_frame(tmp.path(), "tiny.jpg", b"x");
        let camera = SpoolCamera::new(tmp.path()).with_min_frame_bytes(100);
        let err = camera.latest_frame().unwrap_err();
        assert!(matches!(err, SpoolError::ShortFrame { len: 1, .. }));
    }

    #[test]
    fn test_stale_frame_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_frame(tmp.path(), "frame.jpg", b"jpegbytes");
        set_modified(&path, SystemTime::now() - Duration::from_secs(3600));

        let camera =
            SpoolCamera::new(tmp.path()).with_max_frame_age(Some(Duration::from_secs(30)));
        let err = camera.latest_frame().unwrap_err();
        assert!(matches!(err, SpoolError::StaleFrame { .. }));
    }

    #[test]
    fn test_fresh_frame_accepted_with_age_limit() {
        let tmp = tempfile::tempdir().unwrap();
        write_frame(tmp.path(), "frame.jpg", b"jpegbytes");
        let camera =
            SpoolCamera::new(tmp.path()).with_max_frame_age(Some(Duration::from_secs(3600)));
        assert!(camera.latest_frame().is_ok());
    }

    #[test]
    fn test_error_display() {
        let err = SpoolError::NoFrame {
            path: PathBuf::from("/tmp/spool"),
        };
        assert!(err.to_string().contains("/tmp/spool"));

        let err = SpoolError::StaleFrame {
            path: PathBuf::from("/tmp/spool/f.jpg"),
            age_secs: 90,
        };
        assert!(err.to_string().contains("90"));
    }
}
