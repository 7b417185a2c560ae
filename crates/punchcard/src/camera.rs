//! Camera capability seam.
//!
//! A [`CameraDevice`] hands out a live [`CameraFeed`] on `open`; the feed is
//! a capability object owned exclusively by the workflow's camera-open state
//! and dropped on the way out of it. Failing to open the device and failing
//! to read a frame are distinct, both recoverable: the first keeps the
//! workflow idle (fall back to file upload), the second keeps the feed open
//! for another attempt.

use async_trait::async_trait;

use punchcard_spool::{SpoolCamera, SpoolError};

use crate::capture::{Photo, PhotoSource};
use crate::error::{Error, Result};

/// A camera that can be opened for live capture.
#[async_trait]
pub trait CameraDevice: Send + Sync {
    /// The name of this device (for logging/debugging).
    fn name(&self) -> &'static str;

    /// Request access to the device.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CameraUnavailable`] if the device cannot be opened.
    async fn open(&self) -> Result<Box<dyn CameraFeed>>;
}

/// A live feed obtained from an open camera.
///
/// Dropping the feed releases the device.
#[async_trait]
pub trait CameraFeed: Send + std::fmt::Debug {
    /// The name of the device this feed came from.
    fn name(&self) -> &'static str;

    /// Take a single still frame from the feed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CaptureFailed`] if no usable frame is available.
    /// The feed stays open; the caller may try again.
    async fn still(&mut self) -> Result<Photo>;
}

/// The always-unavailable camera, for upload-only deployments.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCamera;

#[async_trait]
impl CameraDevice for NoCamera {
    fn name(&self) -> &'static str {
        "none"
    }

    async fn open(&self) -> Result<Box<dyn CameraFeed>> {
        Err(Error::camera_unavailable("no camera configured"))
    }
}

/// A camera backed by a spool directory an external grabber writes into.
#[derive(Debug, Clone)]
pub struct SpoolDevice {
    camera: SpoolCamera,
}

impl SpoolDevice {
    /// Wrap a configured spool camera.
    #[must_use]
    pub fn new(camera: SpoolCamera) -> Self {
        Self { camera }
    }
}

impl From<SpoolCamera> for SpoolDevice {
    fn from(camera: SpoolCamera) -> Self {
        Self::new(camera)
    }
}

#[async_trait]
impl CameraDevice for SpoolDevice {
    fn name(&self) -> &'static str {
        "spool"
    }

    async fn open(&self) -> Result<Box<dyn CameraFeed>> {
        self.camera
            .check()
            .map_err(|e| Error::camera_unavailable(e.to_string()))?;
        Ok(Box::new(SpoolFeed {
            camera: self.camera.clone(),
        }))
    }
}

/// A live feed over the spool directory.
#[derive(Debug)]
struct SpoolFeed {
    camera: SpoolCamera,
}

#[async_trait]
impl CameraFeed for SpoolFeed {
    fn name(&self) -> &'static str {
        "spool"
    }

    async fn still(&mut self) -> Result<Photo> {
        let frame = self.camera.latest_frame().map_err(|e| match e {
            SpoolError::Unavailable { .. } => Error::camera_unavailable(e.to_string()),
            other => Error::capture_failed(other.to_string()),
        })?;
        Ok(photo_from_frame(&frame.path, frame.bytes))
    }
}

/// Build a camera photo from a spool frame, keeping the frame's image type.
fn photo_from_frame(path: &std::path::Path, bytes: Vec<u8>) -> Photo {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("jpg")
        .to_ascii_lowercase();
    match ext.as_str() {
        "png" => {
            let name = format!(
                "attendance-{}.png",
                chrono::Utc::now().timestamp_millis()
            );
            Photo::new(bytes, "image/png", name, PhotoSource::Camera)
        }
        _ => Photo::jpeg(bytes, PhotoSource::Camera),
    }
}
