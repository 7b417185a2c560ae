//! The attendance capture workflow.
//!
//! Drives a user through photo acquisition and one clock-in submission per
//! day: camera or file upload, local preview, submit, server-confirmed
//! completion. The workflow is a small state machine; every transition is
//! triggered by a discrete action on `&mut self`, so no two transitions can
//! ever run concurrently for one instance.
//!
//! Camera-access denial, capture failure, and submission failure are all
//! recoverable: the user retries from the state they were in, or falls back
//! to file upload. The only terminal state is [`Mode::Completed`].

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Local;
use tracing::{debug, info, warn};

use crate::camera::{CameraDevice, CameraFeed};
use crate::capture::Photo;
use crate::error::{Error, Result};
use crate::preview::{PreviewHandle, PreviewTracker};
use crate::records::{attended_on, AttendanceRecord};

/// The mutually exclusive states of the workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Fetching the caller's history to see if today is already done.
    CheckingStatus,
    /// No photo held; acquisition allowed.
    Idle,
    /// Live camera feed held; waiting for a frame.
    CameraOpen,
    /// Photo held, not yet sent.
    PreviewReady,
    /// Clock-in request in flight; input disabled.
    Submitting,
    /// Attendance recorded (now or earlier today). Terminal.
    Completed,
}

impl Mode {
    /// A short lowercase name for messages and logs.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CheckingStatus => "checking status",
            Self::Idle => "idle",
            Self::CameraOpen => "camera open",
            Self::PreviewReady => "preview ready",
            Self::Submitting => "submitting",
            Self::Completed => "completed",
        }
    }

    /// Whether this state allows no further actions.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Severity of a status message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The last operation succeeded.
    Success,
    /// The last operation failed.
    Error,
}

/// A transient user-visible message about the last operation.
///
/// Overwritten by the next action; cleared on every state-entering
/// transition except into [`Mode::Completed`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    /// The message text.
    pub text: String,
    /// Whether it reports success or failure.
    pub severity: Severity,
}

impl StatusMessage {
    /// Create a success message.
    #[must_use]
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            severity: Severity::Success,
        }
    }

    /// Create an error message.
    #[must_use]
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            severity: Severity::Error,
        }
    }

    /// Whether this message reports a failure.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// The attendance service operations the workflow needs.
///
/// [`crate::client::AttendanceClient`] implements this over HTTP; tests
/// substitute a scripted backend.
#[async_trait]
pub trait AttendanceApi: Send + Sync {
    /// Fetch the caller's attendance history.
    async fn my_history(&self) -> Result<Vec<AttendanceRecord>>;

    /// Submit a clock-in photo. `Ok` means the record was created.
    async fn clock_in(&self, photo: &Photo) -> Result<()>;
}

/// The attendance capture workflow state machine.
///
/// One instance per session; created in [`Mode::CheckingStatus`] and driven
/// by [`CaptureWorkflow::start`] first.
pub struct CaptureWorkflow {
    api: Arc<dyn AttendanceApi>,
    camera: Arc<dyn CameraDevice>,
    previews: PreviewTracker,
    mode: Mode,
    photo: Option<Photo>,
    preview: Option<PreviewHandle>,
    status: Option<StatusMessage>,
    has_attended_today: bool,
    feed: Option<Box<dyn CameraFeed>>,
}

impl std::fmt::Debug for CaptureWorkflow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptureWorkflow")
            .field("mode", &self.mode)
            .field("photo", &self.photo.as_ref().map(Photo::len))
            .field("has_attended_today", &self.has_attended_today)
            .finish_non_exhaustive()
    }
}

impl CaptureWorkflow {
    /// Create a workflow over the given backend and camera.
    #[must_use]
    pub fn new(api: Arc<dyn AttendanceApi>, camera: Arc<dyn CameraDevice>) -> Self {
        Self {
            api,
            camera,
            previews: PreviewTracker::new(),
            mode: Mode::CheckingStatus,
            photo: None,
            preview: None,
            status: None,
            has_attended_today: false,
            feed: None,
        }
    }

    /// Use a shared preview tracker, so a caller can observe handle releases.
    #[must_use]
    pub fn with_preview_tracker(mut self, previews: PreviewTracker) -> Self {
        self.previews = previews;
        self
    }

    /// The current state.
    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// The last operation's status message, if any.
    #[must_use]
    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    /// The held photo, if any.
    #[must_use]
    pub fn photo(&self) -> Option<&Photo> {
        self.photo.as_ref()
    }

    /// The live preview handle, if any.
    #[must_use]
    pub fn preview(&self) -> Option<&PreviewHandle> {
        self.preview.as_ref()
    }

    /// Whether today's attendance is already recorded.
    #[must_use]
    pub fn has_attended_today(&self) -> bool {
        self.has_attended_today
    }

    /// Run the startup status check.
    ///
    /// Scans the caller's history for a record on the current local calendar
    /// day. A read failure fails open: the user is not blocked from
    /// attempting a clock-in by a transient fetch problem. No retry.
    ///
    /// # Errors
    ///
    /// Returns an error if called from any state but
    /// [`Mode::CheckingStatus`].
    pub async fn start(&mut self) -> Result<()> {
        if self.mode != Mode::CheckingStatus {
            return Err(Error::invalid_action("start", self.mode.as_str()));
        }

        let history = self.api.my_history().await;
        match history {
            Ok(records) => {
                let today = Local::now().date_naive();
                if attended_on(&records, today) {
                    info!("attendance already recorded today");
                    self.has_attended_today = true;
                    self.complete(StatusMessage::success("Attendance completed for today."));
                } else {
                    self.enter_idle();
                }
            }
            Err(e) => {
                warn!(error = %e, "history check failed; allowing capture");
                self.enter_idle();
            }
        }
        Ok(())
    }

    /// Request live camera access.
    ///
    /// # Errors
    ///
    /// Returns an error if the device cannot be opened (the workflow stays
    /// idle with an error status) or if called outside [`Mode::Idle`].
    pub async fn open_camera(&mut self) -> Result<()> {
        self.reject_if_completed()?;
        if self.mode != Mode::Idle {
            return Err(Error::invalid_action("open the camera", self.mode.as_str()));
        }

        let opened = self.camera.open().await;
        match opened {
            Ok(feed) => {
                debug!(device = feed.name(), "camera opened");
                self.feed = Some(feed);
                self.mode = Mode::CameraOpen;
                self.status = None;
                Ok(())
            }
            Err(e) => {
                self.status = Some(StatusMessage::error(e.to_string()));
                Err(e)
            }
        }
    }

    /// Take a single still frame from the open camera.
    ///
    /// On success the feed is released and the photo is held for preview.
    /// If no usable frame is available the feed stays open with an error
    /// status, so the user can try again.
    ///
    /// # Errors
    ///
    /// Returns an error on capture failure or if called outside
    /// [`Mode::CameraOpen`].
    pub async fn capture(&mut self) -> Result<()> {
        self.reject_if_completed()?;
        if self.mode != Mode::CameraOpen {
            return Err(Error::invalid_action("capture", self.mode.as_str()));
        }
        let frame = match self.feed.as_mut() {
            Some(feed) => feed.still().await,
            None => return Err(Error::internal("camera open without a live feed")),
        };

        match frame {
            Ok(photo) if photo.is_empty() => {
                self.status = Some(StatusMessage::error("Failed to capture image"));
                Err(Error::capture_failed("empty frame"))
            }
            Ok(photo) => {
                self.feed = None;
                self.install_photo(photo);
                Ok(())
            }
            Err(e) => {
                self.status = Some(StatusMessage::error("Failed to capture image"));
                Err(e)
            }
        }
    }

    /// Close the camera without taking a photo.
    ///
    /// # Errors
    ///
    /// Returns an error if called outside [`Mode::CameraOpen`].
    pub fn close_camera(&mut self) -> Result<()> {
        if self.mode != Mode::CameraOpen {
            return Err(Error::invalid_action("close the camera", self.mode.as_str()));
        }
        self.feed = None;
        self.enter_idle();
        Ok(())
    }

    /// Use an image file from local storage instead of the camera.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload is not image-typed or if called
    /// outside [`Mode::Idle`].
    pub fn select_file(&mut self, photo: Photo) -> Result<()> {
        self.reject_if_completed()?;
        if self.mode != Mode::Idle {
            return Err(Error::invalid_action("select a file", self.mode.as_str()));
        }
        if !photo.mime.starts_with("image/") {
            let err = Error::capture_failed(format!("{} is not an image type", photo.mime));
            self.status = Some(StatusMessage::error(err.to_string()));
            return Err(err);
        }
        self.install_photo(photo);
        Ok(())
    }

    /// Discard the held photo and return to idle.
    ///
    /// # Errors
    ///
    /// Returns an error if called outside [`Mode::PreviewReady`].
    pub fn clear_photo(&mut self) -> Result<()> {
        if self.mode != Mode::PreviewReady {
            return Err(Error::invalid_action("clear the photo", self.mode.as_str()));
        }
        self.release_preview();
        self.photo = None;
        self.enter_idle();
        Ok(())
    }

    /// Submit the held photo to the clock-in endpoint.
    ///
    /// At most one submission is in flight at a time; a submit observed
    /// while one is already in flight is ignored and dispatches nothing.
    /// On success the workflow completes; on any failure the photo is
    /// retained and the user may submit again.
    ///
    /// # Errors
    ///
    /// Returns the transport or rejection error on failure, or an
    /// invalid-action error outside [`Mode::PreviewReady`].
    pub async fn submit(&mut self) -> Result<()> {
        match self.mode {
            Mode::Submitting => {
                warn!("submit ignored; a submission is already in flight");
                return Ok(());
            }
            Mode::Completed => return Err(Error::AlreadyClockedIn),
            Mode::PreviewReady => {}
            other => return Err(Error::invalid_action("submit", other.as_str())),
        }

        let Some(photo) = self.photo.take() else {
            self.status = Some(StatusMessage::error("Please select or take a photo first."));
            return Ok(());
        };

        self.mode = Mode::Submitting;
        self.status = None;
        debug!(
            source = %photo.source,
            bytes = photo.len(),
            hash = %photo.content_hash,
            "submitting clock-in"
        );

        let result = self.api.clock_in(&photo).await;
        match result {
            Ok(()) => {
                info!("clock-in accepted");
                self.has_attended_today = true;
                self.complete(StatusMessage::success("Attendance submitted successfully."));
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "clock-in failed; photo retained for retry");
                self.photo = Some(photo);
                self.mode = Mode::PreviewReady;
                self.status = Some(StatusMessage::error("Failed to submit attendance."));
                Err(e)
            }
        }
    }

    /// Install a freshly acquired photo and enter preview.
    ///
    /// Any superseded preview handle is released before the new one is
    /// registered.
    fn install_photo(&mut self, photo: Photo) {
        self.release_preview();
        let handle = self.previews.register(photo.len());
        debug!(preview = %handle.uri(), bytes = photo.len(), "photo ready for preview");
        self.photo = Some(photo);
        self.preview = Some(handle);
        self.mode = Mode::PreviewReady;
        self.status = None;
    }

    fn release_preview(&mut self) {
        if let Some(mut handle) = self.preview.take() {
            handle.release();
        }
    }

    fn enter_idle(&mut self) {
        self.mode = Mode::Idle;
        self.status = None;
    }

    fn complete(&mut self, status: StatusMessage) {
        self.release_preview();
        self.photo = None;
        self.feed = None;
        self.mode = Mode::Completed;
        self.status = Some(status);
    }

    fn reject_if_completed(&self) -> Result<()> {
        if self.mode == Mode::Completed {
            return Err(Error::AlreadyClockedIn);
        }
        Ok(())
    }
}
