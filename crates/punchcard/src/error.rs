//! Error types for punchcard.
//!
//! This module defines all error types used throughout the punchcard crate,
//! providing detailed context for debugging and user-friendly error messages.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for punchcard operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Credential Errors ===
    /// Failed to read the token file.
    #[error("failed to read token file {path}: {source}")]
    CredentialRead {
        /// Path to the token file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// No bearer token is available.
    #[error("no bearer token available: {message}")]
    CredentialMissing {
        /// Description of where the token was expected.
        message: String,
    },

    // === Capture Errors ===
    /// The camera device could not be opened.
    #[error("camera unavailable: {message}")]
    CameraUnavailable {
        /// Description of what went wrong.
        message: String,
    },

    /// A frame could not be captured or a photo could not be loaded.
    #[error("capture failed: {message}")]
    CaptureFailed {
        /// Description of what went wrong.
        message: String,
    },

    // === Workflow Errors ===
    /// An action was attempted from a state that does not allow it.
    #[error("cannot {action} while {state}")]
    InvalidAction {
        /// The rejected action.
        action: &'static str,
        /// The state the workflow was in.
        state: &'static str,
    },

    /// Attendance has already been recorded for today.
    #[error("attendance already completed for today")]
    AlreadyClockedIn,

    // === Service Errors ===
    /// The HTTP transport failed (connect, timeout, body read).
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("service rejected request (HTTP {status}): {message}")]
    Rejected {
        /// The HTTP status code.
        status: u16,
        /// The server's message, or a generic description.
        message: String,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Generic Errors ===
    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for punchcard operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new camera-unavailable error.
    #[must_use]
    pub fn camera_unavailable(message: impl Into<String>) -> Self {
        Self::CameraUnavailable {
            message: message.into(),
        }
    }

    /// Create a new capture-failed error.
    #[must_use]
    pub fn capture_failed(message: impl Into<String>) -> Self {
        Self::CaptureFailed {
            message: message.into(),
        }
    }

    /// Create a new invalid-action error.
    #[must_use]
    pub fn invalid_action(action: &'static str, state: &'static str) -> Self {
        Self::InvalidAction { action, state }
    }

    /// Create a new credential-missing error.
    #[must_use]
    pub fn credential_missing(message: impl Into<String>) -> Self {
        Self::CredentialMissing {
            message: message.into(),
        }
    }

    /// Create a new service-rejection error.
    #[must_use]
    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        Self::Rejected {
            status,
            message: message.into(),
        }
    }

    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this error is a non-success answer from a service.
    #[must_use]
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }

    /// Check if this error means the camera device could not be opened.
    #[must_use]
    pub fn is_camera_unavailable(&self) -> bool {
        matches!(self, Self::CameraUnavailable { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::AlreadyClockedIn;
        assert_eq!(err.to_string(), "attendance already completed for today");

        let err = Error::camera_unavailable("device busy");
        assert_eq!(err.to_string(), "camera unavailable: device busy");
    }

    #[test]
    fn test_invalid_action_display() {
        let err = Error::invalid_action("submit", "idle");
        assert_eq!(err.to_string(), "cannot submit while idle");
    }

    #[test]
    fn test_rejected_display() {
        let err = Error::rejected(500, "internal server error");
        let msg = err.to_string();
        assert!(msg.contains("500"));
        assert!(msg.contains("internal server error"));
    }

    #[test]
    fn test_is_rejection() {
        assert!(Error::rejected(409, "duplicate").is_rejection());
        assert!(!Error::AlreadyClockedIn.is_rejection());
    }

    #[test]
    fn test_is_camera_unavailable() {
        assert!(Error::camera_unavailable("no device").is_camera_unavailable());
        assert!(!Error::capture_failed("empty frame").is_camera_unavailable());
    }

    #[test]
    fn test_credential_errors_display() {
        let err = Error::credential_missing("token file is empty");
        assert!(err.to_string().contains("token file is empty"));

        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err = Error::CredentialRead {
            path: PathBuf::from("/tmp/token"),
            source: io_err,
        };
        assert!(err.to_string().contains("/tmp/token"));
    }

    #[test]
    fn test_config_validation_display() {
        let err = Error::ConfigValidation {
            message: "attendance_url must not be empty".to_string(),
        };
        assert!(err.to_string().contains("attendance_url"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_json_error() {
        let json_result: std::result::Result<i32, serde_json::Error> =
            serde_json::from_str("not valid json");
        if let Err(json_err) = json_result {
            let err: Error = json_err.into();
            assert!(matches!(err, Error::Json(_)));
        }
    }

    #[test]
    fn test_internal_error() {
        let err = Error::internal("something went wrong");
        assert_eq!(err.to_string(), "internal error: something went wrong");
    }
}
