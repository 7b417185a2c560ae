//! `punchcard` - A headless client for photo-verified daily attendance
//!
//! This library provides the capture workflow (camera or file upload, local
//! preview, one clock-in per day) and HTTP clients for the attendance and
//! user-management services.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod camera;
pub mod capture;
pub mod cli;
pub mod client;
pub mod config;
pub mod credentials;
pub mod error;
pub mod logging;
pub mod preview;
pub mod records;
pub mod workflow;

pub use camera::{CameraDevice, CameraFeed, NoCamera, SpoolDevice};
pub use capture::{Photo, PhotoSource};
pub use client::{AttendanceClient, EmployeeClient};
pub use config::Config;
pub use credentials::{CredentialProvider, StaticToken, TokenFile};
pub use error::{Error, Result};
pub use logging::init_logging;
pub use preview::{PreviewHandle, PreviewTracker};
pub use records::{AttendanceRecord, Employee, EmployeeRole, NewEmployee, RecordFilter};
pub use workflow::{AttendanceApi, CaptureWorkflow, Mode, Severity, StatusMessage};
