//! Wire types for the attendance and user services.
//!
//! Field names mirror the backend's camelCase JSON. Records carry more or
//! less detail depending on the endpoint (the caller's own history omits the
//! user, the admin listing includes it), so the extras are optional.

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Lateness verdict computed by the attendance service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordStatus {
    /// Clocked in after the cutoff.
    Late,
    /// Clocked in before the cutoff.
    #[serde(rename = "On Time")]
    OnTime,
}

impl std::fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Late => write!(f, "Late"),
            Self::OnTime => write!(f, "On Time"),
        }
    }
}

/// One attendance record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    /// Record id.
    #[serde(default)]
    pub id: Option<i64>,

    /// When the photo was submitted.
    pub clock_in_time: DateTime<Utc>,

    /// Where the stored photo can be fetched from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,

    /// Lateness verdict, when the endpoint includes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<RecordStatus>,

    /// The employee the record belongs to (admin listing only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<Employee>,
}

impl AttendanceRecord {
    /// Check whether this record falls on the given local calendar day.
    ///
    /// This is a best-effort client-side hint; the service applies its own
    /// day boundary at submission time.
    #[must_use]
    pub fn is_on_local_day(&self, day: NaiveDate) -> bool {
        self.clock_in_time.with_timezone(&Local).date_naive() == day
    }
}

/// Check whether any record falls on the given local calendar day.
#[must_use]
pub fn attended_on(records: &[AttendanceRecord], day: NaiveDate) -> bool {
    records.iter().any(|record| record.is_on_local_day(day))
}

/// Pagination metadata returned by list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    /// Total records across all pages.
    pub total_items: u64,
    /// Total pages at the requested page size.
    pub total_pages: u64,
    /// The page this response covers (1-based).
    pub current_page: u64,
    /// Records per page.
    pub page_size: u64,
}

/// A page of records with its metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    /// The records on this page.
    pub data: Vec<T>,
    /// Pagination metadata.
    pub meta: PageMeta,
}

/// An unpaginated response body (`{ "data": [...] }`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// The payload.
    pub data: T,
}

/// Record filter accepted by the admin listing endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordFilter {
    /// All records.
    #[default]
    All,
    /// Records from today.
    Today,
    /// Records from the current week.
    ThisWeek,
}

impl RecordFilter {
    /// The value the backend expects in the `filter` query parameter.
    #[must_use]
    pub fn query_value(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Today => "today",
            Self::ThisWeek => "thisWeek",
        }
    }
}

impl std::fmt::Display for RecordFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.query_value())
    }
}

/// Employee account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmployeeRole {
    /// Administrator account.
    Admin,
    /// Regular employee account.
    #[default]
    Employee,
}

impl std::fmt::Display for EmployeeRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::Employee => write!(f, "employee"),
        }
    }
}

/// An employee account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    /// Account id.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// Account role.
    pub role: EmployeeRole,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the account was last updated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Payload for creating an employee account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEmployee {
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// Initial password.
    pub password: String,
    /// Account role.
    pub role: EmployeeRole,
}

/// Payload for updating an employee account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeUpdate {
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// Account role.
    pub role: EmployeeRole,
    /// New password, if it should change.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}
