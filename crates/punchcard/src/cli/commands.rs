//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::records::{EmployeeRole, RecordFilter};

/// Clock-in command arguments.
#[derive(Debug, Args)]
pub struct ClockInCommand {
    /// Submit this image file instead of capturing from the camera
    #[arg(short, long, value_name = "FILE", conflicts_with = "camera")]
    pub photo: Option<PathBuf>,

    /// Capture from the configured camera (the default)
    #[arg(long)]
    pub camera: bool,
}

/// History command arguments.
#[derive(Debug, Args)]
pub struct HistoryCommand {
    /// Maximum number of records to show
    #[arg(short, long, default_value = "20")]
    pub limit: usize,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Records command arguments (admin listing).
#[derive(Debug, Args)]
pub struct RecordsCommand {
    /// Which records to include
    #[arg(short, long, value_enum, default_value = "all")]
    pub filter: FilterArg,

    /// Page to fetch (1-based)
    #[arg(short, long, default_value = "1")]
    pub page: u64,

    /// Records per page
    #[arg(long, default_value = "5")]
    pub page_size: u64,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Employee management commands.
#[derive(Debug, Subcommand)]
pub enum EmployeeCommand {
    /// List employee accounts
    List {
        /// Page to fetch (1-based)
        #[arg(short, long, default_value = "1")]
        page: u64,

        /// Accounts per page
        #[arg(long, default_value = "5")]
        page_size: u64,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Create an employee account
    Add {
        /// Display name
        #[arg(short, long)]
        name: String,

        /// Login email
        #[arg(short, long)]
        email: String,

        /// Initial password
        #[arg(short, long)]
        password: String,

        /// Account role
        #[arg(short, long, value_enum, default_value = "employee")]
        role: RoleArg,
    },

    /// Update an employee account
    Update {
        /// Account id
        id: i64,

        /// Display name
        #[arg(short, long)]
        name: String,

        /// Login email
        #[arg(short, long)]
        email: String,

        /// Account role
        #[arg(short, long, value_enum, default_value = "employee")]
        role: RoleArg,

        /// New password (omit to keep the current one)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Delete an employee account
    Remove {
        /// Account id
        id: i64,
    },
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Record filter argument for the admin listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum FilterArg {
    /// All records
    #[default]
    All,
    /// Records from today
    Today,
    /// Records from the current week
    ThisWeek,
}

impl From<FilterArg> for RecordFilter {
    fn from(arg: FilterArg) -> Self {
        match arg {
            FilterArg::All => Self::All,
            FilterArg::Today => Self::Today,
            FilterArg::ThisWeek => Self::ThisWeek,
        }
    }
}

/// Account role argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum RoleArg {
    /// Administrator account
    Admin,
    /// Regular employee account
    #[default]
    Employee,
}

impl From<RoleArg> for EmployeeRole {
    fn from(arg: RoleArg) -> Self {
        match arg {
            RoleArg::Admin => Self::Admin,
            RoleArg::Employee => Self::Employee,
        }
    }
}
