//! Command-line interface for punchcard.
//!
//! This module provides the CLI structure and command handlers for the
//! `punchc` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    ClockInCommand, ConfigCommand, EmployeeCommand, FilterArg, HistoryCommand, RecordsCommand,
    RoleArg,
};

/// punchc - Daily attendance with a photo
///
/// A headless client for the attendance service: capture or upload a
/// photo, clock in once per day, and browse records.
#[derive(Debug, Parser)]
#[command(name = "punchc")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Submit today's attendance photo
    ClockIn(ClockInCommand),

    /// Show your own attendance history
    History(HistoryCommand),

    /// List all attendance records (admin)
    Records(RecordsCommand),

    /// Manage employee accounts (admin)
    #[command(subcommand)]
    Employee(EmployeeCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}
