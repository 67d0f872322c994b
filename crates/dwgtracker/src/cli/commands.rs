//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::query::StatusFilter;
use crate::record::{RecordId, Status};
use crate::render::OutputFormat;

/// Add command arguments.
#[derive(Debug, Args)]
pub struct AddCommand {
    /// DWG Number (unique, case-insensitive)
    pub number: String,

    /// DWG Name
    pub name: String,

    /// Status: Planned, "In Progress", Completed or Archived
    #[arg(short, long, default_value = "Planned")]
    pub status: Status,

    /// Free-text notes
    #[arg(long)]
    pub notes: Option<String>,

    /// Update the existing record without asking if the number is taken
    #[arg(short, long)]
    pub yes: bool,
}

/// Edit command arguments.
///
/// Fields that are not given keep their stored values.
#[derive(Debug, Args)]
pub struct EditCommand {
    /// ID of the record to edit
    pub id: RecordId,

    /// New DWG Number
    #[arg(long)]
    pub number: Option<String>,

    /// New DWG Name
    #[arg(long)]
    pub name: Option<String>,

    /// New status
    #[arg(short, long)]
    pub status: Option<Status>,

    /// New notes (pass an empty string to clear them)
    #[arg(long)]
    pub notes: Option<String>,
}

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Case-insensitive text to find in number, name or notes
    #[arg(short, long)]
    pub search: Option<String>,

    /// Only show records with this status ("all" for every status)
    #[arg(long, default_value = "all")]
    pub status: StatusFilter,

    /// Output format (defaults to the configured format)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,
}

/// Show command arguments.
#[derive(Debug, Args)]
pub struct ShowCommand {
    /// ID of the record to show
    pub id: RecordId,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Clear command arguments.
#[derive(Debug, Args)]
pub struct ClearCommand {
    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
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
