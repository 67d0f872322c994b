//! Command-line interface for dwgtracker.
//!
//! This module provides the CLI structure and command handlers for the
//! `dwgrec` binary.

mod commands;

use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    AddCommand, ClearCommand, ConfigCommand, EditCommand, ListCommand, ShowCommand, StatusCommand,
};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::form::Outcome;
use crate::logging::Verbosity;
use crate::prompt::Prompt;
use crate::render;
use crate::storage::Backend;
use crate::tracker::Tracker;

/// dwgrec - Keep track of your drawings
///
/// A local record keeper for drawing (DWG) documents: number, name, status
/// and notes, stored on this machine.
#[derive(Debug, Parser)]
#[command(name = "dwgrec")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
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
    /// Add a drawing record
    Add(AddCommand),

    /// Edit an existing record
    Edit(EditCommand),

    /// List records, newest first
    List(ListCommand),

    /// Show one record
    Show(ShowCommand),

    /// Delete every record
    Clear(ClearCommand),

    /// Show storage status and record counts
    Status(StatusCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.verbose, self.quiet)
    }
}

/// Run a command against a tracker.
///
/// Confirmations and result messages go through `prompt`; listings and
/// reports are written to `out`. `config` commands read the default
/// configuration file; use [`handle_config`] to honour `--config`.
///
/// # Errors
///
/// Returns validation, duplicate, not-found, storage, and I/O errors.
pub fn execute<B, P, W>(
    command: Command,
    tracker: &mut Tracker<B>,
    config: &Config,
    prompt: &mut P,
    out: &mut W,
) -> Result<()>
where
    B: Backend,
    P: Prompt,
    W: Write,
{
    match command {
        Command::Add(cmd) => handle_add(cmd, tracker, prompt, out),
        Command::Edit(cmd) => handle_edit(cmd, tracker, prompt),
        Command::List(cmd) => handle_list(cmd, tracker, config, out),
        Command::Show(cmd) => {
            let record = tracker
                .find(cmd.id)
                .ok_or(Error::RecordNotFound { id: cmd.id })?;
            let text = render::render_record(&record, cmd.json, &config.display.date_format)?;
            writeln!(out, "{text}")?;
            Ok(())
        }
        Command::Clear(_) => {
            if !tracker.clear_all(prompt)? {
                writeln!(out, "Nothing was deleted.")?;
            }
            Ok(())
        }
        Command::Status(cmd) => handle_status(tracker, config, cmd.json, out),
        Command::Config(cmd) => handle_config(None, cmd, out),
    }
}

fn handle_add<B: Backend, P: Prompt, W: Write>(
    cmd: AddCommand,
    tracker: &mut Tracker<B>,
    prompt: &mut P,
    out: &mut W,
) -> Result<()> {
    tracker.reset_form();
    let form = tracker.form_mut();
    form.dwg_number = cmd.number;
    form.dwg_name = cmd.name;
    form.status = cmd.status;
    form.notes = cmd.notes.unwrap_or_default();

    match tracker.submit(prompt)? {
        Outcome::Aborted => writeln!(out, "No changes made.")?,
        Outcome::Created(id) | Outcome::Updated(id) | Outcome::Redirected(id) => {
            writeln!(out, "Record id: {id}")?;
        }
    }
    Ok(())
}

fn handle_edit<B: Backend, P: Prompt>(
    cmd: EditCommand,
    tracker: &mut Tracker<B>,
    prompt: &mut P,
) -> Result<()> {
    if !tracker.select(cmd.id) {
        return Err(Error::RecordNotFound { id: cmd.id });
    }

    let form = tracker.form_mut();
    if let Some(number) = cmd.number {
        form.dwg_number = number;
    }
    if let Some(name) = cmd.name {
        form.dwg_name = name;
    }
    if let Some(status) = cmd.status {
        form.status = status;
    }
    if let Some(notes) = cmd.notes {
        form.notes = notes;
    }

    tracker.submit(prompt)?;
    Ok(())
}

fn handle_list<B: Backend, W: Write>(
    cmd: ListCommand,
    tracker: &mut Tracker<B>,
    config: &Config,
    out: &mut W,
) -> Result<()> {
    tracker.set_search(cmd.search.unwrap_or_default());
    let view = tracker.set_status_filter(cmd.status);

    let format = cmd.format.unwrap_or(config.display.default_format);
    let text = render::render_view(&view, format, &config.display.date_format)?;
    writeln!(out, "{text}")?;
    Ok(())
}

fn handle_status<B: Backend, W: Write>(
    tracker: &Tracker<B>,
    config: &Config,
    json: bool,
    out: &mut W,
) -> Result<()> {
    let stats = tracker.store().stats();
    let size = tracker.store().backend().size_bytes();

    if json {
        let by_status: serde_json::Map<String, serde_json::Value> = stats
            .by_status
            .iter()
            .map(|(status, count)| (status.to_string(), (*count).into()))
            .collect();
        let status = serde_json::json!({
            "database_path": config.database_path(),
            "database_size_bytes": size,
            "slot_key": tracker.store().key(),
            "total_records": stats.total_records,
            "by_status": by_status,
            "oldest_record": stats.oldest_record,
            "newest_record": stats.newest_record,
        });
        writeln!(out, "{}", serde_json::to_string_pretty(&status)?)?;
        return Ok(());
    }

    let date = |at: Option<chrono::DateTime<chrono::Utc>>| {
        at.map_or_else(|| "-".to_string(), crate::record::format_timestamp)
    };

    writeln!(out, "dwgrec status")?;
    writeln!(out, "-------------")?;
    writeln!(out, "Database:      {}", config.database_path().display())?;
    if let Some(size) = size {
        writeln!(out, "Size:          {}", format_size(size))?;
    }
    writeln!(out, "Slot:          {}", tracker.store().key())?;
    writeln!(out, "Records:       {}", stats.total_records)?;
    for (status, count) in &stats.by_status {
        writeln!(out, "  {:<12} {count}", status.label())?;
    }
    writeln!(out, "Oldest:        {}", date(stats.oldest_record))?;
    writeln!(out, "Newest:        {}", date(stats.newest_record))?;
    Ok(())
}

/// Human-readable byte count.
fn format_size(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = KIB * 1024;

    let (unit, name) = match bytes {
        b if b >= MIB => (MIB, "MiB"),
        b if b >= KIB => (KIB, "KiB"),
        _ => return format!("{bytes} bytes"),
    };
    format!("{}.{} {name}", bytes / unit, bytes % unit * 10 / unit)
}

/// Handle `config` subcommands. These never touch the record store.
///
/// The configuration is loaded here rather than up front, so `validate` can
/// report on a file that would stop every other command from starting.
/// `config_path` is the global `--config` value.
///
/// # Errors
///
/// Returns the load or validation error when `show` or `validate` meets an
/// invalid configuration, or an I/O error if output cannot be written.
pub fn handle_config<W: Write>(
    config_path: Option<PathBuf>,
    cmd: ConfigCommand,
    out: &mut W,
) -> Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            let config = Config::load_from(config_path)?;
            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(&config)?)?;
            } else {
                writeln!(out, "Current Configuration")?;
                writeln!(out, "=====================")?;
                writeln!(out)?;
                writeln!(out, "[Storage]")?;
                writeln!(out, "  Database path:   {}", config.database_path().display())?;
                writeln!(out, "  Slot key:        {}", config.storage.slot_key)?;
                writeln!(out)?;
                writeln!(out, "[Display]")?;
                writeln!(
                    out,
                    "  Default format:  {:?}",
                    config.display.default_format
                )?;
                writeln!(out, "  Date format:     {}", config.display.date_format)?;
            }
        }
        ConfigCommand::Path => {
            let path = config_path.unwrap_or_else(Config::default_config_path);
            writeln!(out, "{}", path.display())?;
        }
        ConfigCommand::Validate { file } => {
            let path = file
                .or(config_path)
                .unwrap_or_else(Config::default_config_path);
            writeln!(out, "Validating configuration: {}", path.display())?;
            Config::load_from(Some(path))?;
            writeln!(out, "Configuration is valid.")?;
        }
    }
    Ok(())
}
