//! Text and JSON rendering of records and views.

use std::fmt::Write as _;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::query::View;
use crate::record::{Record, Status};

/// Shown instead of a table when the view is empty.
pub const EMPTY_STATE: &str = "No DWG records found.";

/// Default short date format, e.g. `Oct 18, 2026`.
pub const DEFAULT_DATE_FORMAT: &str = "%b %-d, %Y";

/// Output format for record listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One line per record
    Plain,
    /// Aligned table
    #[default]
    Table,
    /// JSON array
    Json,
}

/// Style class for a status badge.
#[must_use]
pub fn status_class(status: Status) -> &'static str {
    match status {
        Status::Planned => "status-planned",
        Status::InProgress => "status-progress",
        Status::Completed => "status-completed",
        Status::Archived => "status-archived",
    }
}

/// A record as JSON, with its status badge class added as `statusClass`.
///
/// # Errors
///
/// Returns an error if the record cannot be serialized.
pub fn record_json(record: &Record) -> Result<Value> {
    let mut value = serde_json::to_value(record)?;
    if let Value::Object(map) = &mut value {
        map.insert(
            "statusClass".to_string(),
            Value::from(status_class(record.status)),
        );
    }
    Ok(value)
}

/// Format a record's creation date; empty when missing or invalid.
#[must_use]
pub fn format_created(record: &Record, date_format: &str) -> String {
    let Some(at) = record.created_at_time() else {
        return String::new();
    };

    let mut out = String::new();
    if write!(out, "{}", at.format(date_format)).is_err() {
        return String::new();
    }
    out
}

/// Render a view in the requested format.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn render_view(view: &View, format: OutputFormat, date_format: &str) -> Result<String> {
    if format == OutputFormat::Json {
        let rows = view
            .rows()
            .iter()
            .map(record_json)
            .collect::<Result<Vec<_>>>()?;
        return Ok(serde_json::to_string_pretty(&rows)?);
    }
    if view.is_empty() {
        return Ok(EMPTY_STATE.to_string());
    }

    Ok(match format {
        OutputFormat::Plain => render_plain(view.rows(), date_format),
        OutputFormat::Table | OutputFormat::Json => render_table(view.rows(), date_format),
    })
}

fn render_plain(rows: &[Record], date_format: &str) -> String {
    rows.iter()
        .map(|r| {
            format!(
                "{}  {}  [{}]  {}  (id {})",
                r.dwg_number,
                r.dwg_name,
                r.status,
                format_created(r, date_format),
                r.id
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_table(rows: &[Record], date_format: &str) -> String {
    const HEADERS: [&str; 5] = ["ID", "DWG Number", "DWG Name", "Status", "Created"];

    let cells: Vec<[String; 5]> = rows
        .iter()
        .map(|r| {
            [
                r.id.to_string(),
                r.dwg_number.clone(),
                r.dwg_name.clone(),
                r.status.to_string(),
                format_created(r, date_format),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |values: Vec<&str>| {
        values
            .iter()
            .zip(widths)
            .map(|(v, w)| format!("{v:<w$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let dashes: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let mut out = vec![
        line(HEADERS.to_vec()),
        line(dashes.iter().map(String::as_str).collect()),
    ];
    out.extend(
        cells
            .iter()
            .map(|row| line(row.iter().map(String::as_str).collect())),
    );
    out.join("\n")
}

/// Render a single record for `show`.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn render_record(record: &Record, json: bool, date_format: &str) -> Result<String> {
    if json {
        return Ok(serde_json::to_string_pretty(&record_json(record)?)?);
    }

    let mut out = String::new();
    let _ = writeln!(out, "ID:          {}", record.id);
    let _ = writeln!(out, "DWG Number:  {}", record.dwg_number);
    let _ = writeln!(out, "DWG Name:    {}", record.dwg_name);
    let _ = writeln!(out, "Status:      {}", record.status);
    let _ = writeln!(out, "Created:     {}", format_created(record, date_format));
    let _ = write!(out, "Notes:       {}", record.notes);
    Ok(out)
}
