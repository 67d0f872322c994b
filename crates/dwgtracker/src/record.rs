//! Core record types for dwgtracker.
//!
//! This module defines the drawing record as it is persisted, together with
//! its status enumeration and the set of fields a form submission may write.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::Error;

/// Stable identifier of a record.
///
/// Assigned once at creation and never changed afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(i64);

impl RecordId {
    /// Wrap a raw identifier value.
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// The raw identifier value.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecordId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// Lifecycle status of a drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Status {
    /// Not started yet.
    #[default]
    Planned,
    /// Being worked on.
    InProgress,
    /// Finished.
    Completed,
    /// Retired from active use.
    Archived,
}

impl Status {
    /// Every status, in display order.
    pub const ALL: [Self; 4] = [
        Self::Planned,
        Self::InProgress,
        Self::Completed,
        Self::Archived,
    ];

    /// The label used both for display and in the persisted JSON.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Planned => "Planned",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
            Self::Archived => "Archived",
        }
    }

    /// Decode a stored label, falling back to `Planned` for anything absent
    /// or unrecognized.
    #[must_use]
    pub fn from_stored(label: Option<&str>) -> Self {
        label
            .and_then(|l| Self::ALL.into_iter().find(|s| s.label() == l))
            .unwrap_or_default()
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Status {
    type Err = Error;

    /// Parse user input. Case-insensitive; `-` and `_` count as spaces.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', '_'], " ");
        Self::ALL
            .into_iter()
            .find(|status| status.label().to_lowercase() == normalized)
            .ok_or_else(|| Error::InvalidStatus(s.to_string()))
    }
}

impl Serialize for Status {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for Status {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(Self::from_stored(value.as_ref().and_then(Value::as_str)))
    }
}

/// Missing, null, or non-string values decode as an empty string.
fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => s,
        _ => String::new(),
    })
}

/// The fields a form submission writes. Everything except `id` and
/// `createdAt`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecordFields {
    /// Drawing number, trimmed and non-empty.
    pub dwg_number: String,
    /// Drawing name, trimmed and non-empty.
    pub dwg_name: String,
    /// Lifecycle status.
    pub status: Status,
    /// Free-text notes, trimmed, may be empty.
    pub notes: String,
}

/// A tracked drawing entry.
///
/// Field names serialize in camelCase to match the stored layout. Fields this
/// crate does not know about are kept in `extra` and written back untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// Unique, immutable identifier.
    pub id: RecordId,

    /// Drawing number, unique under case-insensitive comparison.
    #[serde(default, deserialize_with = "lenient_string")]
    pub dwg_number: String,

    /// Drawing name.
    #[serde(default, deserialize_with = "lenient_string")]
    pub dwg_name: String,

    /// Lifecycle status.
    #[serde(default)]
    pub status: Status,

    /// Optional notes.
    #[serde(default, deserialize_with = "lenient_string")]
    pub notes: String,

    /// ISO-8601 creation timestamp. Kept as the stored string so that
    /// unparseable values survive a round trip.
    #[serde(default, deserialize_with = "lenient_string")]
    pub created_at: String,

    /// Unknown stored fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Record {
    /// Build a new record from validated fields.
    #[must_use]
    pub fn new(id: RecordId, fields: RecordFields, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            dwg_number: fields.dwg_number,
            dwg_name: fields.dwg_name,
            status: fields.status,
            notes: fields.notes,
            created_at: format_timestamp(created_at),
            extra: Map::new(),
        }
    }

    /// Overwrite the mutable fields. `id` and `created_at` are untouched.
    pub fn apply_fields(&mut self, fields: &RecordFields) {
        self.dwg_number.clone_from(&fields.dwg_number);
        self.dwg_name.clone_from(&fields.dwg_name);
        self.status = fields.status;
        self.notes.clone_from(&fields.notes);
    }

    /// The mutable fields of this record.
    #[must_use]
    pub fn fields(&self) -> RecordFields {
        RecordFields {
            dwg_number: self.dwg_number.clone(),
            dwg_name: self.dwg_name.clone(),
            status: self.status,
            notes: self.notes.clone(),
        }
    }

    /// Parsed creation time, if the stored value is a valid timestamp.
    ///
    /// Accepts RFC 3339 and bare `YYYY-MM-DD` dates (read as UTC midnight).
    #[must_use]
    pub fn created_at_time(&self) -> Option<DateTime<Utc>> {
        let raw = self.created_at.trim();
        if raw.is_empty() {
            return None;
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
    }

    /// Creation time in Unix milliseconds; missing or invalid values are 0.
    #[must_use]
    pub fn created_at_millis(&self) -> i64 {
        self.created_at_time()
            .map_or(0, |dt| dt.timestamp_millis())
    }

    /// Case-insensitive comparison against this record's number. A record
    /// with an empty number never matches.
    #[must_use]
    pub fn number_matches(&self, dwg_number: &str) -> bool {
        !self.dwg_number.is_empty() && self.dwg_number.to_lowercase() == dwg_number.to_lowercase()
    }

    /// Lowercased search text: number, name and notes joined by spaces,
    /// with empty fields left out.
    #[must_use]
    pub fn haystack(&self) -> String {
        [&self.dwg_number, &self.dwg_name, &self.notes]
            .into_iter()
            .filter(|s| !s.is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase()
    }
}

/// Format a timestamp the way records store it (`2026-10-18T09:30:00.000Z`).
#[must_use]
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}
