//! `SQLite` schema for the slot database.
//!
//! The database is a small key-value slot table. Each slot holds one JSON
//! document; the record collection lives in a single slot. A `metadata`
//! row stamps the layout version so a newer layout is never misread.

use rusqlite::{Connection, OptionalExtension};
use tracing::debug;

use crate::error::{Error, Result};

/// Layout version written by this build.
pub const SCHEMA_VERSION: i32 = 1;

/// Metadata key holding [`SCHEMA_VERSION`].
const VERSION_KEY: &str = "schema_version";

/// SQL statement to create the slots table.
pub const CREATE_SLOTS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS slots (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
)
";

/// SQL statement to create the metadata table.
pub const CREATE_METADATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// Prepare a connection for slot storage.
///
/// Safe to call on every open: tables are created only when missing and a
/// fresh database is stamped with [`SCHEMA_VERSION`].
///
/// # Errors
///
/// Returns [`Error::UnsupportedSchema`] if the database carries any other
/// version, or a query error if the tables cannot be created.
pub fn initialize(conn: &Connection) -> Result<()> {
    conn.execute_batch(&format!("{CREATE_SLOTS_TABLE};{CREATE_METADATA_TABLE};"))?;

    let stamped: Option<String> = conn
        .query_row(
            "SELECT value FROM metadata WHERE key = ?1",
            [VERSION_KEY],
            |row| row.get(0),
        )
        .optional()?;

    match stamped {
        None => {
            conn.execute(
                "INSERT INTO metadata (key, value) VALUES (?1, ?2)",
                (VERSION_KEY, SCHEMA_VERSION.to_string()),
            )?;
            debug!("Stamped new database with schema version {}", SCHEMA_VERSION);
            Ok(())
        }
        Some(found) if found == SCHEMA_VERSION.to_string() => Ok(()),
        Some(found) => Err(Error::UnsupportedSchema {
            found,
            supported: SCHEMA_VERSION,
        }),
    }
}
