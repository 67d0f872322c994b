//! Storage layer for dwgtracker.
//!
//! Records are persisted as one JSON array inside a single named slot of a
//! key-value [`Backend`]. [`RecordStore`] reads and writes the whole
//! collection at once; there are no partial updates.

pub mod schema;
mod sqlite;

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::record::{Record, RecordId, Status};

pub use sqlite::SqliteBackend;

/// Default slot holding the record collection.
pub const DEFAULT_SLOT_KEY: &str = "dwgRecords";

/// A string key-value store, modelled on browser local storage.
pub trait Backend {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store cannot be written.
    fn set_item(&mut self, key: &str, value: &str) -> Result<()>;

    /// Delete `key`. Deleting a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store cannot be written.
    fn remove_item(&mut self, key: &str) -> Result<()>;

    /// Bytes used on disk, if the backend is file-based.
    fn size_bytes(&self) -> Option<u64> {
        None
    }
}

/// In-memory backend for tests and dry runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    items: HashMap<String, String>,
}

impl MemoryBackend {
    /// Create an empty backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a backend with one slot pre-populated.
    #[must_use]
    pub fn with_item(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut items = HashMap::new();
        items.insert(key.into(), value.into());
        Self { items }
    }
}

impl Backend for MemoryBackend {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        self.items.remove(key);
        Ok(())
    }
}

/// Whole-collection persistence for drawing records.
#[derive(Debug)]
pub struct RecordStore<B> {
    backend: B,
    key: String,
    last_issued: i64,
}

impl<B: Backend> RecordStore<B> {
    /// Create a store over the default slot.
    pub fn new(backend: B) -> Self {
        Self::with_key(backend, DEFAULT_SLOT_KEY)
    }

    /// Create a store over a custom slot.
    pub fn with_key(backend: B, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
            last_issued: i64::MIN,
        }
    }

    /// The slot key this store reads and writes.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The underlying backend.
    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Load every persisted record in stored order.
    ///
    /// Never fails: an absent slot, a backend read error, invalid JSON, or
    /// JSON that is not an array of records all yield an empty collection.
    #[must_use]
    pub fn load(&self) -> Vec<Record> {
        let raw = match self.backend.get_item(&self.key) {
            Ok(Some(raw)) if !raw.is_empty() => raw,
            Ok(_) => return Vec::new(),
            Err(e) => {
                warn!("Failed to read slot {}: {}", self.key, e);
                return Vec::new();
            }
        };

        let value: Value = match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                warn!("Failed to parse records in slot {}: {}", self.key, e);
                return Vec::new();
            }
        };

        if !value.is_array() {
            warn!("Slot {} does not hold an array, ignoring it", self.key);
            return Vec::new();
        }

        match serde_json::from_value::<Vec<Record>>(value) {
            Ok(records) => {
                debug!("Loaded {} records from slot {}", records.len(), self.key);
                records
            }
            Err(e) => {
                warn!("Malformed record in slot {}: {}", self.key, e);
                Vec::new()
            }
        }
    }

    /// Replace the persisted collection with `records`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the backend write fails.
    pub fn save(&mut self, records: &[Record]) -> Result<()> {
        let json = serde_json::to_string(records)?;
        self.backend.set_item(&self.key, &json)?;
        info!("Saved {} records", records.len());
        Ok(())
    }

    /// Delete every persisted record.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend write fails.
    pub fn clear(&mut self) -> Result<()> {
        self.backend.remove_item(&self.key)?;
        info!("Cleared all records from slot {}", self.key);
        Ok(())
    }

    /// Issue a fresh identifier.
    ///
    /// Based on the current time in milliseconds, but always greater than
    /// the last id this store issued and than every id in `existing`.
    pub fn generate_id(&mut self, existing: &[Record]) -> RecordId {
        let now = Utc::now().timestamp_millis();
        let above_existing = existing
            .iter()
            .map(|r| r.id.get())
            .max()
            .map_or(i64::MIN, |max| max.saturating_add(1));

        let next = now
            .max(self.last_issued.saturating_add(1))
            .max(above_existing);
        self.last_issued = next;
        RecordId::new(next)
    }

    /// Summarize the persisted collection.
    #[must_use]
    pub fn stats(&self) -> StoreStats {
        StoreStats::from_records(&self.load())
    }
}

/// Statistics about the stored records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreStats {
    /// Total number of records.
    pub total_records: usize,
    /// Record count per status, in [`Status::ALL`] order.
    pub by_status: Vec<(Status, usize)>,
    /// Earliest valid creation time.
    pub oldest_record: Option<DateTime<Utc>>,
    /// Latest valid creation time.
    pub newest_record: Option<DateTime<Utc>>,
}

impl StoreStats {
    /// Compute statistics for a collection.
    #[must_use]
    pub fn from_records(records: &[Record]) -> Self {
        let by_status = Status::ALL
            .into_iter()
            .map(|status| (status, records.iter().filter(|r| r.status == status).count()))
            .collect();
        let times = records.iter().filter_map(Record::created_at_time);

        Self {
            total_records: records.len(),
            by_status,
            oldest_record: times.clone().min(),
            newest_record: times.max(),
        }
    }
}
