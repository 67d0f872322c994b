//! `dwgtracker` - A local record keeper for drawing (DWG) documents
//!
//! This library provides the record model, the persisted record store, the
//! create/edit form protocol with duplicate detection, and the filtered
//! views used by the `dwgrec` command-line tool.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod form;
pub mod logging;
pub mod prompt;
pub mod query;
pub mod record;
pub mod render;
pub mod storage;
pub mod tracker;

pub use config::Config;
pub use error::{Error, Result};
pub use form::{Decision, Outcome, Proposal, RecordForm};
pub use logging::init_logging;
pub use prompt::{Prompt, ScriptedPrompt, TerminalPrompt};
pub use query::{Query, StatusFilter, View};
pub use record::{Record, RecordFields, RecordId, Status};
pub use render::OutputFormat;
pub use storage::{Backend, MemoryBackend, RecordStore, SqliteBackend, StoreStats};
pub use tracker::Tracker;
