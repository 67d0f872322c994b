//! Create/update logic behind the record form.
//!
//! Submitting is split into two phases so that the user's yes/no decision
//! stays outside the core logic:
//!
//! 1. [`propose`] validates the form against the current collection and
//!    describes what would happen, without touching anything.
//! 2. [`apply`] carries out a [`Proposal`] once the caller has a
//!    [`Decision`], mutating the in-memory collection.
//!
//! Duplicate numbers are handled differently per mode: editing into another
//! record's number is rejected outright, while creating with an existing
//! number proposes a redirect that needs confirmation.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::error::{Error, Result};
use crate::record::{Record, RecordFields, RecordId, Status};

/// Prompt shown before a create is redirected into an update.
pub const REDIRECT_PROMPT: &str =
    "A record with this DWG Number already exists. Do you want to update that existing record instead?";

/// Editable form state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordForm {
    /// Record the next submission updates; `None` means create mode.
    pub editing_id: Option<RecordId>,
    /// DWG Number input.
    pub dwg_number: String,
    /// DWG Name input.
    pub dwg_name: String,
    /// Status selector.
    pub status: Status,
    /// Notes input.
    pub notes: String,
}

impl RecordForm {
    /// A blank create-mode form.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A form populated from `record`, in edit mode for its id.
    #[must_use]
    pub fn for_record(record: &Record) -> Self {
        Self {
            editing_id: Some(record.id),
            dwg_number: record.dwg_number.clone(),
            dwg_name: record.dwg_name.clone(),
            status: record.status,
            notes: record.notes.clone(),
        }
    }

    /// Blank every field and return to create mode.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// True when a submission would update an existing record.
    #[must_use]
    pub fn is_editing(&self) -> bool {
        self.editing_id.is_some()
    }

    /// Trim the inputs and check the required ones.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingRequiredFields`] if the number or name is
    /// empty after trimming.
    pub fn validate(&self) -> Result<RecordFields> {
        let dwg_number = self.dwg_number.trim();
        let dwg_name = self.dwg_name.trim();
        if dwg_number.is_empty() || dwg_name.is_empty() {
            return Err(Error::MissingRequiredFields);
        }

        Ok(RecordFields {
            dwg_number: dwg_number.to_string(),
            dwg_name: dwg_name.to_string(),
            status: self.status,
            notes: self.notes.trim().to_string(),
        })
    }
}

/// What a submission would do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Proposal {
    /// Append a new record.
    Create(RecordFields),
    /// Overwrite the record being edited.
    Update {
        /// Target record.
        id: RecordId,
        /// New field values.
        fields: RecordFields,
    },
    /// A create whose number already exists; update that record instead,
    /// but only if the user agrees.
    ConfirmRedirect {
        /// The existing record with the same number.
        existing: RecordId,
        /// New field values.
        fields: RecordFields,
    },
}

impl Proposal {
    /// The question to put to the user before applying, if any.
    #[must_use]
    pub fn confirmation_prompt(&self) -> Option<&'static str> {
        match self {
            Self::ConfirmRedirect { .. } => Some(REDIRECT_PROMPT),
            Self::Create(_) | Self::Update { .. } => None,
        }
    }

    /// The fields this proposal would write.
    #[must_use]
    pub fn fields(&self) -> &RecordFields {
        match self {
            Self::Create(fields)
            | Self::Update { fields, .. }
            | Self::ConfirmRedirect { fields, .. } => fields,
        }
    }
}

/// The user's answer to a proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Go ahead.
    Proceed,
    /// Leave everything as it is.
    Abort,
}

impl From<bool> for Decision {
    fn from(confirmed: bool) -> Self {
        if confirmed {
            Self::Proceed
        } else {
            Self::Abort
        }
    }
}

/// Result of applying a proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A new record was appended.
    Created(RecordId),
    /// The edited record was overwritten.
    Updated(RecordId),
    /// A create was redirected into an update of an existing record.
    Redirected(RecordId),
    /// Nothing changed.
    Aborted,
}

impl Outcome {
    /// Message to show the user after a successful write.
    #[must_use]
    pub fn message(&self) -> Option<&'static str> {
        match self {
            Self::Created(_) => Some("DWG saved successfully."),
            Self::Updated(_) => Some("DWG updated successfully."),
            Self::Redirected(_) => Some("Existing DWG updated."),
            Self::Aborted => None,
        }
    }

    /// The record that was written, if any.
    #[must_use]
    pub fn record_id(&self) -> Option<RecordId> {
        match self {
            Self::Created(id) | Self::Updated(id) | Self::Redirected(id) => Some(*id),
            Self::Aborted => None,
        }
    }

    /// True when the collection changed.
    #[must_use]
    pub fn is_applied(&self) -> bool {
        !matches!(self, Self::Aborted)
    }
}

fn position(records: &[Record], id: RecordId) -> Result<usize> {
    records
        .iter()
        .position(|r| r.id == id)
        .ok_or(Error::RecordNotFound { id })
}

/// Index of the record an update writes to, provided no other record has
/// taken the new number in the meantime.
fn overwrite_target(records: &[Record], id: RecordId, fields: &RecordFields) -> Result<usize> {
    let idx = position(records, id)?;
    if records
        .iter()
        .any(|r| r.id != id && r.number_matches(&fields.dwg_number))
    {
        return Err(Error::duplicate_number(fields.dwg_number.clone()));
    }
    Ok(idx)
}

/// Work out what submitting `form` against `records` would do.
///
/// # Errors
///
/// - [`Error::MissingRequiredFields`] if validation fails.
/// - [`Error::RecordNotFound`] if the form edits an id that is gone.
/// - [`Error::DuplicateNumber`] if an edit takes another record's number.
pub fn propose(form: &RecordForm, records: &[Record]) -> Result<Proposal> {
    let fields = form.validate()?;

    if let Some(id) = form.editing_id {
        position(records, id)?;

        let clash = records
            .iter()
            .any(|r| r.id != id && r.number_matches(&fields.dwg_number));
        if clash {
            return Err(Error::duplicate_number(fields.dwg_number));
        }

        return Ok(Proposal::Update { id, fields });
    }

    match records.iter().find(|r| r.number_matches(&fields.dwg_number)) {
        Some(existing) => {
            debug!(
                "DWG Number {} already used by record {}",
                fields.dwg_number, existing.id
            );
            Ok(Proposal::ConfirmRedirect {
                existing: existing.id,
                fields,
            })
        }
        None => Ok(Proposal::Create(fields)),
    }
}

/// Carry out `proposal` on `records`.
///
/// `new_id` is called only when a record is created, with the collection as
/// it stands before the append.
///
/// # Errors
///
/// - [`Error::RecordNotFound`] if the target record disappeared since the
///   proposal was made.
/// - [`Error::DuplicateNumber`] if the new number now belongs to a record
///   other than the one being written, because of a change made since the
///   proposal.
pub fn apply(
    proposal: Proposal,
    decision: Decision,
    records: &mut Vec<Record>,
    new_id: impl FnOnce(&[Record]) -> RecordId,
    now: DateTime<Utc>,
) -> Result<Outcome> {
    if decision == Decision::Abort {
        return Ok(Outcome::Aborted);
    }

    match proposal {
        Proposal::Create(fields) => {
            if records.iter().any(|r| r.number_matches(&fields.dwg_number)) {
                return Err(Error::duplicate_number(fields.dwg_number));
            }
            let id = new_id(records.as_slice());
            records.push(Record::new(id, fields, now));
            Ok(Outcome::Created(id))
        }
        Proposal::Update { id, fields } => {
            let idx = overwrite_target(records, id, &fields)?;
            records[idx].apply_fields(&fields);
            Ok(Outcome::Updated(id))
        }
        Proposal::ConfirmRedirect { existing, fields } => {
            let idx = overwrite_target(records, existing, &fields)?;
            records[idx].apply_fields(&fields);
            Ok(Outcome::Redirected(existing))
        }
    }
}
