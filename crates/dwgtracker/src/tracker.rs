//! Session state tying the store, the form and the filters together.
//!
//! A [`Tracker`] holds no copy of the records: every view and every write
//! starts from a fresh [`RecordStore::load`].

use chrono::Utc;
use tracing::{debug, info};

use crate::error::Result;
use crate::form::{self, Decision, Outcome, Proposal, RecordForm};
use crate::prompt::Prompt;
use crate::query::{Query, StatusFilter, View};
use crate::record::{Record, RecordId};
use crate::storage::{Backend, RecordStore};

/// Confirmation asked before deleting every record.
pub const CLEAR_ALL_PROMPT: &str =
    "This will delete ALL DWG records stored on this machine. Are you sure?";

/// Message shown after a bulk clear.
pub const CLEARED_MESSAGE: &str = "All records cleared.";

/// Record store plus form and filter state.
#[derive(Debug)]
pub struct Tracker<B> {
    store: RecordStore<B>,
    form: RecordForm,
    query: Query,
}

impl<B: Backend> Tracker<B> {
    /// Start a session with a blank form and no filters.
    pub fn new(store: RecordStore<B>) -> Self {
        Self {
            store,
            form: RecordForm::new(),
            query: Query::default(),
        }
    }

    /// The underlying store.
    #[must_use]
    pub fn store(&self) -> &RecordStore<B> {
        &self.store
    }

    /// Current form state.
    #[must_use]
    pub fn form(&self) -> &RecordForm {
        &self.form
    }

    /// Mutable access to the form inputs.
    pub fn form_mut(&mut self) -> &mut RecordForm {
        &mut self.form
    }

    /// Current filter state.
    #[must_use]
    pub fn query(&self) -> &Query {
        &self.query
    }

    /// All stored records, in stored order.
    #[must_use]
    pub fn records(&self) -> Vec<Record> {
        self.store.load()
    }

    /// Look up one stored record.
    #[must_use]
    pub fn find(&self, id: RecordId) -> Option<Record> {
        self.store.load().into_iter().find(|r| r.id == id)
    }

    /// Build the display view from the current filters.
    #[must_use]
    pub fn view(&self) -> View {
        self.query.apply(self.store.load())
    }

    /// Change the search text and rebuild the view.
    pub fn set_search(&mut self, search: impl Into<String>) -> View {
        self.query.search = search.into();
        self.view()
    }

    /// Change the status filter and rebuild the view.
    pub fn set_status_filter(&mut self, status: StatusFilter) -> View {
        self.query.status = status;
        self.view()
    }

    /// Reset both filters and rebuild the view.
    pub fn clear_filters(&mut self) -> View {
        self.query = Query::default();
        self.view()
    }

    /// Load a record into the form for editing.
    ///
    /// Returns `false`, leaving the form untouched, if no record has that id.
    pub fn select(&mut self, id: RecordId) -> bool {
        match self.find(id) {
            Some(record) => {
                debug!("Editing record {}", id);
                self.form = RecordForm::for_record(&record);
                true
            }
            None => false,
        }
    }

    /// Blank the form and return to create mode.
    pub fn reset_form(&mut self) {
        self.form.reset();
    }

    /// First phase of a submission: describe what it would do.
    ///
    /// # Errors
    ///
    /// Returns validation, duplicate, or stale-record errors from
    /// [`form::propose`]. Nothing is written.
    pub fn propose_submit(&self) -> Result<Proposal> {
        form::propose(&self.form, &self.store.load())
    }

    /// Second phase of a submission: apply or abort.
    ///
    /// On success the collection is saved and the form reset. On abort the
    /// form keeps its contents.
    ///
    /// # Errors
    ///
    /// Returns an error if the proposal no longer fits the stored records or
    /// the save fails.
    pub fn apply(&mut self, proposal: Proposal, decision: Decision) -> Result<Outcome> {
        let mut records = self.store.load();
        let store = &mut self.store;
        let outcome = form::apply(
            proposal,
            decision,
            &mut records,
            |existing| store.generate_id(existing),
            Utc::now(),
        )?;

        if outcome.is_applied() {
            self.store.save(&records)?;
            info!("Submission applied: {:?}", outcome);
            self.form.reset();
        } else {
            debug!("Submission aborted");
        }
        Ok(outcome)
    }

    /// Submit the form, asking `prompt` whenever a decision is needed and
    /// alerting the success message.
    ///
    /// # Errors
    ///
    /// Same as [`Self::propose_submit`] and [`Self::apply`].
    pub fn submit(&mut self, prompt: &mut impl Prompt) -> Result<Outcome> {
        let proposal = self.propose_submit()?;
        let decision = match proposal.confirmation_prompt() {
            Some(question) => Decision::from(prompt.confirm(question)),
            None => Decision::Proceed,
        };

        let outcome = self.apply(proposal, decision)?;
        if let Some(message) = outcome.message() {
            prompt.alert(message);
        }
        Ok(outcome)
    }

    /// Delete every record after confirmation, resetting the form.
    ///
    /// Returns whether anything was cleared.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be cleared.
    pub fn clear_all(&mut self, prompt: &mut impl Prompt) -> Result<bool> {
        if !prompt.confirm(CLEAR_ALL_PROMPT) {
            return Ok(false);
        }

        self.store.clear()?;
        self.form.reset();
        prompt.alert(CLEARED_MESSAGE);
        Ok(true)
    }
}
