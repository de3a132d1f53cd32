//! Per-form sessions.
//!
//! A [`FormSession`] is the live counterpart of one open incident form: the
//! draft being edited field by field, the optional sections the reporter has
//! toggled off, and the submission state machine
//!
//! ```text
//! Editing -> Validating -> Editing        (validation failed, error shown)
//!                       -> Normalizing -> Submitted
//! ```
//!
//! The draft is mutable only in `Editing`. `Submitted` is terminal and is
//! reached only after the store accepts the write (or, for staged forms,
//! after the report lands in the session's staging area).

use crate::staging::StagingArea;
use crate::submit::ReportingService;
use crate::{CoreError, CoreResult};
use frr_report::{FieldValue, Report, SubmitMode};
use frr_store::{DocumentId, DocumentStore};
use frr_types::CategorySlug;
use std::collections::BTreeSet;

/// Where a session is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionStatus {
    Editing,
    Validating,
    Normalizing,
    Submitted,
}

/// What a successful session submit produced.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionOutcome {
    /// The report was written immediately; here is its id.
    Persisted(DocumentId),
    /// The report is staged in this session, awaiting the preview step.
    Staged,
}

/// One open incident form.
#[derive(Clone, Debug)]
pub struct FormSession {
    category: CategorySlug,
    draft: FieldValue,
    hidden_sections: BTreeSet<String>,
    reported_by: Option<String>,
    status: SessionStatus,
    staging: StagingArea,
}

impl FormSession {
    /// Opens a fresh session for a category with an empty draft.
    pub fn new(category: CategorySlug) -> Self {
        Self {
            category,
            draft: FieldValue::Mapping(Vec::new()),
            hidden_sections: BTreeSet::new(),
            reported_by: None,
            status: SessionStatus::Editing,
            staging: StagingArea::new(),
        }
    }

    /// Attaches the opaque user id from the authentication collaborator.
    pub fn with_reporter(mut self, reporter: impl Into<String>) -> Self {
        self.reported_by = Some(reporter.into());
        self
    }

    pub fn category(&self) -> &CategorySlug {
        &self.category
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn draft(&self) -> &FieldValue {
        &self.draft
    }

    /// The report staged by a `Stage`-mode submit, if any.
    pub fn staged(&self) -> Option<&Report> {
        self.staging.peek()
    }

    /// Sets one draft field.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::AlreadySubmitted`] once the session has reached
    /// its terminal state.
    pub fn set_field(&mut self, key: impl Into<String>, value: FieldValue) -> CoreResult<()> {
        self.ensure_editing()?;
        self.draft.set(key, value);
        Ok(())
    }

    /// Marks an optional section as hidden (its checkbox is off).
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::AlreadySubmitted`] after submission.
    pub fn hide_section(&mut self, name: impl Into<String>) -> CoreResult<()> {
        self.ensure_editing()?;
        self.hidden_sections.insert(name.into());
        Ok(())
    }

    /// Marks an optional section as visible again.
    pub fn show_section(&mut self, name: &str) -> CoreResult<()> {
        self.ensure_editing()?;
        self.hidden_sections.remove(name);
        Ok(())
    }

    /// Runs the submit pipeline for this session.
    ///
    /// On validation failure the session returns to `Editing` with the draft
    /// untouched, so the reporter can fix the missing fields and resubmit.
    ///
    /// # Errors
    ///
    /// - [`CoreError::AlreadySubmitted`] if the session already finished
    /// - [`CoreError::IncompleteReport`] when required fields are missing
    /// - [`CoreError::Store`] when the document store rejects the write
    pub fn submit<S: DocumentStore>(
        &mut self,
        service: &ReportingService<S>,
    ) -> CoreResult<SessionOutcome> {
        self.ensure_editing()?;

        self.status = SessionStatus::Validating;
        let profile = match service.profile(&self.category) {
            Ok(profile) => profile,
            Err(e) => {
                self.status = SessionStatus::Editing;
                return Err(e);
            }
        };

        if !service.check_complete(profile, &self.draft, &self.hidden_sections) {
            self.status = SessionStatus::Editing;
            return Err(CoreError::IncompleteReport);
        }

        self.status = SessionStatus::Normalizing;
        let report = service.normalize(
            profile,
            self.draft.clone(),
            &self.hidden_sections,
            self.reported_by.clone(),
        );

        match profile.submit_mode() {
            SubmitMode::Persist => match service.persist(report) {
                Ok(id) => {
                    self.status = SessionStatus::Submitted;
                    Ok(SessionOutcome::Persisted(id))
                }
                Err(e) => {
                    // The draft survives a store failure so the reporter can
                    // simply resubmit.
                    self.status = SessionStatus::Editing;
                    Err(e)
                }
            },
            SubmitMode::Stage => {
                self.staging.stage(report);
                self.status = SessionStatus::Submitted;
                Ok(SessionOutcome::Staged)
            }
        }
    }

    /// Persists the staged report (the preview screen's confirm action).
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NothingStaged`] if no report is staged.
    pub fn persist_staged<S: DocumentStore>(
        &mut self,
        service: &ReportingService<S>,
    ) -> CoreResult<DocumentId> {
        let report = self.staging.take().ok_or(CoreError::NothingStaged)?;
        match service.persist(report.clone()) {
            Ok(id) => Ok(id),
            Err(e) => {
                // Keep the report staged so the preview can retry.
                self.staging.stage(report);
                Err(e)
            }
        }
    }

    fn ensure_editing(&self) -> CoreResult<()> {
        if self.status == SessionStatus::Submitted {
            return Err(CoreError::AlreadySubmitted);
        }
        Ok(())
    }
}
