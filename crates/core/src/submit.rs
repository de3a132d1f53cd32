//! The submit pipeline.
//!
//! This is the orchestration every form runs when the reporter presses
//! submit:
//!
//! 1. validate the draft against the form's active exception set (structural
//!    exceptions plus the keys of hidden optional sections);
//! 2. on failure, surface [`CoreError::IncompleteReport`]; the draft stays
//!    editable and nothing leaves the core;
//! 3. on success, fill placeholders, force hidden-section fields to the
//!    sentinel, and attach category/timestamp/reporter metadata;
//! 4. hand the frozen [`Report`] to the document store (`Persist` forms) or
//!    back to the caller for staging (`Stage` forms).
//!
//! Persistence failures are final from this layer's perspective: no retry,
//! no rollback of the caller's draft.

use crate::activity::{ActivityAction, ActivityLog};
use crate::config::CoreConfig;
use crate::constants::REPORTS_COLLECTION;
use crate::forms::FormRegistry;
use crate::{CoreError, CoreResult};
use chrono::Utc;
use frr_report::{fill, force_sentinel, validate, FieldValue, FormProfile, Report, SubmitMode};
use frr_store::{DocumentId, DocumentStore};
use frr_types::CategorySlug;
use std::collections::BTreeSet;
use std::sync::Arc;

/// What happened to a valid submission.
#[derive(Clone, Debug, PartialEq)]
pub enum SubmitOutcome {
    /// The report was written to the document store.
    Persisted(DocumentId),
    /// The form stages instead of persisting; the normalized report is
    /// returned for the caller's staging area.
    Staged(Report),
}

/// A persisted report together with its document id.
#[derive(Clone, Debug, PartialEq)]
pub struct StoredReport {
    pub id: DocumentId,
    pub report: Report,
}

/// Report submission operations.
///
/// Holds the form registry and the store collaborator; one instance serves
/// every form session.
#[derive(Debug)]
pub struct ReportingService<S> {
    cfg: Arc<CoreConfig>,
    store: Arc<S>,
    registry: FormRegistry,
    activity: ActivityLog<S>,
}

impl<S> Clone for ReportingService<S> {
    fn clone(&self) -> Self {
        Self {
            cfg: Arc::clone(&self.cfg),
            store: Arc::clone(&self.store),
            registry: self.registry.clone(),
            activity: self.activity.clone(),
        }
    }
}

impl<S: DocumentStore> ReportingService<S> {
    /// Creates a service over the built-in form registry.
    pub fn new(cfg: Arc<CoreConfig>, store: Arc<S>) -> Self {
        Self::with_registry(cfg, store, FormRegistry::builtin())
    }

    /// Creates a service with an explicit registry.
    pub fn with_registry(cfg: Arc<CoreConfig>, store: Arc<S>, registry: FormRegistry) -> Self {
        let activity = ActivityLog::new(Arc::clone(&store));
        Self {
            cfg,
            store,
            registry,
            activity,
        }
    }

    pub fn registry(&self) -> &FormRegistry {
        &self.registry
    }

    /// Resolves the profile for a category.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnknownCategory`] when no form is registered
    /// under `category`.
    pub fn profile(&self, category: &CategorySlug) -> CoreResult<&FormProfile> {
        self.registry
            .find(category)
            .ok_or_else(|| CoreError::UnknownCategory(category.to_string()))
    }

    /// Step 2 of the pipeline: is the draft complete for this form, given
    /// the sections currently hidden?
    pub fn check_complete(
        &self,
        profile: &FormProfile,
        draft: &FieldValue,
        hidden_sections: &BTreeSet<String>,
    ) -> bool {
        let exceptions = profile.active_exceptions(hidden_sections);
        validate(draft, &exceptions, profile.sequence_rule())
    }

    /// Steps 4–6: fill placeholders, force hidden-section fields to the
    /// sentinel, and freeze the draft into a report.
    ///
    /// Assumes the draft already passed [`check_complete`]; normalization
    /// itself cannot fail.
    ///
    /// [`check_complete`]: ReportingService::check_complete
    pub fn normalize(
        &self,
        profile: &FormProfile,
        draft: FieldValue,
        hidden_sections: &BTreeSet<String>,
        reported_by: Option<String>,
    ) -> Report {
        let filled = fill(draft, profile.sequence_fill());
        let normalized = force_sentinel(filled, &profile.hidden_keys(hidden_sections));
        Report::new(profile.category().clone(), normalized, Utc::now(), reported_by)
    }

    /// Step 7 for `Persist` forms: write the report and log the activity.
    ///
    /// Reports go through the strict wire rendering rather than generic
    /// serialization, so what lands in the store is exactly what
    /// [`Report::parse`] validates on the way back out.
    pub fn persist(&self, report: Report) -> CoreResult<DocumentId> {
        let json = report.render()?;
        let id = self.store.create_raw(REPORTS_COLLECTION, &json)?;

        let actor = report
            .reported_by
            .clone()
            .unwrap_or_else(|| self.cfg.operator().to_string());
        if let Err(e) = self.activity.record(
            actor,
            ActivityAction::ReportCreated,
            report.category.to_string(),
        ) {
            // The report itself is already safe; a lost log line is not
            // worth failing the submission over.
            tracing::warn!("failed to record report activity: {e}");
        }

        Ok(id)
    }

    /// Runs the whole pipeline in one call.
    ///
    /// Stateless surfaces (REST, CLI) use this; interactive form sessions
    /// drive the granular steps so their state machine can track phases.
    ///
    /// # Errors
    ///
    /// - [`CoreError::UnknownCategory`] for an unregistered category
    /// - [`CoreError::IncompleteReport`] when validation fails (the draft is
    ///   untouched and nothing is persisted)
    /// - [`CoreError::Store`] when the document store rejects the write
    pub fn submit(
        &self,
        category: &CategorySlug,
        draft: FieldValue,
        hidden_sections: &BTreeSet<String>,
        reported_by: Option<String>,
    ) -> CoreResult<SubmitOutcome> {
        let profile = self.profile(category)?;

        if !self.check_complete(profile, &draft, hidden_sections) {
            return Err(CoreError::IncompleteReport);
        }

        let report = self.normalize(profile, draft, hidden_sections, reported_by);

        match profile.submit_mode() {
            SubmitMode::Persist => Ok(SubmitOutcome::Persisted(self.persist(report)?)),
            SubmitMode::Stage => Ok(SubmitOutcome::Staged(report)),
        }
    }

    /// Reads one persisted report.
    ///
    /// # Errors
    ///
    /// A document that exists but no longer matches the report schema
    /// surfaces as [`CoreError::Report`] with a path to the failing field.
    pub fn get_report(&self, id: &DocumentId) -> CoreResult<Option<Report>> {
        match self.store.get_raw(REPORTS_COLLECTION, id)? {
            Some(contents) => Ok(Some(Report::parse(&contents)?)),
            None => Ok(None),
        }
    }

    /// All persisted reports.
    ///
    /// Documents that fail the strict report parse are logged with their
    /// path diagnostics and skipped; one corrupt document does not take the
    /// listing down.
    pub fn list_reports(&self) -> CoreResult<Vec<StoredReport>> {
        let raw = self.store.list_raw(REPORTS_COLLECTION)?;

        let mut reports = Vec::with_capacity(raw.len());
        for (id, contents) in raw {
            match Report::parse(&contents) {
                Ok(report) => reports.push(StoredReport { id, report }),
                Err(e) => {
                    tracing::warn!("failed to parse report {}: {}", id, e);
                }
            }
        }
        Ok(reports)
    }
}
