//! The activity log.
//!
//! Every successful write through the orchestration layer leaves one entry
//! here: who did it, what kind of action it was, and a short human-readable
//! detail. The log is append-only; entries are documents in their own
//! collection and are never edited or removed by this crate.

use crate::constants::ACTIVITY_COLLECTION;
use crate::CoreResult;
use chrono::{DateTime, Utc};
use frr_store::{DocumentId, DocumentStore};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// The kinds of action the log records.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityAction {
    ReportCreated,
    NoteCreated,
}

impl ActivityAction {
    /// Returns the string representation of this action.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ReportCreated => "report_created",
            Self::NoteCreated => "note_created",
        }
    }
}

/// One entry of the activity log.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ActivityEntry {
    /// Opaque user identifier, or the operator name for system actions.
    pub actor: String,
    pub action: ActivityAction,
    /// Short human-readable context, e.g. the report category.
    pub detail: String,
    pub recorded_at: DateTime<Utc>,
}

/// Append/list operations over the activity collection.
#[derive(Debug)]
pub struct ActivityLog<S> {
    store: Arc<S>,
}

impl<S> Clone for ActivityLog<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: DocumentStore> ActivityLog<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Appends one entry, stamped with the current time.
    pub fn record(
        &self,
        actor: impl Into<String>,
        action: ActivityAction,
        detail: impl Into<String>,
    ) -> CoreResult<DocumentId> {
        let entry = ActivityEntry {
            actor: actor.into(),
            action,
            detail: detail.into(),
            recorded_at: Utc::now(),
        };
        let id = self.store.create(ACTIVITY_COLLECTION, &entry)?;
        Ok(id)
    }

    /// All entries, oldest first.
    pub fn list(&self) -> CoreResult<Vec<ActivityEntry>> {
        let mut entries: Vec<ActivityEntry> = self
            .store
            .list(ACTIVITY_COLLECTION)?
            .into_iter()
            .map(|(_, entry)| entry)
            .collect();
        entries.sort_by_key(|entry| entry.recorded_at);
        Ok(entries)
    }
}
