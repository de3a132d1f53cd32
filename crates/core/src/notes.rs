//! Personal notes.
//!
//! Reporters can keep free-form notes alongside their reports. A note
//! belongs to the opaque user id the authentication collaborator supplies;
//! this crate stores and filters by that id without interpreting it.

use crate::activity::{ActivityAction, ActivityLog};
use crate::constants::NOTES_COLLECTION;
use crate::{CoreError, CoreResult};
use chrono::{DateTime, Utc};
use frr_store::{DocumentId, DocumentStore};
use frr_types::NonEmptyText;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A personal note document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Note {
    /// Opaque user identifier of the note's owner.
    pub author: String,
    pub body: NonEmptyText,
    pub created_at: DateTime<Utc>,
}

/// Note operations over the document store.
#[derive(Debug)]
pub struct NotesService<S> {
    store: Arc<S>,
    activity: ActivityLog<S>,
}

impl<S> Clone for NotesService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            activity: self.activity.clone(),
        }
    }
}

impl<S: DocumentStore> NotesService<S> {
    pub fn new(store: Arc<S>) -> Self {
        let activity = ActivityLog::new(Arc::clone(&store));
        Self { store, activity }
    }

    /// Creates a note for `author`, stamped with the current time.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidInput`] for an empty author id, and
    /// [`CoreError::Store`] when the write fails.
    pub fn create_note(&self, author: &str, body: NonEmptyText) -> CoreResult<DocumentId> {
        if author.trim().is_empty() {
            return Err(CoreError::InvalidInput("author cannot be empty".into()));
        }

        let note = Note {
            author: author.to_owned(),
            body,
            created_at: Utc::now(),
        };
        let id = self.store.create(NOTES_COLLECTION, &note)?;

        if let Err(e) = self
            .activity
            .record(author, ActivityAction::NoteCreated, "note")
        {
            tracing::warn!("failed to record note activity: {e}");
        }

        Ok(id)
    }

    /// Lists notes, optionally restricted to one author, newest last.
    pub fn list_notes(&self, author: Option<&str>) -> CoreResult<Vec<(DocumentId, Note)>> {
        let mut notes: Vec<(DocumentId, Note)> = self
            .store
            .list(NOTES_COLLECTION)?
            .into_iter()
            .filter(|(_, note): &(DocumentId, Note)| {
                author.is_none_or(|a| note.author == a)
            })
            .collect();
        notes.sort_by_key(|(_, note)| note.created_at);
        Ok(notes)
    }
}
