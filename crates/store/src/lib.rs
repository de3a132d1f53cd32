//! Document persistence for FRR.
//!
//! The reporting core treats storage as a collaborator: it hands over a
//! document and gets back an identifier, nothing more. This crate provides
//! that collaborator as the [`DocumentStore`] trait: implementations move
//! raw JSON text, and generic serde convenience methods sit on top for
//! callers without a strict wire format of their own. Two implementations:
//!
//! - [`FsDocumentStore`]: JSON documents on the local filesystem, laid out
//!   in sharded directories to keep per-directory fan-out small:
//!
//!   ```text
//!   <data_dir>/
//!     <collection>/            # reports, notes, activity
//!       <s1>/
//!         <s2>/
//!           <32hex-id>/
//!             document.json
//!   ```
//!
//!   where `s1`/`s2` are the first four hex characters of the document id.
//!
//! - [`MemoryStore`]: an in-process map for unit tests.
//!
//! Writes are never retried here; failures surface as [`StoreError`] and the
//! caller decides what to tell the user. Listing skips unreadable documents
//! with a warning rather than failing the whole collection.

mod ids;
mod store;

pub use ids::DocumentId;
pub use store::{DocumentStore, FsDocumentStore, MemoryStore};

/// Filename of the document payload inside its sharded directory.
pub const DOCUMENT_FILENAME: &str = "document.json";

/// Errors returned by document store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("invalid document id: {0}")]
    InvalidId(String),
    #[error("invalid collection name: {0}")]
    InvalidCollection(String),
    #[error("failed to create document directory: {0}")]
    DirCreation(std::io::Error),
    #[error("failed to allocate a unique document id after {0} attempts")]
    IdAllocation(usize),
    #[error("failed to write document: {0}")]
    FileWrite(std::io::Error),
    #[error("failed to read document: {0}")]
    FileRead(std::io::Error),
    #[error("failed to serialize document: {0}")]
    Serialization(serde_json::Error),
    #[error("failed to deserialize document: {0}")]
    Deserialization(serde_json::Error),
}

/// Type alias for Results that can fail with a [`StoreError`].
pub type StoreResult<T> = Result<T, StoreError>;
