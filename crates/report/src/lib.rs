//! Report draft model and normalization pipeline for FRR.
//!
//! Incident forms build up dynamically shaped drafts as the reporter types.
//! Before anything is persisted or shared, every form runs the same pipeline
//! over its draft:
//! - the completeness validator checks that every required leaf is populated,
//! - the placeholder filler replaces empty leaves with the `NILL` sentinel,
//! - category and timestamp metadata are attached to freeze a [`Report`].
//!
//! This crate contains the pure parts of that pipeline: the recursive
//! [`FieldValue`] draft model, the filler, the validator, the per-category
//! [`FormProfile`] carrying all per-form variance (exception keys, optional
//! sections, sequence policies), and the strict [`Report`] document shape.
//!
//! Persistence, share rendering, and the submit orchestration live in the
//! `frr-store`, `frr-share`, and `frr-core` crates.

pub mod form;
pub mod normalize;
pub mod report;
pub mod validate;
pub mod value;

// Re-export facades
pub use form::{FormProfile, OptionalSection, SubmitMode};
pub use normalize::{fill, force_sentinel, SequenceFillPolicy};
pub use report::Report;
pub use validate::{validate, SequenceRule};
pub use value::{FieldValue, SENTINEL};

/// Errors returned by the report boundary crate.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("translation error: {0}")]
    Translation(String),
}

/// Type alias for Results that can fail with a [`ReportError`].
pub type ReportResult<T> = Result<T, ReportError>;
