//! # FRR Core
//!
//! Orchestration for the FRR field-reporting system.
//!
//! This crate ties the pure report pipeline (`frr-report`) to its
//! collaborators:
//! - the submit flow: validate → fill placeholders → force hidden sections
//!   to the sentinel → attach category/timestamp metadata → persist or stage
//! - per-form sessions with the editing state machine
//! - the local staging area used by preview/share flows
//! - personal notes and the activity log, stored as documents
//!
//! **No API concerns**: authentication and HTTP servers belong in `api-rest`.

pub mod activity;
pub mod config;
pub mod constants;
pub mod error;
pub mod forms;
pub mod notes;
pub mod session;
pub mod staging;
pub mod submit;

pub use activity::{ActivityAction, ActivityEntry, ActivityLog};
pub use config::{resolve_data_dir, CoreConfig};
pub use error::{CoreError, CoreResult};
pub use forms::FormRegistry;
pub use notes::{Note, NotesService};
pub use session::{FormSession, SessionOutcome, SessionStatus};
pub use staging::StagingArea;
pub use submit::{ReportingService, StoredReport, SubmitOutcome};
