//! Constants used throughout the FRR core crate.
//!
//! This module contains collection and path constants to ensure consistency
//! across the codebase and make maintenance easier.

/// Collection name for persisted incident reports.
pub const REPORTS_COLLECTION: &str = "reports";

/// Collection name for personal notes.
pub const NOTES_COLLECTION: &str = "notes";

/// Collection name for the activity log.
pub const ACTIVITY_COLLECTION: &str = "activity";

/// Default directory for report data storage when no explicit directory is configured.
pub const DEFAULT_REPORT_DATA_DIR: &str = "report_data";
