//! Core runtime configuration.
//!
//! This module defines configuration that should be resolved once at process
//! startup and then passed into core services. The intent is to avoid reading
//! process-wide environment variables during request handling, which can lead
//! to inconsistent behaviour in multi-threaded runtimes and test harnesses.

use crate::constants::DEFAULT_REPORT_DATA_DIR;
use crate::{CoreError, CoreResult};
use frr_types::NonEmptyText;
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    data_dir: PathBuf,
    operator: NonEmptyText,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// `operator` names the highway-operations unit running this instance;
    /// it is recorded as the actor of system-generated activity entries.
    pub fn new(data_dir: PathBuf, operator: NonEmptyText) -> CoreResult<Self> {
        if data_dir.as_os_str().is_empty() {
            return Err(CoreError::InvalidInput(
                "data_dir cannot be empty".into(),
            ));
        }

        Ok(Self { data_dir, operator })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn operator(&self) -> &NonEmptyText {
        &self.operator
    }
}

/// Resolve the report data directory from an optional override value.
///
/// If `value` is `None` or empty/whitespace, the default directory is used.
pub fn resolve_data_dir(value: Option<String>) -> PathBuf {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_REPORT_DATA_DIR))
}
