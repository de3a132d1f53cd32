//! Canonical document identifiers and sharded-path derivation.
//!
//! FRR stores every document under a directory derived from its identifier.
//! To keep path derivation deterministic, identifiers use a canonical form:
//! **32 lowercase hexadecimal characters** (no hyphens), the same value
//! `Uuid::new_v4().simple()` produces.
//!
//! Externally supplied identifiers (CLI arguments, API path segments) must
//! already be canonical; [`DocumentId::parse`] rejects uppercase, hyphenated,
//! or otherwise non-canonical input rather than normalising it.

use crate::{StoreError, StoreResult};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use uuid::Uuid;

/// A validated document identifier in canonical 32-hex form.
///
/// Once constructed, the contained identifier is guaranteed canonical, so
/// sharded path derivation cannot disagree between writers and readers.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId(String);

impl DocumentId {
    /// Generates a fresh identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    /// Validates and wraps an identifier that must already be canonical.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidId`] if `input` is not exactly 32
    /// lowercase hex characters.
    pub fn parse(input: &str) -> StoreResult<Self> {
        if Self::is_canonical(input) {
            return Ok(Self(input.to_owned()));
        }
        Err(StoreError::InvalidId(format!(
            "id must be 32 lowercase hex characters without hyphens, got: '{}'",
            input
        )))
    }

    /// Returns true if `input` is in canonical form.
    pub fn is_canonical(input: &str) -> bool {
        input.len() == 32
            && input
                .bytes()
                .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `parent_dir/<s1>/<s2>/<id>/` where `s1`/`s2` are the first
    /// two and next two hex characters of the identifier.
    ///
    /// Two-level sharding bounds the number of entries per directory, which
    /// keeps listing and backup tolerable as collections grow.
    pub fn sharded_dir(&self, parent_dir: &Path) -> PathBuf {
        let s1 = &self.0[0..2];
        let s2 = &self.0[2..4];
        parent_dir.join(s1).join(s2).join(&self.0)
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DocumentId {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl serde::Serialize for DocumentId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for DocumentId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        DocumentId::parse(&s).map_err(serde::de::Error::custom)
    }
}
