//! The frozen report document.
//!
//! A [`Report`] is what leaves the pipeline: the normalized form data plus
//! category and creation metadata. It is assembled once at submission and
//! never mutated afterwards; persistence and share rendering both consume it
//! as-is.
//!
//! Parsing uses `serde_path_to_error` so a document that does not match the
//! schema reports the failing field (e.g. `form_data.vehicles[0]`) instead of
//! a bare message. Unknown keys are rejected.

use crate::value::FieldValue;
use crate::{ReportError, ReportResult};
use chrono::{DateTime, Utc};
use frr_types::CategorySlug;
use serde::{Deserialize, Serialize};

/// A persisted (or staged) incident report.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Report {
    /// The incident category the reporter selected.
    pub category: CategorySlug,

    /// Normalized form data: no blank leaves, sentinel where skipped.
    pub form_data: FieldValue,

    /// When the report was frozen.
    pub created_at: DateTime<Utc>,

    /// Opaque user identifier from the authentication collaborator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reported_by: Option<String>,
}

impl Report {
    /// Freezes a normalized draft into a report.
    pub fn new(
        category: CategorySlug,
        form_data: FieldValue,
        created_at: DateTime<Utc>,
        reported_by: Option<String>,
    ) -> Self {
        Self {
            category,
            form_data,
            created_at,
            reported_by,
        }
    }

    /// Parses a report from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Translation`] with a best-effort path to the
    /// failing field when the JSON does not match the report schema, when a
    /// field has an unexpected type, or when unknown keys are present.
    pub fn parse(json_text: &str) -> ReportResult<Self> {
        let deserializer = &mut serde_json::Deserializer::from_str(json_text);

        match serde_path_to_error::deserialize::<_, Report>(deserializer) {
            Ok(report) => Ok(report),
            Err(err) => {
                let path = err.path().to_string();
                let source = err.into_inner();
                let path = if path.is_empty() {
                    "<root>"
                } else {
                    path.as_str()
                };
                Err(ReportError::Translation(format!(
                    "Report schema mismatch at {path}: {source}"
                )))
            }
        }
    }

    /// Renders the report as pretty-printed JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Translation`] if serialization fails.
    pub fn render(&self) -> ReportResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ReportError::Translation(format!("Failed to serialize report: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_sample_report() {
        let input = r#"{
  "category": "accident",
  "form_data": {
    "rodovia": "ms-112",
    "qth": "NILL",
    "sentido": "norte",
    "vehicles": [
      {
        "placa": "ABC1234",
        "modelo": "NILL"
      }
    ]
  },
  "created_at": "2026-03-14T09:21:45.120Z",
  "reported_by": "op-7f3a"
}"#;

        let report = Report::parse(input).expect("parse report");
        let output = report.render().expect("render report");
        let reparsed = Report::parse(&output).expect("reparse report");
        assert_eq!(report, reparsed);
    }

    #[test]
    fn strict_validation_rejects_unknown_keys() {
        let input = r#"{
  "category": "accident",
  "form_data": {},
  "created_at": "2026-03-14T09:21:45.120Z",
  "unexpected_key": "should_fail"
}"#;

        let err = Report::parse(input).expect_err("should reject unknown key");
        let ReportError::Translation(msg) = err;
        assert!(msg.contains("unexpected_key"));
    }

    #[test]
    fn rejects_invalid_category_slug() {
        let input = r#"{
  "category": "Not A Slug",
  "form_data": {},
  "created_at": "2026-03-14T09:21:45.120Z"
}"#;

        let err = Report::parse(input).expect_err("should reject invalid slug");
        let ReportError::Translation(msg) = err;
        assert!(msg.contains("category"), "path should name the field: {msg}");
    }

    #[test]
    fn reports_path_to_failing_nested_field() {
        let input = r#"{
  "category": "accident",
  "form_data": {"ok": true},
  "created_at": "not-a-timestamp"
}"#;

        let err = Report::parse(input).expect_err("should reject bad timestamp");
        let ReportError::Translation(msg) = err;
        assert!(msg.contains("created_at"), "path should name the field: {msg}");
    }

    #[test]
    fn reported_by_is_optional() {
        let input = r#"{
  "category": "animal-on-road",
  "form_data": {"qth": "km 12"},
  "created_at": "2026-03-14T09:21:45.120Z"
}"#;

        let report = Report::parse(input).expect("should parse without reporter");
        assert_eq!(report.reported_by, None);

        let rendered = report.render().expect("render report");
        assert!(
            !rendered.contains("reported_by"),
            "absent reporter should be omitted from the wire"
        );
    }

    #[test]
    fn sentinel_survives_the_wire() {
        let report = Report::new(
            CategorySlug::new("accident").unwrap(),
            FieldValue::Mapping(vec![("qth".into(), FieldValue::Sentinel)]),
            "2026-03-14T09:21:45.120Z".parse().unwrap(),
            None,
        );

        let rendered = report.render().expect("render report");
        let reparsed = Report::parse(&rendered).expect("reparse report");
        assert_eq!(
            reparsed.form_data.get("qth"),
            Some(&FieldValue::Sentinel),
            "NILL should come back as the sentinel variant"
        );
    }
}
