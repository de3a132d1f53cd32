//! The local staging area.
//!
//! Forms configured with `SubmitMode::Stage` do not persist on submit:
//! the normalized report is held locally while a preview screen lets the
//! reporter read it back (and build the share message) before the actual
//! write happens. One staging area belongs to one form session; nothing
//! here is shared between sessions.

use frr_report::Report;

/// Holds at most one staged report.
#[derive(Clone, Debug, Default)]
pub struct StagingArea {
    slot: Option<Report>,
}

impl StagingArea {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stages a report, replacing any previously staged one.
    pub fn stage(&mut self, report: Report) {
        self.slot = Some(report);
    }

    /// The staged report, if any.
    pub fn peek(&self) -> Option<&Report> {
        self.slot.as_ref()
    }

    /// Removes and returns the staged report.
    pub fn take(&mut self) -> Option<Report> {
        self.slot.take()
    }

    pub fn is_empty(&self) -> bool {
        self.slot.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use frr_report::FieldValue;
    use frr_types::CategorySlug;

    fn report(qth: &str) -> Report {
        Report::new(
            CategorySlug::new("accident").unwrap(),
            FieldValue::Mapping(vec![("qth".into(), FieldValue::text(qth))]),
            chrono::Utc::now(),
            None,
        )
    }

    #[test]
    fn stage_take_cycle() {
        let mut staging = StagingArea::new();
        assert!(staging.is_empty());

        staging.stage(report("km 1"));
        assert!(!staging.is_empty());
        assert!(staging.peek().is_some());

        let taken = staging.take().expect("should hold a report");
        assert_eq!(taken.form_data.get("qth"), Some(&FieldValue::text("km 1")));
        assert!(staging.is_empty());
    }

    #[test]
    fn staging_again_replaces_the_previous_report() {
        let mut staging = StagingArea::new();
        staging.stage(report("km 1"));
        staging.stage(report("km 2"));

        let taken = staging.take().expect("should hold a report");
        assert_eq!(taken.form_data.get("qth"), Some(&FieldValue::text("km 2")));
    }
}
