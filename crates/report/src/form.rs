//! Per-category form profiles.
//!
//! Every incident form runs the same validate/fill pipeline; what differs
//! between forms is captured here. A [`FormProfile`] carries the structural
//! exception keys (always skipped), the optional sections a reporter can
//! toggle, the sequence policies, and whether submission persists
//! immediately or stages for a preview screen.
//!
//! Consolidating this variance into one parameterised type is what lets
//! a single filler/validator pair serve every category.

use crate::normalize::SequenceFillPolicy;
use crate::validate::SequenceRule;
use frr_types::CategorySlug;
use std::collections::BTreeSet;

/// What a form does with a valid, normalized report.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmitMode {
    /// Hand the report straight to the document store.
    Persist,
    /// Hold the report in the local staging area; a preview step performs
    /// the actual persistence/share.
    Stage,
}

/// An optional form section toggled by a companion checkbox.
///
/// While the section is hidden, its keys join the validator's exception set
/// and are forced to the sentinel during normalization.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionalSection {
    /// Toggle name, e.g. `support-vehicle`.
    pub name: String,
    /// Draft keys belonging to this section.
    pub keys: BTreeSet<String>,
}

/// The per-category configuration of the submit pipeline.
#[derive(Clone, Debug, PartialEq)]
pub struct FormProfile {
    category: CategorySlug,
    exceptions: BTreeSet<String>,
    optional_sections: Vec<OptionalSection>,
    sequence_fill: SequenceFillPolicy,
    sequence_rule: SequenceRule,
    submit_mode: SubmitMode,
}

impl FormProfile {
    /// Creates a profile with no exceptions, no optional sections, and the
    /// lenient sequence policies.
    pub fn new(category: CategorySlug, submit_mode: SubmitMode) -> Self {
        Self {
            category,
            exceptions: BTreeSet::new(),
            optional_sections: Vec::new(),
            sequence_fill: SequenceFillPolicy::Recurse,
            sequence_rule: SequenceRule::AllowEmpty,
            submit_mode,
        }
    }

    /// Adds a structural exception key, skipped by the validator wherever it
    /// appears.
    pub fn with_exception(mut self, key: impl Into<String>) -> Self {
        self.exceptions.insert(key.into());
        self
    }

    /// Adds an optional section toggled by `name`, owning the given keys.
    pub fn with_optional_section(
        mut self,
        name: impl Into<String>,
        keys: impl IntoIterator<Item = &'static str>,
    ) -> Self {
        self.optional_sections.push(OptionalSection {
            name: name.into(),
            keys: keys.into_iter().map(str::to_owned).collect(),
        });
        self
    }

    pub fn with_sequence_fill(mut self, policy: SequenceFillPolicy) -> Self {
        self.sequence_fill = policy;
        self
    }

    pub fn with_sequence_rule(mut self, rule: SequenceRule) -> Self {
        self.sequence_rule = rule;
        self
    }

    pub fn category(&self) -> &CategorySlug {
        &self.category
    }

    pub fn submit_mode(&self) -> SubmitMode {
        self.submit_mode
    }

    pub fn sequence_fill(&self) -> SequenceFillPolicy {
        self.sequence_fill
    }

    pub fn sequence_rule(&self) -> SequenceRule {
        self.sequence_rule
    }

    /// Structural exception keys (without any optional-section keys).
    pub fn exceptions(&self) -> &BTreeSet<String> {
        &self.exceptions
    }

    /// The optional sections this form offers.
    pub fn optional_sections(&self) -> &[OptionalSection] {
        &self.optional_sections
    }

    /// Looks up an optional section by toggle name.
    pub fn section(&self, name: &str) -> Option<&OptionalSection> {
        self.optional_sections.iter().find(|s| s.name == name)
    }

    /// The exception set for one submission: structural exceptions plus the
    /// keys of every section named in `hidden_sections`.
    ///
    /// Section names not offered by this form are ignored.
    pub fn active_exceptions(&self, hidden_sections: &BTreeSet<String>) -> BTreeSet<String> {
        let mut all = self.exceptions.clone();
        for section in &self.optional_sections {
            if hidden_sections.contains(&section.name) {
                all.extend(section.keys.iter().cloned());
            }
        }
        all
    }

    /// The draft keys that must be forced to the sentinel because their
    /// section is hidden.
    pub fn hidden_keys(&self, hidden_sections: &BTreeSet<String>) -> BTreeSet<String> {
        let mut keys = BTreeSet::new();
        for section in &self.optional_sections {
            if hidden_sections.contains(&section.name) {
                keys.extend(section.keys.iter().cloned());
            }
        }
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> FormProfile {
        FormProfile::new(
            CategorySlug::new("accident").unwrap(),
            SubmitMode::Persist,
        )
        .with_exception("id")
        .with_optional_section("support-vehicle", ["vtrApoio"])
        .with_optional_section("property-damage", ["propertyDamage", "damageNotes"])
        .with_sequence_rule(SequenceRule::NonEmpty)
    }

    fn hidden(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn active_exceptions_include_hidden_section_keys() {
        let p = profile();
        let active = p.active_exceptions(&hidden(&["support-vehicle"]));

        assert!(active.contains("id"), "structural exception should remain");
        assert!(active.contains("vtrApoio"));
        assert!(
            !active.contains("propertyDamage"),
            "visible section keys are still required"
        );
    }

    #[test]
    fn hidden_keys_cover_only_hidden_sections() {
        let p = profile();
        let keys = p.hidden_keys(&hidden(&["property-damage"]));

        assert_eq!(
            keys,
            ["propertyDamage", "damageNotes"]
                .iter()
                .map(|s| s.to_string())
                .collect::<BTreeSet<_>>()
        );
    }

    #[test]
    fn unknown_hidden_section_names_are_ignored() {
        let p = profile();
        let active = p.active_exceptions(&hidden(&["no-such-section"]));
        assert_eq!(active, p.exceptions().clone());
        assert!(p.hidden_keys(&hidden(&["no-such-section"])).is_empty());
    }

    #[test]
    fn section_lookup_finds_registered_sections() {
        let p = profile();
        assert!(p.section("support-vehicle").is_some());
        assert!(p.section("missing").is_none());
    }
}
