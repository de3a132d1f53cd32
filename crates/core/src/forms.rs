//! The built-in form registry.
//!
//! Each shipped incident category registers one [`FormProfile`] describing
//! how its submissions behave: which keys the validator skips, which optional
//! sections exist, how sequences are treated, and whether a valid report is
//! persisted immediately or staged for a preview screen.
//!
//! The `id` key is a structural exception on every form: sub-entities carry
//! an internal numeric identifier that has no user-facing requirement.

use frr_report::{FormProfile, SequenceFillPolicy, SequenceRule, SubmitMode};
use frr_types::CategorySlug;

/// Registry of the form profiles this deployment offers.
#[derive(Clone, Debug)]
pub struct FormRegistry {
    profiles: Vec<FormProfile>,
}

impl FormRegistry {
    /// The built-in incident categories.
    pub fn builtin() -> Self {
        let slug = |s: &str| CategorySlug::new(s).expect("builtin slugs are valid");

        let profiles = vec![
            // Vehicle accidents stage for a preview/share step and require at
            // least one vehicle entry.
            FormProfile::new(slug("accident"), SubmitMode::Stage)
                .with_exception("id")
                .with_optional_section("support-vehicle", ["vtrApoio"])
                .with_optional_section("property-damage", ["propertyDamage", "damageNotes"])
                .with_sequence_rule(SequenceRule::NonEmpty),
            // Pedestrian incidents persist immediately; victims are required.
            FormProfile::new(slug("pedestrian-incident"), SubmitMode::Persist)
                .with_exception("id")
                .with_sequence_rule(SequenceRule::NonEmpty),
            // Animal occurrences have no repeated sub-entities worth keeping
            // when empty, so an empty list collapses to the sentinel.
            FormProfile::new(slug("animal-on-road"), SubmitMode::Persist)
                .with_exception("id")
                .with_sequence_fill(SequenceFillPolicy::SentinelWhenEmpty),
            FormProfile::new(slug("cargo-spill"), SubmitMode::Persist)
                .with_exception("id")
                .with_optional_section("support-vehicle", ["vtrApoio"]),
            FormProfile::new(slug("infrastructure-damage"), SubmitMode::Stage)
                .with_exception("id")
                .with_optional_section("property-damage", ["propertyDamage", "damageNotes"]),
        ];

        Self { profiles }
    }

    /// Builds a registry from explicit profiles (used by tests and
    /// deployments with custom categories).
    pub fn from_profiles(profiles: Vec<FormProfile>) -> Self {
        Self { profiles }
    }

    /// All registered profiles, in registration order.
    pub fn profiles(&self) -> &[FormProfile] {
        &self.profiles
    }

    /// Looks up the profile for a category.
    pub fn find(&self, category: &CategorySlug) -> Option<&FormProfile> {
        self.profiles.iter().find(|p| p.category() == category)
    }
}

impl Default for FormRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
