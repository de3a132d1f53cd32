//! Completeness validation.
//!
//! Before a draft is normalized and persisted, every required leaf must be
//! populated. The sentinel counts as populated (the emptiness was
//! deliberate); raw empty strings and nulls do not.
//!
//! Callers supply a set of exception keys that are skipped entirely wherever
//! they appear: optional sections whose companion checkbox is off, and
//! structural keys such as an internal `id` that carry no user-facing
//! requirement. Matching is by bare key name at any nesting depth, so an
//! exception named `id` skips *every* `id` field in the draft, including
//! inside unrelated sub-sections. That keeps the behaviour of the forms this
//! pipeline replaced; path-based matching would be the stricter alternative.

use crate::value::FieldValue;
use std::collections::BTreeSet;

/// How the validator treats empty sequences.
///
/// Carried on the form profile, next to [`SequenceFillPolicy`]: forms that
/// require at least one repeated entry (for example one vehicle per accident)
/// use the strict rule, the rest allow empty.
///
/// [`SequenceFillPolicy`]: crate::normalize::SequenceFillPolicy
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SequenceRule {
    /// An empty sequence fails validation: at least one element is required.
    NonEmpty,
    /// Empty sequences are acceptable.
    AllowEmpty,
}

/// Checks that every required leaf of `value` is populated.
///
/// Mapping entries whose key appears in `exceptions` are skipped outright.
/// Sequences follow `rule` when empty and recurse per element otherwise.
/// Scalars pass when they are the sentinel or any non-blank value.
///
/// Returns `false` as soon as one invalid leaf is found; the traversal
/// reports no paths, only the verdict.
pub fn validate(value: &FieldValue, exceptions: &BTreeSet<String>, rule: SequenceRule) -> bool {
    match value {
        FieldValue::Mapping(entries) => entries
            .iter()
            .filter(|(key, _)| !exceptions.contains(key))
            .all(|(_, entry)| validate(entry, exceptions, rule)),
        FieldValue::Sequence(items) => {
            if items.is_empty() {
                return rule == SequenceRule::AllowEmpty;
            }
            items.iter().all(|item| validate(item, exceptions, rule))
        }
        FieldValue::Sentinel => true,
        FieldValue::Null => false,
        FieldValue::Text(s) => !s.trim().is_empty(),
        FieldValue::Bool(_) | FieldValue::Number(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::{fill, SequenceFillPolicy};

    fn draft(json: &str) -> FieldValue {
        serde_json::from_str(json).expect("should parse draft")
    }

    fn exceptions(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn rejects_draft_with_empty_leaf() {
        let incomplete = draft(r#"{"rodovia":"ms-112","qth":"","sentido":"norte"}"#);
        assert!(!validate(
            &incomplete,
            &exceptions(&[]),
            SequenceRule::AllowEmpty
        ));
    }

    #[test]
    fn accepts_draft_after_fill() {
        let incomplete = draft(r#"{"rodovia":"ms-112","qth":"","sentido":"norte"}"#);
        let filled = fill(incomplete, SequenceFillPolicy::Recurse);

        assert_eq!(
            filled,
            draft(r#"{"rodovia":"ms-112","qth":"NILL","sentido":"norte"}"#)
        );
        assert!(validate(&filled, &exceptions(&[]), SequenceRule::AllowEmpty));
    }

    #[test]
    fn sentinel_is_acceptable_where_raw_emptiness_is_not() {
        assert!(!validate(
            &draft(r#"{"a":""}"#),
            &exceptions(&[]),
            SequenceRule::AllowEmpty
        ));
        assert!(validate(
            &draft(r#"{"a":"NILL"}"#),
            &exceptions(&[]),
            SequenceRule::AllowEmpty
        ));
    }

    #[test]
    fn excepted_key_is_skipped_regardless_of_value() {
        assert!(validate(
            &draft(r#"{"a":""}"#),
            &exceptions(&["a"]),
            SequenceRule::AllowEmpty
        ));
    }

    #[test]
    fn exception_matches_bare_key_name_at_any_depth() {
        let hidden_section = draft(r#"{"otherInfo":{"vtrApoio":""},"qth":"km 42"}"#);
        assert!(validate(
            &hidden_section,
            &exceptions(&["vtrApoio"]),
            SequenceRule::AllowEmpty
        ));
        assert!(!validate(
            &hidden_section,
            &exceptions(&[]),
            SequenceRule::AllowEmpty
        ));
    }

    #[test]
    fn empty_sequence_verdict_follows_the_rule() {
        let no_vehicles = draft(r#"{"vehicles":[]}"#);
        assert!(!validate(
            &no_vehicles,
            &exceptions(&[]),
            SequenceRule::NonEmpty
        ));
        assert!(validate(
            &no_vehicles,
            &exceptions(&[]),
            SequenceRule::AllowEmpty
        ));
    }

    #[test]
    fn recurses_into_sequence_elements() {
        let vehicles = draft(r#"{"vehicles":[{"placa":"ABC1234","modelo":""}]}"#);
        assert!(!validate(
            &vehicles,
            &exceptions(&[]),
            SequenceRule::NonEmpty
        ));

        let filled = fill(vehicles, SequenceFillPolicy::Recurse);
        assert!(validate(&filled, &exceptions(&[]), SequenceRule::NonEmpty));

        let refilled = fill(filled.clone(), SequenceFillPolicy::Recurse);
        assert_eq!(filled, refilled, "normalized draft should be stable");
    }

    #[test]
    fn booleans_and_numbers_always_pass() {
        assert!(validate(
            &draft(r#"{"closed":false,"lanes":0}"#),
            &exceptions(&[]),
            SequenceRule::AllowEmpty
        ));
    }

    #[test]
    fn null_leaf_fails() {
        assert!(!validate(
            &draft(r#"{"qth":null}"#),
            &exceptions(&[]),
            SequenceRule::AllowEmpty
        ));
    }
}
