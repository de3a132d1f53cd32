//! Placeholder filling.
//!
//! After a draft passes validation, every leaf the reporter left empty is
//! replaced with the sentinel so the persisted document displays uniformly
//! and downstream renderers can tell "deliberately skipped" from "missing".
//!
//! Filling is a pure, total transformation: it never fails, preserves
//! structural shape and key order, and is idempotent.

use crate::value::FieldValue;
use std::collections::BTreeSet;

/// How the filler treats sequences.
///
/// Forms disagree on what an empty repeated section means, so the choice is
/// carried on each form's profile rather than inferred here.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SequenceFillPolicy {
    /// Recurse into each element, keeping the sequence's length.
    Recurse,
    /// Like `Recurse`, except an *empty* sequence collapses to the sentinel.
    SentinelWhenEmpty,
}

/// Replaces every blank leaf of `value` with the sentinel.
///
/// Blank means `Null` or text that is empty after trimming. Sequences recurse
/// per element (subject to `policy`), mappings recurse per entry with all
/// keys kept, and every other value passes through unchanged.
///
/// Filling an already-filled value is a no-op: `fill(fill(v)) == fill(v)`.
pub fn fill(value: FieldValue, policy: SequenceFillPolicy) -> FieldValue {
    match value {
        FieldValue::Null => FieldValue::Sentinel,
        FieldValue::Text(s) if s.trim().is_empty() => FieldValue::Sentinel,
        FieldValue::Sequence(items) => {
            if items.is_empty() && policy == SequenceFillPolicy::SentinelWhenEmpty {
                FieldValue::Sentinel
            } else {
                FieldValue::Sequence(items.into_iter().map(|item| fill(item, policy)).collect())
            }
        }
        FieldValue::Mapping(entries) => FieldValue::Mapping(
            entries
                .into_iter()
                .map(|(key, entry)| (key, fill(entry, policy)))
                .collect(),
        ),
        other => other,
    }
}

/// Forces every mapping entry named in `keys` to the sentinel, at any depth.
///
/// This is the explicit override the submit pipeline applies to
/// optional-section fields the reporter left hidden: they are structurally
/// present in the draft but carry no requirement, so their values are
/// overwritten wholesale. Matching is by bare key name, the same rule the
/// validator uses for exception keys.
pub fn force_sentinel(value: FieldValue, keys: &BTreeSet<String>) -> FieldValue {
    match value {
        FieldValue::Mapping(entries) => FieldValue::Mapping(
            entries
                .into_iter()
                .map(|(key, entry)| {
                    if keys.contains(&key) {
                        (key, FieldValue::Sentinel)
                    } else {
                        (key, force_sentinel(entry, keys))
                    }
                })
                .collect(),
        ),
        FieldValue::Sequence(items) => FieldValue::Sequence(
            items
                .into_iter()
                .map(|item| force_sentinel(item, keys))
                .collect(),
        ),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(json: &str) -> FieldValue {
        serde_json::from_str(json).expect("should parse draft")
    }

    fn keys(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn replaces_blank_leaves_with_sentinel() {
        let filled = fill(
            draft(r#"{"rodovia":"ms-112","qth":"","sentido":null}"#),
            SequenceFillPolicy::Recurse,
        );

        assert_eq!(
            filled,
            draft(r#"{"rodovia":"ms-112","qth":"NILL","sentido":"NILL"}"#)
        );
    }

    #[test]
    fn recurses_into_sequences_preserving_length() {
        let filled = fill(
            draft(r#"{"vehicles":[{"placa":"ABC1234","modelo":""},{"placa":"","modelo":null}]}"#),
            SequenceFillPolicy::Recurse,
        );

        let expected = draft(
            r#"{"vehicles":[{"placa":"ABC1234","modelo":"NILL"},{"placa":"NILL","modelo":"NILL"}]}"#,
        );
        assert_eq!(filled, expected);
    }

    #[test]
    fn fill_is_idempotent() {
        let once = fill(
            draft(r#"{"a":"","b":[{"c":null}],"d":{"e":"  "}}"#),
            SequenceFillPolicy::Recurse,
        );
        let twice = fill(once.clone(), SequenceFillPolicy::Recurse);
        assert_eq!(once, twice, "fill(fill(d)) should equal fill(d)");
    }

    #[test]
    fn fill_preserves_shape_and_key_order() {
        let filled = fill(
            draft(r#"{"z":"","a":"kept","m":{"y":"","b":1}}"#),
            SequenceFillPolicy::Recurse,
        );

        let rendered = serde_json::to_string(&filled).expect("should serialize");
        assert_eq!(rendered, r#"{"z":"NILL","a":"kept","m":{"y":"NILL","b":1}}"#);
    }

    #[test]
    fn empty_sequence_policy_is_caller_supplied() {
        let recursed = fill(draft(r#"{"vehicles":[]}"#), SequenceFillPolicy::Recurse);
        assert_eq!(recursed, draft(r#"{"vehicles":[]}"#));

        let collapsed = fill(
            draft(r#"{"vehicles":[]}"#),
            SequenceFillPolicy::SentinelWhenEmpty,
        );
        assert_eq!(collapsed, draft(r#"{"vehicles":"NILL"}"#));
    }

    #[test]
    fn leaves_booleans_numbers_and_sentinels_alone() {
        let original = draft(r#"{"flag":false,"count":0,"skipped":"NILL"}"#);
        let filled = fill(original.clone(), SequenceFillPolicy::Recurse);
        assert_eq!(filled, original);
    }

    #[test]
    fn force_sentinel_overrides_named_keys_at_any_depth() {
        let forced = force_sentinel(
            draft(r#"{"otherInfo":{"vtrApoio":"VTR-07"},"vtrApoio":"kept?"}"#),
            &keys(&["vtrApoio"]),
        );

        assert_eq!(
            forced,
            draft(r#"{"otherInfo":{"vtrApoio":"NILL"},"vtrApoio":"NILL"}"#)
        );
    }

    #[test]
    fn force_sentinel_reaches_inside_sequences() {
        let forced = force_sentinel(
            draft(r#"{"vehicles":[{"placa":"ABC1234","damage":{"notes":"x"}}]}"#),
            &keys(&["damage"]),
        );

        assert_eq!(
            forced,
            draft(r#"{"vehicles":[{"placa":"ABC1234","damage":"NILL"}]}"#)
        );
    }

    #[test]
    fn force_sentinel_with_no_keys_is_identity() {
        let original = draft(r#"{"a":1,"b":{"c":"x"}}"#);
        assert_eq!(force_sentinel(original.clone(), &keys(&[])), original);
    }
}
