//! The recursive draft value model.
//!
//! Every incident form assembles its data as a [`FieldValue`] mapping: scalar
//! leaves, nested mappings for sub-sections, and sequences for repeated
//! sub-entities such as vehicles or victims. No fixed schema is enforced here;
//! each form defines its own shape and the pipeline operates generically.
//!
//! The sentinel ("deliberately left empty, already considered") is modelled as
//! a distinguished variant rather than a magic string so the filler and
//! validator can match on it directly. On the wire it is the string `"NILL"`,
//! and the manual serde implementations below translate in both directions.
//!
//! Mappings preserve insertion order, so a normalized draft serializes with
//! the same key order the form produced.

use serde::de::{MapAccess, SeqAccess, Visitor};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Wire representation of the sentinel marker.
pub const SENTINEL: &str = "NILL";

/// A single value inside a report draft.
///
/// Drafts are trees: mappings of named fields whose values are scalars,
/// nested mappings, or ordered sequences of further values.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    /// An absent value (JSON `null`). Treated as "not yet filled in".
    Null,
    /// The sentinel marker: deliberately empty, already considered.
    Sentinel,
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
    /// An ordered sequence of values (repeated sub-entities).
    Sequence(Vec<FieldValue>),
    /// A nested mapping. Entries keep their insertion order.
    Mapping(Vec<(String, FieldValue)>),
}

impl FieldValue {
    /// Convenience constructor for a text leaf.
    pub fn text(input: impl Into<String>) -> Self {
        Self::Text(input.into())
    }

    /// Returns true for the sentinel marker.
    pub fn is_sentinel(&self) -> bool {
        matches!(self, Self::Sentinel)
    }

    /// Returns true for a leaf that counts as "not filled in": `Null` or a
    /// text value that is empty after trimming.
    ///
    /// The sentinel is *not* blank: it records that the emptiness was
    /// deliberate.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Looks up an entry of a mapping by key.
    ///
    /// Returns `None` for non-mapping values and missing keys.
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        match self {
            Self::Mapping(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Sets an entry of a mapping, replacing an existing key in place or
    /// appending a new one at the end.
    ///
    /// Has no effect on non-mapping values.
    pub fn set(&mut self, key: impl Into<String>, value: FieldValue) {
        if let Self::Mapping(entries) = self {
            let key = key.into();
            match entries.iter_mut().find(|(k, _)| *k == key) {
                Some((_, slot)) => *slot = value,
                None => entries.push((key, value)),
            }
        }
    }
}

impl From<serde_json::Value> for FieldValue {
    /// Converts a JSON value into a draft value.
    ///
    /// The string `"NILL"` maps to [`FieldValue::Sentinel`]; object key order
    /// is preserved as-is.
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => Self::Number(n),
            serde_json::Value::String(s) if s == SENTINEL => Self::Sentinel,
            serde_json::Value::String(s) => Self::Text(s),
            serde_json::Value::Array(items) => {
                Self::Sequence(items.into_iter().map(Self::from).collect())
            }
            serde_json::Value::Object(entries) => Self::Mapping(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, Self::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<FieldValue> for serde_json::Value {
    fn from(value: FieldValue) -> Self {
        match value {
            FieldValue::Null => serde_json::Value::Null,
            FieldValue::Sentinel => serde_json::Value::String(SENTINEL.to_owned()),
            FieldValue::Bool(b) => serde_json::Value::Bool(b),
            FieldValue::Number(n) => serde_json::Value::Number(n),
            FieldValue::Text(s) => serde_json::Value::String(s),
            FieldValue::Sequence(items) => {
                serde_json::Value::Array(items.into_iter().map(Self::from).collect())
            }
            FieldValue::Mapping(entries) => serde_json::Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, Self::from(v)))
                    .collect(),
            ),
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Sentinel => serializer.serialize_str(SENTINEL),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Number(n) => n.serialize(serializer),
            Self::Text(s) => serializer.serialize_str(s),
            Self::Sequence(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Mapping(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for FieldValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct FieldValueVisitor;

        impl<'de> Visitor<'de> for FieldValueVisitor {
            type Value = FieldValue;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a scalar, sequence, or mapping draft value")
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E> {
                Ok(FieldValue::Null)
            }

            fn visit_none<E>(self) -> Result<Self::Value, E> {
                Ok(FieldValue::Null)
            }

            fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                deserializer.deserialize_any(FieldValueVisitor)
            }

            fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E> {
                Ok(FieldValue::Bool(value))
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E> {
                Ok(FieldValue::Number(serde_json::Number::from(value)))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E> {
                Ok(FieldValue::Number(serde_json::Number::from(value)))
            }

            fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                serde_json::Number::from_f64(value)
                    .map(FieldValue::Number)
                    .ok_or_else(|| E::custom("non-finite numbers are not supported"))
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E> {
                if value == SENTINEL {
                    Ok(FieldValue::Sentinel)
                } else {
                    Ok(FieldValue::Text(value.to_owned()))
                }
            }

            fn visit_string<E>(self, value: String) -> Result<Self::Value, E> {
                if value == SENTINEL {
                    Ok(FieldValue::Sentinel)
                } else {
                    Ok(FieldValue::Text(value))
                }
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(item) = seq.next_element()? {
                    items.push(item);
                }
                Ok(FieldValue::Sequence(items))
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((key, value)) = map.next_entry::<String, FieldValue>()? {
                    entries.push((key, value));
                }
                Ok(FieldValue::Mapping(entries))
            }
        }

        deserializer.deserialize_any(FieldValueVisitor)
    }
}
