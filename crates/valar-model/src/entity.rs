//! Dynamic, schema-less character records
//!
//! Raw dataset documents are plain JSON objects whose attribute sets differ
//! between dataset revisions. [`AttrValue`] captures the value shapes that
//! actually occur (scalars, strings, and homogeneous sequences) and
//! [`Entity`] exposes them through named accessor policies so that default
//! substitution is explicit and testable rather than hidden in ad-hoc
//! coercions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// An ordered sequence of entities used as a reference population.
pub type Corpus = Vec<Entity>;

/// A single attribute value on an entity.
///
/// The untagged representation maps directly onto the JSON documents the
/// pipeline reads: `null` becomes [`AttrValue::Absent`], numbers become
/// [`AttrValue::Number`], and arrays become the matching sequence variant.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(untagged)]
pub enum AttrValue {
    /// Attribute present with a `null` value (or missing entirely).
    #[default]
    Absent,
    Bool(bool),
    Number(f64),
    Str(String),
    NumSeq(Vec<f64>),
    StrSeq(Vec<String>),
}

impl AttrValue {
    /// Numeric reading of the value, treating booleans as 0/1.
    ///
    /// Non-numeric values (strings, sequences, absent) yield `None`; the
    /// range calculator maps `None` to its accumulation identity.
    #[must_use]
    pub fn as_numeric(&self) -> Option<f64> {
        match self {
            AttrValue::Number(n) => Some(*n),
            AttrValue::Bool(b) => Some(f64::from(*b)),
            _ => None,
        }
    }
}

/// A character record: a mapping from attribute name to value.
///
/// Attributes are accessed dynamically by name per encoder configuration.
/// A missing attribute behaves exactly like an [`AttrValue::Absent`] one.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Entity {
    attrs: BTreeMap<String, AttrValue>,
}

impl Entity {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<N>(&mut self, name: N, value: AttrValue)
    where
        N: Into<String>,
    {
        self.attrs.insert(name.into(), value);
    }

    #[must_use]
    pub fn get(&self, attr: &str) -> Option<&AttrValue> {
        self.attrs.get(attr)
    }

    /// Scalar-slot coercion policy: numbers as-is, booleans as 0/1,
    /// everything else (including absent) as 0.0.
    ///
    /// This is the value written into a scalar slot of an encoded vector.
    #[must_use]
    pub fn scalar(&self, attr: &str) -> f64 {
        self.numeric(attr).unwrap_or(0.0)
    }

    /// Strictly numeric reading: numbers and booleans only.
    ///
    /// Used by the range calculator, where a non-numeric value counts as
    /// absent rather than as zero.
    #[must_use]
    pub fn numeric(&self, attr: &str) -> Option<f64> {
        self.get(attr).and_then(AttrValue::as_numeric)
    }

    /// Sequence reading for one-hot writes.
    ///
    /// A numeric sequence is returned as-is; a single number or boolean is
    /// treated as a one-element sequence; anything else is empty.
    #[must_use]
    pub fn numbers(&self, attr: &str) -> Vec<f64> {
        match self.get(attr) {
            Some(AttrValue::NumSeq(values)) => values.clone(),
            other => other
                .and_then(AttrValue::as_numeric)
                .map_or_else(Vec::new, |n| vec![n]),
        }
    }

    /// String-sequence reading for vocabulary accessors.
    ///
    /// A string sequence is returned as-is; a single string is treated as a
    /// one-element sequence; anything else is empty.
    #[must_use]
    pub fn strings(&self, attr: &str) -> Vec<&str> {
        match self.get(attr) {
            Some(AttrValue::StrSeq(values)) => values.iter().map(String::as_str).collect(),
            Some(AttrValue::Str(value)) => vec![value.as_str()],
            _ => vec![],
        }
    }
}

impl FromIterator<(String, AttrValue)> for Entity {
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = (String, AttrValue)>,
    {
        Self {
            attrs: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(pairs: &[(&str, AttrValue)]) -> Entity {
        pairs
            .iter()
            .map(|(name, value)| ((*name).to_string(), value.clone()))
            .collect()
    }

    #[test]
    fn scalar_policy_coerces_bools_and_defaults_to_zero() {
        let e = entity(&[
            ("male", AttrValue::Bool(true)),
            ("age", AttrValue::Number(12.0)),
            ("house", AttrValue::Str("stark".to_string())),
        ]);

        assert_eq!(e.scalar("male"), 1.0);
        assert_eq!(e.scalar("age"), 12.0);
        assert_eq!(e.scalar("house"), 0.0);
        assert_eq!(e.scalar("missing"), 0.0);
    }

    #[test]
    fn numeric_policy_treats_non_numbers_as_absent() {
        let e = entity(&[
            ("name", AttrValue::Str("arya".to_string())),
            ("dead", AttrValue::Bool(false)),
            ("titles", AttrValue::NumSeq(vec![1.0])),
        ]);

        assert_eq!(e.numeric("name"), None);
        assert_eq!(e.numeric("dead"), Some(0.0));
        assert_eq!(e.numeric("titles"), None);
    }

    #[test]
    fn numbers_policy_wraps_scalars_as_one_element_sequences() {
        let e = entity(&[
            ("books", AttrValue::NumSeq(vec![0.0, 2.0, 2.0])),
            ("culture", AttrValue::Number(4.0)),
            ("name", AttrValue::Str("bran".to_string())),
        ]);

        assert_eq!(e.numbers("books"), vec![0.0, 2.0, 2.0]);
        assert_eq!(e.numbers("culture"), vec![4.0]);
        assert_eq!(e.numbers("name"), Vec::<f64>::new());
        assert_eq!(e.numbers("missing"), Vec::<f64>::new());
    }

    #[test]
    fn deserializes_plain_json_objects() {
        let json = r#"{
            "name": "Jon Snow",
            "male": true,
            "age": 23,
            "titles": ["Lord Commander"],
            "books": [0, 1, 4],
            "death": null
        }"#;
        let e: Entity = serde_json::from_str(json).unwrap();

        assert_eq!(e.scalar("male"), 1.0);
        assert_eq!(e.numeric("age"), Some(23.0));
        assert_eq!(e.strings("titles"), vec!["Lord Commander"]);
        assert_eq!(e.numbers("books"), vec![0.0, 1.0, 4.0]);
        assert_eq!(e.get("death"), Some(&AttrValue::Absent));
        assert_eq!(e.get("missing"), None);
    }

    #[test]
    fn round_trips_through_json() {
        let e = entity(&[
            ("male", AttrValue::Bool(false)),
            ("locations", AttrValue::NumSeq(vec![3.0])),
        ]);
        let json = serde_json::to_string(&e).unwrap();
        let back: Entity = serde_json::from_str(&json).unwrap();
        assert_eq!(back, e);
    }
}
