//! Vocabulary construction and index mapping for categorical attributes
//!
//! A vocabulary is the sorted, deduplicated universe of sanitized values a
//! categorical attribute takes across a corpus. Because the order is
//! deterministic (lexicographic ascending after sanitization), the index of
//! a value in its vocabulary is stable given the same corpus, which is what
//! keeps one-hot layouts comparable across pipeline runs.

use std::collections::BTreeSet;

use valar_model::Entity;

use crate::sanitize::sanitize;

/// Builds the vocabulary for an attribute from an arbitrary record type.
///
/// The accessor maps a record to its raw candidate strings (one element for
/// single-valued attributes). Values are sanitized, empty results are
/// dropped, duplicates collapse, and the output is sorted ascending.
///
/// Running this twice on the same corpus yields identical output in
/// identical order.
///
/// # Examples
///
/// ```
/// use valar_features::vocabulary::build_vocabulary;
///
/// let corpus = [vec!["x", "y"], vec!["z", "X"], vec!["x", "w"]];
/// let vocabulary = build_vocabulary(&corpus, |values| values.clone());
/// assert_eq!(vocabulary, vec!["w", "x", "y", "z"]);
/// ```
pub fn build_vocabulary<T, F>(corpus: &[T], accessor: F) -> Vec<String>
where
    F: Fn(&T) -> Vec<&str>,
{
    let set: BTreeSet<String> = corpus
        .iter()
        .flat_map(|record| accessor(record))
        .filter_map(|value| sanitize(Some(value)))
        .filter(|value| !value.is_empty())
        .collect();
    set.into_iter().collect()
}

/// Builds the vocabulary of a named entity attribute.
///
/// Convenience wrapper over [`build_vocabulary`] using the entity's
/// string-sequence accessor policy.
#[must_use]
pub fn attr_vocabulary(corpus: &[Entity], attr: &str) -> Vec<String> {
    build_vocabulary(corpus, |entity| entity.strings(attr))
}

/// Converts raw values into indices into a sorted vocabulary.
///
/// Each value is sanitized and looked up exactly; values absent from the
/// vocabulary are silently dropped. Output order matches input order and
/// duplicates are preserved. A missing input is the empty sequence.
///
/// # Examples
///
/// ```
/// use valar_features::vocabulary::to_indices;
///
/// let vocabulary = vec!["a".to_string(), "b".to_string(), "c".to_string()];
/// assert_eq!(to_indices(["A", "d", "b", "A"], &vocabulary), vec![0, 2, 0]);
/// ```
pub fn to_indices<'a, I>(values: I, vocabulary: &[String]) -> Vec<usize>
where
    I: IntoIterator<Item = &'a str>,
{
    values
        .into_iter()
        .filter_map(|value| sanitize(Some(value)))
        .filter_map(|value| vocabulary.binary_search(&value).ok())
        .collect()
}
