//! Dataset formatters: raw scraped records to model-ready characters
//!
//! The raw character documents are scraped wiki data with inconsistent
//! attribute coverage. The formatters distill them into the fixed shape the
//! encoder consumes: derived scalars (`age`, `numRelatives`), vocabulary
//! indices for categorical attributes, and a train/predict split on death.
//!
//! Both dataset flavours share the same skeleton:
//!
//! 1. build vocabularies over the whole raw corpus,
//! 2. keep characters with a known birth and a non-negative lifespan,
//! 3. derive and index the attributes,
//! 4. drop implausible ages, max-normalize the unbounded scalars,
//! 5. split into dead (training) and alive (prediction) characters.

pub mod book;
pub mod raw;
pub mod show;

pub use book::{BookFormatterOutput, BookVocabularies, FormattedBookCharacter, format_book};
pub use show::{FormattedShowCharacter, ShowFormatterOutput, ShowVocabularies, format_show};

use valar_features::sanitize;
use valar_model::AttrValue;

/// Index of a single-valued attribute in its vocabulary, `-1` when the
/// value is absent or unknown.
///
/// Single-valued categoricals keep the sentinel instead of being dropped;
/// the encoder's range step treats `-1` as the minimum of the attribute and
/// gives it a slot of its own.
pub(crate) fn vocab_index(vocabulary: &[String], value: Option<&str>) -> i64 {
    sanitize(value)
        .and_then(|value| vocabulary.binary_search(&value).ok())
        .and_then(|index| i64::try_from(index).ok())
        .unwrap_or(-1)
}

/// Divides a scalar field by its corpus-wide maximum, mapping it into
/// `[0, 1]`. A non-positive maximum leaves the values untouched.
pub(crate) fn max_normalize<T, F>(items: &mut [T], field: F)
where
    F: Fn(&mut T) -> &mut f64,
{
    let max = items
        .iter_mut()
        .map(|item| *field(item))
        .fold(f64::NEG_INFINITY, f64::max);
    if max > 0.0 {
        for item in items {
            *field(item) /= max;
        }
    }
}

#[expect(clippy::cast_precision_loss)]
pub(crate) fn indices_attr(indices: &[usize]) -> AttrValue {
    AttrValue::NumSeq(indices.iter().map(|&i| i as f64).collect())
}
