//! Attribute range computation
//!
//! A range is the `{min, max}` of a numeric or index-valued attribute
//! across a reference corpus, and its span (`max - min + 1`) is the number
//! of slots the attribute occupies in a one-hot layout. Ranges are computed
//! once per (corpus, attribute) and cached by the encoder for the lifetime
//! of an encoding session.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use valar_model::{AttrValue, Entity};

/// Minimum and maximum of an attribute over a corpus.
///
/// A corpus that yields no valid values produces the degenerate range
/// `{min: +inf, max: -inf}`; layout construction detects this via
/// [`AttrRange::is_degenerate`] and allocates the attribute zero width.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttrRange {
    pub min: f64,
    pub max: f64,
}

impl AttrRange {
    /// The identity element of range accumulation: no value observed yet.
    pub const DEGENERATE: AttrRange = AttrRange {
        min: f64::INFINITY,
        max: f64::NEG_INFINITY,
    };

    #[must_use]
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// `max - min + 1`: the number of one-hot slots this range spans.
    #[must_use]
    pub fn span(&self) -> f64 {
        self.max - self.min + 1.0
    }

    /// True if the range cannot size a one-hot region (span not positive,
    /// or not finite).
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        !(self.span() > 0.0 && self.span().is_finite())
    }

    /// The span as a slot count. Must not be called on a degenerate range.
    #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    #[must_use]
    pub(crate) fn slots(&self) -> usize {
        debug_assert!(!self.is_degenerate());
        self.span() as usize
    }

    fn accumulate(&mut self, value: f64) {
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }
}

/// Computes the range of an attribute across a corpus.
///
/// Each entity contributes a representative value pair: for a numeric
/// sequence, its own minimum and maximum (an empty sequence contributes the
/// accumulation identities); for a numeric scalar, the value itself;
/// non-numeric and absent values count as absent.
///
/// # Examples
///
/// ```
/// use valar_features::range::extreme_of;
/// use valar_model::{AttrValue, Entity};
///
/// let corpus: Vec<Entity> = [3.0, 7.0, 5.0]
///     .iter()
///     .map(|v| {
///         let mut e = Entity::new();
///         e.insert("v", AttrValue::Number(*v));
///         e
///     })
///     .collect();
///
/// let range = extreme_of(&corpus, "v");
/// assert_eq!((range.min, range.max, range.span()), (3.0, 7.0, 5.0));
/// ```
#[must_use]
pub fn extreme_of(corpus: &[Entity], attr: &str) -> AttrRange {
    let mut range = AttrRange::DEGENERATE;
    for entity in corpus {
        match entity.get(attr) {
            Some(AttrValue::NumSeq(values)) => {
                for value in values {
                    range.accumulate(*value);
                }
            }
            _ => {
                if let Some(value) = entity.numeric(attr) {
                    range.accumulate(value);
                }
            }
        }
    }
    range
}

/// Computes ranges for several attributes in one pass over the names.
#[must_use]
pub fn attr_ranges(corpus: &[Entity], attrs: &[&str]) -> BTreeMap<String, AttrRange> {
    attrs
        .iter()
        .map(|attr| ((*attr).to_string(), extreme_of(corpus, attr)))
        .collect()
}
