//! Joined one-hot vector encoding
//!
//! [`JoinedOneHotEncoder`] projects entities into fixed-length numeric
//! vectors whose layout is derived once from a reference corpus and never
//! changes afterwards. The layout joins two kinds of attributes:
//!
//! - **Scalar attributes** occupy exactly one slot each, at their
//!   declaration index, and receive the entity's coerced numeric value.
//! - **Vector attributes** occupy one contiguous indicator region each,
//!   sized by the attribute's range over the reference corpus. Every value
//!   the entity carries sets the indicator at `offset + (value - min)`, so
//!   multi-valued attributes may set several slots at once.
//!
//! Because the reference corpus should be the union of every split that
//! will later be encoded (training, prediction, test), the offsets and the
//! total length form a stable contract: vectors from different splits stay
//! comparable slot by slot.
//!
//! # Unfolding
//!
//! The encoder can also expand one entity into a family of labeled
//! synthetic examples by sweeping a single attribute across its range
//! ([`JoinedOneHotEncoder::encode_one_unfolded`]). This is how a static
//! character record becomes an ordinal training sequence ("is the character
//! still alive at age N" for every N). The entity's own indicator for the
//! swept attribute is explicitly cleared before the sweep so each synthetic
//! example carries exactly the swept value in that region.

use std::collections::BTreeMap;

use valar_model::Entity;

use crate::range::{AttrRange, attr_ranges};

/// Offset and range of one active vector attribute ("attribute descriptor").
#[derive(Debug, Clone, Copy)]
struct Region {
    offset: usize,
    range: AttrRange,
}

/// Fixed-layout encoder for scalar and categorical attributes.
///
/// Construction computes the range of every vector attribute over the
/// reference corpus, drops attributes whose range is degenerate (a
/// zero-width region would otherwise corrupt its neighbors), and assigns
/// offsets in declaration order: scalars first, then the vector regions
/// back to back. The resulting layout is immutable; reconfiguration via
/// [`JoinedOneHotEncoder::apply_config`] rebuilds offsets but reuses the
/// cached ranges.
#[derive(Debug, Clone)]
pub struct JoinedOneHotEncoder {
    ranges: BTreeMap<String, AttrRange>,
    scalar_attrs: Vec<String>,
    vector_attrs: Vec<String>,
    regions: BTreeMap<String, Region>,
    len: usize,
}

impl JoinedOneHotEncoder {
    /// Builds an encoder whose layout is derived from `reference_corpus`.
    ///
    /// Vector attributes that yield a degenerate range (absent from every
    /// entity, or an empty corpus) are excluded from the active layout.
    ///
    /// # Examples
    ///
    /// ```
    /// use valar_features::encoder::JoinedOneHotEncoder;
    /// use valar_model::{AttrValue, Entity};
    ///
    /// let corpus: Vec<Entity> = (0..3)
    ///     .map(|house| {
    ///         let mut e = Entity::new();
    ///         e.insert("male", AttrValue::Bool(true));
    ///         e.insert("house", AttrValue::Number(f64::from(house)));
    ///         e
    ///     })
    ///     .collect();
    ///
    /// let encoder = JoinedOneHotEncoder::new(&corpus, &["male"], &["house"]);
    /// assert_eq!(encoder.len(), 4);
    /// ```
    #[must_use]
    pub fn new(reference_corpus: &[Entity], scalar_attrs: &[&str], vector_attrs: &[&str]) -> Self {
        let ranges = attr_ranges(reference_corpus, vector_attrs);
        let scalar_attrs: Vec<String> = scalar_attrs.iter().map(ToString::to_string).collect();
        let vector_attrs: Vec<String> = vector_attrs.iter().map(ToString::to_string).collect();
        let (vector_attrs, regions, len) = build_layout(&ranges, &scalar_attrs, &vector_attrs);
        Self {
            ranges,
            scalar_attrs,
            vector_attrs,
            regions,
            len,
        }
    }

    /// Rebuilds the layout for a (sub)set of attributes, reusing the ranges
    /// computed at construction.
    ///
    /// Used to derive secondary layouts (for example scalar-only label
    /// vectors) from the same reference corpus without recomputing ranges.
    /// Vector attributes without a cached, non-degenerate range are
    /// excluded, exactly as during construction.
    pub fn apply_config(&mut self, scalar_attrs: &[&str], vector_attrs: &[&str]) {
        self.scalar_attrs = scalar_attrs.iter().map(ToString::to_string).collect();
        let vector_attrs: Vec<String> = vector_attrs.iter().map(ToString::to_string).collect();
        let (vector_attrs, regions, len) =
            build_layout(&self.ranges, &self.scalar_attrs, &vector_attrs);
        self.vector_attrs = vector_attrs;
        self.regions = regions;
        self.len = len;
    }

    /// Total length of every encoded vector.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Active scalar attributes in declaration order.
    #[must_use]
    pub fn scalar_attrs(&self) -> &[String] {
        &self.scalar_attrs
    }

    /// Active vector attributes in declaration order (degenerate ones are
    /// not present).
    #[must_use]
    pub fn vector_attrs(&self) -> &[String] {
        &self.vector_attrs
    }

    /// Slot offset of an active attribute, scalar or vector.
    #[must_use]
    pub fn offset_of(&self, attr: &str) -> Option<usize> {
        if let Some(index) = self.scalar_attrs.iter().position(|a| a == attr) {
            return Some(index);
        }
        self.regions.get(attr).map(|region| region.offset)
    }

    /// Cached range of a vector attribute (including degenerate ones).
    #[must_use]
    pub fn range_of(&self, attr: &str) -> Option<AttrRange> {
        self.ranges.get(attr).copied()
    }

    /// Encodes a single entity into a vector of [`Self::len`] slots.
    ///
    /// # Panics
    ///
    /// Panics if a vector-attribute value lies outside the range computed
    /// from the reference corpus. That is a logic error in the caller (the
    /// value did not originate from the reference population), and an
    /// out-of-bounds indicator write would silently corrupt a neighboring
    /// region.
    #[expect(clippy::cast_possible_truncation)]
    #[must_use]
    pub fn encode_one(&self, entity: &Entity) -> Vec<f32> {
        let mut vector = vec![0.0_f32; self.len];
        for (slot, attr) in self.scalar_attrs.iter().enumerate() {
            vector[slot] = entity.scalar(attr) as f32;
        }
        for attr in &self.vector_attrs {
            let region = self.regions[attr];
            for value in entity.numbers(attr) {
                vector[indicator_slot(attr, region, value)] = 1.0;
            }
        }
        vector
    }

    /// Encodes a batch of entities, preserving order.
    #[must_use]
    pub fn encode_many(&self, entities: &[Entity]) -> Vec<Vec<f32>> {
        entities.iter().map(|e| self.encode_one(e)).collect()
    }

    /// Expands one entity into labeled synthetic examples by sweeping
    /// `attr` across a range.
    ///
    /// The base vector is the ordinary encoding with the entity's own
    /// indicator(s) for `attr` cleared. For every integer step of the swept
    /// range (`used_range`, defaulting to the attribute's cached range; a
    /// caller-supplied range spans `max - min + 1` steps), the modifier maps
    /// the swept value to a region-relative slot (`identity_sweep` passes it
    /// through, which is exact for zero-based ranges), the indicator is set
    /// in a copy of the base vector, and the pair is labeled via
    /// `label_fn(entity, swept_slot, cached_range)`.
    ///
    /// Returns one `(vector, label)` pair per swept integer, ascending.
    ///
    /// # Panics
    ///
    /// Panics if `attr` is not an active vector attribute, or if a swept
    /// slot falls outside the attribute's region.
    pub fn encode_one_unfolded<L, F, M>(
        &self,
        entity: &Entity,
        attr: &str,
        label_fn: F,
        used_range: Option<AttrRange>,
        modifier: M,
    ) -> Vec<(Vec<f32>, L)>
    where
        F: Fn(&Entity, f64, AttrRange) -> L,
        M: Fn(&Entity, f64, AttrRange) -> f64,
    {
        let region = *self
            .regions
            .get(attr)
            .unwrap_or_else(|| panic!("`{attr}` is not an active vector attribute"));
        let full = region.range;
        let used = used_range.unwrap_or(full);

        let mut base = self.encode_one(entity);
        // Clear-then-set: the entity's own value must not leak into the
        // swept copies.
        for value in entity.numbers(attr) {
            base[indicator_slot(attr, region, value)] = 0.0;
        }

        if used.is_degenerate() {
            return vec![];
        }
        let steps = used.slots();
        let mut out = Vec::with_capacity(steps);
        for step in 0..steps {
            #[expect(clippy::cast_precision_loss)]
            let swept = used.min + step as f64;
            let slot = modifier(entity, swept, full);
            let mut vector = base.clone();
            vector[region_slot(attr, region, slot)] = 1.0;
            out.push((vector, label_fn(entity, slot, full)));
        }
        out
    }

    /// Flat-maps [`Self::encode_one_unfolded`] over a batch.
    ///
    /// Returns two parallel sequences in flattened order; the vector and
    /// label at the same index always belong to the same synthetic example.
    pub fn encode_many_unfolded<L, F, M>(
        &self,
        entities: &[Entity],
        attr: &str,
        label_fn: F,
        used_range: Option<AttrRange>,
        modifier: M,
    ) -> (Vec<Vec<f32>>, Vec<L>)
    where
        F: Fn(&Entity, f64, AttrRange) -> L,
        M: Fn(&Entity, f64, AttrRange) -> f64,
    {
        let mut vectors = vec![];
        let mut labels = vec![];
        for entity in entities {
            for (vector, label) in
                self.encode_one_unfolded(entity, attr, &label_fn, used_range, &modifier)
            {
                vectors.push(vector);
                labels.push(label);
            }
        }
        (vectors, labels)
    }

    /// The unfolding sweep without labels, for prediction-time inputs.
    pub fn encode_many_unfolded_data_only<M>(
        &self,
        entities: &[Entity],
        attr: &str,
        used_range: Option<AttrRange>,
        modifier: M,
    ) -> Vec<Vec<f32>>
    where
        M: Fn(&Entity, f64, AttrRange) -> f64,
    {
        self.encode_many_unfolded(entities, attr, |_, _, _| (), used_range, modifier)
            .0
    }
}

/// Default sweep modifier: the swept value is already the region slot.
#[must_use]
pub fn identity_sweep(_entity: &Entity, swept: f64, _range: AttrRange) -> f64 {
    swept
}

/// Assigns offsets in declaration order: scalars first, then vector regions
/// back to back. Attributes without a usable range are excluded up front.
fn build_layout(
    ranges: &BTreeMap<String, AttrRange>,
    scalar_attrs: &[String],
    vector_attrs: &[String],
) -> (Vec<String>, BTreeMap<String, Region>, usize) {
    let active: Vec<String> = vector_attrs
        .iter()
        .filter(|attr| {
            ranges
                .get(attr.as_str())
                .is_some_and(|range| !range.is_degenerate())
        })
        .cloned()
        .collect();

    let mut regions = BTreeMap::new();
    let mut offset = scalar_attrs.len();
    for attr in &active {
        let range = ranges[attr.as_str()];
        regions.insert(attr.clone(), Region { offset, range });
        offset += range.slots();
    }
    (active, regions, offset)
}

/// Slot of an absolute attribute value: `offset + (value - min)`.
fn indicator_slot(attr: &str, region: Region, value: f64) -> usize {
    region_slot(attr, region, value - region.range.min)
}

/// Slot of a region-relative position, bounds-checked against the region.
#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn region_slot(attr: &str, region: Region, relative: f64) -> usize {
    assert!(
        relative >= 0.0 && relative < region.range.span(),
        "value out of range for attribute `{attr}`: relative slot {relative} not in [0, {})",
        region.range.span(),
    );
    region.offset + relative as usize
}

#[cfg(test)]
mod tests {
    use valar_model::{AttrValue, Corpus};

    use super::*;

    /// male + house corpus giving house range {min: 0, max: 2, span: 3}.
    fn house_corpus() -> Corpus {
        (0..3)
            .map(|house| {
                let mut e = Entity::new();
                e.insert("male", AttrValue::Bool(house % 2 == 0));
                e.insert("house", AttrValue::Number(f64::from(house)));
                e
            })
            .collect()
    }

    fn character(age: f64, titles: &[f64]) -> Entity {
        let mut e = Entity::new();
        e.insert("male", AttrValue::Bool(true));
        e.insert("age", AttrValue::Number(age));
        e.insert("titles", AttrValue::NumSeq(titles.to_vec()));
        e
    }

    #[test]
    fn scalar_then_region_layout_and_encoding() {
        let corpus = house_corpus();
        let encoder = JoinedOneHotEncoder::new(&corpus, &["male"], &["house"]);

        assert_eq!(encoder.len(), 4);
        assert_eq!(encoder.offset_of("male"), Some(0));
        assert_eq!(encoder.offset_of("house"), Some(1));

        let mut entity = Entity::new();
        entity.insert("male", AttrValue::Number(1.0));
        entity.insert("house", AttrValue::Number(1.0));
        assert_eq!(encoder.encode_one(&entity), vec![1.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn layout_is_stable_across_constructions() {
        let corpus = house_corpus();
        let a = JoinedOneHotEncoder::new(&corpus, &["male"], &["house"]);
        let b = JoinedOneHotEncoder::new(&corpus, &["male"], &["house"]);

        assert_eq!(a.len(), b.len());
        assert_eq!(a.offset_of("house"), b.offset_of("house"));
        assert_eq!(a.range_of("house"), b.range_of("house"));
    }

    #[test]
    fn all_vectors_share_the_encoder_length() {
        let corpus: Corpus = (0..5).map(|i| character(f64::from(i), &[0.0])).collect();
        let encoder = JoinedOneHotEncoder::new(&corpus, &["male"], &["age", "titles"]);

        for vector in encoder.encode_many(&corpus) {
            assert_eq!(vector.len(), encoder.len());
        }
    }

    #[test]
    fn single_valued_attribute_sets_exactly_one_slot_in_its_region() {
        let corpus = house_corpus();
        let encoder = JoinedOneHotEncoder::new(&corpus, &[], &["house"]);
        let offset = encoder.offset_of("house").unwrap();

        for entity in &corpus {
            let vector = encoder.encode_one(entity);
            let ones = vector[offset..offset + 3]
                .iter()
                .filter(|v| **v == 1.0)
                .count();
            assert_eq!(ones, 1);
        }
    }

    #[test]
    fn multi_valued_attribute_sets_multiple_slots() {
        let corpus: Corpus = vec![character(0.0, &[0.0, 1.0, 2.0])];
        let encoder = JoinedOneHotEncoder::new(&corpus, &[], &["titles"]);

        let vector = encoder.encode_one(&character(0.0, &[0.0, 2.0]));
        assert_eq!(vector, vec![1.0, 0.0, 1.0]);
    }

    #[test]
    fn degenerate_attribute_is_excluded() {
        let corpus = house_corpus();
        let encoder = JoinedOneHotEncoder::new(&corpus, &["male"], &["house", "culture"]);

        assert_eq!(encoder.vector_attrs(), ["house".to_string()]);
        assert_eq!(encoder.offset_of("culture"), None);
        assert!(encoder.range_of("culture").unwrap().is_degenerate());
        // length unaffected by the excluded attribute
        assert_eq!(encoder.len(), 4);
    }

    #[test]
    fn offsets_follow_declaration_order() {
        let corpus: Corpus = (0..4)
            .map(|i| {
                let mut e = character(f64::from(i), &[0.0, 1.0]);
                e.insert("house", AttrValue::Number(f64::from(i % 2)));
                e
            })
            .collect();
        let encoder =
            JoinedOneHotEncoder::new(&corpus, &["male"], &["age", "house", "titles"]);

        // male: slot 0; age: span 4 at offset 1; house: span 2 at 5;
        // titles: span 2 at 7.
        assert_eq!(encoder.offset_of("age"), Some(1));
        assert_eq!(encoder.offset_of("house"), Some(5));
        assert_eq!(encoder.offset_of("titles"), Some(7));
        assert_eq!(encoder.len(), 9);
    }

    #[test]
    fn nonzero_minimum_shifts_indicator_slots() {
        let corpus: Corpus = [3.0, 7.0, 5.0]
            .iter()
            .map(|v| {
                let mut e = Entity::new();
                e.insert("v", AttrValue::Number(*v));
                e
            })
            .collect();
        let encoder = JoinedOneHotEncoder::new(&corpus, &[], &["v"]);

        assert_eq!(encoder.len(), 5);
        let mut entity = Entity::new();
        entity.insert("v", AttrValue::Number(3.0));
        assert_eq!(encoder.encode_one(&entity)[0], 1.0);
        let mut entity = Entity::new();
        entity.insert("v", AttrValue::Number(7.0));
        assert_eq!(encoder.encode_one(&entity)[4], 1.0);
    }

    #[test]
    #[should_panic(expected = "out of range for attribute `house`")]
    fn out_of_range_value_panics_instead_of_corrupting() {
        let corpus = house_corpus();
        let encoder = JoinedOneHotEncoder::new(&corpus, &[], &["house"]);

        let mut entity = Entity::new();
        entity.insert("house", AttrValue::Number(5.0));
        let _ = encoder.encode_one(&entity);
    }

    #[test]
    fn apply_config_reuses_ranges_for_a_subset() {
        let corpus: Corpus = (0..4).map(|i| character(f64::from(i), &[0.0])).collect();
        let mut encoder =
            JoinedOneHotEncoder::new(&corpus, &["male"], &["age", "titles"]);
        let age_range = encoder.range_of("age").unwrap();

        encoder.apply_config(&[], &["age"]);
        assert_eq!(encoder.range_of("age"), Some(age_range));
        assert_eq!(encoder.offset_of("age"), Some(0));
        assert_eq!(encoder.len(), 4);
        // attributes never ranged at construction stay excluded
        encoder.apply_config(&[], &["age", "house"]);
        assert_eq!(encoder.offset_of("house"), None);
    }

    #[test]
    fn unfold_produces_span_many_ascending_pairs() {
        let corpus: Corpus = (0..6).map(|i| character(f64::from(i), &[0.0])).collect();
        let encoder = JoinedOneHotEncoder::new(&corpus, &["male"], &["age", "titles"]);

        let pairs = encoder.encode_one_unfolded(
            &corpus[3],
            "age",
            |_, swept, _| swept,
            None,
            identity_sweep,
        );

        assert_eq!(pairs.len(), 6);
        let swept: Vec<f64> = pairs.iter().map(|(_, label)| *label).collect();
        assert_eq!(swept, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn unfold_clears_the_entity_bit_before_sweeping() {
        let corpus: Corpus = (0..4).map(|i| character(f64::from(i), &[0.0])).collect();
        let encoder = JoinedOneHotEncoder::new(&corpus, &[], &["age"]);

        let pairs = encoder.encode_one_unfolded(
            &corpus[2],
            "age",
            |_, swept, _| swept,
            None,
            identity_sweep,
        );

        // each swept vector carries exactly its own indicator, including
        // the step matching the entity's true age
        for (step, (vector, _)) in pairs.iter().enumerate() {
            let expected: Vec<f32> = (0..4).map(|i| f32::from(u8::from(i == step))).collect();
            assert_eq!(*vector, expected);
        }
    }

    #[test]
    fn unfold_respects_a_caller_supplied_range() {
        let corpus: Corpus = (0..10).map(|i| character(f64::from(i), &[0.0])).collect();
        let encoder = JoinedOneHotEncoder::new(&corpus, &[], &["age"]);

        let pairs = encoder.encode_one_unfolded(
            &corpus[0],
            "age",
            |_, swept, _| swept,
            Some(AttrRange::new(2.0, 5.0)),
            identity_sweep,
        );

        let swept: Vec<f64> = pairs.iter().map(|(_, label)| *label).collect();
        assert_eq!(swept, vec![2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn unfold_modifier_remaps_swept_values() {
        let corpus: Corpus = (0..4).map(|i| character(f64::from(i), &[0.0])).collect();
        let encoder = JoinedOneHotEncoder::new(&corpus, &[], &["age"]);

        // reverse the sweep within the region
        let pairs = encoder.encode_one_unfolded(
            &corpus[0],
            "age",
            |_, slot, _| slot,
            None,
            |_, swept, range| range.max - swept,
        );

        let slots: Vec<f64> = pairs.iter().map(|(_, label)| *label).collect();
        assert_eq!(slots, vec![3.0, 2.0, 1.0, 0.0]);
        assert_eq!(pairs[0].0, vec![0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn unfolded_batches_stay_index_aligned() {
        let corpus: Corpus = (0..3).map(|i| character(f64::from(i), &[0.0])).collect();
        let encoder = JoinedOneHotEncoder::new(&corpus, &[], &["age"]);

        let (vectors, labels) = encoder.encode_many_unfolded(
            &corpus,
            "age",
            |entity, swept, _| (entity.scalar("age"), swept),
            None,
            identity_sweep,
        );

        assert_eq!(vectors.len(), 9);
        assert_eq!(labels.len(), 9);
        for (vector, (_, swept)) in vectors.iter().zip(&labels) {
            #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let slot = *swept as usize;
            assert_eq!(vector[slot], 1.0);
        }
    }

    #[test]
    fn data_only_sweep_matches_labeled_sweep() {
        let corpus: Corpus = (0..3).map(|i| character(f64::from(i), &[0.0])).collect();
        let encoder = JoinedOneHotEncoder::new(&corpus, &[], &["age"]);

        let (vectors, _) = encoder.encode_many_unfolded(
            &corpus,
            "age",
            |_, _, _| (),
            None,
            identity_sweep,
        );
        let data_only =
            encoder.encode_many_unfolded_data_only(&corpus, "age", None, identity_sweep);

        assert_eq!(data_only, vectors);
    }
}
