//! Feature engineering core for the character-survival pipeline
//!
//! This crate turns heterogeneous character records into fixed-width numeric
//! vectors with a layout that is stable across training, prediction, and
//! test splits. It is the reusable heart of the repository; everything else
//! (formatters, file writers, the API client) is glue around it.
//!
//! # Overview
//!
//! The encoding pipeline works as follows:
//!
//! 1. **Sanitize** raw attribute strings ([`sanitize`]) so equality and set
//!    membership are stable across spelling variants.
//! 2. **Build vocabularies** ([`vocabulary::build_vocabulary`]): the sorted,
//!    deduplicated universe of values for a categorical attribute.
//! 3. **Map values to indices** ([`vocabulary::to_indices`]), silently
//!    dropping values outside the vocabulary.
//! 4. **Compute ranges** ([`range::extreme_of`]): the min/max/span of each
//!    numeric or index-valued attribute across the reference corpus.
//! 5. **Encode** ([`encoder::JoinedOneHotEncoder`]): project each entity
//!    into a vector with one slot per scalar attribute and one indicator
//!    region per categorical attribute.
//!
//! # Example
//!
//! ```
//! use valar_features::encoder::JoinedOneHotEncoder;
//! use valar_model::{AttrValue, Entity};
//!
//! let corpus: Vec<Entity> = [0.0, 1.0, 2.0]
//!     .iter()
//!     .map(|house| {
//!         let mut e = Entity::new();
//!         e.insert("male", AttrValue::Bool(true));
//!         e.insert("house", AttrValue::Number(*house));
//!         e
//!     })
//!     .collect();
//!
//! let encoder = JoinedOneHotEncoder::new(&corpus, &["male"], &["house"]);
//! assert_eq!(encoder.len(), 1 + 3);
//! assert_eq!(encoder.encode_one(&corpus[1]), vec![1.0, 0.0, 1.0, 0.0]);
//! ```

pub mod encoder;
pub mod range;
pub mod sanitize;
pub mod vocabulary;

pub use encoder::JoinedOneHotEncoder;
pub use range::AttrRange;
pub use sanitize::{sanitize, sanitized_eq};
