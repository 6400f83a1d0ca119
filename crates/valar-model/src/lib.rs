//! Data model shared by the character-survival pipeline
//!
//! This crate defines the dynamic entity representation consumed by the
//! feature encoder, together with the pipeline-wide configuration values.
//!
//! Character records have no fixed schema: every dataset revision carries a
//! different set of attributes, and the encoder is configured with attribute
//! names at runtime. [`Entity`] therefore models a record as a map from
//! attribute name to a tagged [`AttrValue`] variant, with explicit accessor
//! policies for the places where a scalar, a numeric value, or a sequence is
//! expected.
//!
//! # Examples
//!
//! ```
//! use valar_model::{AttrValue, Entity};
//!
//! let mut entity = Entity::new();
//! entity.insert("male", AttrValue::Bool(true));
//! entity.insert("titles", AttrValue::NumSeq(vec![0.0, 3.0]));
//!
//! assert_eq!(entity.scalar("male"), 1.0);
//! assert_eq!(entity.numbers("titles"), vec![0.0, 3.0]);
//! assert_eq!(entity.numeric("missing"), None);
//! ```

pub mod config;
pub mod entity;

pub use config::{Dataset, PipelineConfig};
pub use entity::{AttrValue, Corpus, Entity};
