//! File I/O for the character-survival pipeline
//!
//! Two concerns live here:
//!
//! - [`store`]: the key-addressed JSON document store the formatters read
//!   raw corpora from and write their outputs to.
//! - [`tensor`]: the length-prefixed binary format the external model
//!   consumers read encoded vectors from.

pub mod store;
pub mod tensor;

pub use store::DataStore;
