// src/engine/mod.rs
//! Field descriptors, typed values and the extractor that reads them.
//! Site-specific tables live in `specs`; this module knows nothing about
//! any particular site.

pub mod extract;
pub mod types;

pub use extract::{coerce, extract, extract_fields, locate};
pub use types::*;
