//! Structural diffing of semi-structured values.
//!
//! - [`compare`]: the recursive comparator and its options
//! - [`model`]: `DiffEntry` / `DiffKind` output types

pub mod compare;
pub mod model;

pub use compare::{type_name, ArrayTailPolicy, Comparator, DEFAULT_MAX_VALUE_LEN, ROOT_PATH};
pub use model::{DiffEntry, DiffKind};
