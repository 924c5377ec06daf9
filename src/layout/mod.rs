//! Host-side buffer layout following WGSL alignment rules.
//!
//! Named scalar, vector, matrix and array entries are packed into a single
//! byte region ready to be written into a uniform or storage buffer.

pub mod data;
pub mod packer;
pub mod types;

pub use data::{EntryData, ScalarArray, ScalarValue};
pub use packer::{Entry, EntryLayout, LayoutError, StructAlignmentMode, StructuredBuffer};
pub use types::{padding, round_up, AlignAndSize, CompositeKind, DataType, ScalarType};
