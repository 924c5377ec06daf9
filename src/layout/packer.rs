//! Structured buffer packing.
//!
//! A [`StructuredBuffer`] holds named, typed entries in insertion order and
//! packs them into one contiguous byte region laid out like a WGSL struct.
//! Struct member layout: <https://www.w3.org/TR/WGSL/#structure-member-layout>.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::data::EntryData;
use super::types::{padding, AlignAndSize, CompositeKind, DataType};

/// Errors that can occur when registering a buffer entry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    #[error("Invalid element type for {data_type}: {reason}")]
    InvalidElementType { data_type: DataType, reason: String },
    #[error("Invalid data for {data_type}: {reason}")]
    InvalidDataType { data_type: DataType, reason: String },
}

/// How the struct alignment used as padding floor is tracked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StructAlignmentMode {
    /// Largest alignment ever registered. Never shrinks, even when the entry
    /// that raised it is replaced by one with a smaller alignment.
    #[default]
    Monotonic,
    /// Largest alignment among the entries currently held.
    Current,
}

/// A named entry with its derived alignment and size.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    name: String,
    data: EntryData,
    data_type: DataType,
    layout: AlignAndSize,
}

impl Entry {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data(&self) -> &EntryData {
        &self.data
    }

    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    pub fn align(&self) -> usize {
        self.layout.align
    }

    pub fn size(&self) -> usize {
        self.layout.size
    }

    fn write(&self, out: &mut Vec<u8>) {
        // Tightly packed mat3x3 columns get their fourth lane inserted here.
        if self.data_type.kind == CompositeKind::Mat3x3 && self.data.len() == 9 {
            self.data.write_columns(out, 3, 4);
        } else {
            self.data.write_lanes(out);
        }
    }
}

/// Placement of one entry inside the packed region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryLayout {
    pub name: String,
    pub data_type: DataType,
    pub offset: usize,
    pub align: usize,
    pub size: usize,
    /// Trailing padding after the entry.
    pub padding: usize,
}

/// Named, ordered buffer entries packed with WGSL alignment rules.
///
/// Entries are kept in a `Vec` in insertion order, with a name to index side
/// table. Setting an existing name replaces that entry in place, so layout
/// order is always the order in which names were first registered.
#[derive(Debug, Clone, Default)]
pub struct StructuredBuffer {
    entries: Vec<Entry>,
    index: HashMap<String, usize>,
    struct_alignment: usize,
    mode: StructAlignmentMode,
}

impl StructuredBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mode(mode: StructAlignmentMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn mode(&self) -> StructAlignmentMode {
        self.mode
    }

    /// Register or replace a named entry.
    ///
    /// Invalid entries are logged and rejected; the buffer keeps its previous
    /// state, so callers are free to ignore the returned error.
    pub fn set_entry(
        &mut self,
        name: impl Into<String>,
        data: impl Into<EntryData>,
        data_type: DataType,
    ) -> Result<(), LayoutError> {
        let name = name.into();
        let data = data.into();

        let layout = match validate(&data, data_type) {
            Ok(layout) => layout,
            Err(err) => {
                log::error!("Rejected buffer entry '{}': {}", name, err);
                return Err(err);
            }
        };

        self.struct_alignment = self.struct_alignment.max(layout.align);

        let entry = Entry {
            name: name.clone(),
            data,
            data_type,
            layout,
        };

        match self.index.get(&name) {
            Some(&i) => self.entries[i] = entry,
            None => {
                self.index.insert(name, self.entries.len());
                self.entries.push(entry);
            }
        }

        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Entry> {
        self.index.get(name).map(|&i| &self.entries[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Entries in layout order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The alignment every entry's trailing padding is floored to.
    pub fn struct_alignment(&self) -> usize {
        match self.mode {
            StructAlignmentMode::Monotonic => self.struct_alignment,
            StructAlignmentMode::Current => {
                self.entries.iter().map(Entry::align).max().unwrap_or(0)
            }
        }
    }

    /// Total packed size in bytes, without serializing.
    pub fn byte_size(&self) -> usize {
        let struct_align = self.struct_alignment();
        self.entries.iter().fold(0, |len, entry| {
            let end = len + entry.size();
            end + padding(end, struct_align.max(entry.align()))
        })
    }

    /// Offset, size and padding of every entry, in layout order.
    pub fn layout(&self) -> Vec<EntryLayout> {
        let struct_align = self.struct_alignment();
        let mut offset = 0;

        self.entries
            .iter()
            .map(|entry| {
                let end = offset + entry.size();
                let pad = padding(end, struct_align.max(entry.align()));
                let layout = EntryLayout {
                    name: entry.name.clone(),
                    data_type: entry.data_type,
                    offset,
                    align: entry.align(),
                    size: entry.size(),
                    padding: pad,
                };
                offset = end + pad;
                layout
            })
            .collect()
    }

    /// Serialize all entries into one contiguous region.
    ///
    /// # Panics
    ///
    /// Panics if an entry serializes to a length other than its derived size.
    /// Entries are validated on registration, so this indicates a bug.
    pub fn pack(&self) -> Vec<u8> {
        let struct_align = self.struct_alignment();
        let size = self.byte_size();
        let mut out = Vec::with_capacity(size);

        for entry in &self.entries {
            let start = out.len();
            entry.write(&mut out);
            assert_eq!(
                out.len() - start,
                entry.size(),
                "entry '{}' ({}) serialized to the wrong length",
                entry.name,
                entry.data_type
            );

            let pad = padding(out.len(), struct_align.max(entry.align()));
            out.resize(out.len() + pad, 0);
        }

        assert_eq!(out.len(), size, "packed length differs from computed size");
        out
    }
}

/// Check `data` against `data_type` and derive its alignment and size.
fn validate(data: &EntryData, data_type: DataType) -> Result<AlignAndSize, LayoutError> {
    if data_type.kind.is_matrix() && !data_type.scalar.is_float() {
        return Err(LayoutError::InvalidElementType {
            data_type,
            reason: "matrices require f32 or f16 elements".to_string(),
        });
    }

    if data.scalar_type() != data_type.scalar {
        return Err(LayoutError::InvalidElementType {
            data_type,
            reason: format!("data holds {} lanes", data.scalar_type().wgsl_name()),
        });
    }

    let lanes = data.len();
    let invalid = |reason: String| LayoutError::InvalidDataType { data_type, reason };

    match (data_type.kind, data) {
        (CompositeKind::Scalar, EntryData::Scalar(_)) => {}
        (CompositeKind::Scalar, EntryData::Sequence(_)) => {
            return Err(invalid("expected a single value, got a sequence".to_string()));
        }
        (_, EntryData::Scalar(_)) => {
            return Err(invalid("expected a sequence, got a single value".to_string()));
        }
        (kind, EntryData::Sequence(_)) => {
            let accepted = match kind {
                CompositeKind::Array => lanes > 0,
                CompositeKind::Mat3x3 => lanes == 9 || lanes == 12,
                CompositeKind::Mat4x4 => lanes == 16,
                _ => kind.vector_width() == Some(lanes),
            };
            if !accepted {
                return Err(invalid(format!("unexpected lane count {}", lanes)));
            }
        }
    }

    Ok(data_type.align_and_size(lanes))
}
