//! Raw entry data and its lane encoding.

use half::f16;

use super::types::ScalarType;

/// A single scalar value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScalarValue {
    Bool(bool),
    Int32(i32),
    Uint32(u32),
    Uint16(u16),
    Float32(f32),
    Float16(f16),
}

impl ScalarValue {
    pub fn scalar_type(&self) -> ScalarType {
        match self {
            ScalarValue::Bool(_) => ScalarType::Bool,
            ScalarValue::Int32(_) => ScalarType::Int32,
            ScalarValue::Uint32(_) => ScalarType::Uint32,
            ScalarValue::Uint16(_) => ScalarType::Uint16,
            ScalarValue::Float32(_) => ScalarType::Float32,
            ScalarValue::Float16(_) => ScalarType::Float16,
        }
    }

    fn write(&self, out: &mut Vec<u8>) {
        match *self {
            ScalarValue::Bool(v) => out.extend_from_slice(bytemuck::bytes_of(&(v as u32))),
            ScalarValue::Int32(v) => out.extend_from_slice(bytemuck::bytes_of(&v)),
            ScalarValue::Uint32(v) => out.extend_from_slice(bytemuck::bytes_of(&v)),
            ScalarValue::Uint16(v) => out.extend_from_slice(bytemuck::bytes_of(&v)),
            ScalarValue::Float32(v) => out.extend_from_slice(bytemuck::bytes_of(&v)),
            ScalarValue::Float16(v) => out.extend_from_slice(bytemuck::bytes_of(&v)),
        }
    }
}

/// A flat sequence of lanes of one scalar type.
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarArray {
    Bool(Vec<bool>),
    Int32(Vec<i32>),
    Uint32(Vec<u32>),
    Uint16(Vec<u16>),
    Float32(Vec<f32>),
    Float16(Vec<f16>),
}

impl ScalarArray {
    pub fn scalar_type(&self) -> ScalarType {
        match self {
            ScalarArray::Bool(_) => ScalarType::Bool,
            ScalarArray::Int32(_) => ScalarType::Int32,
            ScalarArray::Uint32(_) => ScalarType::Uint32,
            ScalarArray::Uint16(_) => ScalarType::Uint16,
            ScalarArray::Float32(_) => ScalarType::Float32,
            ScalarArray::Float16(_) => ScalarType::Float16,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ScalarArray::Bool(v) => v.len(),
            ScalarArray::Int32(v) => v.len(),
            ScalarArray::Uint32(v) => v.len(),
            ScalarArray::Uint16(v) => v.len(),
            ScalarArray::Float32(v) => v.len(),
            ScalarArray::Float16(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append lanes `range` to `out`.
    fn write_range(&self, out: &mut Vec<u8>, range: std::ops::Range<usize>) {
        match self {
            ScalarArray::Bool(v) => {
                for &b in &v[range] {
                    out.extend_from_slice(bytemuck::bytes_of(&(b as u32)));
                }
            }
            ScalarArray::Int32(v) => out.extend_from_slice(bytemuck::cast_slice(&v[range])),
            ScalarArray::Uint32(v) => out.extend_from_slice(bytemuck::cast_slice(&v[range])),
            ScalarArray::Uint16(v) => out.extend_from_slice(bytemuck::cast_slice(&v[range])),
            ScalarArray::Float32(v) => out.extend_from_slice(bytemuck::cast_slice(&v[range])),
            ScalarArray::Float16(v) => out.extend_from_slice(bytemuck::cast_slice(&v[range])),
        }
    }

    fn write_all(&self, out: &mut Vec<u8>) {
        self.write_range(out, 0..self.len());
    }

    /// Write the lanes as columns of `rows` lanes, zero padding every column
    /// out to `padded_rows` lanes.
    fn write_columns(&self, out: &mut Vec<u8>, rows: usize, padded_rows: usize) {
        let lane = self.scalar_type().align_and_size().size;
        for start in (0..self.len()).step_by(rows) {
            self.write_range(out, start..start + rows);
            out.resize(out.len() + (padded_rows - rows) * lane, 0);
        }
    }
}

/// Raw data of a buffer entry.
#[derive(Debug, Clone, PartialEq)]
pub enum EntryData {
    Scalar(ScalarValue),
    Sequence(ScalarArray),
}

impl EntryData {
    pub fn scalar_type(&self) -> ScalarType {
        match self {
            EntryData::Scalar(v) => v.scalar_type(),
            EntryData::Sequence(v) => v.scalar_type(),
        }
    }

    /// Number of lanes held (1 for scalars).
    pub fn len(&self) -> usize {
        match self {
            EntryData::Scalar(_) => 1,
            EntryData::Sequence(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append the lanes as-is.
    pub(crate) fn write_lanes(&self, out: &mut Vec<u8>) {
        match self {
            EntryData::Scalar(v) => v.write(out),
            EntryData::Sequence(v) => v.write_all(out),
        }
    }

    /// Append the lanes as tightly packed columns, each padded to `padded_rows`.
    pub(crate) fn write_columns(&self, out: &mut Vec<u8>, rows: usize, padded_rows: usize) {
        match self {
            EntryData::Scalar(v) => v.write(out),
            EntryData::Sequence(v) => v.write_columns(out, rows, padded_rows),
        }
    }
}

macro_rules! impl_entry_data_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for EntryData {
                fn from(value: $ty) -> Self {
                    EntryData::Scalar(ScalarValue::$variant(value))
                }
            }

            impl From<Vec<$ty>> for EntryData {
                fn from(values: Vec<$ty>) -> Self {
                    EntryData::Sequence(ScalarArray::$variant(values))
                }
            }

            impl From<&[$ty]> for EntryData {
                fn from(values: &[$ty]) -> Self {
                    EntryData::Sequence(ScalarArray::$variant(values.to_vec()))
                }
            }

            impl<const N: usize> From<[$ty; N]> for EntryData {
                fn from(values: [$ty; N]) -> Self {
                    EntryData::Sequence(ScalarArray::$variant(values.to_vec()))
                }
            }
        )*
    };
}

impl_entry_data_from! {
    bool => Bool,
    i32 => Int32,
    u32 => Uint32,
    u16 => Uint16,
    f32 => Float32,
    f16 => Float16,
}

impl From<[[f32; 4]; 4]> for EntryData {
    /// Column-major 4x4 matrix.
    fn from(columns: [[f32; 4]; 4]) -> Self {
        EntryData::Sequence(ScalarArray::Float32(columns.concat()))
    }
}

impl From<[[f32; 3]; 3]> for EntryData {
    /// Column-major 3x3 matrix.
    fn from(columns: [[f32; 3]; 3]) -> Self {
        EntryData::Sequence(ScalarArray::Float32(columns.concat()))
    }
}
