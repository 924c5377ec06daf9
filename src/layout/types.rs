//! WGSL data types and their alignment/size rules.
//!
//! Alignment and size follow <https://www.w3.org/TR/WGSL/#alignment-and-size>.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Scalar element type of a buffer entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScalarType {
    Bool,
    Int32,
    Uint32,
    Uint16,
    Float32,
    Float16,
}

impl ScalarType {
    /// All scalar types, in declaration order.
    pub fn all() -> &'static [ScalarType] {
        &[
            ScalarType::Bool,
            ScalarType::Int32,
            ScalarType::Uint32,
            ScalarType::Uint16,
            ScalarType::Float32,
            ScalarType::Float16,
        ]
    }

    /// Base alignment and size of a single lane.
    pub fn align_and_size(self) -> AlignAndSize {
        match self {
            ScalarType::Bool | ScalarType::Int32 | ScalarType::Uint32 | ScalarType::Float32 => {
                AlignAndSize::new(4, 4)
            }
            ScalarType::Uint16 | ScalarType::Float16 => AlignAndSize::new(2, 2),
        }
    }

    pub fn is_float(self) -> bool {
        matches!(self, ScalarType::Float32 | ScalarType::Float16)
    }

    /// Shader-side spelling of the type.
    pub fn wgsl_name(self) -> &'static str {
        match self {
            ScalarType::Bool => "bool",
            ScalarType::Int32 => "i32",
            ScalarType::Uint32 => "u32",
            ScalarType::Uint16 => "u16",
            ScalarType::Float32 => "f32",
            ScalarType::Float16 => "f16",
        }
    }
}

/// Shape of a buffer entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompositeKind {
    Scalar,
    Vec2,
    Vec3,
    Vec4,
    Array,
    Mat3x3,
    Mat4x4,
}

impl CompositeKind {
    pub fn is_matrix(self) -> bool {
        matches!(self, CompositeKind::Mat3x3 | CompositeKind::Mat4x4)
    }

    /// Number of lanes a vector of this kind holds.
    pub fn vector_width(self) -> Option<usize> {
        match self {
            CompositeKind::Vec2 => Some(2),
            CompositeKind::Vec3 => Some(3),
            CompositeKind::Vec4 => Some(4),
            _ => None,
        }
    }
}

/// Alignment and byte size of a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignAndSize {
    pub align: usize,
    pub size: usize,
}

impl AlignAndSize {
    pub const fn new(align: usize, size: usize) -> Self {
        Self { align, size }
    }
}

/// Element type plus shape of a buffer entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DataType {
    pub scalar: ScalarType,
    pub kind: CompositeKind,
}

impl DataType {
    pub const fn new(scalar: ScalarType, kind: CompositeKind) -> Self {
        Self { scalar, kind }
    }

    pub const fn scalar(scalar: ScalarType) -> Self {
        Self::new(scalar, CompositeKind::Scalar)
    }

    pub const fn vec2(scalar: ScalarType) -> Self {
        Self::new(scalar, CompositeKind::Vec2)
    }

    pub const fn vec3(scalar: ScalarType) -> Self {
        Self::new(scalar, CompositeKind::Vec3)
    }

    pub const fn vec4(scalar: ScalarType) -> Self {
        Self::new(scalar, CompositeKind::Vec4)
    }

    pub const fn array(scalar: ScalarType) -> Self {
        Self::new(scalar, CompositeKind::Array)
    }

    pub const fn mat3x3(scalar: ScalarType) -> Self {
        Self::new(scalar, CompositeKind::Mat3x3)
    }

    pub const fn mat4x4(scalar: ScalarType) -> Self {
        Self::new(scalar, CompositeKind::Mat4x4)
    }

    /// Alignment and size of an entry of this type.
    ///
    /// `len` is the number of lanes and only matters for arrays. Matrices use
    /// a fixed base alignment of 8 (4 for `f16`) regardless of the lane size.
    pub fn align_and_size(self, len: usize) -> AlignAndSize {
        let base = self.scalar.align_and_size();
        let matrix_base = if self.scalar == ScalarType::Float16 {
            4
        } else {
            8
        };

        match self.kind {
            CompositeKind::Scalar => base,
            CompositeKind::Vec2 => AlignAndSize::new(base.align * 2, base.size * 2),
            CompositeKind::Vec3 => AlignAndSize::new(base.align * 4, base.size * 3),
            CompositeKind::Vec4 => AlignAndSize::new(base.align * 4, base.size * 4),
            CompositeKind::Array => {
                AlignAndSize::new(base.align, len * round_up(base.align, base.size))
            }
            CompositeKind::Mat3x3 => AlignAndSize::new(matrix_base * 2, matrix_base * 2 * 3),
            CompositeKind::Mat4x4 => AlignAndSize::new(matrix_base * 2, matrix_base * 2 * 4),
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let elem = self.scalar.wgsl_name();
        match self.kind {
            CompositeKind::Scalar => write!(f, "{}", elem),
            CompositeKind::Vec2 => write!(f, "vec2<{}>", elem),
            CompositeKind::Vec3 => write!(f, "vec3<{}>", elem),
            CompositeKind::Vec4 => write!(f, "vec4<{}>", elem),
            CompositeKind::Array => write!(f, "array<{}>", elem),
            CompositeKind::Mat3x3 => write!(f, "mat3x3<{}>", elem),
            CompositeKind::Mat4x4 => write!(f, "mat4x4<{}>", elem),
        }
    }
}

/// Round `n` up to the next multiple of `k`.
pub fn round_up(k: usize, n: usize) -> usize {
    n.div_ceil(k) * k
}

/// Bytes needed after `len` bytes to reach a multiple of `align`.
pub fn padding(len: usize, align: usize) -> usize {
    (align - len % align) % align
}
