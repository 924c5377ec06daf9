//! gpukit
//!
//! Convenience layer over wgpu.
//!
//! # Features
//!
//! - Host-side buffer packing following WGSL alignment and size rules
//!   (scalars, vectors, matrices, arrays)
//! - Headless GPU context creation
//! - Device buffers written straight from a packed layout
//! - WGSL shader loading from source or file
//! - Bind group and render pipeline builders
//!
//! # Example
//!
//! ```
//! use gpukit::{DataType, ScalarType, StructuredBuffer};
//!
//! let mut uniforms = StructuredBuffer::new();
//! uniforms.set_entry("time", 1.5f32, DataType::scalar(ScalarType::Float32)).unwrap();
//! uniforms
//!     .set_entry("color", [1.0f32, 0.5, 0.0], DataType::vec3(ScalarType::Float32))
//!     .unwrap();
//!
//! // `time` is padded out to the 16-byte alignment of the vec3.
//! assert_eq!(uniforms.layout()[1].offset, 16);
//! assert_eq!(uniforms.pack().len(), 32);
//! ```

pub mod gpu;
pub mod layout;

// Re-export commonly used types
pub use gpu::{
    BindGroupBuilder, BindGroupLayoutBuilder, ContextConfig, GpuBuffer, GpuContext, GpuError,
    RenderPipelineBuilder,
};
pub use layout::{
    CompositeKind, DataType, EntryData, EntryLayout, LayoutError, ScalarType,
    StructAlignmentMode, StructuredBuffer,
};
