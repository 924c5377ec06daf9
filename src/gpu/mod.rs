//! Thin helpers over wgpu.
//!
//! Headless context creation, device buffers backed by a packed
//! [`StructuredBuffer`](crate::layout::StructuredBuffer), shader loading, and
//! bind group and pipeline builders.

pub mod buffer;
pub mod context;
pub mod layouts;
pub mod pipelines;
pub mod shader;

pub use buffer::GpuBuffer;
pub use context::{ContextConfig, GpuContext, GpuError};
pub use layouts::{BindGroupBuilder, BindGroupLayoutBuilder};
pub use pipelines::{create_pipeline_layout, RenderPipelineBuilder};
