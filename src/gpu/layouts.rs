//! Bind group layout and bind group builders.

use wgpu::{
    BindGroup, BindGroupEntry, BindGroupLayout, BindGroupLayoutEntry, BindingResource, Buffer,
    Device, Sampler, ShaderStages, TextureView,
};

/// Builder for creating bind group layouts with common patterns.
pub struct BindGroupLayoutBuilder {
    label: Option<&'static str>,
    entries: Vec<BindGroupLayoutEntry>,
}

impl BindGroupLayoutBuilder {
    /// Create a new bind group layout builder.
    pub fn new(label: &'static str) -> Self {
        Self {
            label: Some(label),
            entries: Vec::new(),
        }
    }

    /// Add an arbitrary layout entry.
    pub fn entry(mut self, entry: BindGroupLayoutEntry) -> Self {
        self.entries.push(entry);
        self
    }

    fn buffer(self, binding: u32, visibility: ShaderStages, ty: wgpu::BufferBindingType) -> Self {
        self.entry(BindGroupLayoutEntry {
            binding,
            visibility,
            ty: wgpu::BindingType::Buffer {
                ty,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        })
    }

    /// Add a uniform buffer entry.
    pub fn uniform(self, binding: u32, visibility: ShaderStages) -> Self {
        self.buffer(binding, visibility, wgpu::BufferBindingType::Uniform)
    }

    /// Add a storage buffer entry.
    pub fn storage(self, binding: u32, visibility: ShaderStages, read_only: bool) -> Self {
        self.buffer(
            binding,
            visibility,
            wgpu::BufferBindingType::Storage { read_only },
        )
    }

    /// Add a 2D texture entry.
    pub fn texture_2d(self, binding: u32, visibility: ShaderStages) -> Self {
        self.entry(BindGroupLayoutEntry {
            binding,
            visibility,
            ty: wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                view_dimension: wgpu::TextureViewDimension::D2,
                multisampled: false,
            },
            count: None,
        })
    }

    /// Add a filtering sampler entry.
    pub fn sampler(self, binding: u32, visibility: ShaderStages) -> Self {
        self.entry(BindGroupLayoutEntry {
            binding,
            visibility,
            ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
            count: None,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Build the bind group layout.
    pub fn build(self, device: &Device) -> BindGroupLayout {
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: self.label,
            entries: &self.entries,
        })
    }
}

/// Builder for bind groups matching a layout.
pub struct BindGroupBuilder<'a> {
    label: Option<&'static str>,
    layout: &'a BindGroupLayout,
    entries: Vec<BindGroupEntry<'a>>,
}

impl<'a> BindGroupBuilder<'a> {
    pub fn new(label: &'static str, layout: &'a BindGroupLayout) -> Self {
        Self {
            label: Some(label),
            layout,
            entries: Vec::new(),
        }
    }

    /// Bind an arbitrary resource.
    pub fn resource(mut self, binding: u32, resource: BindingResource<'a>) -> Self {
        self.entries.push(BindGroupEntry { binding, resource });
        self
    }

    /// Bind a whole buffer.
    pub fn buffer(self, binding: u32, buffer: &'a Buffer) -> Self {
        self.resource(binding, buffer.as_entire_binding())
    }

    pub fn texture_view(self, binding: u32, view: &'a TextureView) -> Self {
        self.resource(binding, BindingResource::TextureView(view))
    }

    pub fn sampler(self, binding: u32, sampler: &'a Sampler) -> Self {
        self.resource(binding, BindingResource::Sampler(sampler))
    }

    /// Build the bind group.
    pub fn build(self, device: &Device) -> BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: self.label,
            layout: self.layout,
            entries: &self.entries,
        })
    }
}
