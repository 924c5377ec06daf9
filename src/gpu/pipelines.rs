//! Pipeline layout and render pipeline builders.

use wgpu::{
    BindGroupLayout, ColorTargetState, DepthStencilState, Device, MultisampleState,
    PipelineLayout, PrimitiveState, RenderPipeline, ShaderModule, TextureFormat,
    VertexBufferLayout,
};

use super::context::GpuError;

/// Builder for creating render pipelines with common patterns.
pub struct RenderPipelineBuilder<'a> {
    label: &'static str,
    layout: Option<&'a PipelineLayout>,
    vertex: Option<(&'a ShaderModule, &'a str)>,
    fragment: Option<(&'a ShaderModule, &'a str)>,
    vertex_buffers: Vec<VertexBufferLayout<'a>>,
    targets: Vec<Option<ColorTargetState>>,
    primitive: PrimitiveState,
    depth_stencil: Option<DepthStencilState>,
    multisample: MultisampleState,
}

impl<'a> RenderPipelineBuilder<'a> {
    /// Create a new render pipeline builder.
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            layout: None,
            vertex: None,
            fragment: None,
            vertex_buffers: Vec::new(),
            targets: Vec::new(),
            primitive: PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: MultisampleState::default(),
        }
    }

    /// Set the pipeline layout.
    pub fn layout(mut self, layout: &'a PipelineLayout) -> Self {
        self.layout = Some(layout);
        self
    }

    /// Use one module for both stages, with `vs_main` and `fs_main` entry points.
    pub fn shader(self, shader: &'a ShaderModule) -> Self {
        self.vertex_shader(shader, "vs_main").fragment_shader(shader, "fs_main")
    }

    pub fn vertex_shader(mut self, shader: &'a ShaderModule, entry: &'a str) -> Self {
        self.vertex = Some((shader, entry));
        self
    }

    pub fn fragment_shader(mut self, shader: &'a ShaderModule, entry: &'a str) -> Self {
        self.fragment = Some((shader, entry));
        self
    }

    /// Add a vertex buffer layout.
    pub fn vertex_buffer(mut self, layout: VertexBufferLayout<'a>) -> Self {
        self.vertex_buffers.push(layout);
        self
    }

    /// Add a color target.
    pub fn color_target(mut self, target: ColorTargetState) -> Self {
        self.targets.push(Some(target));
        self
    }

    /// Add a color target with the given format and replace blending.
    pub fn format(self, format: TextureFormat) -> Self {
        self.color_target(ColorTargetState {
            format,
            blend: Some(wgpu::BlendState::REPLACE),
            write_mask: wgpu::ColorWrites::ALL,
        })
    }

    pub fn primitive(mut self, primitive: PrimitiveState) -> Self {
        self.primitive = primitive;
        self
    }

    pub fn depth_stencil(mut self, depth_stencil: DepthStencilState) -> Self {
        self.depth_stencil = Some(depth_stencil);
        self
    }

    pub fn multisample(mut self, multisample: MultisampleState) -> Self {
        self.multisample = multisample;
        self
    }

    /// Build the render pipeline.
    ///
    /// Without any color target a fragment stage renders to one
    /// `Rgba8Unorm` target.
    pub fn build(self, device: &Device) -> Result<RenderPipeline, GpuError> {
        let (vertex_module, vertex_entry) =
            self.vertex.ok_or(GpuError::MissingShader(self.label))?;

        let targets = if self.targets.is_empty() {
            vec![Some(ColorTargetState {
                format: TextureFormat::Rgba8Unorm,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })]
        } else {
            self.targets
        };

        let fragment = self.fragment.map(|(module, entry)| wgpu::FragmentState {
            module,
            entry_point: Some(entry),
            targets: &targets,
            compilation_options: Default::default(),
        });

        Ok(device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(self.label),
            layout: self.layout,
            vertex: wgpu::VertexState {
                module: vertex_module,
                entry_point: Some(vertex_entry),
                buffers: &self.vertex_buffers,
                compilation_options: Default::default(),
            },
            fragment,
            primitive: self.primitive,
            depth_stencil: self.depth_stencil,
            multisample: self.multisample,
            multiview_mask: None,
            cache: None,
        }))
    }
}

/// Create a pipeline layout from bind group layouts.
pub fn create_pipeline_layout(
    device: &Device,
    label: &'static str,
    layouts: &[&BindGroupLayout],
) -> PipelineLayout {
    device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(label),
        bind_group_layouts: layouts,
        immediate_size: 0,
    })
}
