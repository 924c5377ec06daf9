//! Device buffers filled from a packed structured layout.

use wgpu::{Buffer, BufferUsages};

use super::context::GpuContext;
use crate::layout::{round_up, DataType, EntryData, LayoutError, StructuredBuffer};

/// A wgpu buffer whose contents are described by a [`StructuredBuffer`].
///
/// The device buffer is created on the first [`GpuBuffer::write`] and
/// recreated whenever the packed size changes.
pub struct GpuBuffer {
    layout: StructuredBuffer,
    usage: BufferUsages,
    label: Option<String>,
    buffer: Option<Buffer>,
}

impl GpuBuffer {
    pub fn new(usage: BufferUsages, label: Option<&str>) -> Self {
        Self::with_layout(StructuredBuffer::new(), usage, label)
    }

    pub fn with_layout(layout: StructuredBuffer, usage: BufferUsages, label: Option<&str>) -> Self {
        Self {
            layout,
            usage,
            label: label.map(str::to_string),
            buffer: None,
        }
    }

    /// Uniform buffer that can be written from the CPU.
    pub fn uniform(label: &str) -> Self {
        Self::new(BufferUsages::UNIFORM | BufferUsages::COPY_DST, Some(label))
    }

    /// Storage buffer that can be written from the CPU.
    pub fn storage(label: &str) -> Self {
        Self::new(BufferUsages::STORAGE | BufferUsages::COPY_DST, Some(label))
    }

    /// Register or replace a named entry. See [`StructuredBuffer::set_entry`].
    pub fn set_entry(
        &mut self,
        name: impl Into<String>,
        data: impl Into<EntryData>,
        data_type: DataType,
    ) -> Result<(), LayoutError> {
        self.layout.set_entry(name, data, data_type)
    }

    pub fn layout(&self) -> &StructuredBuffer {
        &self.layout
    }

    pub fn usage(&self) -> BufferUsages {
        self.usage
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Size the device buffer will have for the current entries.
    ///
    /// Queue writes must be a multiple of `COPY_BUFFER_ALIGNMENT`, so a packed
    /// region of only `f16` lanes may be rounded up.
    pub fn upload_size(&self) -> u64 {
        let align = wgpu::COPY_BUFFER_ALIGNMENT as usize;
        round_up(align, self.layout.byte_size()) as u64
    }

    /// Pack the entries and write them to the device buffer.
    pub fn write(&mut self, ctx: &GpuContext) -> &Buffer {
        let mut bytes = self.layout.pack();
        if bytes.is_empty() {
            log::warn!(
                "Writing empty buffer '{}'",
                self.label.as_deref().unwrap_or("unnamed")
            );
        }
        let size = self.upload_size();
        bytes.resize(size as usize, 0);

        let stale = self.buffer.as_ref().is_some_and(|b| b.size() != size);
        if stale {
            log::debug!(
                "Recreating buffer '{}' with {} bytes",
                self.label.as_deref().unwrap_or("unnamed"),
                size
            );
            self.buffer = None;
        }

        let label = self.label.as_deref();
        let usage = self.usage;
        let buffer = self.buffer.get_or_insert_with(|| {
            ctx.device.create_buffer(&wgpu::BufferDescriptor {
                label,
                size,
                usage,
                mapped_at_creation: false,
            })
        });

        ctx.queue.write_buffer(buffer, 0, &bytes);
        buffer
    }

    /// The device buffer, once it has been written.
    pub fn raw(&self) -> Option<&Buffer> {
        self.buffer.as_ref()
    }
}
