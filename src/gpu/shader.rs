//! WGSL shader module loading.

use std::path::Path;

use wgpu::{Device, ShaderModule};

use super::context::GpuError;

/// Compile a shader module from WGSL source.
pub fn load_from_source(device: &Device, label: Option<&str>, code: &str) -> ShaderModule {
    device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label,
        source: wgpu::ShaderSource::Wgsl(code.into()),
    })
}

/// Read WGSL source from disk.
pub fn read_source(path: impl AsRef<Path>) -> Result<String, GpuError> {
    let path = path.as_ref();
    std::fs::read_to_string(path).map_err(|source| GpuError::ShaderRead {
        path: path.to_path_buf(),
        source,
    })
}

/// Compile a shader module from a WGSL file, labelled with its file name.
pub fn load_from_path(device: &Device, path: impl AsRef<Path>) -> Result<ShaderModule, GpuError> {
    let path = path.as_ref();
    let code = read_source(path)?;
    let label = path.file_name().and_then(|name| name.to_str());
    Ok(load_from_source(device, label, &code))
}
