//! GPU context initialization and management.

use std::path::PathBuf;
use std::sync::Arc;
use wgpu::{Adapter, Device, Instance, Queue};

/// Errors that can occur during GPU operations.
#[derive(Debug, thiserror::Error)]
pub enum GpuError {
    #[error("No suitable GPU adapter found")]
    NoAdapter,
    #[error("Failed to request device: {0}")]
    DeviceRequest(#[from] wgpu::RequestDeviceError),
    #[error("Failed to read shader {}: {source}", path.display())]
    ShaderRead {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Pipeline '{0}' has no vertex shader")]
    MissingShader(&'static str),
}

/// Options for adapter and device selection.
#[derive(Debug, Clone)]
pub struct ContextConfig {
    pub label: String,
    pub backends: wgpu::Backends,
    pub power_preference: wgpu::PowerPreference,
    pub required_features: wgpu::Features,
    pub required_limits: wgpu::Limits,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            label: "gpukit".to_string(),
            backends: wgpu::Backends::METAL
                | wgpu::Backends::VULKAN
                | wgpu::Backends::DX12
                | wgpu::Backends::GL,
            power_preference: wgpu::PowerPreference::HighPerformance,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
        }
    }
}

/// GPU context holding adapter, device and queue.
pub struct GpuContext {
    pub instance: Instance,
    pub adapter: Arc<Adapter>,
    pub device: Arc<Device>,
    pub queue: Arc<Queue>,
}

impl GpuContext {
    /// Create a headless GPU context with default options.
    pub async fn new() -> Result<Self, GpuError> {
        Self::with_config(ContextConfig::default()).await
    }

    /// Create a headless GPU context.
    pub async fn with_config(config: ContextConfig) -> Result<Self, GpuError> {
        let instance = Instance::new(&wgpu::InstanceDescriptor {
            backends: config.backends,
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: config.power_preference,
                force_fallback_adapter: false,
                compatible_surface: None,
            })
            .await
            .map_err(|_| GpuError::NoAdapter)?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some(config.label.as_str()),
                required_features: config.required_features,
                required_limits: config.required_limits,
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
                experimental_features: wgpu::ExperimentalFeatures::default(),
            })
            .await?;

        log::debug!("Created GPU context on {}", adapter.get_info().name);

        Ok(Self {
            instance,
            adapter: Arc::new(adapter),
            device: Arc::new(device),
            queue: Arc::new(queue),
        })
    }

    /// Blocking variant of [`GpuContext::new`].
    pub fn new_blocking() -> Result<Self, GpuError> {
        pollster::block_on(Self::new())
    }

    /// Get info about the GPU adapter.
    pub fn adapter_info(&self) -> wgpu::AdapterInfo {
        self.adapter.get_info()
    }

    pub fn limits(&self) -> wgpu::Limits {
        self.device.limits()
    }

    pub fn features(&self) -> wgpu::Features {
        self.device.features()
    }
}
