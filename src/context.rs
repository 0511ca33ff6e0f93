//! GPU context initialization.
//!
//! A [`GpuContext`] bundles wgpu's instance, adapter, device and queue, the
//! four handles every dispatch needs.  Construction picks the default
//! adapter, verifies it can run compute shaders and requests a device with
//! downlevel default limits, so the same code runs on Vulkan, Metal, DX12
//! and GL backends.  `new_blocking` hides the asynchronous adapter and
//! device requests behind [`pollster`]; `new_async` exposes them for callers
//! that already live in an async runtime.

use log::{debug, info};
use wgpu::{Adapter, Device, Instance, Queue};

use crate::error::{GpuError, GpuResult};

/// Owns all state needed to submit compute work.
///
/// The wrapped wgpu types are internally reference counted, so cloning the
/// individual handles out of the context is cheap.  Dropping the context
/// releases the device once all outstanding work has completed.
pub struct GpuContext {
    /// Global entry point.  Headless compute still needs an instance to
    /// request an adapter from.
    pub instance: Instance,
    /// The physical device selected for computation.  Exposes downlevel
    /// capabilities and limits for callers that want to size their
    /// dispatches.
    pub adapter: Adapter,
    /// Logical device used to create buffers, pipelines and encoders.
    pub device: Device,
    /// Queue that recorded command buffers are submitted to.
    pub queue: Queue,
}

impl GpuContext {
    /// Create a context, blocking the current thread until the adapter and
    /// device requests resolve.
    pub fn new_blocking() -> GpuResult<Self> {
        pollster::block_on(Self::new_async())
    }

    /// Create a context from within an async runtime.
    ///
    /// The default `RequestAdapterOptions` prefer a high performance
    /// adapter; no surface is supplied because nothing here ever draws to a
    /// window.  Adapters whose downlevel flags lack compute support are
    /// rejected up front rather than failing later at pipeline creation.
    pub async fn new_async() -> GpuResult<Self> {
        let instance = Instance::new(&wgpu::InstanceDescriptor::default());
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions::default())
            .await?;

        let adapter_info = adapter.get_info();
        info!(
            "using adapter '{}' ({:?}, {:?})",
            adapter_info.name, adapter_info.device_type, adapter_info.backend
        );

        let capabilities = adapter.get_downlevel_capabilities();
        if !capabilities.flags.contains(wgpu::DownlevelFlags::COMPUTE_SHADERS) {
            return Err(GpuError::ComputeUnsupported {
                name: adapter_info.name,
            });
        }

        // Timestamp queries are optional; take them when offered so timing
        // experiments can use them, but never require them.
        let mut features = wgpu::Features::empty();
        if adapter.features().contains(wgpu::Features::TIMESTAMP_QUERY) {
            features |= wgpu::Features::TIMESTAMP_QUERY;
        }

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("compute_device"),
                required_features: features,
                required_limits: wgpu::Limits::downlevel_defaults(),
                memory_hints: wgpu::MemoryHints::MemoryUsage,
                trace: wgpu::Trace::Off,
            })
            .await?;

        let limits = device.limits();
        debug!(
            "device limits: max workgroups/dim {}, max storage binding {} bytes",
            limits.max_compute_workgroups_per_dimension, limits.max_storage_buffer_binding_size
        );

        Ok(Self {
            instance,
            adapter,
            device,
            queue,
        })
    }
}
