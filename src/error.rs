//! Error taxonomy for GPU setup and readback.
//!
//! Everything that can fail while acquiring a device or moving data off the
//! GPU is collected in [`GpuError`] so callers can propagate failures with
//! `?` instead of inspecting strings.  Shader authoring mistakes (invalid
//! WGSL, mismatched bind groups) are surfaced by wgpu's own validation and
//! are not wrapped here.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type GpuResult<T> = Result<T, GpuError>;

#[derive(Debug, Error)]
pub enum GpuError {
    /// No adapter matched the request, typically because no GPU (or
    /// software rasterizer) is available on this machine.
    #[error("no suitable GPU adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),

    /// The adapter exists but its downlevel capabilities exclude compute
    /// shaders, as on some GL-backed devices.
    #[error("adapter '{name}' does not support compute shaders")]
    ComputeUnsupported { name: String },

    /// Device creation failed, e.g. the requested limits exceed what the
    /// adapter offers.
    #[error("failed to create GPU device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    /// Waiting for submitted work to finish failed.
    #[error("device poll failed: {0}")]
    Poll(#[from] wgpu::PollError),

    /// Mapping a readback buffer into host memory failed.
    #[error("buffer mapping failed: {0}")]
    BufferMap(#[from] wgpu::BufferAsyncError),

    /// The map callback was dropped without reporting a result.
    #[error("readback channel closed before the buffer was mapped")]
    ReadbackChannelClosed,
}
