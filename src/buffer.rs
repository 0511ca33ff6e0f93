//! Typed GPU buffers and host readback.
//!
//! [`GpuBuffer`] wraps a [`wgpu::Buffer`] together with its element count so
//! upload, binding and readback all agree on the number of `T`s involved.
//! The wrapper owns only GPU memory; host data is borrowed at the call
//! sites.  All operations go through a [`crate::GpuContext`].

use bytemuck::{cast_slice, Pod};
use wgpu::util::DeviceExt;
use wgpu::{Buffer, BufferDescriptor, BufferUsages};

use crate::error::{GpuError, GpuResult};
use crate::GpuContext;

/// A typed GPU buffer of `len` elements of `T`.
///
/// The underlying allocation is `len * size_of::<T>()` bytes.  The phantom
/// parameter keeps casts in [`Self::read_to_vec`] honest without storing any
/// host data.
pub struct GpuBuffer<T: Pod> {
    pub buffer: Buffer,
    pub len: usize,
    _marker: std::marker::PhantomData<T>,
}

impl<T: Pod> GpuBuffer<T> {
    /// Upload a slice into a new storage buffer.
    ///
    /// The buffer always carries `STORAGE | COPY_DST`; pass extra flags
    /// (e.g. `COPY_SRC` for buffers that are read back) through `usage`.
    /// Writing through the queue avoids `MAP_WRITE` and is ordered before
    /// any later submission that binds the buffer.
    pub fn from_slice(context: &GpuContext, data: &[T], usage: BufferUsages) -> Self {
        let bytes = cast_slice(data);
        let buffer = context.device.create_buffer(&BufferDescriptor {
            label: Some("storage_input"),
            size: bytes.len() as u64,
            usage: BufferUsages::STORAGE | BufferUsages::COPY_DST | usage,
            mapped_at_creation: false,
        });
        context.queue.write_buffer(&buffer, 0, bytes);
        Self {
            buffer,
            len: data.len(),
            _marker: std::marker::PhantomData,
        }
    }

    /// Create an uninitialized storage buffer for shader output.
    ///
    /// Carries `STORAGE | COPY_SRC` so it can be bound read_write and then
    /// copied into a download buffer.
    pub fn new_output(context: &GpuContext, len: usize) -> Self {
        let size = (len * std::mem::size_of::<T>()) as u64;
        let buffer = context.device.create_buffer(&BufferDescriptor {
            label: Some("storage_output"),
            size,
            usage: BufferUsages::STORAGE | BufferUsages::COPY_SRC,
            mapped_at_creation: false,
        });
        Self {
            buffer,
            len,
            _marker: std::marker::PhantomData,
        }
    }

    /// Create a staging buffer the CPU can map.
    ///
    /// `COPY_DST | MAP_READ` buffers cannot be bound to shaders; results are
    /// copied into them with `copy_buffer_to_buffer` and then read with
    /// [`Self::read_to_vec`].
    pub fn new_download(context: &GpuContext, len: usize) -> Self {
        let size = (len * std::mem::size_of::<T>()) as u64;
        let buffer = context.device.create_buffer(&BufferDescriptor {
            label: Some("download"),
            size,
            usage: BufferUsages::COPY_DST | BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });
        Self {
            buffer,
            len,
            _marker: std::marker::PhantomData,
        }
    }

    /// Upload a single value as a uniform buffer.
    ///
    /// Used for small parameter blocks (kernel dimensions, scalar
    /// coefficients) bound as `var<uniform>`.
    pub fn uniform_from(context: &GpuContext, value: &T) -> Self {
        let buffer = context
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("uniform_params"),
                contents: bytemuck::bytes_of(value),
                usage: BufferUsages::UNIFORM,
            });
        Self {
            buffer,
            len: 1,
            _marker: std::marker::PhantomData,
        }
    }

    /// Block until the GPU is done, then copy the buffer's contents to the
    /// host.
    ///
    /// Only valid on buffers created with [`Self::new_download`].  The map
    /// callback reports through a oneshot channel; `poll(Wait)` drives the
    /// device until the callback has fired.  The buffer is unmapped before
    /// returning so it can be reused for another copy.
    pub fn read_to_vec(&self, context: &GpuContext) -> GpuResult<Vec<T>> {
        let slice = self.buffer.slice(..);
        let (sender, receiver) = futures_intrusive::channel::shared::oneshot_channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = sender.send(result);
        });

        context.device.poll(wgpu::PollType::Wait)?;
        pollster::block_on(receiver.receive()).ok_or(GpuError::ReadbackChannelClosed)??;

        let data = slice.get_mapped_range();
        let result = cast_slice(&data).to_vec();
        drop(data);
        self.buffer.unmap();
        Ok(result)
    }
}
