//! The numeric kernels: vector multiply-add, 1-D convolution and dense
//! matmul.
//!
//! Each host wrapper uploads its inputs, dispatches the matching WGSL
//! shader from [`shaders`] and blocks until the result is back on the host.
//! [`cpu`] holds the single-threaded reference implementations the GPU
//! results are validated and timed against.

pub mod cpu;
pub mod shaders;

use bytemuck::{Pod, Zeroable};
use wgpu::BufferUsages;

use crate::buffer::GpuBuffer;
use crate::compute::{run_compute_pass, run_compute_two_inputs_custom_output, DispatchGrid};
use crate::context::GpuContext;
use crate::error::GpuResult;

/// Threads per workgroup in the 1-D kernels; matches their
/// `@workgroup_size`.
const WORKGROUP_SIZE: u32 = 256;
/// Square workgroup side in the matmul kernel; matches its
/// `@workgroup_size(16, 16, 1)`.
const MATMUL_TILE: u32 = 16;

/// Shape of a row-major product `a (m x k) * b (k x n)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MatmulDims {
    pub m: usize,
    pub k: usize,
    pub n: usize,
}

impl MatmulDims {
    /// Dimensions of a square `n x n` product.
    pub fn square(n: usize) -> Self {
        Self { m: n, k: n, n }
    }
}

/// Host-side mirror of the shader's `MatmulParams` uniform, padded to
/// 16 bytes.
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct MatmulParams {
    m: u32,
    k: u32,
    n: u32,
    _pad: u32,
}

/// Host-side mirror of the shader's `FmaParams` uniform.
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct FmaParams {
    bias: f32,
}

/// Compute `out[i] = a[i] * b[i] + bias` on the GPU.
///
/// Both inputs must have the same non-zero length; the result has that
/// length too.
pub fn vector_fma(context: &GpuContext, a: &[f32], b: &[f32], bias: f32) -> GpuResult<Vec<f32>> {
    assert_eq!(a.len(), b.len(), "input slices must have equal length");
    assert!(!a.is_empty(), "input slices must not be empty");
    let buffer_a = GpuBuffer::from_slice(context, a, BufferUsages::empty());
    let buffer_b = GpuBuffer::from_slice(context, b, BufferUsages::empty());
    let params = GpuBuffer::uniform_from(context, &FmaParams { bias });
    let grid = DispatchGrid::linear(context, a.len(), WORKGROUP_SIZE);
    run_compute_pass(
        context,
        shaders::VECTOR_FMA_SRC,
        "vector_fma",
        &[&buffer_a.buffer, &buffer_b.buffer],
        Some(&params.buffer),
        a.len(),
        grid,
    )
}

/// Convolve `signal` with `taps` on the GPU.
///
/// The output has the signal's length; boundaries clamp to the edge
/// samples.  The tap window is centred at `taps.len() / 2`, so odd tap
/// counts are symmetric and even counts lean one sample left.
pub fn convolve_1d(context: &GpuContext, signal: &[f32], taps: &[f32]) -> GpuResult<Vec<f32>> {
    assert!(!signal.is_empty(), "signal must not be empty");
    assert!(!taps.is_empty(), "taps must not be empty");
    run_compute_two_inputs_custom_output::<f32, f32, f32>(
        context,
        shaders::CONVOLVE_1D_SRC,
        "convolve_1d",
        signal,
        taps,
        signal.len(),
        WORKGROUP_SIZE,
    )
}

/// Multiply row-major matrices on the GPU.
///
/// `a` must hold `m * k` elements and `b` `k * n`; the result holds
/// `m * n`.  Dimensions are passed to the shader through a uniform block
/// and the 2-D grid is sized by ceiling division, so shapes need not align
/// to the 16-wide workgroup tiles.
pub fn matmul(context: &GpuContext, a: &[f32], b: &[f32], dims: MatmulDims) -> GpuResult<Vec<f32>> {
    assert!(
        dims.m > 0 && dims.k > 0 && dims.n > 0,
        "matrix dimensions must be non-zero"
    );
    assert_eq!(a.len(), dims.m * dims.k, "lhs length must equal m * k");
    assert_eq!(b.len(), dims.k * dims.n, "rhs length must equal k * n");
    let buffer_a = GpuBuffer::from_slice(context, a, BufferUsages::empty());
    let buffer_b = GpuBuffer::from_slice(context, b, BufferUsages::empty());
    let params = GpuBuffer::uniform_from(
        context,
        &MatmulParams {
            m: dims.m as u32,
            k: dims.k as u32,
            n: dims.n as u32,
            _pad: 0,
        },
    );
    let grid = DispatchGrid::tiles_2d(dims.n as u32, dims.m as u32, MATMUL_TILE);
    let limit = context.device.limits().max_compute_workgroups_per_dimension;
    debug_assert!(
        grid.x <= limit && grid.y <= limit,
        "matmul grid {}x{} exceeds the per-dimension workgroup limit {limit}",
        grid.x,
        grid.y
    );
    run_compute_pass(
        context,
        shaders::MATMUL_SRC,
        "matmul",
        &[&buffer_a.buffer, &buffer_b.buffer],
        Some(&params.buffer),
        dims.m * dims.n,
        grid,
    )
}

#[cfg(test)]
mod tests;
