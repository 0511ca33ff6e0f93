//! GPU compute kernel demos over [wgpu](https://github.com/gfx-rs/wgpu).
//!
//! The crate bundles the plumbing every small compute experiment repeats
//! (context acquisition, typed buffers, dispatch-and-readback) with three
//! worked numeric kernels: element-wise multiply-add, 1-D convolution and
//! dense matrix multiplication, each paired with a single-threaded CPU
//! reference.  The demo binaries under `src/bin/` drive one kernel each
//! and print their results to stdout.
//!
//! The API is synchronous and blocking: every dispatch waits for the GPU
//! to finish and returns the results as a `Vec`.  Callers that need an
//! async flow can use [`GpuContext::new_async`] and the underlying
//! `wgpu::Device` and `wgpu::Queue` directly.

pub mod buffer;
pub mod compute;
pub mod context;
pub mod error;
pub mod kernels;

// Re-export the common types so demos can `use wgpu_compute_kernels::*`.
pub use buffer::GpuBuffer;
pub use context::GpuContext;
pub use error::{GpuError, GpuResult};

pub use compute::{
    run_compute_single_input, run_compute_single_input_custom_output, run_compute_two_inputs,
    run_compute_two_inputs_custom_output,
};
pub use kernels::{convolve_1d, matmul, vector_fma, MatmulDims};
