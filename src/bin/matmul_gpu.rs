//! Timed dense matrix multiplication on the GPU.
//!
//! Fills a 4096 x 4096 matrix with uniform random values, multiplies it by
//! itself with the matmul compute shader, prints the wall-clock time for
//! the whole run (device setup through readback) and then the first ten
//! output values.  Companion to the `matmul_cpu` baseline, which prints in
//! the same format.

use std::time::Instant;

use rand::Rng;
use wgpu_compute_kernels::{matmul, GpuContext, MatmulDims};

// Each input buffer is n^2 * 4 bytes; 4096 keeps that at 64 MiB, inside
// the 128 MiB downlevel storage-binding cap.
const N: usize = 4096;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let start = Instant::now();

    let ctx = GpuContext::new_blocking()?;

    let mut rng = rand::thread_rng();
    let input: Vec<f32> = (0..N * N).map(|_| rng.gen_range(0.0..1.0)).collect();

    let output = matmul(&ctx, &input, &input, MatmulDims::square(N))?;

    println!("Time: {}ms", start.elapsed().as_millis());
    for value in &output[..10] {
        println!("{value}");
    }
    Ok(())
}
