//! Element-wise multiply-add on the GPU.
//!
//! Builds two ten-element vectors with `a[i] = b[i] = i`, computes
//! `c[i] = a[i] * b[i] + 1.0` in a compute shader and prints each result on
//! its own line, so the expected output is 1, 2, 5, 10, 17, ...

use wgpu_compute_kernels::{vector_fma, GpuContext};

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let ctx = GpuContext::new_blocking()?;

    const N: usize = 10;
    let a: Vec<f32> = (0..N).map(|i| i as f32).collect();
    let b = a.clone();

    let c = vector_fma(&ctx, &a, &b, 1.0)?;
    for value in &c {
        println!("{value}");
    }
    Ok(())
}
