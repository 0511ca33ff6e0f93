//! Timed naive matrix multiplication on the CPU.
//!
//! The single-threaded baseline the GPU demo is measured against: fill a
//! 2024 x 2024 matrix with uniform random values, multiply it by itself
//! with the triple-loop reference, print the wall-clock time and the first
//! ten output values in the same format as `matmul_gpu`.

use std::time::Instant;

use rand::Rng;
use wgpu_compute_kernels::kernels::cpu;
use wgpu_compute_kernels::MatmulDims;

const N: usize = 2024;

fn main() {
    env_logger::init();
    let start = Instant::now();

    let mut rng = rand::thread_rng();
    let input: Vec<f32> = (0..N * N).map(|_| rng.gen_range(0.0..1.0)).collect();

    let output = cpu::matmul(&input, &input, MatmulDims::square(N));

    println!("Time: {}ms", start.elapsed().as_millis());
    for value in &output[..10] {
        println!("{value}");
    }
}
