//! 1-D box-filter convolution on the GPU.
//!
//! Convolves a 100-sample all-ones signal with a five-tap box filter, then
//! smooths the first pass's output with the same filter again.  With
//! clamp-to-edge boundaries a constant signal is a fixed point of the box
//! filter, so both passes print values within float rounding of 1.0.  Each
//! pass is checked against the CPU reference before printing.

use wgpu_compute_kernels::{convolve_1d, kernels::cpu, GpuContext};

const SIGNAL_LEN: usize = 100;
const TAP_COUNT: usize = 5;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let ctx = GpuContext::new_blocking()?;

    let signal = vec![1.0f32; SIGNAL_LEN];
    let taps = vec![1.0 / TAP_COUNT as f32; TAP_COUNT];

    let smoothed = convolve_1d(&ctx, &signal, &taps)?;
    check_against_cpu(&smoothed, &cpu::convolve_1d(&signal, &taps));

    let smoothed_twice = convolve_1d(&ctx, &smoothed, &taps)?;
    check_against_cpu(&smoothed_twice, &cpu::convolve_1d(&smoothed, &taps));

    println!("pass 1:");
    for value in &smoothed[..10] {
        println!("{value}");
    }
    println!("pass 2:");
    for value in &smoothed_twice[..10] {
        println!("{value}");
    }
    Ok(())
}

fn check_against_cpu(gpu: &[f32], cpu: &[f32]) {
    for (i, (got, want)) in gpu.iter().zip(cpu).enumerate() {
        assert!(
            (got - want).abs() < 1e-6,
            "GPU and CPU disagree at {i}: {got} vs {want}"
        );
    }
}
