use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::*;
use crate::context::GpuContext;

fn test_context() -> Option<GpuContext> {
    match GpuContext::new_blocking() {
        Ok(ctx) => Some(ctx),
        Err(err) => {
            eprintln!("skipping GPU test: {err}");
            None
        }
    }
}

fn random_vec(len: usize, seed: u64) -> Vec<f32> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len).map(|_| rng.gen_range(0.0..1.0)).collect()
}

fn assert_all_close(actual: &[f32], expected: &[f32], tolerance: f32) {
    assert_eq!(actual.len(), expected.len(), "length mismatch");
    for (i, (got, want)) in actual.iter().zip(expected).enumerate() {
        assert!(
            (got - want).abs() <= tolerance,
            "mismatch at index {i}: got {got}, want {want}"
        );
    }
}

#[test]
fn cpu_fma_applies_bias() {
    let out = cpu::vector_fma(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0], 0.5);
    assert_eq!(out, vec![4.5, 10.5, 18.5]);
}

#[test]
fn cpu_convolve_single_tap_is_identity() {
    let signal = [3.0, -1.0, 2.5, 0.0];
    assert_eq!(cpu::convolve_1d(&signal, &[1.0]), signal.to_vec());
}

#[test]
fn cpu_convolve_clamps_at_edges() {
    let third = 1.0 / 3.0;
    let out = cpu::convolve_1d(&[1.0, 2.0, 3.0, 4.0], &[third, third, third]);
    let expected = [4.0 / 3.0, 2.0, 3.0, 11.0 / 3.0];
    assert_all_close(&out, &expected, 1e-6);
}

#[test]
fn cpu_matmul_hand_checked() {
    // (2 x 3) * (3 x 2)
    let a = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
    let b = [7.0, 8.0, 9.0, 10.0, 11.0, 12.0];
    let out = cpu::matmul(&a, &b, MatmulDims { m: 2, k: 3, n: 2 });
    assert_eq!(out, vec![58.0, 64.0, 139.0, 154.0]);
}

#[test]
fn fma_matches_cpu() {
    let Some(ctx) = test_context() else { return };
    let a = random_vec(1000, 1);
    let b = random_vec(1000, 2);
    let gpu = vector_fma(&ctx, &a, &b, 1.0).unwrap();
    let cpu = cpu::vector_fma(&a, &b, 1.0);
    assert_all_close(&gpu, &cpu, 1e-5);
}

#[test]
fn fma_integer_inputs_are_exact() {
    let Some(ctx) = test_context() else { return };
    let a: Vec<f32> = (0..10).map(|i| i as f32).collect();
    let gpu = vector_fma(&ctx, &a, &a, 1.0).unwrap();
    let expected: Vec<f32> = (0..10).map(|i| (i * i + 1) as f32).collect();
    assert_eq!(gpu, expected);
}

#[test]
fn fma_on_a_folded_grid_writes_every_element() {
    let Some(ctx) = test_context() else { return };
    // An explicit two-row grid stands in for a dispatch folded at the
    // device limit; indexing by gid.x alone would leave the second row at
    // the buffer's initial zeros.
    let n = 2 * 2 * 256;
    let a = random_vec(n, 9);
    let b = random_vec(n, 10);
    let buffer_a = GpuBuffer::from_slice(&ctx, &a, BufferUsages::empty());
    let buffer_b = GpuBuffer::from_slice(&ctx, &b, BufferUsages::empty());
    let params = GpuBuffer::uniform_from(&ctx, &FmaParams { bias: 1.0 });
    let gpu: Vec<f32> = run_compute_pass(
        &ctx,
        shaders::VECTOR_FMA_SRC,
        "vector_fma",
        &[&buffer_a.buffer, &buffer_b.buffer],
        Some(&params.buffer),
        n,
        DispatchGrid { x: 2, y: 2, z: 1 },
    )
    .unwrap();
    assert_all_close(&gpu, &cpu::vector_fma(&a, &b, 1.0), 1e-5);
}

#[test]
fn convolve_matches_cpu_for_box_filter() {
    let Some(ctx) = test_context() else { return };
    let signal = random_vec(1000, 3);
    let taps = vec![0.2f32; 5];
    let gpu = convolve_1d(&ctx, &signal, &taps).unwrap();
    let cpu = cpu::convolve_1d(&signal, &taps);
    assert_all_close(&gpu, &cpu, 1e-5);
}

#[test]
fn convolve_matches_cpu_for_even_tap_count() {
    let Some(ctx) = test_context() else { return };
    let signal = random_vec(257, 4);
    let taps = random_vec(4, 5);
    let gpu = convolve_1d(&ctx, &signal, &taps).unwrap();
    let cpu = cpu::convolve_1d(&signal, &taps);
    assert_all_close(&gpu, &cpu, 1e-5);
}

#[test]
fn convolve_single_tap_is_identity() {
    let Some(ctx) = test_context() else { return };
    let signal = random_vec(100, 6);
    let gpu = convolve_1d(&ctx, &signal, &[1.0]).unwrap();
    assert_eq!(gpu, signal);
}

#[test]
fn convolve_on_a_folded_grid_writes_every_element() {
    let Some(ctx) = test_context() else { return };
    let n = 2 * 256;
    let signal = random_vec(n, 11);
    let taps = vec![0.2f32; 5];
    let signal_buffer = GpuBuffer::from_slice(&ctx, &signal, BufferUsages::empty());
    let taps_buffer = GpuBuffer::from_slice(&ctx, &taps, BufferUsages::empty());
    let gpu: Vec<f32> = run_compute_pass(
        &ctx,
        shaders::CONVOLVE_1D_SRC,
        "convolve_1d",
        &[&signal_buffer.buffer, &taps_buffer.buffer],
        None,
        n,
        DispatchGrid { x: 1, y: 2, z: 1 },
    )
    .unwrap();
    assert_all_close(&gpu, &cpu::convolve_1d(&signal, &taps), 1e-5);
}

fn run_matmul_parity(ctx: &GpuContext, m: usize, k: usize, n: usize) {
    let dims = MatmulDims { m, k, n };
    let a = random_vec(m * k, (m * k) as u64);
    let b = random_vec(k * n, (k * n + 7) as u64);
    let gpu = matmul(ctx, &a, &b, dims).unwrap();
    let cpu = cpu::matmul(&a, &b, dims);
    // Rounding differences accumulate with the k-length dot products, so
    // the tolerance scales with k rather than sitting at a fixed value.
    assert_all_close(&gpu, &cpu, 1e-6 * k as f32);
}

#[test]
fn matmul_matches_cpu_across_shapes() {
    let Some(ctx) = test_context() else { return };
    // Includes shapes that do not align to the 16-wide workgroup tiles.
    for &(m, k, n) in &[(1, 1, 1), (4, 4, 4), (16, 16, 16), (33, 17, 25), (50, 100, 70)] {
        run_matmul_parity(&ctx, m, k, n);
    }
}

#[test]
fn matmul_by_identity_is_exact() {
    let Some(ctx) = test_context() else { return };
    let n = 16;
    let a = random_vec(n * n, 8);
    let mut identity = vec![0.0f32; n * n];
    for i in 0..n {
        identity[i * n + i] = 1.0;
    }
    let gpu = matmul(&ctx, &a, &identity, MatmulDims::square(n)).unwrap();
    assert_eq!(gpu, a);
}
