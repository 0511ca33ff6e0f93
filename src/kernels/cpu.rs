//! Single-threaded reference implementations.
//!
//! These mirror the GPU kernels exactly (same boundary handling, same
//! row-major layout) so test comparisons and timing baselines are
//! apples-to-apples.

use super::MatmulDims;

/// `out[i] = a[i] * b[i] + bias`.
pub fn vector_fma(a: &[f32], b: &[f32], bias: f32) -> Vec<f32> {
    assert_eq!(a.len(), b.len(), "input slices must have equal length");
    a.iter().zip(b).map(|(x, y)| x * y + bias).collect()
}

/// 1-D convolution with clamp-to-edge boundaries, window centred at
/// `taps.len() / 2`.
pub fn convolve_1d(signal: &[f32], taps: &[f32]) -> Vec<f32> {
    assert!(!signal.is_empty(), "signal must not be empty");
    assert!(!taps.is_empty(), "taps must not be empty");
    let n = signal.len() as isize;
    let centre = (taps.len() / 2) as isize;
    let mut out = Vec::with_capacity(signal.len());
    for i in 0..n {
        let mut acc = 0.0;
        for (j, &tap) in taps.iter().enumerate() {
            let pos = (i + j as isize - centre).clamp(0, n - 1);
            acc += signal[pos as usize] * tap;
        }
        out.push(acc);
    }
    out
}

/// Naive row-major matrix product `a (m x k) * b (k x n)`.
pub fn matmul(a: &[f32], b: &[f32], dims: MatmulDims) -> Vec<f32> {
    assert_eq!(a.len(), dims.m * dims.k, "lhs length must equal m * k");
    assert_eq!(b.len(), dims.k * dims.n, "rhs length must equal k * n");
    let mut out = vec![0.0f32; dims.m * dims.n];
    for row in 0..dims.m {
        for col in 0..dims.n {
            let mut acc = 0.0;
            for i in 0..dims.k {
                acc += a[row * dims.k + i] * b[i * dims.n + col];
            }
            out[row * dims.n + col] = acc;
        }
    }
    out
}
