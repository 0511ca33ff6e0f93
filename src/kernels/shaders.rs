//! WGSL sources for the numeric kernels.
//!
//! Each shader computes one output element per invocation and bounds-guards
//! against oversubscribed grids.  Binding order follows the crate-wide
//! convention: read-only inputs first, then the read_write output, then any
//! uniform parameter block.  The 1-D kernels linearize their element index
//! from `num_workgroups`, because dispatches past the per-dimension
//! workgroup limit arrive folded into an (x, y) grid where `gid.x` alone no
//! longer spans the input.

/// Element-wise multiply-add: `out[i] = a[i] * b[i] + bias`.
///
/// The bias arrives through a uniform block so the same shader serves any
/// coefficient.  One invocation per element, 1-D grid.
pub const VECTOR_FMA_SRC: &str = r#"
struct FmaParams {
    bias: f32,
}

@group(0) @binding(0) var<storage, read>       a:      array<f32>;
@group(0) @binding(1) var<storage, read>       b:      array<f32>;
@group(0) @binding(2) var<storage, read_write> out:    array<f32>;
@group(0) @binding(3) var<uniform>             params: FmaParams;

@compute @workgroup_size(256)
fn vector_fma(
    @builtin(global_invocation_id) gid: vec3<u32>,
    @builtin(num_workgroups) grid: vec3<u32>,
) {
    let i = gid.y * grid.x * 256u + gid.x;
    if (i >= arrayLength(&out)) { return; }
    out[i] = fma(a[i], b[i], params.bias);
}
"#;

/// 1-D convolution with clamp-to-edge boundaries.
///
/// The tap window is centred at `taps.len() / 2`; reads that fall outside
/// the signal take the nearest edge sample.  Tap count is read via
/// `arrayLength`, so any filter length works without respecialization.
pub const CONVOLVE_1D_SRC: &str = r#"
@group(0) @binding(0) var<storage, read>       signal: array<f32>;
@group(0) @binding(1) var<storage, read>       taps:   array<f32>;
@group(0) @binding(2) var<storage, read_write> out:    array<f32>;

@compute @workgroup_size(256)
fn convolve_1d(
    @builtin(global_invocation_id) gid: vec3<u32>,
    @builtin(num_workgroups) grid: vec3<u32>,
) {
    let i = gid.y * grid.x * 256u + gid.x;
    let n = arrayLength(&signal);
    if (i >= n) { return; }

    let k = arrayLength(&taps);
    let centre = k / 2u;
    var acc = 0.0;
    for (var j = 0u; j < k; j = j + 1u) {
        let pos = i32(i) + i32(j) - i32(centre);
        let src = u32(clamp(pos, 0, i32(n) - 1));
        acc = acc + signal[src] * taps[j];
    }
    out[i] = acc;
}
"#;

/// Dense row-major matrix multiplication: `out = a (m x k) * b (k x n)`.
///
/// One invocation per output element on a 2-D grid of 16x16 workgroups;
/// rows map to `gid.y`, columns to `gid.x`.  Dimensions arrive through a
/// uniform block, so non-tile-aligned shapes rely on the row/column guard.
pub const MATMUL_SRC: &str = r#"
struct MatmulParams {
    m: u32,
    k: u32,
    n: u32,
}

@group(0) @binding(0) var<storage, read>       a:      array<f32>;
@group(0) @binding(1) var<storage, read>       b:      array<f32>;
@group(0) @binding(2) var<storage, read_write> out:    array<f32>;
@group(0) @binding(3) var<uniform>             params: MatmulParams;

@compute @workgroup_size(16, 16, 1)
fn matmul(@builtin(global_invocation_id) gid: vec3<u32>) {
    let row = gid.y;
    let col = gid.x;
    if (row >= params.m || col >= params.n) { return; }

    var acc = 0.0;
    for (var i = 0u; i < params.k; i = i + 1u) {
        acc = acc + a[row * params.k + i] * b[i * params.n + col];
    }
    out[row * params.n + col] = acc;
}
"#;
