//! Helpers for running compute shaders.
//!
//! Every helper here follows the same blocking recipe: compile a WGSL
//! module, create storage buffers for the inputs and the output, bind them,
//! dispatch a grid of workgroups, copy the output into a staging buffer and
//! map it back to the host.  The binding convention is fixed: read-only
//! input buffers occupy bindings `0..n`, the read_write output buffer sits
//! at binding `n`, and an optional uniform parameter block follows at
//! binding `n + 1`.
//!
//! Grids may oversubscribe the problem (the last workgroup can contain
//! unused invocations, and folding a long 1-D dispatch into two dimensions
//! rounds up further), so every shader is expected to bounds-guard against
//! its output size.  A 1-D dispatch whose group count exceeds the device's
//! per-dimension limit arrives folded into an (x, y) grid, so shaders run
//! through the 1-D helpers must linearize their element index as
//! `gid.y * num_workgroups.x * WORKGROUP_SIZE + gid.x`; `gid.x` on its own
//! stops at the end of the first x-row.

use std::num::NonZeroU64;

use bytemuck::Pod;
use log::debug;
use wgpu::{BufferUsages, ShaderModuleDescriptor, ShaderSource};

use crate::buffer::GpuBuffer;
use crate::context::GpuContext;
use crate::error::GpuResult;

/// Workgroup counts along each dispatch axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DispatchGrid {
    pub x: u32,
    pub y: u32,
    pub z: u32,
}

impl DispatchGrid {
    /// Cover `invocations` threads with 1-D workgroups of `workgroup_size`
    /// threads, folding into an (x, y) grid when the group count exceeds
    /// the device's per-dimension limit.
    ///
    /// On a folded grid the shader must derive its element index from
    /// `gid.y` and `num_workgroups.x` as described in the module docs.
    pub fn linear(context: &GpuContext, invocations: usize, workgroup_size: u32) -> Self {
        assert!(workgroup_size > 0, "workgroup size must be non-zero");
        // Buffer byte caps keep any bindable element count far below
        // u32::MAX, so the cast below cannot truncate in practice.
        debug_assert!(
            invocations <= u32::MAX as usize,
            "invocation count {invocations} overflows u32"
        );
        let limit = context.device.limits().max_compute_workgroups_per_dimension;
        let total_groups = ((invocations as u32) + workgroup_size - 1) / workgroup_size;
        let (x, y) = split_workgroups(total_groups, limit);
        Self { x, y, z: 1 }
    }

    /// Cover a `cols` x `rows` thread grid with square workgroups of
    /// `tile` threads per side.
    ///
    /// No folding happens here: the caller is responsible for keeping both
    /// axes within the device's `max_compute_workgroups_per_dimension`.
    pub fn tiles_2d(cols: u32, rows: u32, tile: u32) -> Self {
        assert!(tile > 0, "tile size must be non-zero");
        Self {
            x: (cols + tile - 1) / tile,
            y: (rows + tile - 1) / tile,
            z: 1,
        }
    }
}

/// Split `total_groups` workgroups into an (x, y) grid where neither axis
/// exceeds `limit`.
fn split_workgroups(total_groups: u32, limit: u32) -> (u32, u32) {
    if total_groups <= limit {
        (total_groups, 1)
    } else {
        let y = (total_groups + limit - 1) / limit; // ceiling-divide
        (limit, y)
    }
}

/// Compile, bind, dispatch and read back one compute pass.
///
/// `inputs` are bound read-only in slice order; the output buffer of
/// `output_len` elements of `Out` follows them, then `uniform` if present.
/// Blocks until the results are host-visible.
pub(crate) fn run_compute_pass<Out: Pod>(
    context: &GpuContext,
    shader_source: &str,
    entry_point: &str,
    inputs: &[&wgpu::Buffer],
    uniform: Option<&wgpu::Buffer>,
    output_len: usize,
    grid: DispatchGrid,
) -> GpuResult<Vec<Out>> {
    assert!(output_len > 0, "output length must be non-zero");

    let module = context.device.create_shader_module(ShaderModuleDescriptor {
        label: Some(entry_point),
        source: ShaderSource::Wgsl(shader_source.into()),
    });

    let output_buffer = GpuBuffer::<Out>::new_output(context, output_len);
    let download_buffer = GpuBuffer::<Out>::new_download(context, output_len);

    // Layout: inputs at 0..n, output at n, uniform (if any) at n + 1.  The
    // output entry pins its minimum binding size to one element; the input
    // sizes are validated against the shader when the bind group is used.
    let output_binding = inputs.len() as u32;
    let mut layout_entries = Vec::with_capacity(inputs.len() + 2);
    for binding in 0..output_binding {
        layout_entries.push(wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::COMPUTE,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Storage { read_only: true },
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        });
    }
    layout_entries.push(wgpu::BindGroupLayoutEntry {
        binding: output_binding,
        visibility: wgpu::ShaderStages::COMPUTE,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Storage { read_only: false },
            has_dynamic_offset: false,
            min_binding_size: NonZeroU64::new(std::mem::size_of::<Out>() as u64),
        },
        count: None,
    });
    if uniform.is_some() {
        layout_entries.push(wgpu::BindGroupLayoutEntry {
            binding: output_binding + 1,
            visibility: wgpu::ShaderStages::COMPUTE,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        });
    }
    let bind_group_layout =
        context
            .device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("compute_bind_group_layout"),
                entries: &layout_entries,
            });

    let mut bind_entries: Vec<wgpu::BindGroupEntry> = inputs
        .iter()
        .enumerate()
        .map(|(i, buffer)| wgpu::BindGroupEntry {
            binding: i as u32,
            resource: buffer.as_entire_binding(),
        })
        .collect();
    bind_entries.push(wgpu::BindGroupEntry {
        binding: output_binding,
        resource: output_buffer.buffer.as_entire_binding(),
    });
    if let Some(params) = uniform {
        bind_entries.push(wgpu::BindGroupEntry {
            binding: output_binding + 1,
            resource: params.as_entire_binding(),
        });
    }
    let bind_group = context.device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("compute_bind_group"),
        layout: &bind_group_layout,
        entries: &bind_entries,
    });

    let pipeline_layout =
        context
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("compute_pipeline_layout"),
                bind_group_layouts: &[&bind_group_layout],
                push_constant_ranges: &[],
            });
    let pipeline = context
        .device
        .create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some("compute_pipeline"),
            layout: Some(&pipeline_layout),
            module: &module,
            entry_point: Some(entry_point),
            compilation_options: wgpu::PipelineCompilationOptions::default(),
            cache: None,
        });

    let mut encoder = context
        .device
        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("compute_encoder"),
        });
    {
        let mut cpass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
            label: Some("compute_pass"),
            timestamp_writes: None,
        });
        cpass.set_pipeline(&pipeline);
        cpass.set_bind_group(0, &bind_group, &[]);
        debug!(
            "dispatching {}x{}x{} workgroups for '{}'",
            grid.x, grid.y, grid.z, entry_point
        );
        cpass.dispatch_workgroups(grid.x, grid.y, grid.z);
    }
    encoder.copy_buffer_to_buffer(
        &output_buffer.buffer,
        0,
        &download_buffer.buffer,
        0,
        (output_len * std::mem::size_of::<Out>()) as u64,
    );
    context.queue.submit([encoder.finish()]);

    download_buffer.read_to_vec(context)
}

/// Dispatch a shader over a single input buffer, producing an output of the
/// same length and type.
///
/// The shader must declare a read-only storage buffer at binding 0 and a
/// read_write storage buffer at binding 1.  One invocation is launched per
/// input element; `entry_point` names the `@compute` function and
/// `workgroup_size` must match its `@workgroup_size`.  Large dispatches
/// fold into an (x, y) grid, so the shader must linearize its element
/// index as the module docs describe.
pub fn run_compute_single_input<T: Pod>(
    context: &GpuContext,
    shader_source: &str,
    entry_point: &str,
    input: &[T],
    workgroup_size: u32,
) -> GpuResult<Vec<T>> {
    run_compute_single_input_custom_output::<T, T>(
        context,
        shader_source,
        entry_point,
        input,
        input.len(),
        workgroup_size,
    )
}

/// Dispatch a shader over a single input buffer with a caller-chosen output
/// element type and length.
///
/// Bindings are input at 0, output at 1.  One invocation is launched per
/// *input* element, which suits reductions that scatter into a smaller
/// output (histograms, per-bucket accumulation via atomics).  The folded
/// 1-D index convention from the module docs applies.
pub fn run_compute_single_input_custom_output<In: Pod, Out: Pod>(
    context: &GpuContext,
    shader_source: &str,
    entry_point: &str,
    input: &[In],
    output_len: usize,
    workgroup_size: u32,
) -> GpuResult<Vec<Out>> {
    assert!(!input.is_empty(), "input slice must not be empty");
    let input_buffer = GpuBuffer::from_slice(context, input, BufferUsages::empty());
    let grid = DispatchGrid::linear(context, input.len(), workgroup_size);
    run_compute_pass(
        context,
        shader_source,
        entry_point,
        &[&input_buffer.buffer],
        None,
        output_len,
        grid,
    )
}

/// Dispatch a shader over two equal-length input buffers, producing an
/// output of that same length.
///
/// Bindings are the inputs at 0 and 1 and the output at 2.  One invocation
/// is launched per element; the folded 1-D index convention from the
/// module docs applies.
pub fn run_compute_two_inputs<T: Pod>(
    context: &GpuContext,
    shader_source: &str,
    entry_point: &str,
    input_a: &[T],
    input_b: &[T],
    workgroup_size: u32,
) -> GpuResult<Vec<T>> {
    assert_eq!(
        input_a.len(),
        input_b.len(),
        "input slices must have equal length"
    );
    run_compute_two_inputs_custom_output::<T, T, T>(
        context,
        shader_source,
        entry_point,
        input_a,
        input_b,
        input_a.len(),
        workgroup_size,
    )
}

/// Dispatch a shader over two input buffers of independent lengths and
/// types, producing `output_len` elements of `Out`.
///
/// Bindings are the inputs at 0 and 1 and the output at 2.  One invocation
/// is launched per *output* element, which suits kernels where a secondary
/// input (filter taps, lookup table) is consulted wholesale by each thread.
/// The folded 1-D index convention from the module docs applies.
pub fn run_compute_two_inputs_custom_output<A: Pod, B: Pod, Out: Pod>(
    context: &GpuContext,
    shader_source: &str,
    entry_point: &str,
    input_a: &[A],
    input_b: &[B],
    output_len: usize,
    workgroup_size: u32,
) -> GpuResult<Vec<Out>> {
    assert!(!input_a.is_empty(), "input slices must not be empty");
    assert!(!input_b.is_empty(), "input slices must not be empty");
    let buffer_a = GpuBuffer::from_slice(context, input_a, BufferUsages::empty());
    let buffer_b = GpuBuffer::from_slice(context, input_b, BufferUsages::empty());
    let grid = DispatchGrid::linear(context, output_len, workgroup_size);
    run_compute_pass(
        context,
        shader_source,
        entry_point,
        &[&buffer_a.buffer, &buffer_b.buffer],
        None,
        output_len,
        grid,
    )
}
