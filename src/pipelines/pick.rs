use crate::{
    data_structures::model::Vertex,
    pipelines::{
        DepthOptions, PipelineOptions,
        handle::{HandleRaw, handle_shader},
        mk_render_pipeline,
    },
};

/// Handle markers rendered as raw `u32` IDs into an `R32Uint` target.
pub fn mk_pick_pipeline(
    device: &wgpu::Device,
    camera_bind_group_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Render Pipeline Layout (For picking)"),
        bind_group_layouts: &[camera_bind_group_layout],
        push_constant_ranges: &[],
    });
    mk_render_pipeline(
        device,
        &layout,
        &handle_shader(device),
        &[HandleRaw::desc()],
        PipelineOptions {
            label: "Pick Pipeline",
            color_format: wgpu::TextureFormat::R32Uint,
            // integer targets cannot blend
            blend: None,
            depth: Some(DepthOptions {
                format: wgpu::TextureFormat::Depth24Plus,
                write: true,
                compare: wgpu::CompareFunction::Less,
            }),
            topology: wgpu::PrimitiveTopology::TriangleList,
            cull_mode: None,
            fs_entry: "fs_pick",
        },
    )
}
