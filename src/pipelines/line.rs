use crate::{
    data_structures::{
        instance::LineVertex,
        model::Vertex,
        texture::Texture,
    },
    pipelines::{DepthOptions, PipelineOptions, mk_render_pipeline},
};

/// World-space coloured line lists: curve polylines, handle bars and wireframes.
pub fn mk_line_pipeline(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
    camera_bind_group_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Line Pipeline Layout"),
        bind_group_layouts: &[camera_bind_group_layout],
        push_constant_ranges: &[],
    });
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("Line Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("line.wgsl").into()),
    });
    mk_render_pipeline(
        device,
        &layout,
        &shader,
        &[LineVertex::desc()],
        PipelineOptions {
            label: "Line Pipeline",
            color_format: config.format,
            blend: Some(wgpu::BlendState::REPLACE),
            depth: Some(DepthOptions {
                format: Texture::DEPTH_FORMAT,
                write: true,
                compare: wgpu::CompareFunction::LessEqual,
            }),
            topology: wgpu::PrimitiveTopology::LineList,
            cull_mode: None,
            fs_entry: "fs_main",
        },
    )
}
