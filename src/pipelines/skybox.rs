use crate::{
    data_structures::texture::Texture,
    pipelines::{DepthOptions, PipelineOptions, mk_render_pipeline},
};

/// A single fullscreen triangle that looks up the cube map along each view ray.
///
/// Drawn first and without depth writes, so everything else covers it.
pub fn mk_skybox_pipeline(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
    camera_bind_group_layout: &wgpu::BindGroupLayout,
    environment_bind_group_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Skybox Pipeline Layout"),
        bind_group_layouts: &[camera_bind_group_layout, environment_bind_group_layout],
        push_constant_ranges: &[],
    });
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("Skybox Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("skybox.wgsl").into()),
    });
    mk_render_pipeline(
        device,
        &layout,
        &shader,
        &[],
        PipelineOptions {
            label: "Skybox Pipeline",
            color_format: config.format,
            blend: Some(wgpu::BlendState::REPLACE),
            depth: Some(DepthOptions {
                format: Texture::DEPTH_FORMAT,
                write: false,
                compare: wgpu::CompareFunction::Always,
            }),
            topology: wgpu::PrimitiveTopology::TriangleList,
            cull_mode: None,
            fs_entry: "fs_main",
        },
    )
}
