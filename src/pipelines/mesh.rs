use crate::{
    data_structures::{
        instance::ModelRaw,
        model::{ModelVertex, Vertex},
        texture::Texture,
    },
    pipelines::{DepthOptions, PipelineOptions, mk_render_pipeline},
};

/// The two mesh shading programs: normal colouring and cube map reflection.
///
/// Both share one shader module and vertex stage and only differ in the
/// fragment entry point.
pub fn mk_mesh_pipelines(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
    camera_bind_group_layout: &wgpu::BindGroupLayout,
    environment_bind_group_layout: &wgpu::BindGroupLayout,
) -> (wgpu::RenderPipeline, wgpu::RenderPipeline) {
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Mesh Pipeline Layout"),
        bind_group_layouts: &[camera_bind_group_layout, environment_bind_group_layout],
        push_constant_ranges: &[],
    });
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("Mesh Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("mesh.wgsl").into()),
    });

    let options = |label, fs_entry| PipelineOptions {
        label,
        color_format: config.format,
        blend: Some(wgpu::BlendState::REPLACE),
        depth: Some(DepthOptions {
            format: Texture::DEPTH_FORMAT,
            write: true,
            compare: wgpu::CompareFunction::LessEqual,
        }),
        topology: wgpu::PrimitiveTopology::TriangleList,
        cull_mode: Some(wgpu::Face::Back),
        fs_entry,
    };
    let buffers = [ModelVertex::desc(), ModelRaw::desc()];

    let normal_coloring = mk_render_pipeline(
        device,
        &layout,
        &shader,
        &buffers,
        options("Normal Coloring Pipeline", "fs_normal"),
    );
    let reflection = mk_render_pipeline(
        device,
        &layout,
        &shader,
        &buffers,
        options("Reflection Pipeline", "fs_reflect"),
    );
    (normal_coloring, reflection)
}
