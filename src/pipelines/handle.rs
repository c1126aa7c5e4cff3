//! Control point markers: camera-facing quads, one instance per point.
//!
//! The same shader serves the visible pass (`fs_main`) and the pick pass
//! (`fs_pick`, see [`super::pick`]), so both rasterize exactly the same pixels.

use cgmath::{EuclideanSpace, Point3};

use crate::{
    data_structures::{model::Vertex, texture::Texture},
    pipelines::{DepthOptions, PipelineOptions, mk_render_pipeline},
};

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct HandleRaw {
    pub center: [f32; 3],
    /// Half the quad's edge length in normalized device coordinates.
    pub size: f32,
    pub color: [f32; 3],
    pub id: u32,
}

impl HandleRaw {
    const TANGENT_SIZE: f32 = 0.012;
    const ANCHOR_SIZE: f32 = 0.018;
    const TANGENT_COLOR: [f32; 3] = [0.2, 0.6, 1.0];
    const ANCHOR_COLOR: [f32; 3] = [1.0, 0.3, 0.2];

    /// The three markers of one handle; IDs follow `base_id` consecutively.
    pub fn from_handle(points: &[Point3<f32>; 3], base_id: u32) -> [Self; 3] {
        let marker = |i: usize, size, color| Self {
            center: points[i].to_vec().into(),
            size,
            color,
            id: base_id + i as u32,
        };
        [
            marker(0, Self::TANGENT_SIZE, Self::TANGENT_COLOR),
            marker(1, Self::ANCHOR_SIZE, Self::ANCHOR_COLOR),
            marker(2, Self::TANGENT_SIZE, Self::TANGENT_COLOR),
        ]
    }
}

const HANDLE_ATTRIBUTES: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
    0 => Float32x3,
    1 => Float32,
    2 => Float32x3,
    3 => Uint32,
];

impl Vertex for HandleRaw {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<HandleRaw>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &HANDLE_ATTRIBUTES,
        }
    }
}

pub fn handle_shader(device: &wgpu::Device) -> wgpu::ShaderModule {
    device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("Handle Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("handle.wgsl").into()),
    })
}

pub fn mk_handle_pipeline(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
    camera_bind_group_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Handle Pipeline Layout"),
        bind_group_layouts: &[camera_bind_group_layout],
        push_constant_ranges: &[],
    });
    mk_render_pipeline(
        device,
        &layout,
        &handle_shader(device),
        &[HandleRaw::desc()],
        PipelineOptions {
            label: "Handle Pipeline",
            color_format: config.format,
            blend: Some(wgpu::BlendState::REPLACE),
            depth: Some(DepthOptions {
                format: Texture::DEPTH_FORMAT,
                write: true,
                compare: wgpu::CompareFunction::LessEqual,
            }),
            topology: wgpu::PrimitiveTopology::TriangleList,
            cull_mode: None,
            fs_entry: "fs_main",
        },
    )
}
