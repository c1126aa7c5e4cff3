//! Control point picking.
//!
//! Every control point drawn by a handle gets a small positive ID; 0 means
//! "nothing". The GPU backend renders the handles into an offscreen `R32Uint`
//! texture and reads back the texel under the cursor. Dragging a picked point
//! needs the other half: projecting it to window space to keep its depth and
//! unprojecting the cursor at that depth.
//!
//! Window coordinates follow the OpenGL convention (origin bottom-left,
//! depth in `[0, 1]`), cursor coordinates the windowing one (origin top-left).

use std::iter;

use cgmath::{Matrix4, Point3, SquareMatrix, Vector4};
use wgpu::util::DeviceExt;

use crate::{context::Context, pipelines::handle::HandleRaw};

/// ID of point `i` (0..3) of handle `group`.
pub fn pick_id(group: usize, i: usize) -> u32 {
    (3 * group + i + 1) as u32
}

/// Inverse of [`pick_id`]; `None` for the background ID 0.
pub fn decode_pick_id(id: u32) -> Option<(usize, usize)> {
    let zero_based = (id as usize).checked_sub(1)?;
    Some((zero_based / 3, zero_based % 3))
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: width as f32,
            height: height as f32,
        }
    }
}

/// Object coordinates to window coordinates.
pub fn project(
    obj: Point3<f32>,
    view: &Matrix4<f32>,
    projection: &Matrix4<f32>,
    viewport: &Viewport,
) -> Option<Point3<f32>> {
    let clip = projection * view * Vector4::new(obj.x, obj.y, obj.z, 1.0);
    if clip.w.abs() < f32::EPSILON {
        return None;
    }
    let ndc = clip / clip.w;
    Some(Point3::new(
        (ndc.x * 0.5 + 0.5) * viewport.width + viewport.x,
        (ndc.y * 0.5 + 0.5) * viewport.height + viewport.y,
        ndc.z * 0.5 + 0.5,
    ))
}

/// Window coordinates back to object coordinates.
pub fn unproject(
    win: Point3<f32>,
    view: &Matrix4<f32>,
    projection: &Matrix4<f32>,
    viewport: &Viewport,
) -> Option<Point3<f32>> {
    if viewport.width == 0.0 || viewport.height == 0.0 {
        return None;
    }
    let inverse = (projection * view).invert()?;
    let ndc = Vector4::new(
        (win.x - viewport.x) / viewport.width * 2.0 - 1.0,
        (win.y - viewport.y) / viewport.height * 2.0 - 1.0,
        win.z * 2.0 - 1.0,
        1.0,
    );
    let obj = inverse * ndc;
    if obj.w.abs() < f32::EPSILON {
        return None;
    }
    Some(Point3::new(obj.x / obj.w, obj.y / obj.w, obj.z / obj.w))
}

/// Source of the pick ID under a cursor position (top-left origin, physical pixels).
pub trait PixelReader {
    fn read_pixel_id(&mut self, x: u32, y: u32) -> u32;
}

/// Reads pick IDs by rendering control handles into an offscreen ID texture.
pub struct GpuPixelReader<'a> {
    ctx: &'a Context,
    async_runtime: &'a tokio::runtime::Runtime,
    handles: Vec<HandleRaw>,
}

impl<'a> GpuPixelReader<'a> {
    pub fn new(
        ctx: &'a Context,
        async_runtime: &'a tokio::runtime::Runtime,
        handles: Vec<HandleRaw>,
    ) -> Self {
        Self {
            ctx,
            async_runtime,
            handles,
        }
    }
}

impl PixelReader for GpuPixelReader<'_> {
    fn read_pixel_id(&mut self, x: u32, y: u32) -> u32 {
        match draw_to_pick_buffer(self.async_runtime, self.ctx, &self.handles, x, y) {
            Ok(id) => id,
            Err(e) => {
                log::error!("Picking failed: {}", e);
                0
            }
        }
    }
}

/// Render all handles with their IDs and return the ID at `(x, y)`.
pub fn draw_to_pick_buffer(
    async_runtime: &tokio::runtime::Runtime,
    ctx: &Context,
    handles: &[HandleRaw],
    x: u32,
    y: u32,
) -> anyhow::Result<u32> {
    let width = ctx.config.width;
    let height = ctx.config.height;
    if x >= width || y >= height || handles.is_empty() {
        return Ok(0);
    }

    let extent3d = wgpu::Extent3d {
        width,
        height,
        depth_or_array_layers: 1,
    };

    let pick_texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Pick texture"),
        size: extent3d,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::R32Uint,
        usage: wgpu::TextureUsages::COPY_SRC | wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });

    let pick_depth_texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Pick depth texture"),
        size: extent3d,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Depth24Plus,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });

    let instances = ctx
        .device
        .create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Pick handle instances"),
            contents: bytemuck::cast_slice(handles),
            usage: wgpu::BufferUsages::VERTEX,
        });

    let mut encoder = ctx
        .device
        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Pick Encoder"),
        });

    {
        let pick_view = pick_texture.create_view(&wgpu::TextureViewDescriptor::default());
        let depth_view = pick_depth_texture.create_view(&wgpu::TextureViewDescriptor::default());
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Pick Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &pick_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            occlusion_query_set: None,
            timestamp_writes: None,
        });

        render_pass.set_pipeline(&ctx.pipelines.pick);
        render_pass.set_bind_group(0, &ctx.camera.bind_group, &[]);
        render_pass.set_vertex_buffer(0, instances.slice(..));
        render_pass.draw(0..6, 0..handles.len() as u32);
    }

    // A single texel is copied, but rows still have to be padded to the copy alignment.
    let bytes_per_row = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    let output_buffer = ctx.device.create_buffer(&wgpu::BufferDescriptor {
        size: u64::from(bytes_per_row),
        usage: wgpu::BufferUsages::COPY_DST
                    // this tells wpgu that we want to read this buffer from the cpu
                    | wgpu::BufferUsages::MAP_READ,
        label: Some("Pick output buffer"),
        mapped_at_creation: false,
    });

    encoder.copy_texture_to_buffer(
        wgpu::TexelCopyTextureInfo {
            aspect: wgpu::TextureAspect::All,
            texture: &pick_texture,
            mip_level: 0,
            origin: wgpu::Origin3d { x, y, z: 0 },
        },
        wgpu::TexelCopyBufferInfo {
            buffer: &output_buffer,
            layout: wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(bytes_per_row),
                rows_per_image: Some(1),
            },
        },
        wgpu::Extent3d {
            width: 1,
            height: 1,
            depth_or_array_layers: 1,
        },
    );

    ctx.queue.submit(iter::once(encoder.finish()));

    let buffer_slice = output_buffer.slice(..);
    let id = async_runtime.block_on(read_texel(buffer_slice, &ctx.device))?;
    output_buffer.unmap();
    log::info!("Picked id {} at ({}, {})", id, x, y);
    Ok(id)
}

async fn read_texel(buffer_slice: wgpu::BufferSlice<'_>, device: &wgpu::Device) -> anyhow::Result<u32> {
    // NOTE: map first, then poll, then await. Otherwise the future never resolves.
    let (tx, rx) = futures_intrusive::channel::shared::oneshot_channel();
    buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
        let _ = tx.send(result);
    });
    device.poll(wgpu::PollType::Wait)?;
    rx.receive()
        .await
        .ok_or_else(|| anyhow::anyhow!("pick buffer mapping was cancelled"))??;

    let data = buffer_slice.get_mapped_range();
    let id = u32::from_le_bytes([data[0], data[1], data[2], data[3]]);
    Ok(id)
}
