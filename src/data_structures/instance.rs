//! Per-draw data for GPU rendering.
//!
//! Mesh draws are batched per mesh: every scene node drawing the same mesh
//! contributes one [`ModelRaw`] to an instance buffer. Lines are expanded on
//! the CPU into world-space [`LineVertex`] pairs.

use cgmath::{EuclideanSpace, Matrix, Matrix3, Matrix4, Point3, SquareMatrix, Transform};

use crate::data_structures::{bounds::Aabb, model};

/**
 * The raw instance is the actual data stored on the GPU
 */
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ModelRaw {
    model: [[f32; 4]; 4],
    normal: [[f32; 3]; 3],
}

impl ModelRaw {
    /// Model matrix plus the normal matrix (inverse transpose of its upper 3x3).
    pub fn new(model: &Matrix4<f32>) -> Self {
        let linear = Matrix3::from_cols(model.x.truncate(), model.y.truncate(), model.z.truncate());
        let normal = linear
            .invert()
            .map(|inverse| inverse.transpose())
            .unwrap_or(linear);
        Self {
            model: (*model).into(),
            normal: normal.into(),
        }
    }
}

/// A mat4 takes up 4 vertex slots as it is technically 4 vec4s, the normal
/// matrix another 3. Locations start after the mesh vertex attributes.
const MODEL_ATTRIBUTES: [wgpu::VertexAttribute; 7] = wgpu::vertex_attr_array![
    5 => Float32x4,
    6 => Float32x4,
    7 => Float32x4,
    8 => Float32x4,
    9 => Float32x3,
    10 => Float32x3,
    11 => Float32x3,
];

impl model::Vertex for ModelRaw {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<ModelRaw>() as wgpu::BufferAddress,
            // One model per instance, not per vertex
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &MODEL_ATTRIBUTES,
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LineVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

impl LineVertex {
    pub const CURVE: [f32; 3] = [1.0, 0.85, 0.1];
    pub const HANDLE: [f32; 3] = [0.6, 0.6, 0.6];
    pub const WIREFRAME: [f32; 3] = [0.1, 1.0, 0.3];

    /// Segments of the polyline `points` placed by `model`, as a line list.
    pub fn polyline(points: &[Point3<f32>], model: &Matrix4<f32>, color: [f32; 3]) -> Vec<Self> {
        points
            .windows(2)
            .flat_map(|pair| {
                [
                    Self::at(model.transform_point(pair[0]), color),
                    Self::at(model.transform_point(pair[1]), color),
                ]
            })
            .collect()
    }

    /// The 12 edges of `bounds` placed by `model`, as a line list.
    pub fn box_edges(bounds: &Aabb, model: &Matrix4<f32>, color: [f32; 3]) -> Vec<Self> {
        let corners = bounds.corners().map(|c| model.transform_point(c));
        Aabb::EDGES
            .iter()
            .flat_map(|&(a, b)| [Self::at(corners[a], color), Self::at(corners[b], color)])
            .collect()
    }

    fn at(point: Point3<f32>, color: [f32; 3]) -> Self {
        Self {
            position: point.to_vec().into(),
            color,
        }
    }
}

const LINE_ATTRIBUTES: [wgpu::VertexAttribute; 2] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

impl model::Vertex for LineVertex {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<LineVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &LINE_ATTRIBUTES,
        }
    }
}
