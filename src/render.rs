//! Render composition.
//!
//! The scene never talks to the GPU directly. Every frame it produces a
//! [`Frame`]: the camera matrices plus an ordered list of [`Render`] commands.
//! The backend batches the commands per pipeline; the order inside the list is
//! the hierarchy order, which also defines the pick IDs of control handles.

use cgmath::{Matrix4, Point3, SquareMatrix};

use crate::{
    data_structures::{
        bounds::Aabb,
        component::{ComponentId, MeshHandle, Shading},
        instance::{LineVertex, ModelRaw},
    },
    pipelines::handle::HandleRaw,
};

/// Specifies what has to be drawn and where.
///
/// # Variants
///
/// - `Skybox` draws the environment cube map behind everything
/// - `Mesh` draws a backend-owned mesh with one of the shading programs
/// - `Wireframe` draws the 12 edges of a bounding box
/// - `Curve` draws the last uploaded polyline of a bezier curve
/// - `Handle` draws the three points of a control handle, pickable by ID
#[derive(Debug, Clone, PartialEq)]
pub enum Render<'a> {
    Skybox,
    Mesh {
        mesh: MeshHandle,
        shading: Shading,
        model: Matrix4<f32>,
    },
    Wireframe {
        bounds: Aabb,
        model: Matrix4<f32>,
    },
    Curve {
        component: ComponentId,
        revision: u64,
        vertices: &'a [Point3<f32>],
        model: Matrix4<f32>,
    },
    Handle {
        points: [Point3<f32>; 3],
        /// ID of the first point, the other two follow consecutively.
        base_id: u32,
    },
}

/// Everything the backend needs to draw one frame.
#[derive(Debug, Clone)]
pub struct Frame<'a> {
    pub projection: Matrix4<f32>,
    pub view: Matrix4<f32>,
    pub eye: Point3<f32>,
    pub renders: Vec<Render<'a>>,
}

impl Frame<'_> {
    pub fn view_projection(&self) -> Matrix4<f32> {
        self.projection * self.view
    }

    /// All handle commands in draw order.
    pub fn handles(&self) -> impl Iterator<Item = ([Point3<f32>; 3], u32)> + '_ {
        self.renders.iter().filter_map(|render| match render {
            Render::Handle { points, base_id } => Some((*points, *base_id)),
            _ => None,
        })
    }
}

/// CPU-side draw data of one frame, sorted by pipeline.
///
/// Meshes are grouped per shading program and mesh so each group becomes one
/// instanced draw call. Curves, handle bars and wireframes all end up in one
/// world-space line list.
#[derive(Debug, Default)]
pub struct Batches {
    pub skybox: bool,
    pub meshes: Vec<MeshBatch>,
    pub lines: Vec<LineVertex>,
    pub handles: Vec<HandleRaw>,
}

#[derive(Debug)]
pub struct MeshBatch {
    pub shading: Shading,
    pub mesh: MeshHandle,
    pub instances: Vec<ModelRaw>,
}

impl Batches {
    pub fn from_frame(frame: &Frame<'_>) -> Self {
        let mut batches = Self::default();
        for render in &frame.renders {
            match render {
                Render::Skybox => batches.skybox = true,
                Render::Mesh {
                    mesh,
                    shading,
                    model,
                } => batches.push_mesh(*shading, *mesh, model),
                Render::Wireframe { bounds, model } => batches.lines.extend(
                    LineVertex::box_edges(bounds, model, LineVertex::WIREFRAME),
                ),
                Render::Curve {
                    vertices, model, ..
                } => batches
                    .lines
                    .extend(LineVertex::polyline(vertices, model, LineVertex::CURVE)),
                Render::Handle { points, base_id } => {
                    batches.lines.extend(LineVertex::polyline(
                        points,
                        &Matrix4::identity(),
                        LineVertex::HANDLE,
                    ));
                    batches
                        .handles
                        .extend(HandleRaw::from_handle(points, *base_id));
                }
            }
        }
        batches
    }

    fn push_mesh(&mut self, shading: Shading, mesh: MeshHandle, model: &Matrix4<f32>) {
        let instance = ModelRaw::new(model);
        match self
            .meshes
            .iter_mut()
            .find(|batch| batch.shading == shading && batch.mesh == mesh)
        {
            Some(batch) => batch.instances.push(instance),
            None => self.meshes.push(MeshBatch {
                shading,
                mesh,
                instances: vec![instance],
            }),
        }
    }
}
