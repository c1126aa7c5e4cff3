//! Camera attached to a scene node.
//!
//! The camera does not own its transform: it points at a node whose model
//! matrix is driven by a controller. View matrix and eye position are derived
//! from the node's world matrix every frame in [`Camera::setup`].

use cgmath::{EuclideanSpace, Matrix4, Point3, Rad, SquareMatrix};

use crate::data_structures::scene_graph::{NodeId, Scene};

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

/// Perspective projection parameters, kept so resizing only changes the aspect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Perspective {
    pub fovy: Rad<f32>,
    pub aspect: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Perspective {
    pub fn new<F: Into<Rad<f32>>>(fovy: F, width: u32, height: u32, znear: f32, zfar: f32) -> Self {
        Self {
            fovy: fovy.into(),
            aspect: width.max(1) as f32 / height.max(1) as f32,
            znear,
            zfar,
        }
    }

    /// OpenGL-style projection (clip depth in [-1, 1]).
    pub fn matrix(&self) -> Matrix4<f32> {
        cgmath::perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }
}

#[derive(Debug, Clone)]
pub struct Camera {
    node: NodeId,
    perspective: Perspective,
    pub projection: Matrix4<f32>,
    pub view: Matrix4<f32>,
    pub eye: Point3<f32>,
}

impl Camera {
    pub fn new(node: NodeId, perspective: Perspective) -> Self {
        Self {
            node,
            perspective,
            projection: perspective.matrix(),
            view: Matrix4::identity(),
            eye: Point3::origin(),
        }
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn perspective(&self) -> &Perspective {
        &self.perspective
    }

    /// Recompute `view` and `eye` from the camera node's world matrix.
    pub fn setup(&mut self, scene: &Scene) {
        let Some(world) = scene.world_matrix(self.node) else {
            log::warn!("Camera node {:?} is not part of the scene", self.node);
            return;
        };
        match world.invert() {
            Some(view) => {
                self.view = view;
                self.eye = Point3::new(world.w.x, world.w.y, world.w.z);
            }
            None => log::warn!("Camera world matrix is singular, keeping the previous view"),
        }
    }

    /// Adapt the aspect ratio to a new viewport. Zero-sized viewports are ignored.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 {
            return false;
        }
        self.perspective.aspect = width as f32 / height as f32;
        self.projection = self.perspective.matrix();
        true
    }

    pub fn view_projection(&self) -> Matrix4<f32> {
        self.projection * self.view
    }
}

/// Camera data as laid out in the shaders' uniform buffer.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    /// The eye position in homogeneous coordinates to satisfy 16 byte alignment.
    pub view_position: [f32; 4],
    pub view_proj: [[f32; 4]; 4],
    /// Inverse of the rotation-only view projection, used to shoot skybox rays.
    pub inv_view_proj_sky: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn new() -> Self {
        Self {
            view_position: [0.0; 4],
            view_proj: Matrix4::identity().into(),
            inv_view_proj_sky: Matrix4::identity().into(),
        }
    }

    pub fn update_view_proj(&mut self, view: &Matrix4<f32>, projection: &Matrix4<f32>, eye: Point3<f32>) {
        self.view_position = eye.to_homogeneous().into();
        self.view_proj = (OPENGL_TO_WGPU_MATRIX * projection * view).into();
        let mut rotation_only = *view;
        rotation_only.w = cgmath::Vector4::new(0.0, 0.0, 0.0, 1.0);
        let sky = OPENGL_TO_WGPU_MATRIX * projection * rotation_only;
        self.inv_view_proj_sky = sky.invert().unwrap_or(Matrix4::identity()).into();
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}
