//! Drawable / updatable components that can be attached to scene nodes.
//!
//! The set of component kinds is closed, so dispatch is a plain `match`
//! instead of trait objects.

use cgmath::Matrix4;

use crate::{
    animation::{ConstraintAnimator, LimbSwing},
    data_structures::{bounds::Aabb, curve::BezierCurve},
    render::Render,
};

/// Opaque reference to a mesh owned by the render backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshHandle(pub usize);

/// Shading programs a mesh can be drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shading {
    NormalColoring,
    ReflectionMap,
}

impl Shading {
    pub fn swapped(self) -> Self {
        match self {
            Shading::NormalColoring => Shading::ReflectionMap,
            Shading::ReflectionMap => Shading::NormalColoring,
        }
    }
}

/// A loaded mesh together with its object-space bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshAsset {
    pub mesh: MeshHandle,
    pub bounds: Aabb,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshComponent {
    pub mesh: MeshHandle,
    pub shading: Shading,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(pub(crate) usize);

impl ComponentId {
    pub fn index(&self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
pub enum Component {
    Mesh(MeshComponent),
    Wireframe(Aabb),
    Bezier(BezierCurve),
    Animator(ConstraintAnimator),
    LimbSwing(LimbSwing),
}

impl Component {
    /// Draw command for this component placed at `world`, if it draws anything.
    pub fn render(&self, id: ComponentId, world: Matrix4<f32>) -> Option<Render<'_>> {
        match self {
            Component::Mesh(mesh) => Some(Render::Mesh {
                mesh: mesh.mesh,
                shading: mesh.shading,
                model: world,
            }),
            Component::Wireframe(bounds) => Some(Render::Wireframe {
                bounds: *bounds,
                model: world,
            }),
            Component::Bezier(curve) => Some(Render::Curve {
                component: id,
                revision: curve.revision(),
                vertices: curve.uploaded(),
                model: world,
            }),
            Component::Animator(_) | Component::LimbSwing(_) => None,
        }
    }

    pub fn as_curve(&self) -> Option<&BezierCurve> {
        match self {
            Component::Bezier(curve) => Some(curve),
            _ => None,
        }
    }

    pub fn as_curve_mut(&mut self) -> Option<&mut BezierCurve> {
        match self {
            Component::Bezier(curve) => Some(curve),
            _ => None,
        }
    }
}
