//! Axis-aligned bounding boxes and view-frustum tests.
//!
//! Bounds are stored in a node's local space and transformed on demand, so
//! animated hierarchies never carry stale world boxes.

use cgmath::{Matrix, Matrix4, Point3, Transform, Vector4};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Point3<f32>,
    pub max: Point3<f32>,
}

impl Aabb {
    pub fn new(min: Point3<f32>, max: Point3<f32>) -> Self {
        Self { min, max }
    }

    /// Smallest box around `points`, `None` when there are no points.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Point3<f32>>,
    {
        let mut points = points.into_iter();
        let first = points.next()?;
        let (min, max) = points.fold((first, first), |(min, max), p| {
            (
                Point3::new(min.x.min(p.x), min.y.min(p.y), min.z.min(p.z)),
                Point3::new(max.x.max(p.x), max.y.max(p.y), max.z.max(p.z)),
            )
        });
        Some(Self { min, max })
    }

    pub fn corners(&self) -> [Point3<f32>; 8] {
        let (a, b) = (self.min, self.max);
        [
            Point3::new(a.x, a.y, a.z),
            Point3::new(b.x, a.y, a.z),
            Point3::new(b.x, b.y, a.z),
            Point3::new(a.x, b.y, a.z),
            Point3::new(a.x, a.y, b.z),
            Point3::new(b.x, a.y, b.z),
            Point3::new(b.x, b.y, b.z),
            Point3::new(a.x, b.y, b.z),
        ]
    }

    /// The 12 box edges as index pairs into [`Aabb::corners`].
    pub const EDGES: [(usize, usize); 12] = [
        (0, 1),
        (1, 2),
        (2, 3),
        (3, 0),
        (4, 5),
        (5, 6),
        (6, 7),
        (7, 4),
        (0, 4),
        (1, 5),
        (2, 6),
        (3, 7),
    ];

    /// Axis-aligned box around this box placed by `model`.
    pub fn transformed(&self, model: &Matrix4<f32>) -> Aabb {
        let corners = self.corners().map(|c| model.transform_point(c));
        corners[1..]
            .iter()
            .fold(Aabb::new(corners[0], corners[0]), |bounds, &p| {
                bounds.merge(&Aabb::new(p, p))
            })
    }

    /// Union of this box with another.
    pub fn merge(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: Point3::new(
                self.min.x.min(other.min.x),
                self.min.y.min(other.min.y),
                self.min.z.min(other.min.z),
            ),
            max: Point3::new(
                self.max.x.max(other.max.x),
                self.max.y.max(other.max.y),
                self.max.z.max(other.max.z),
            ),
        }
    }
}

/// The six clip planes of a view-projection matrix (OpenGL depth range).
///
/// Planes are stored as `(a, b, c, d)` with the inside satisfying
/// `a*x + b*y + c*z + d >= 0`.
#[derive(Debug, Clone, Copy)]
pub struct Frustum {
    planes: [Vector4<f32>; 6],
}

impl Frustum {
    pub fn from_view_projection(m: &Matrix4<f32>) -> Self {
        let r0 = m.row(0);
        let r1 = m.row(1);
        let r2 = m.row(2);
        let r3 = m.row(3);
        Self {
            planes: [r3 + r0, r3 - r0, r3 + r1, r3 - r1, r3 + r2, r3 - r2],
        }
    }

    /// True when the box, placed by `world`, lies completely outside at least one plane.
    ///
    /// This is conservative: boxes straddling a frustum corner are kept.
    pub fn excludes(&self, aabb: &Aabb, world: &Matrix4<f32>) -> bool {
        let world = *world;
        let corners = aabb
            .corners()
            .map(|c| world * Vector4::new(c.x, c.y, c.z, 1.0));
        self.planes.iter().any(|plane| {
            corners.iter().all(|c| {
                plane.x * c.x + plane.y * c.y + plane.z * c.z + plane.w * c.w < 0.0
            })
        })
    }
}
