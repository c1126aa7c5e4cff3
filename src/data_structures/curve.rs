//! Closed piecewise-cubic Bezier curves and their editable control handles.
//!
//! Control points are laid out as `[anchor, handle, handle, anchor, handle, handle, ...]`
//! and the last segment wraps around to the first anchor, so a curve with `3k`
//! points has exactly `k` cubic segments and no open ends.

use cgmath::{EuclideanSpace, Point3, Vector3};

use crate::error::CurveError;

/// Number of line vertices generated per segment when uploading.
pub const SAMPLES_PER_SEGMENT: usize = 24;

#[derive(Debug, Clone)]
pub struct BezierCurve {
    control_points: Vec<Point3<f32>>,
    uploaded: Vec<Point3<f32>>,
    revision: u64,
}

impl BezierCurve {
    pub fn new(control_points: Vec<Point3<f32>>) -> Result<Self, CurveError> {
        if control_points.len() % 3 != 0 {
            return Err(CurveError::PointCount(control_points.len()));
        }
        Ok(Self {
            control_points,
            uploaded: Vec::new(),
            revision: 0,
        })
    }

    /// `3 * segments` points evenly spread on a circle in the xz-plane,
    /// alternating between y = -1 and y = +1.
    pub fn circle(segments: usize, radius: f32) -> Self {
        let n = 3 * segments;
        let control_points = (0..n)
            .map(|i| {
                let theta = 2.0 * std::f32::consts::PI / n as f32 * i as f32;
                let y = if i % 2 == 1 { 1.0 } else { -1.0 };
                Point3::new(radius * theta.cos(), y, radius * theta.sin())
            })
            .collect();
        Self {
            control_points,
            uploaded: Vec::new(),
            revision: 0,
        }
    }

    pub fn control_points(&self) -> &[Point3<f32>] {
        &self.control_points
    }

    pub fn len(&self) -> usize {
        self.control_points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.control_points.is_empty()
    }

    pub fn segments(&self) -> usize {
        self.control_points.len() / 3
    }

    /// Point `i` with wraparound.
    pub fn point(&self, i: usize) -> Option<Point3<f32>> {
        if self.control_points.is_empty() {
            return None;
        }
        Some(self.control_points[i % self.control_points.len()])
    }

    fn segment(&self, t: f32) -> Option<([Point3<f32>; 4], f32)> {
        let k = self.segments();
        if k == 0 || !t.is_finite() {
            return None;
        }
        let floor = t.floor();
        let u = t - floor;
        let s = (floor as i64).rem_euclid(k as i64) as usize;
        let n = self.control_points.len();
        let p = [
            self.control_points[3 * s],
            self.control_points[3 * s + 1],
            self.control_points[3 * s + 2],
            self.control_points[(3 * s + 3) % n],
        ];
        Some((p, u))
    }

    /// Position at path parameter `t`; integer values land exactly on anchors.
    pub fn evaluate(&self, t: f32) -> Option<Point3<f32>> {
        let (p, u) = self.segment(t)?;
        if u == 0.0 {
            return Some(p[0]);
        }
        let v = 1.0 - u;
        let b = [v * v * v, 3.0 * v * v * u, 3.0 * v * u * u, u * u * u];
        let sum = p[0].to_vec() * b[0]
            + p[1].to_vec() * b[1]
            + p[2].to_vec() * b[2]
            + p[3].to_vec() * b[3];
        Some(Point3::from_vec(sum))
    }

    /// First derivative of the blend at `t` (not normalized).
    pub fn tangent(&self, t: f32) -> Option<Vector3<f32>> {
        let (p, u) = self.segment(t)?;
        let v = 1.0 - u;
        Some(
            (p[1] - p[0]) * (3.0 * v * v)
                + (p[2] - p[1]) * (6.0 * v * u)
                + (p[3] - p[2]) * (3.0 * u * u),
        )
    }

    /// Snapshot the current control points as a closed polyline for drawing.
    ///
    /// Draws only ever see the last uploaded snapshot, so this has to run after
    /// every edit.
    pub fn upload(&mut self) {
        let k = self.segments();
        self.uploaded = (0..k * SAMPLES_PER_SEGMENT)
            .filter_map(|i| self.evaluate(i as f32 / SAMPLES_PER_SEGMENT as f32))
            .collect();
        if let Some(first) = self.uploaded.first().copied() {
            self.uploaded.push(first);
        }
        self.revision += 1;
        log::debug!(
            "uploaded bezier curve revision {} ({} vertices)",
            self.revision,
            self.uploaded.len()
        );
    }

    pub fn uploaded(&self) -> &[Point3<f32>] {
        &self.uploaded
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// One handle per segment, each grouping an anchor with its two tangents.
    pub fn handles(&self) -> Vec<ControlPointHandle> {
        let n = self.control_points.len();
        (0..self.segments())
            .map(|group| ControlPointHandle {
                group,
                indices: [(3 * group + 2) % n, (3 * group + 3) % n, (3 * group + 4) % n],
            })
            .collect()
    }
}

/// Three control points around one anchor: incoming tangent, anchor, outgoing tangent.
///
/// The handle only stores indices; reads and writes always go through the curve,
/// so edits are visible to every other reader of the same curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlPointHandle {
    group: usize,
    indices: [usize; 3],
}

impl ControlPointHandle {
    pub const INCOMING: usize = 0;
    pub const ANCHOR: usize = 1;
    pub const OUTGOING: usize = 2;

    pub fn group(&self) -> usize {
        self.group
    }

    pub fn indices(&self) -> [usize; 3] {
        self.indices
    }

    pub fn get(&self, curve: &BezierCurve, i: usize) -> Option<Point3<f32>> {
        let index = *self.indices.get(i)?;
        curve.control_points.get(index).copied()
    }

    pub fn set(&self, curve: &mut BezierCurve, i: usize, point: Point3<f32>) -> bool {
        let Some(&index) = self.indices.get(i) else {
            return false;
        };
        match curve.control_points.get_mut(index) {
            Some(slot) => {
                *slot = point;
                true
            }
            None => false,
        }
    }

    /// All three points, `None` if the handle no longer fits the curve.
    pub fn points(&self, curve: &BezierCurve) -> Option<[Point3<f32>; 3]> {
        Some([self.get(curve, 0)?, self.get(curve, 1)?, self.get(curve, 2)?])
    }
}
