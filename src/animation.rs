//! Per-frame animators that write node transforms.
//!
//! Each animator is the only writer of the nodes it drives. The scene hands
//! them the elapsed time once per frame and stores the returned matrices.

use cgmath::{EuclideanSpace, InnerSpace, Matrix3, Matrix4, Rad, Vector3};

use crate::data_structures::{component::ComponentId, curve::BezierCurve, scene_graph::NodeId};

/// Moves a node along a closed [`BezierCurve`], facing the direction of travel.
#[derive(Debug, Clone)]
pub struct ConstraintAnimator {
    curve: ComponentId,
    control: NodeId,
    /// Path parameter in segments, always in `[0, k)`.
    param: f32,
    /// Segments per second.
    rate: f32,
}

impl ConstraintAnimator {
    const LOOK_AHEAD: f32 = 1e-2;

    pub fn new(curve: ComponentId, control: NodeId, rate: f32) -> Self {
        Self {
            curve,
            control,
            param: 0.0,
            rate,
        }
    }

    pub fn curve(&self) -> ComponentId {
        self.curve
    }

    pub fn control(&self) -> NodeId {
        self.control
    }

    pub fn param(&self) -> f32 {
        self.param
    }

    pub fn rate(&self) -> f32 {
        self.rate
    }

    /// Step the path parameter by `rate * dt` and return the new pose.
    ///
    /// The parameter wraps at the segment count, so the animation loops forever.
    /// Returns `None` for an empty curve.
    pub fn advance(&mut self, dt: f32, curve: &BezierCurve) -> Option<Matrix4<f32>> {
        let k = curve.segments();
        if k == 0 {
            return None;
        }
        let next = self.param + self.rate * dt;
        self.param = if next.is_finite() {
            next.rem_euclid(k as f32)
        } else {
            0.0
        };
        // rem_euclid can round up to exactly k for tiny negative inputs
        if self.param >= k as f32 {
            self.param = 0.0;
        }
        Self::pose_at(self.param, curve)
    }

    /// Translation to the curve point at `t`, rotated so local +Z follows the tangent.
    pub fn pose_at(t: f32, curve: &BezierCurve) -> Option<Matrix4<f32>> {
        let position = curve.evaluate(t)?;
        let mut direction = curve.tangent(t).unwrap_or(Vector3::new(0.0, 0.0, 0.0));
        if direction.magnitude2() < f32::EPSILON {
            let ahead = curve.evaluate(t + Self::LOOK_AHEAD)?;
            direction = ahead - position;
        }
        let rotation = look_along(direction);
        Some(Matrix4::from_translation(position.to_vec()) * Matrix4::from(rotation))
    }
}

/// Rotation mapping +Z onto `direction`, keeping +Y as up where possible.
pub fn look_along(direction: Vector3<f32>) -> Matrix3<f32> {
    if direction.magnitude2() < f32::EPSILON {
        return Matrix3::from_cols(Vector3::unit_x(), Vector3::unit_y(), Vector3::unit_z());
    }
    let forward = direction.normalize();
    let hint = if forward.dot(Vector3::unit_y()).abs() > 0.999 {
        Vector3::unit_x()
    } else {
        Vector3::unit_y()
    };
    let right = hint.cross(forward).normalize();
    let up = forward.cross(right);
    Matrix3::from_cols(right, up, forward)
}

/// Swings two arms and two legs back and forth in opposite phase.
///
/// The angle bounces between `-limit` and `limit`. Arm and leg of one side
/// share the angle, the other side swings in opposite phase.
#[derive(Debug, Clone)]
pub struct LimbSwing {
    pub left_arm: NodeId,
    pub right_arm: NodeId,
    pub left_leg: NodeId,
    pub right_leg: NodeId,
    angle: f32,
    forward: bool,
    rate: f32,
    limit: f32,
}

impl LimbSwing {
    pub fn new(left_arm: NodeId, right_arm: NodeId, left_leg: NodeId, right_leg: NodeId) -> Self {
        Self {
            left_arm,
            right_arm,
            left_leg,
            right_leg,
            angle: 0.0,
            forward: true,
            rate: 1.0,
            limit: std::f32::consts::FRAC_PI_4,
        }
    }

    pub fn with_rate(mut self, rate: f32) -> Self {
        self.rate = rate;
        self
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn limit(&self) -> f32 {
        self.limit
    }

    pub fn advance(&mut self, dt: f32) -> [(NodeId, Matrix4<f32>); 4] {
        let step = self.rate * dt;
        self.angle += if self.forward { step } else { -step };
        if self.angle > self.limit {
            self.angle = self.limit;
            self.forward = false;
        } else if self.angle < -self.limit {
            self.angle = -self.limit;
            self.forward = true;
        }
        let swing = Matrix4::from_angle_x(Rad(self.angle));
        let counter = Matrix4::from_angle_x(Rad(-self.angle));
        [
            (self.left_arm, swing),
            (self.right_arm, counter),
            (self.left_leg, swing),
            (self.right_leg, counter),
        ]
    }
}
