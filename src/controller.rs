//! Free-flying camera controller.
//!
//! Keyboard flags move the controlled transform, a left-button drag turns it
//! toward the cursor. The controller never owns the matrix it drives: the
//! viewer hands it the camera node's model every frame.

use cgmath::{InnerSpace, Matrix4, Rad, SquareMatrix, Vector3, Vector4, Zero};

#[derive(Debug, Clone)]
pub struct FreeFlying {
    pub forward: bool,
    pub left: bool,
    pub backward: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    /// Move along the transform's own axes (`M * T`) instead of the world axes (`T * M`).
    pub local: bool,
    /// Units per second.
    pub speed: f32,
    /// Scale applied to the angle between two cursor directions.
    pub sensitivity: f32,
    rotating: bool,
    initial: Vector3<f32>,
}

impl Default for FreeFlying {
    fn default() -> Self {
        Self::new(10.0, 1.0)
    }
}

impl FreeFlying {
    const MIN_AXIS: f32 = 1e-6;

    pub fn new(speed: f32, sensitivity: f32) -> Self {
        Self {
            forward: false,
            left: false,
            backward: false,
            right: false,
            up: false,
            down: false,
            local: true,
            speed,
            sensitivity,
            rotating: false,
            initial: Vector3::new(0.0, 0.0, -1.0),
        }
    }

    pub fn is_rotating(&self) -> bool {
        self.rotating
    }

    /// Sum of the direction vectors of all active movement flags.
    pub fn direction(&self) -> Vector3<f32> {
        let mut direction = Vector3::zero();
        if self.forward {
            direction -= Vector3::unit_z();
        }
        if self.backward {
            direction += Vector3::unit_z();
        }
        if self.left {
            direction -= Vector3::unit_x();
        }
        if self.right {
            direction += Vector3::unit_x();
        }
        if self.up {
            direction += Vector3::unit_y();
        }
        if self.down {
            direction -= Vector3::unit_y();
        }
        direction
    }

    /// Integrate the movement flags over `dt` seconds.
    pub fn update(&self, model: &mut Matrix4<f32>, dt: f32) {
        let direction = self.direction();
        if direction.magnitude2() < f32::EPSILON || dt <= 0.0 {
            return;
        }
        let translation = Matrix4::from_translation(direction.normalize() * self.speed * dt);
        *model = if self.local {
            *model * translation
        } else {
            translation * *model
        };
    }

    pub fn start_rotate(&mut self, direction: Vector3<f32>) {
        self.initial = direction;
        self.rotating = true;
    }

    /// Turn by the angle between the last and the current cursor direction.
    ///
    /// Only acts between [`FreeFlying::start_rotate`] and [`FreeFlying::stop_rotate`].
    pub fn rotate(&mut self, model: &mut Matrix4<f32>, direction: Vector3<f32>) {
        if !self.rotating {
            return;
        }
        let angle = self.initial.dot(direction).clamp(-1.0, 1.0).acos();
        let axis = self.initial.cross(direction);
        if axis.magnitude() < Self::MIN_AXIS || angle.abs() < f32::EPSILON {
            return;
        }
        let rotation = Matrix4::from_axis_angle(axis.normalize(), Rad(angle * self.sensitivity));
        *model = *model * rotation;
        self.initial = direction;
    }

    pub fn stop_rotate(&mut self) {
        self.rotating = false;
    }

    /// Direction in camera space that passes through pixel `(x, y)` of a
    /// `width` x `height` window, `y` growing downwards.
    pub fn window_coord_to_cam_dir(
        x: f64,
        y: f64,
        width: u32,
        height: u32,
        projection: &Matrix4<f32>,
    ) -> Option<Vector3<f32>> {
        if width == 0 || height == 0 {
            return None;
        }
        let ndc_x = (2.0 * x / f64::from(width) - 1.0) as f32;
        let ndc_y = (1.0 - 2.0 * y / f64::from(height)) as f32;
        let inverse = projection.invert()?;
        let near = inverse * Vector4::new(ndc_x, ndc_y, -1.0, 1.0);
        if near.w.abs() < f32::EPSILON {
            return None;
        }
        let direction = near.truncate() / near.w;
        if direction.magnitude2() < f32::EPSILON {
            return None;
        }
        Some(direction.normalize())
    }
}
