//! Viewer configuration.
//!
//! All values have working defaults; `from_env` only overrides where the
//! assets live. Without `BEZIER_FLOW_ASSETS` the viewer reads the copy the
//! build script bundled, falling back to `./assets`.

use std::path::PathBuf;

use cgmath::{Deg, Point3};

pub const ASSETS_ENV: &str = "BEZIER_FLOW_ASSETS";

/// Asset directory copied by the build script, if the crate had one.
const BUNDLED_ASSETS: Option<&str> = option_env!("BEZIER_FLOW_BUNDLED_ASSETS");

#[derive(Debug, Clone, PartialEq)]
pub struct RobotFiles {
    pub antenna: String,
    pub eyeball: String,
    pub head: String,
    pub limb: String,
    pub body: String,
}

impl Default for RobotFiles {
    fn default() -> Self {
        Self {
            antenna: "meshes/robot/antenna_s.obj".to_string(),
            eyeball: "meshes/robot/eyeball_s.obj".to_string(),
            head: "meshes/robot/head_s.obj".to_string(),
            limb: "meshes/robot/limb_s.obj".to_string(),
            body: "meshes/robot/body_s.obj".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewerConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub fovy: Deg<f32>,
    pub znear: f32,
    pub zfar: f32,
    pub eye: Point3<f32>,
    pub curve_segments: usize,
    pub curve_radius: f32,
    /// Curve segments travelled per second.
    pub animator_rate: f32,
    pub mover_scale: f32,
    pub move_speed: f32,
    pub rotate_sensitivity: f32,
    pub show_robot: bool,
    pub robot_position: Point3<f32>,
    pub cull_on_start: bool,
    pub asset_dir: PathBuf,
    pub mover_mesh: String,
    pub robot: RobotFiles,
    /// Cube map faces in +X, -X, +Y, -Y, +Z, -Z order.
    pub skybox_faces: [String; 6],
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            title: "bezier-flow".to_string(),
            width: 1280,
            height: 720,
            fovy: Deg(60.0),
            znear: 1.0,
            zfar: 1000.0,
            eye: Point3::new(0.0, 0.0, 20.0),
            curve_segments: 8,
            curve_radius: 5.0,
            animator_rate: 1.0,
            mover_scale: 0.2,
            move_speed: 10.0,
            rotate_sensitivity: 1.0,
            show_robot: true,
            robot_position: Point3::new(0.0, 0.0, 0.0),
            cull_on_start: false,
            asset_dir: PathBuf::from(BUNDLED_ASSETS.unwrap_or("assets")),
            mover_mesh: "meshes/bunny.obj".to_string(),
            robot: RobotFiles::default(),
            skybox_faces: [
                "skybox/right.jpg".to_string(),
                "skybox/left.jpg".to_string(),
                "skybox/top.jpg".to_string(),
                "skybox/bottom.jpg".to_string(),
                "skybox/front.jpg".to_string(),
                "skybox/back.jpg".to_string(),
            ],
        }
    }
}

impl ViewerConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(dir) = std::env::var(ASSETS_ENV) {
            log::info!("Loading assets from {}", dir);
            config.asset_dir = PathBuf::from(dir);
        }
        config
    }
}
