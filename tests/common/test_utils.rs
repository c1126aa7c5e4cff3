#![allow(dead_code)]

use bezier_flow::{
    config::ViewerConfig,
    data_structures::{
        bounds::Aabb,
        component::{MeshAsset, MeshHandle},
    },
    pick::PixelReader,
    robot::RobotParts,
    viewer::SceneAssets,
};
use cgmath::{Matrix4, Point3, Vector3};

pub const EPSILON: f32 = 1e-4;

pub fn assert_matrix_eq(actual: &Matrix4<f32>, expected: &Matrix4<f32>, eps: f32) {
    let a: &[[f32; 4]; 4] = actual.as_ref();
    let e: &[[f32; 4]; 4] = expected.as_ref();
    for col in 0..4 {
        for row in 0..4 {
            assert!(
                (a[col][row] - e[col][row]).abs() <= eps,
                "matrices differ at column {} row {}:\n{:?}\n!=\n{:?}",
                col,
                row,
                actual,
                expected
            );
        }
    }
}

pub fn assert_point_eq(actual: Point3<f32>, expected: Point3<f32>, eps: f32) {
    assert!(
        (actual.x - expected.x).abs() <= eps
            && (actual.y - expected.y).abs() <= eps
            && (actual.z - expected.z).abs() <= eps,
        "{:?} != {:?}",
        actual,
        expected
    );
}

pub fn assert_vector_eq(actual: Vector3<f32>, expected: Vector3<f32>, eps: f32) {
    assert_point_eq(
        Point3::new(actual.x, actual.y, actual.z),
        Point3::new(expected.x, expected.y, expected.z),
        eps,
    );
}

/// Pixel reader that answers every read with the same ID and records where it was asked.
pub struct FixedPixels {
    pub id: u32,
    pub reads: Vec<(u32, u32)>,
}

impl FixedPixels {
    pub fn new(id: u32) -> Self {
        Self {
            id,
            reads: Vec::new(),
        }
    }
}

impl PixelReader for FixedPixels {
    fn read_pixel_id(&mut self, x: u32, y: u32) -> u32 {
        self.reads.push((x, y));
        self.id
    }
}

pub fn unit_box() -> Aabb {
    Aabb::new(Point3::new(-1.0, -1.0, -1.0), Point3::new(1.0, 1.0, 1.0))
}

pub fn mesh_asset(index: usize) -> MeshAsset {
    MeshAsset {
        mesh: MeshHandle(index),
        bounds: unit_box(),
    }
}

pub fn robot_parts() -> RobotParts {
    RobotParts {
        antenna: mesh_asset(1),
        eyeball: mesh_asset(2),
        head: mesh_asset(3),
        limb: mesh_asset(4),
        body: mesh_asset(5),
    }
}

pub fn scene_assets() -> SceneAssets {
    SceneAssets {
        mover: Some(mesh_asset(0)),
        robot: Some(robot_parts()),
    }
}

/// Default viewer settings on an 800x600 window. Nothing in here touches the disk.
pub fn test_config() -> ViewerConfig {
    ViewerConfig {
        width: 800,
        height: 600,
        ..ViewerConfig::default()
    }
}
