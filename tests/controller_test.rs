use bezier_flow::controller::FreeFlying;
use cgmath::{
    Deg, EuclideanSpace, InnerSpace, Matrix4, Point3, SquareMatrix, Transform, Vector3, Zero,
};

use crate::common::test_utils::{EPSILON, assert_matrix_eq, assert_point_eq, assert_vector_eq};

mod common;

fn position(model: &Matrix4<f32>) -> Point3<f32> {
    model.transform_point(Point3::origin())
}

#[test]
fn opposing_flags_cancel() {
    let mut controller = FreeFlying::new(10.0, 1.0);
    controller.forward = true;
    controller.backward = true;
    controller.left = true;
    controller.right = true;
    assert_eq!(controller.direction(), Vector3::zero());

    let mut model = Matrix4::identity();
    controller.update(&mut model, 1.0);
    assert_matrix_eq(&model, &Matrix4::identity(), 0.0);

    controller.up = true;
    controller.update(&mut model, 0.5);
    assert_point_eq(position(&model), Point3::new(0.0, 5.0, 0.0), EPSILON);
}

#[test]
fn local_and_world_movement() {
    let turned = Matrix4::from_angle_y(Deg(90.0));
    let mut controller = FreeFlying::new(10.0, 1.0);
    controller.forward = true;

    // Forward follows the transform's own -Z axis, which now points along world -X.
    let mut local = turned;
    controller.update(&mut local, 0.1);
    assert_point_eq(position(&local), Point3::new(-1.0, 0.0, 0.0), EPSILON);

    controller.local = false;
    let mut world = turned;
    controller.update(&mut world, 0.1);
    assert_point_eq(position(&world), Point3::new(0.0, 0.0, -1.0), EPSILON);
}

#[test]
fn diagonal_movement_keeps_the_speed() {
    let mut controller = FreeFlying::new(10.0, 1.0);
    controller.forward = true;
    controller.right = true;
    let mut model = Matrix4::identity();
    controller.update(&mut model, 1.0);
    assert!((position(&model).to_vec().magnitude() - 10.0).abs() < EPSILON);
}

#[test]
fn rotation_turns_the_initial_direction_onto_the_current_one() {
    let mut controller = FreeFlying::default();
    let mut model = Matrix4::identity();
    let from = Vector3::new(0.0, 0.0, -1.0);
    let to = Vector3::new(0.3, 0.1, -1.0).normalize();

    // Not started: nothing happens.
    controller.rotate(&mut model, to);
    assert_matrix_eq(&model, &Matrix4::identity(), 0.0);

    controller.start_rotate(from);
    assert!(controller.is_rotating());
    controller.rotate(&mut model, from);
    assert_matrix_eq(&model, &Matrix4::identity(), 0.0);

    controller.rotate(&mut model, to);
    assert_vector_eq(model.transform_vector(from), to, EPSILON);

    controller.stop_rotate();
    let before = model;
    controller.rotate(&mut model, from);
    assert_matrix_eq(&model, &before, 0.0);
}

#[test]
fn cursor_directions() {
    let projection = cgmath::perspective(Deg(60.0), 800.0 / 600.0, 1.0, 1000.0);

    let center = FreeFlying::window_coord_to_cam_dir(400.0, 300.0, 800, 600, &projection).unwrap();
    assert_vector_eq(center, Vector3::new(0.0, 0.0, -1.0), EPSILON);

    let top_left = FreeFlying::window_coord_to_cam_dir(0.0, 0.0, 800, 600, &projection).unwrap();
    assert!(top_left.x < 0.0 && top_left.y > 0.0 && top_left.z < 0.0);
    assert!((top_left.magnitude() - 1.0).abs() < EPSILON);

    assert!(FreeFlying::window_coord_to_cam_dir(0.0, 0.0, 0, 600, &projection).is_none());
}
