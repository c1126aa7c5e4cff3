use bezier_flow::{
    animation::{ConstraintAnimator, LimbSwing, look_along},
    data_structures::{curve::BezierCurve, scene_graph::Scene},
};
use cgmath::{InnerSpace, Matrix3, Matrix4, Point3, Rad, SquareMatrix, Vector3};

use crate::common::test_utils::{EPSILON, assert_matrix_eq, assert_vector_eq};

mod common;

fn animator(scene: &mut Scene) -> ConstraintAnimator {
    let curve = scene.add_component(bezier_flow::data_structures::component::Component::Bezier(
        BezierCurve::circle(4, 5.0),
    ));
    let node = scene.add_node(Matrix4::identity());
    ConstraintAnimator::new(curve, node, 1.0)
}

#[test]
fn parameter_wraps_at_the_segment_count() {
    let mut scene = Scene::new();
    let curve = BezierCurve::circle(4, 5.0);
    let mut animator = animator(&mut scene);

    animator.advance(3.5, &curve).unwrap();
    assert!((animator.param() - 3.5).abs() < EPSILON);
    animator.advance(1.0, &curve).unwrap();
    assert!((animator.param() - 0.5).abs() < EPSILON);
    animator.advance(-1.0, &curve).unwrap();
    assert!((animator.param() - 3.5).abs() < EPSILON);

    for _ in 0..100 {
        animator.advance(0.37, &curve);
        assert!((0.0..4.0).contains(&animator.param()));
    }
}

#[test]
fn empty_curve_produces_no_pose() {
    let mut scene = Scene::new();
    let mut animator = animator(&mut scene);
    let empty = BezierCurve::new(Vec::new()).unwrap();
    assert!(animator.advance(1.0, &empty).is_none());
    assert_eq!(animator.param(), 0.0);
}

#[test]
fn pose_faces_the_direction_of_travel() {
    let curve = BezierCurve::circle(4, 5.0);
    for t in [0.0, 0.3, 1.0, 2.75] {
        let pose = ConstraintAnimator::pose_at(t, &curve).unwrap();
        let position = pose.w.truncate();
        let expected = curve.evaluate(t).unwrap();
        assert_vector_eq(position, Vector3::new(expected.x, expected.y, expected.z), EPSILON);

        let facing = pose.z.truncate();
        let tangent = curve.tangent(t).unwrap().normalize();
        assert_vector_eq(facing, tangent, 1e-3);
    }
}

#[test]
fn zero_tangent_falls_back_to_looking_ahead() {
    // The first handle sits on its anchor, so the blend has no derivative at t = 0.
    let curve = BezierCurve::new(vec![
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(10.0, 0.0, 10.0),
        Point3::new(20.0, 0.0, 0.0),
        Point3::new(20.0, 0.0, -10.0),
        Point3::new(0.0, 0.0, -10.0),
    ])
    .unwrap();
    assert_eq!(curve.tangent(0.0).unwrap(), Vector3::new(0.0, 0.0, 0.0));

    let pose = ConstraintAnimator::pose_at(0.0, &curve).unwrap();
    assert_vector_eq(pose.w.truncate(), Vector3::new(0.0, 0.0, 0.0), EPSILON);

    let facing = pose.z.truncate();
    assert!(facing.x.is_finite() && facing.y.is_finite() && facing.z.is_finite());
    assert!((facing.magnitude() - 1.0).abs() < EPSILON);
    let ahead = curve.evaluate(0.01).unwrap() - curve.evaluate(0.0).unwrap();
    assert_vector_eq(facing, ahead.normalize(), 1e-3);
}

#[test]
fn look_along_is_a_rotation() {
    let identity: Matrix3<f32> = Matrix3::identity();
    assert_eq!(look_along(Vector3::unit_z()), identity);
    assert_eq!(look_along(Vector3::new(0.0, 0.0, 0.0)), identity);

    let straight_up = look_along(Vector3::unit_y() * 3.0);
    assert_vector_eq(straight_up.z, Vector3::unit_y(), EPSILON);
    assert!((straight_up.determinant() - 1.0).abs() < EPSILON);
}

#[test]
fn limbs_swing_within_the_limit_in_opposite_phase() {
    let mut scene = Scene::new();
    let nodes: Vec<_> = (0..4).map(|_| scene.add_node(Matrix4::identity())).collect();
    let mut swing = LimbSwing::new(nodes[0], nodes[1], nodes[2], nodes[3]);

    let first = swing.advance(10.0);
    assert!((swing.angle() - swing.limit()).abs() < EPSILON);
    assert_matrix_eq(&first[0].1, &Matrix4::from_angle_x(Rad(swing.limit())), EPSILON);
    assert_matrix_eq(&first[1].1, &Matrix4::from_angle_x(Rad(-swing.limit())), EPSILON);
    assert_eq!(first[2].0, nodes[2]);
    // Arm and leg of one side move together.
    assert_matrix_eq(&first[2].1, &first[0].1, EPSILON);
    assert_matrix_eq(&first[3].1, &first[1].1, EPSILON);

    // Past the limit the swing turns around.
    swing.advance(0.1);
    assert!(swing.angle() < swing.limit());

    for _ in 0..200 {
        swing.advance(0.05);
        assert!(swing.angle().abs() <= swing.limit() + EPSILON);
    }
}
