use bezier_flow::resources::mesh::{face_normals, parse_obj};
use cgmath::Point3;

const TRIANGLE: &str = "\
v 0 0 0
v 1 0 0
v 0 1 0
f 1 2 3
";

const QUAD_WITH_NORMALS: &str = "\
v -1 -1 2
v 1 -1 2
v 1 1 2
v -1 1 2
vn 0 0 -1
f 1//1 2//1 3//1 4//1
";

#[test]
fn computes_normals_when_the_file_has_none() {
    let data = parse_obj(TRIANGLE, "triangle.obj").unwrap();
    assert_eq!(data.vertices.len(), 3);
    assert_eq!(data.indices, vec![0, 1, 2]);
    for vertex in &data.vertices {
        assert_eq!(vertex.normal, [0.0, 0.0, 1.0]);
    }
    assert_eq!(data.bounds.min, Point3::new(0.0, 0.0, 0.0));
    assert_eq!(data.bounds.max, Point3::new(1.0, 1.0, 0.0));
}

#[test]
fn keeps_file_normals_and_triangulates() {
    let data = parse_obj(QUAD_WITH_NORMALS, "quad.obj").unwrap();
    assert_eq!(data.indices.len(), 6);
    assert!(data.vertices.iter().all(|v| v.normal == [0.0, 0.0, -1.0]));
    assert_eq!(data.bounds.min, Point3::new(-1.0, -1.0, 2.0));
    assert_eq!(data.bounds.max, Point3::new(1.0, 1.0, 2.0));
}

#[test]
fn empty_file_is_an_error() {
    assert!(parse_obj("", "empty.obj").is_err());
}

#[test]
fn shared_vertices_average_their_faces() {
    // Two triangles folded along the x axis, one facing +Z and one facing +Y.
    let positions = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0];
    let indices = [0, 1, 2, 0, 3, 1];
    let normals = face_normals(&positions, &indices);
    let half = std::f32::consts::FRAC_1_SQRT_2;
    assert!((normals[0] - 0.0).abs() < 1e-6);
    assert!((normals[1] - half).abs() < 1e-6);
    assert!((normals[2] - half).abs() < 1e-6);
    assert_eq!(&normals[6..9], &[0.0, 0.0, 1.0]);
}
