use bezier_flow::{
    data_structures::{
        component::{Component, MeshHandle, Shading},
        instance::LineVertex,
        scene_graph::Scene,
    },
    pick::{Viewport, decode_pick_id, pick_id, project, unproject},
    render::{Batches, Frame, Render},
};
use cgmath::{Deg, Matrix4, Point3, SquareMatrix, Vector3};

use crate::common::test_utils::{assert_point_eq, unit_box};

mod common;

fn frame(renders: Vec<Render<'_>>) -> Frame<'_> {
    Frame {
        projection: Matrix4::identity(),
        view: Matrix4::identity(),
        eye: Point3::new(0.0, 0.0, 0.0),
        renders,
    }
}

#[test]
fn meshes_are_batched_per_shading_and_mesh() {
    let at = |x: f32| Matrix4::from_translation(Vector3::new(x, 0.0, 0.0));
    let mesh = |index, shading, x| Render::Mesh {
        mesh: MeshHandle(index),
        shading,
        model: at(x),
    };
    let batches = Batches::from_frame(&frame(vec![
        Render::Skybox,
        mesh(0, Shading::NormalColoring, 0.0),
        mesh(1, Shading::NormalColoring, 1.0),
        mesh(0, Shading::NormalColoring, 2.0),
        mesh(0, Shading::ReflectionMap, 3.0),
    ]));

    assert!(batches.skybox);
    let summary: Vec<_> = batches
        .meshes
        .iter()
        .map(|batch| (batch.mesh.0, batch.shading, batch.instances.len()))
        .collect();
    assert_eq!(
        summary,
        vec![
            (0, Shading::NormalColoring, 2),
            (1, Shading::NormalColoring, 1),
            (0, Shading::ReflectionMap, 1),
        ]
    );
    assert!(batches.lines.is_empty());
    assert!(batches.handles.is_empty());
}

#[test]
fn lines_and_handles_end_up_in_world_space() {
    let polyline = [
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(1.0, 1.0, 0.0),
    ];
    let shifted = Matrix4::from_translation(Vector3::new(0.0, 0.0, 5.0));
    let component = Scene::new().add_component(Component::Wireframe(unit_box()));
    let renders = vec![
        Render::Curve {
            component,
            revision: 1,
            vertices: &polyline,
            model: shifted,
        },
        Render::Wireframe {
            bounds: unit_box(),
            model: Matrix4::identity(),
        },
        Render::Handle {
            points: polyline,
            base_id: pick_id(2, 0),
        },
    ];
    let batches = Batches::from_frame(&frame(renders));

    assert!(!batches.skybox);
    // curve: 2 segments, wireframe: 12 edges, handle bar: 2 segments
    assert_eq!(batches.lines.len(), 4 + 24 + 4);
    assert_eq!(batches.lines[0].position, [0.0, 0.0, 5.0]);
    assert_eq!(batches.lines[0].color, LineVertex::CURVE);
    assert_eq!(batches.lines[4].color, LineVertex::WIREFRAME);
    assert_eq!(batches.lines[28].color, LineVertex::HANDLE);

    let ids: Vec<u32> = batches.handles.iter().map(|h| h.id).collect();
    assert_eq!(ids, vec![7, 8, 9]);
    assert_eq!(batches.handles[1].center, [1.0, 0.0, 0.0]);
}

#[test]
fn pick_ids_are_one_based_and_dense() {
    assert_eq!(pick_id(0, 0), 1);
    assert_eq!(pick_id(0, 2), 3);
    assert_eq!(pick_id(1, 0), 4);
    assert_eq!(decode_pick_id(0), None);
    for id in 1..50 {
        let (group, i) = decode_pick_id(id).unwrap();
        assert!(i < 3);
        assert_eq!(pick_id(group, i), id);
    }
}

#[test]
fn unproject_inverts_project() {
    let projection = cgmath::perspective(Deg(60.0), 4.0 / 3.0, 1.0, 1000.0);
    let view = Matrix4::from_translation(Vector3::new(0.0, 0.0, -20.0));
    let viewport = Viewport::new(800, 600);

    let center = project(Point3::new(0.0, 0.0, 0.0), &view, &projection, &viewport).unwrap();
    assert!((center.x - 400.0).abs() < 1e-3 && (center.y - 300.0).abs() < 1e-3);
    assert!(center.z > 0.0 && center.z < 1.0);

    let point = Point3::new(2.0, -1.5, 3.0);
    let window = project(point, &view, &projection, &viewport).unwrap();
    let back = unproject(window, &view, &projection, &viewport).unwrap();
    assert_point_eq(back, point, 1e-3);

    assert!(unproject(window, &view, &projection, &Viewport::new(0, 600)).is_none());
}
