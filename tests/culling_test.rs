use bezier_flow::{
    data_structures::{
        bounds::{Aabb, Frustum},
        component::{Component, MeshComponent, MeshHandle, Shading},
        scene_graph::{NodeId, Scene},
    },
    render::Render,
};
use cgmath::{Deg, Matrix4, Point3, SquareMatrix, Vector3};

use crate::common::test_utils::unit_box;

mod common;

/// Camera at the origin looking down -Z.
fn view_projection() -> Matrix4<f32> {
    cgmath::perspective(Deg(60.0), 1.0, 1.0, 100.0)
}

fn mesh_node(scene: &mut Scene, parent: NodeId, offset: Vector3<f32>, mesh: usize) -> NodeId {
    let node = scene
        .add_child(parent, Matrix4::from_translation(offset))
        .unwrap();
    let component = scene.add_component(Component::Mesh(MeshComponent {
        mesh: MeshHandle(mesh),
        shading: Shading::NormalColoring,
    }));
    scene.attach_component(node, component).unwrap();
    scene.set_bounds(node, unit_box());
    node
}

fn drawn(scene: &Scene) -> Vec<usize> {
    let mut renders = Vec::new();
    scene.draw(Matrix4::identity(), &mut renders);
    renders
        .into_iter()
        .filter_map(|render| match render {
            Render::Mesh { mesh, .. } => Some(mesh.0),
            _ => None,
        })
        .collect()
}

#[test]
fn frustum_excludes_boxes_behind_the_camera() {
    let frustum = Frustum::from_view_projection(&view_projection());
    let placed = |z: f32| Matrix4::from_translation(Vector3::new(0.0, 0.0, z));

    assert!(!frustum.excludes(&unit_box(), &placed(-10.0)));
    assert!(frustum.excludes(&unit_box(), &placed(10.0)));
    assert!(frustum.excludes(&unit_box(), &placed(-200.0)));
    // Straddling the near plane is kept.
    assert!(!frustum.excludes(&unit_box(), &placed(-1.0)));
}

#[test]
fn culled_node_skips_its_components_but_not_its_children() {
    let mut scene = Scene::new();
    let root = scene.root();
    mesh_node(&mut scene, root, Vector3::new(0.0, 0.0, -10.0), 0);
    let behind = mesh_node(&mut scene, root, Vector3::new(0.0, 0.0, 10.0), 1);
    // Back in front of the camera through its own offset.
    mesh_node(&mut scene, behind, Vector3::new(0.0, 0.0, -20.0), 2);
    let unbounded = scene
        .add_child(root, Matrix4::from_translation(Vector3::new(0.0, 0.0, 50.0)))
        .unwrap();
    let component = scene.add_component(Component::Mesh(MeshComponent {
        mesh: MeshHandle(3),
        shading: Shading::NormalColoring,
    }));
    scene.attach_component(unbounded, component).unwrap();

    assert_eq!(scene.cull(&view_projection()), 1);
    assert!(scene.node(behind).unwrap().is_culled());
    assert_eq!(drawn(&scene), vec![0, 2, 3]);

    scene.clear_culling();
    assert_eq!(drawn(&scene), vec![0, 1, 2, 3]);
}

#[test]
fn bounds_from_points() {
    assert!(Aabb::from_points(Vec::new()).is_none());
    let bounds = Aabb::from_points([
        Point3::new(1.0, -2.0, 0.5),
        Point3::new(-1.0, 4.0, 0.0),
        Point3::new(0.0, 0.0, 3.0),
    ])
    .unwrap();
    assert_eq!(bounds.min, Point3::new(-1.0, -2.0, 0.0));
    assert_eq!(bounds.max, Point3::new(1.0, 4.0, 3.0));

    let merged = bounds.merge(&unit_box());
    assert_eq!(merged.min, Point3::new(-1.0, -2.0, -1.0));
    assert_eq!(merged.max, Point3::new(1.0, 4.0, 3.0));
}

#[test]
fn culling_follows_the_hierarchy() {
    let mut scene = Scene::new();
    let root = scene.root();
    let rig = scene.add_child(root, Matrix4::identity()).unwrap();
    let node = mesh_node(&mut scene, rig, Vector3::new(0.0, 0.0, -10.0), 0);

    assert_eq!(scene.cull(&view_projection()), 0);
    scene.set_model(rig, Matrix4::from_angle_y(Deg(180.0)));
    assert_eq!(scene.cull(&view_projection()), 1);
    assert!(scene.node(node).unwrap().is_culled());
    assert!(drawn(&scene).is_empty());
}
