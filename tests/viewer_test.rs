use bezier_flow::{
    data_structures::{component::Shading, curve::ControlPointHandle},
    input::{Control, InputEvent, Key, MouseButton},
    pick::{Viewport, pick_id, project},
    render::Render,
    viewer::{SceneAssets, Viewer},
};
use cgmath::{EuclideanSpace, Point3};

use crate::common::test_utils::{FixedPixels, scene_assets, test_config};

mod common;

fn viewer() -> Viewer {
    Viewer::new(&test_config(), &scene_assets()).unwrap()
}

fn key(viewer: &mut Viewer, key: Key, pressed: bool) -> Control {
    viewer.handle_event(InputEvent::Key { key, pressed }, &mut FixedPixels::new(0))
}

fn right_click(viewer: &mut Viewer, x: f64, y: f64, pixels: &mut FixedPixels) {
    viewer.handle_event(
        InputEvent::MouseButton {
            button: MouseButton::Right,
            pressed: true,
            x,
            y,
        },
        pixels,
    );
}

fn move_cursor(viewer: &mut Viewer, x: f64, y: f64) {
    viewer.handle_event(InputEvent::CursorMoved { x, y }, &mut FixedPixels::new(0));
}

fn mesh_shadings(viewer: &mut Viewer) -> Vec<Shading> {
    viewer
        .draw()
        .renders
        .into_iter()
        .filter_map(|render| match render {
            Render::Mesh { shading, .. } => Some(shading),
            _ => None,
        })
        .collect()
}

#[test]
fn initial_scene() {
    let mut viewer = viewer();
    let curve = viewer.curve().unwrap();
    assert_eq!(curve.len(), 24);
    assert_eq!(curve.uploaded().len(), 8 * 24 + 1);
    assert_eq!(viewer.handles().len(), 8);
    assert!(viewer.robot().is_some());
    assert_eq!(viewer.camera().eye, Point3::new(0.0, 0.0, 20.0));

    let frame = viewer.draw();
    assert_eq!(frame.renders[0], Render::Skybox);
    let ids: Vec<u32> = frame.handles().map(|(_, id)| id).collect();
    assert_eq!(ids, (0..8).map(|g| pick_id(g, 0)).collect::<Vec<_>>());
    assert_eq!(
        frame
            .renders
            .iter()
            .filter(|render| matches!(render, Render::Curve { .. }))
            .count(),
        1
    );
}

#[test]
fn missing_assets_still_build_a_scene() {
    let mut viewer = Viewer::new(&test_config(), &SceneAssets::default()).unwrap();
    assert!(viewer.robot().is_none());
    assert!(mesh_shadings(&mut viewer).is_empty());
    assert_eq!(viewer.draw().handles().count(), 8);
}

#[test]
fn escape_exits() {
    let mut viewer = viewer();
    assert_eq!(key(&mut viewer, Key::W, true), Control::Continue);
    assert_eq!(key(&mut viewer, Key::Escape, true), Control::Exit);
}

#[test]
fn keys_move_the_camera() {
    let mut viewer = viewer();
    key(&mut viewer, Key::W, true);
    viewer.update(0.5);
    assert!((viewer.camera().eye.z - 15.0).abs() < 1e-3);

    key(&mut viewer, Key::W, false);
    viewer.update(0.5);
    assert!((viewer.camera().eye.z - 15.0).abs() < 1e-3);
}

#[test]
fn culling_and_shading_toggles() {
    let mut viewer = viewer();
    assert!(!viewer.is_culling());
    key(&mut viewer, Key::C, true);
    assert!(viewer.is_culling());
    key(&mut viewer, Key::C, true);
    assert!(!viewer.is_culling());

    let before = mesh_shadings(&mut viewer);
    assert!(!before.is_empty());
    assert!(before.iter().all(|s| *s == Shading::NormalColoring));
    key(&mut viewer, Key::N, true);
    assert!(mesh_shadings(&mut viewer).iter().all(|s| *s == Shading::ReflectionMap));
    key(&mut viewer, Key::N, true);
    assert_eq!(mesh_shadings(&mut viewer), before);
}

#[test]
fn resize_ignores_zero_sizes() {
    let mut viewer = viewer();
    let mut pixels = FixedPixels::new(0);
    viewer.handle_event(InputEvent::Resized { width: 0, height: 300 }, &mut pixels);
    assert_eq!(viewer.size(), (800, 600));
    viewer.handle_event(InputEvent::Resized { width: 1000, height: 500 }, &mut pixels);
    assert_eq!(viewer.size(), (1000, 500));
    assert!((viewer.camera().perspective().aspect - 2.0).abs() < 1e-6);
}

#[test]
fn picked_point_follows_the_cursor() {
    let mut viewer = viewer();
    let id = pick_id(0, ControlPointHandle::ANCHOR);
    let mut pixels = FixedPixels::new(id);
    right_click(&mut viewer, 400.0, 300.0, &mut pixels);
    assert_eq!(pixels.reads, vec![(400, 300)]);
    assert_eq!(viewer.selected(), id);

    let viewport = Viewport::new(800, 600);
    let handle = viewer.handles()[0];
    let start_point = handle.get(viewer.curve().unwrap(), ControlPointHandle::ANCHOR).unwrap();
    let depth = project(start_point, &viewer.camera().view, &viewer.camera().projection, &viewport)
        .unwrap()
        .z;
    let revision = viewer.curve().unwrap().revision();

    move_cursor(&mut viewer, 450.0, 250.0);

    let curve = viewer.curve().unwrap();
    let moved = handle.get(curve, ControlPointHandle::ANCHOR).unwrap();
    assert_eq!(curve.control_points()[3], moved);
    assert_eq!(curve.revision(), revision + 1);
    let window = project(moved, &viewer.camera().view, &viewer.camera().projection, &viewport).unwrap();
    assert!((window.x - 450.0).abs() < 0.05, "{:?}", window);
    assert!((window.y - 349.0).abs() < 0.05, "{:?}", window);
    assert!((window.z - depth).abs() < 1e-4);

    // Releasing drops the selection; later moves leave the curve alone.
    viewer.handle_event(
        InputEvent::MouseButton {
            button: MouseButton::Right,
            pressed: false,
            x: 450.0,
            y: 250.0,
        },
        &mut pixels,
    );
    assert_eq!(viewer.selected(), 0);
    move_cursor(&mut viewer, 100.0, 100.0);
    assert_eq!(viewer.curve().unwrap().control_points()[3], moved);
}

#[test]
fn dragging_a_wrapped_handle_moves_the_first_anchor() {
    let mut viewer = viewer();
    let id = pick_id(7, ControlPointHandle::ANCHOR);
    right_click(&mut viewer, 400.0, 300.0, &mut FixedPixels::new(id));
    let before = viewer.curve().unwrap().control_points()[0];
    move_cursor(&mut viewer, 420.0, 310.0);
    let curve = viewer.curve().unwrap();
    assert_ne!(curve.control_points()[0], before);
    assert_eq!(curve.evaluate(0.0).unwrap(), curve.control_points()[0]);
    assert_eq!(curve.uploaded()[0], curve.control_points()[0]);
}

#[test]
fn background_and_unknown_ids_select_nothing() {
    let mut viewer = viewer();
    right_click(&mut viewer, 10.0, 10.0, &mut FixedPixels::new(0));
    assert_eq!(viewer.selected(), 0);
    right_click(&mut viewer, 10.0, 10.0, &mut FixedPixels::new(1000));
    assert_eq!(viewer.selected(), 0);

    let mut outside = FixedPixels::new(pick_id(0, 0));
    right_click(&mut viewer, -5.0, 10.0, &mut outside);
    right_click(&mut viewer, 10.0, 600.0, &mut outside);
    assert!(outside.reads.is_empty());
    assert_eq!(viewer.selected(), 0);
}

#[test]
fn left_drag_turns_the_camera() {
    let mut viewer = viewer();
    let view = viewer.camera().view;
    let mut pixels = FixedPixels::new(0);
    viewer.handle_event(
        InputEvent::MouseButton {
            button: MouseButton::Left,
            pressed: true,
            x: 400.0,
            y: 300.0,
        },
        &mut pixels,
    );
    move_cursor(&mut viewer, 600.0, 300.0);
    viewer.update(0.0);
    assert_ne!(viewer.camera().view, view);
    // Turning does not move the eye.
    let eye = viewer.camera().eye.to_vec();
    assert!((eye.z - 20.0).abs() < 1e-3 && eye.x.abs() < 1e-3);
    assert!(pixels.reads.is_empty());
}
