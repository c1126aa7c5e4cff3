//! Scene composition and the per-frame protocol.
//!
//! [`Viewer`] owns the scene and everything that acts on it: the camera, its
//! free-flying controller, the editable animation path and the current pick
//! selection. The event loop drives it in a fixed order each frame:
//!
//! 1. [`Viewer::handle_event`] for every pending input event
//! 2. [`Viewer::update`] with the elapsed time
//! 3. [`Viewer::draw`] to collect the frame's render commands
//!
//! Nothing in here talks to the GPU, so the whole interaction model can be
//! exercised without a window.

use cgmath::{Matrix4, Point3, SquareMatrix, Vector3};
use log::{debug, info, warn};

use crate::{
    animation::ConstraintAnimator,
    camera::{Camera, Perspective},
    config::ViewerConfig,
    controller::FreeFlying,
    data_structures::{
        component::{Component, ComponentId, MeshAsset, MeshComponent, Shading},
        curve::{BezierCurve, ControlPointHandle},
        scene_graph::{NodeId, Scene},
    },
    error::SceneError,
    input::{Control, InputEvent, Key, MouseButton},
    pick::{PixelReader, Viewport, decode_pick_id, pick_id, project, unproject},
    render::{Frame, Render},
    robot::{Robot, RobotParts},
};

/// Meshes the backend loaded for the initial scene. Missing parts are left out.
#[derive(Debug, Clone, Copy, Default)]
pub struct SceneAssets {
    pub mover: Option<MeshAsset>,
    pub robot: Option<RobotParts>,
}

#[derive(Debug)]
pub struct Viewer {
    scene: Scene,
    camera: Camera,
    controller: FreeFlying,
    curve: ComponentId,
    handles: Vec<ControlPointHandle>,
    mover: NodeId,
    robot: Option<Robot>,
    selected: u32,
    cursor: (f64, f64),
    width: u32,
    height: u32,
    cull: bool,
}

impl Viewer {
    pub fn new(config: &ViewerConfig, assets: &SceneAssets) -> Result<Self, SceneError> {
        let mut scene = Scene::new();
        let root = scene.root();

        let eye = Vector3::new(config.eye.x, config.eye.y, config.eye.z);
        let camera_node = scene.add_child(root, Matrix4::from_translation(eye))?;
        let perspective = Perspective::new(
            config.fovy,
            config.width,
            config.height,
            config.znear,
            config.zfar,
        );
        let camera = Camera::new(camera_node, perspective);

        let mut curve = BezierCurve::circle(config.curve_segments, config.curve_radius);
        curve.upload();
        let handles = curve.handles();
        let curve = scene.add_top_level(Component::Bezier(curve));

        let mover = scene.add_node(Matrix4::identity());
        scene.add_top_level(Component::Animator(ConstraintAnimator::new(
            curve,
            mover,
            config.animator_rate,
        )));
        if let Some(asset) = &assets.mover {
            let scaled = scene.add_child(mover, Matrix4::from_scale(config.mover_scale))?;
            let mesh = scene.add_component(Component::Mesh(MeshComponent {
                mesh: asset.mesh,
                shading: Shading::NormalColoring,
            }));
            scene.attach_component(scaled, mesh)?;
            scene.set_bounds(scaled, asset.bounds);
        }
        scene.attach(root, mover)?;

        let robot = match (&assets.robot, config.show_robot) {
            (Some(parts), true) => Some(Robot::build(
                &mut scene,
                root,
                config.robot_position,
                parts,
                Shading::NormalColoring,
            )?),
            _ => None,
        };

        let mut viewer = Self {
            scene,
            camera,
            controller: FreeFlying::new(config.move_speed, config.rotate_sensitivity),
            curve,
            handles,
            mover,
            robot,
            selected: 0,
            cursor: (0.0, 0.0),
            width: config.width,
            height: config.height,
            cull: config.cull_on_start,
        };
        // Place animated nodes and derive the view before the first frame.
        viewer.update(0.0);
        Ok(viewer)
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn controller(&self) -> &FreeFlying {
        &self.controller
    }

    pub fn curve_id(&self) -> ComponentId {
        self.curve
    }

    pub fn curve(&self) -> Option<&BezierCurve> {
        self.scene.curve(self.curve)
    }

    pub fn handles(&self) -> &[ControlPointHandle] {
        &self.handles
    }

    pub fn mover(&self) -> NodeId {
        self.mover
    }

    pub fn robot(&self) -> Option<&Robot> {
        self.robot.as_ref()
    }

    /// Pick ID of the control point being dragged, 0 if none.
    pub fn selected(&self) -> u32 {
        self.selected
    }

    pub fn is_culling(&self) -> bool {
        self.cull
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn handle_event(&mut self, event: InputEvent, pixels: &mut dyn PixelReader) -> Control {
        match event {
            InputEvent::Key { key, pressed: true } => return self.key_pressed(key),
            InputEvent::Key { key, pressed: false } => self.key_released(key),
            InputEvent::MouseButton {
                button,
                pressed,
                x,
                y,
            } => {
                self.cursor = (x, y);
                self.mouse_button(button, pressed, pixels);
            }
            InputEvent::CursorMoved { x, y } => self.cursor_moved(x, y),
            InputEvent::Scroll { dx, dy } => debug!("ignoring scroll ({}, {})", dx, dy),
            InputEvent::Resized { width, height } => self.resize(width, height),
        }
        Control::Continue
    }

    fn key_pressed(&mut self, key: Key) -> Control {
        match key {
            Key::Escape => return Control::Exit,
            Key::W => self.controller.forward = true,
            Key::A => self.controller.left = true,
            Key::S => self.controller.backward = true,
            Key::D => self.controller.right = true,
            Key::Q => self.controller.up = true,
            Key::E => self.controller.down = true,
            Key::LeftShift => self.controller.local = false,
            Key::C => {
                self.cull = !self.cull;
                if !self.cull {
                    self.scene.clear_culling();
                }
                info!("Frustum culling: {}", self.cull);
            }
            Key::N => self.swap_shading(),
            Key::Other => (),
        }
        Control::Continue
    }

    fn key_released(&mut self, key: Key) {
        match key {
            Key::W => self.controller.forward = false,
            Key::A => self.controller.left = false,
            Key::S => self.controller.backward = false,
            Key::D => self.controller.right = false,
            Key::Q => self.controller.up = false,
            Key::E => self.controller.down = false,
            Key::LeftShift => self.controller.local = true,
            _ => (),
        }
    }

    fn swap_shading(&mut self) {
        let mut swapped = 0;
        for component in self.scene.components_mut() {
            if let Component::Mesh(mesh) = component {
                mesh.shading = mesh.shading.swapped();
                swapped += 1;
            }
        }
        info!("Swapped shading of {} meshes", swapped);
    }

    fn cursor_direction(&self, x: f64, y: f64) -> Option<Vector3<f32>> {
        FreeFlying::window_coord_to_cam_dir(x, y, self.width, self.height, &self.camera.projection)
    }

    fn mouse_button(&mut self, button: MouseButton, pressed: bool, pixels: &mut dyn PixelReader) {
        let (x, y) = self.cursor;
        match (button, pressed) {
            (MouseButton::Left, true) => match self.cursor_direction(x, y) {
                Some(direction) => self.controller.start_rotate(direction),
                None => debug!("no camera direction for ({}, {})", x, y),
            },
            (MouseButton::Left, false) => self.controller.stop_rotate(),
            (MouseButton::Right, true) => self.select(x, y, pixels),
            (MouseButton::Right, false) => self.selected = 0,
            (MouseButton::Other, _) => (),
        }
    }

    fn select(&mut self, x: f64, y: f64, pixels: &mut dyn PixelReader) {
        self.selected = 0;
        if x < 0.0 || y < 0.0 || x >= f64::from(self.width) || y >= f64::from(self.height) {
            return;
        }
        let id = pixels.read_pixel_id(x as u32, y as u32);
        match decode_pick_id(id) {
            Some((group, _)) if group < self.handles.len() => {
                info!("Selected control point {}", id);
                self.selected = id;
            }
            Some(_) => warn!("Ignoring unknown pick id {}", id),
            None => (),
        }
    }

    fn cursor_moved(&mut self, x: f64, y: f64) {
        self.cursor = (x, y);
        if self.controller.is_rotating() {
            if let (Some(direction), Some(model)) = (
                self.cursor_direction(x, y),
                self.scene.model_mut(self.camera.node()),
            ) {
                self.controller.rotate(model, direction);
            }
        }
        if self.selected != 0 {
            self.drag(x, y);
        }
    }

    /// Move the selected point under the cursor, keeping its window depth.
    fn drag(&mut self, x: f64, y: f64) {
        let Some((group, i)) = decode_pick_id(self.selected) else {
            return;
        };
        let Some(handle) = self.handles.get(group).copied() else {
            return;
        };
        let viewport = Viewport::new(self.width, self.height);
        let (view, projection) = (self.camera.view, self.camera.projection);
        let Some(curve) = self.scene.curve_mut(self.curve) else {
            warn!("Selected point belongs to no curve");
            return;
        };
        let Some(point) = handle.get(curve, i) else {
            return;
        };
        let Some(window) = project(point, &view, &projection, &viewport) else {
            return;
        };
        let target = Point3::new(x as f32, self.height as f32 - 1.0 - y as f32, window.z);
        let Some(moved) = unproject(target, &view, &projection, &viewport) else {
            return;
        };
        if handle.set(curve, i, moved) {
            curve.upload();
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        if self.camera.resize(width, height) {
            self.width = width;
            self.height = height;
        }
    }

    /// Advance the simulation by `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        if let Some(model) = self.scene.model_mut(self.camera.node()) {
            self.controller.update(model, dt);
        }
        self.scene.update(dt);
        self.camera.setup(&self.scene);
    }

    /// Render commands for the current state: skybox, control handles, then the scene tree.
    pub fn draw(&mut self) -> Frame<'_> {
        if self.cull {
            let culled = self.scene.cull(&self.camera.view_projection());
            debug!("culled {} nodes", culled);
        }
        let mut renders = vec![Render::Skybox];
        if let Some(curve) = self.scene.curve(self.curve) {
            renders.extend(self.handles.iter().filter_map(|handle| {
                handle.points(curve).map(|points| Render::Handle {
                    points,
                    base_id: pick_id(handle.group(), ControlPointHandle::INCOMING),
                })
            }));
        }
        self.scene.draw(Matrix4::identity(), &mut renders);
        Frame {
            projection: self.camera.projection,
            view: self.camera.view,
            eye: self.camera.eye,
            renders,
        }
    }
}
