//! bezier-flow
//!
//! An interactive 3D scene viewer built around a transform hierarchy. A
//! free-flying camera moves through the scene while a mesh follows a closed,
//! editable cubic Bezier path; the path's control points can be picked and
//! dragged with the mouse.
//!
//! High-level modules
//! - `data_structures`: scene graph, components, curves, bounds and GPU data layouts
//! - `animation`: per-frame animators (path following, limb swing)
//! - `camera`: perspective camera derived from a scene node, and its uniform
//! - `controller`: free-flying movement and rotation of the camera node
//! - `pick`: pick IDs, window/world projection and pixel readback
//! - `render`: render commands produced by the scene and their per-pipeline batches
//! - `viewer`: scene composition, input handling and the frame protocol
//! - `context`, `pipelines`, `resources`, `flow`: the wgpu/winit backend
//!
//! Everything up to and including `viewer` is independent of the GPU and
//! can be driven without a window.

pub mod animation;
pub mod camera;
pub mod config;
pub mod context;
pub mod controller;
pub mod data_structures;
pub mod error;
pub mod flow;
pub mod input;
pub mod pick;
pub mod pipelines;
pub mod render;
pub mod resources;
pub mod robot;
pub mod viewer;

// Re-exports commonly used types for convenience in downstream code.
pub use config::ViewerConfig;
pub use error::{CurveError, SceneError};
pub use viewer::{SceneAssets, Viewer};
