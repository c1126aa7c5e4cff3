//! Scene data: the transform hierarchy and what hangs off it.
//!
//! - `scene_graph` is the node arena with parent/child links and world transforms
//! - `component` holds the closed set of behaviours a node can carry
//! - `curve` is the closed cubic Bezier path and its control point handles
//! - `bounds` contains axis-aligned boxes and the view frustum test
//! - `model`, `instance` and `texture` are the GPU-facing layouts and resources

pub mod bounds;
pub mod component;
pub mod curve;
pub mod instance;
pub mod model;
pub mod scene_graph;
pub mod texture;
