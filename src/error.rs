//! Typed errors for scene construction.
//!
//! Everything that can go wrong while *building* a scene is reported through
//! these enums. Interaction anomalies (unknown pick IDs, degenerate rotations,
//! zero-sized windows) are not errors: they are ignored where they happen.
//! Fatal initialization failures (GPU, shaders, assets) use `anyhow`.

use thiserror::Error;

use crate::data_structures::{component::ComponentId, scene_graph::NodeId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SceneError {
    #[error("node {0:?} does not exist in this scene")]
    UnknownNode(NodeId),
    #[error("node {child:?} is already attached to {parent:?}")]
    AlreadyAttached { child: NodeId, parent: NodeId },
    #[error("attaching {child:?} below {parent:?} would create a cycle")]
    Cycle { parent: NodeId, child: NodeId },
    #[error("the root node cannot become a child")]
    RootAsChild,
    #[error("component {0:?} does not exist in this scene")]
    UnknownComponent(ComponentId),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CurveError {
    #[error("a closed bezier curve needs a multiple of 3 control points, got {0}")]
    PointCount(usize),
}
