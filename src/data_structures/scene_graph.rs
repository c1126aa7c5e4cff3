//! Scene graph and hierarchical scene organization.
//!
//! Nodes live in an arena owned by [`Scene`] and refer to each other through
//! [`NodeId`]s: children are an ordered id list (insertion order is draw order),
//! the parent is a plain back-reference used for upward walks such as computing
//! a camera's world matrix. Components are stored once in the scene and can be
//! referenced by any number of nodes; every stored component is updated exactly
//! once per frame.

use cgmath::{Matrix4, SquareMatrix};
use log::warn;

use crate::{
    data_structures::{
        bounds::{Aabb, Frustum},
        component::{Component, ComponentId},
        curve::BezierCurve,
    },
    error::SceneError,
    render::Render,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
pub struct Node {
    model: Matrix4<f32>,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
    components: Vec<ComponentId>,
    bounds: Option<Aabb>,
    culled: bool,
}

impl Node {
    fn new(model: Matrix4<f32>) -> Self {
        Self {
            model,
            children: Vec::new(),
            parent: None,
            components: Vec::new(),
            bounds: None,
            culled: false,
        }
    }

    pub fn model(&self) -> &Matrix4<f32> {
        &self.model
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn components(&self) -> &[ComponentId] {
        &self.components
    }

    pub fn bounds(&self) -> Option<&Aabb> {
        self.bounds.as_ref()
    }

    pub fn is_culled(&self) -> bool {
        self.culled
    }
}

#[derive(Debug, Clone)]
pub struct Scene {
    nodes: Vec<Node>,
    components: Vec<Component>,
    root: NodeId,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new(Matrix4::identity())],
            components: Vec::new(),
            root: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Create a detached node. It is not drawn until attached below the root.
    pub fn add_node(&mut self, model: Matrix4<f32>) -> NodeId {
        self.nodes.push(Node::new(model));
        NodeId(self.nodes.len() - 1)
    }

    /// Make `child` the last child of `parent`.
    ///
    /// A node has at most one parent for its whole life; re-parenting and
    /// cycles are rejected.
    pub fn attach(&mut self, parent: NodeId, child: NodeId) -> Result<(), SceneError> {
        if parent.0 >= self.nodes.len() {
            return Err(SceneError::UnknownNode(parent));
        }
        if child.0 >= self.nodes.len() {
            return Err(SceneError::UnknownNode(child));
        }
        if child == self.root {
            return Err(SceneError::RootAsChild);
        }
        if let Some(existing) = self.nodes[child.0].parent {
            return Err(SceneError::AlreadyAttached {
                child,
                parent: existing,
            });
        }
        if self.ancestors(parent).any(|ancestor| ancestor == child) {
            return Err(SceneError::Cycle { parent, child });
        }
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
        Ok(())
    }

    pub fn add_child(&mut self, parent: NodeId, model: Matrix4<f32>) -> Result<NodeId, SceneError> {
        if parent.0 >= self.nodes.len() {
            return Err(SceneError::UnknownNode(parent));
        }
        let child = self.add_node(model);
        self.attach(parent, child)?;
        Ok(child)
    }

    /// `id` itself followed by every ancestor up to the root.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.node(id).map(|_| id), move |current| {
            self.nodes[current.0].parent
        })
    }

    pub fn model(&self, id: NodeId) -> Option<Matrix4<f32>> {
        self.node(id).map(|node| node.model)
    }

    pub fn model_mut(&mut self, id: NodeId) -> Option<&mut Matrix4<f32>> {
        self.nodes.get_mut(id.0).map(|node| &mut node.model)
    }

    pub fn set_model(&mut self, id: NodeId, model: Matrix4<f32>) {
        match self.nodes.get_mut(id.0) {
            Some(node) => node.model = model,
            None => warn!("Tried to set the model of unknown node {:?}", id),
        }
    }

    pub fn set_bounds(&mut self, id: NodeId, bounds: Aabb) {
        if let Some(node) = self.nodes.get_mut(id.0) {
            node.bounds = Some(bounds);
        }
    }

    /// Local-to-world matrix of `id`: `M_root * ... * M_parent * M_id`.
    pub fn world_matrix(&self, id: NodeId) -> Option<Matrix4<f32>> {
        self.node(id)?;
        Some(
            self.ancestors(id)
                .fold(Matrix4::identity(), |world, ancestor| {
                    self.nodes[ancestor.0].model * world
                }),
        )
    }

    pub fn add_component(&mut self, component: Component) -> ComponentId {
        self.components.push(component);
        ComponentId(self.components.len() - 1)
    }

    pub fn attach_component(&mut self, node: NodeId, component: ComponentId) -> Result<(), SceneError> {
        if component.0 >= self.components.len() {
            return Err(SceneError::UnknownComponent(component));
        }
        let node_ref = self
            .nodes
            .get_mut(node.0)
            .ok_or(SceneError::UnknownNode(node))?;
        node_ref.components.push(component);
        Ok(())
    }

    /// Store a component and hang it off the root node.
    pub fn add_top_level(&mut self, component: Component) -> ComponentId {
        let id = self.add_component(component);
        self.nodes[self.root.0].components.push(id);
        id
    }

    pub fn component(&self, id: ComponentId) -> Option<&Component> {
        self.components.get(id.0)
    }

    pub fn component_mut(&mut self, id: ComponentId) -> Option<&mut Component> {
        self.components.get_mut(id.0)
    }

    pub fn components(&self) -> impl Iterator<Item = (ComponentId, &Component)> {
        self.components
            .iter()
            .enumerate()
            .map(|(idx, component)| (ComponentId(idx), component))
    }

    pub fn components_mut(&mut self) -> impl Iterator<Item = &mut Component> {
        self.components.iter_mut()
    }

    pub fn curve(&self, id: ComponentId) -> Option<&BezierCurve> {
        self.component(id).and_then(Component::as_curve)
    }

    pub fn curve_mut(&mut self, id: ComponentId) -> Option<&mut BezierCurve> {
        self.component_mut(id).and_then(Component::as_curve_mut)
    }

    /// Run every stored component once.
    pub fn update(&mut self, dt: f32) {
        for idx in 0..self.components.len() {
            let curve_idx = match &self.components[idx] {
                Component::Animator(animator) => Some(animator.curve().0),
                _ => None,
            };
            if let Some(curve_idx) = curve_idx {
                let Some((Component::Animator(animator), Component::Bezier(curve))) =
                    pair_mut(&mut self.components, idx, curve_idx)
                else {
                    warn!(
                        "Animator {} does not follow a bezier curve (component {}).",
                        idx, curve_idx
                    );
                    continue;
                };
                if let Some(pose) = animator.advance(dt, curve) {
                    match self.nodes.get_mut(animator.control().0) {
                        Some(node) => node.model = pose,
                        None => warn!("Animator {} drives an unknown node.", idx),
                    }
                }
                continue;
            }
            if let Component::LimbSwing(swing) = &mut self.components[idx] {
                for (node, model) in swing.advance(dt) {
                    if let Some(node) = self.nodes.get_mut(node.0) {
                        node.model = model;
                    }
                }
            }
        }
    }

    /// Flag every node whose world bounds are outside the frustum of `view_projection`.
    ///
    /// Returns the number of culled nodes. Nodes without bounds are never culled.
    pub fn cull(&mut self, view_projection: &Matrix4<f32>) -> usize {
        let frustum = Frustum::from_view_projection(view_projection);
        let mut culled = 0;
        let mut stack = vec![(self.root, Matrix4::identity())];
        while let Some((id, parent_world)) = stack.pop() {
            let world = parent_world * self.nodes[id.0].model;
            let node = &mut self.nodes[id.0];
            node.culled = node
                .bounds
                .as_ref()
                .is_some_and(|bounds| frustum.excludes(bounds, &world));
            if node.culled {
                culled += 1;
            }
            stack.extend(node.children.iter().map(|&child| (child, world)));
        }
        culled
    }

    pub fn clear_culling(&mut self) {
        self.nodes.iter_mut().for_each(|node| node.culled = false);
    }

    /// Emit draw commands for the whole tree, children in insertion order.
    ///
    /// A culled node skips its own components; its children are still visited
    /// because they are tested against their own bounds.
    pub fn draw<'a>(&'a self, world: Matrix4<f32>, out: &mut Vec<Render<'a>>) {
        self.draw_node(self.root, world, out);
    }

    fn draw_node<'a>(&'a self, id: NodeId, world: Matrix4<f32>, out: &mut Vec<Render<'a>>) {
        let node = &self.nodes[id.0];
        let world = world * node.model;
        if !node.culled {
            out.extend(node.components.iter().filter_map(|&component| {
                self.components
                    .get(component.0)
                    .and_then(|c| c.render(component, world))
            }));
        }
        for &child in &node.children {
            self.draw_node(child, world, out);
        }
    }
}

/// A mutable and a shared borrow of two distinct slice elements.
fn pair_mut<T>(items: &mut [T], mutable: usize, shared: usize) -> Option<(&mut T, &T)> {
    if mutable == shared || mutable >= items.len() || shared >= items.len() {
        return None;
    }
    if mutable < shared {
        let (head, tail) = items.split_at_mut(shared);
        Some((&mut head[mutable], &tail[0]))
    } else {
        let (head, tail) = items.split_at_mut(mutable);
        Some((&mut tail[0], &head[shared]))
    }
}
