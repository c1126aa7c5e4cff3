//! A walking robot assembled from five part meshes.
//!
//! Each limb hangs below its own control node. A [`LimbSwing`] component owns
//! the swing state and is the only writer of the four control transforms.

use cgmath::{Matrix4, Point3, Rad, SquareMatrix, Vector3};

use crate::{
    animation::LimbSwing,
    data_structures::{
        bounds::Aabb,
        component::{Component, ComponentId, MeshAsset, MeshComponent, Shading},
        scene_graph::{NodeId, Scene},
    },
    error::SceneError,
};

#[derive(Debug, Clone, Copy)]
pub struct RobotParts {
    pub antenna: MeshAsset,
    pub eyeball: MeshAsset,
    pub head: MeshAsset,
    pub limb: MeshAsset,
    pub body: MeshAsset,
}

#[derive(Debug, Clone, Copy)]
pub struct Robot {
    pub root: NodeId,
    pub head: NodeId,
    pub left_arm: NodeId,
    pub right_arm: NodeId,
    pub left_leg: NodeId,
    pub right_leg: NodeId,
    pub swing: ComponentId,
    /// All parts in the space of `root`, as drawn by the wireframe.
    pub bounds: Aabb,
}

impl Robot {
    /// Build the robot below `parent`, standing at `position`.
    pub fn build(
        scene: &mut Scene,
        parent: NodeId,
        position: Point3<f32>,
        parts: &RobotParts,
        shading: Shading,
    ) -> Result<Self, SceneError> {
        let root = scene.add_child(
            parent,
            Matrix4::from_translation(Vector3::new(position.x, position.y, position.z)),
        )?;
        let mut builder = Builder {
            scene,
            shading,
            root,
            bounds: None,
        };
        builder.mesh(root, &parts.body)?;

        let head = builder.head(root, parts)?;
        let (left_arm, right_arm) = builder.arms(root, &parts.limb)?;
        let (left_leg, right_leg) = builder.legs(root, &parts.limb)?;

        let bounds = builder.bounds.unwrap_or(parts.body.bounds);
        let wireframe = builder.scene.add_component(Component::Wireframe(bounds));
        builder.scene.attach_component(root, wireframe)?;
        builder.scene.set_bounds(root, bounds);

        let swing = builder
            .scene
            .add_component(Component::LimbSwing(LimbSwing::new(left_arm, right_arm, left_leg, right_leg)));
        builder.scene.attach_component(root, swing)?;

        log::debug!("built robot with root {:?}", root);
        Ok(Self {
            root,
            head,
            left_arm,
            right_arm,
            left_leg,
            right_leg,
            swing,
            bounds,
        })
    }
}

struct Builder<'s> {
    scene: &'s mut Scene,
    shading: Shading,
    root: NodeId,
    /// Union of the part bounds placed relative to `root`.
    bounds: Option<Aabb>,
}

impl Builder<'_> {
    fn mesh(&mut self, node: NodeId, asset: &MeshAsset) -> Result<(), SceneError> {
        let component = self.scene.add_component(Component::Mesh(MeshComponent {
            mesh: asset.mesh,
            shading: self.shading,
        }));
        self.scene.attach_component(node, component)?;
        self.scene.set_bounds(node, asset.bounds);
        self.include(node, &asset.bounds);
        Ok(())
    }

    fn include(&mut self, node: NodeId, bounds: &Aabb) {
        let relative = self
            .scene
            .world_matrix(self.root)
            .and_then(|root| root.invert())
            .zip(self.scene.world_matrix(node))
            .map(|(to_root, world)| to_root * world);
        let Some(relative) = relative else {
            log::warn!("Robot part {:?} has no invertible placement", node);
            return;
        };
        let placed = bounds.transformed(&relative);
        self.bounds = Some(match self.bounds {
            Some(all) => all.merge(&placed),
            None => placed,
        });
    }

    fn mesh_node(&mut self, parent: NodeId, model: Matrix4<f32>, asset: &MeshAsset) -> Result<NodeId, SceneError> {
        let node = self.scene.add_child(parent, model)?;
        self.mesh(node, asset)?;
        Ok(node)
    }

    fn head(&mut self, root: NodeId, parts: &RobotParts) -> Result<NodeId, SceneError> {
        let neck = self
            .scene
            .add_child(root, Matrix4::from_translation(Vector3::new(0.0, 1.2, 0.0)))?;
        let control = self.mesh_node(neck, Matrix4::from_scale(1.0), &parts.head)?;

        let antenna = Matrix4::from_translation(Vector3::new(0.0, 1.0, 0.0)) * Matrix4::from_scale(0.3);
        let tilt = std::f32::consts::FRAC_PI_4;
        self.mesh_node(control, Matrix4::from_angle_z(Rad(tilt)) * antenna, &parts.antenna)?;
        self.mesh_node(control, Matrix4::from_angle_z(Rad(-tilt)) * antenna, &parts.antenna)?;

        let eyeball = Matrix4::from_angle_x(Rad(std::f32::consts::PI * 0.4))
            * Matrix4::from_translation(Vector3::new(0.0, 1.0, 0.0));
        let spread = std::f32::consts::PI * 0.15;
        self.mesh_node(control, Matrix4::from_angle_y(Rad(spread)) * eyeball, &parts.eyeball)?;
        self.mesh_node(control, Matrix4::from_angle_y(Rad(-spread)) * eyeball, &parts.eyeball)?;
        Ok(control)
    }

    /// A shoulder or hip at `offset`, a swinging control node and the limb mesh below it.
    fn limb(
        &mut self,
        root: NodeId,
        offset: Vector3<f32>,
        limb_model: Matrix4<f32>,
        limb: &MeshAsset,
    ) -> Result<NodeId, SceneError> {
        let joint = self.scene.add_child(root, Matrix4::from_translation(offset))?;
        let control = self.scene.add_child(joint, Matrix4::from_scale(1.0))?;
        self.mesh_node(control, limb_model, limb)?;
        Ok(control)
    }

    fn arms(&mut self, root: NodeId, limb: &MeshAsset) -> Result<(NodeId, NodeId), SceneError> {
        let arm = Matrix4::from_translation(Vector3::new(0.0, -0.8, 0.0))
            * Matrix4::from_nonuniform_scale(1.0, 2.0, 1.0);
        let left = self.limb(root, Vector3::new(-1.4, 0.6, 0.0), arm, limb)?;
        let right = self.limb(root, Vector3::new(1.4, 0.6, 0.0), arm, limb)?;
        Ok((left, right))
    }

    fn legs(&mut self, root: NodeId, limb: &MeshAsset) -> Result<(NodeId, NodeId), SceneError> {
        let leg = Matrix4::from_translation(Vector3::new(0.0, -0.7, 0.0));
        let left = self.limb(root, Vector3::new(-0.5, -1.0, 0.0), leg, limb)?;
        let right = self.limb(root, Vector3::new(0.5, -1.0, 0.0), leg, limb)?;
        Ok((left, right))
    }
}
