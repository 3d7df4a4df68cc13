use std::fmt;
use std::ops::{Index, IndexMut};

use glam::{EulerRot, Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::camera::{forward_from_world, PerspectiveCamera};
use crate::geometry::{Geometry, GeometryError};
use crate::light::Light;
use crate::material::Material;

/// Handle to a node owned by a [`Scene`]. Nodes are never removed, so a
/// handle stays valid for the lifetime of the scene that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(usize);

impl NodeId {
    pub(crate) fn from_index(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GeometryId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MaterialId(usize);

impl GeometryId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl MaterialId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SceneError {
    #[error("node {0} does not belong to this scene")]
    UnknownNode(NodeId),
    #[error("node {0} cannot be its own parent")]
    SelfParent(NodeId),
    #[error("attaching {child} under {parent} would create a cycle")]
    Cycle { parent: NodeId, child: NodeId },
    #[error("node {0} is not a camera")]
    NotACamera(NodeId),
    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

/// Parent-relative placement of a node. Rotation is Euler XYZ in radians.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Pose {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Vec3::ZERO,
        scale: Vec3::ONE,
    };

    pub fn matrix(&self) -> Mat4 {
        let rotation = Quat::from_euler(
            EulerRot::XYZ,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
        );
        Mat4::from_scale_rotation_translation(self.scale, rotation, self.position)
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    Group,
    Mesh {
        geometry: GeometryId,
        material: MaterialId,
    },
    Camera(PerspectiveCamera),
    Light(Light),
}

impl NodeKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Group => "group",
            Self::Mesh { .. } => "mesh",
            Self::Camera(_) => "camera",
            Self::Light(Light::Point(_)) => "point light",
            Self::Light(Light::Ambient(_)) => "ambient light",
            Self::Light(Light::Spot(_)) => "spot light",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneNode {
    pub name: String,
    pub kind: NodeKind,
    pub pose: Pose,
    pub visible: bool,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl SceneNode {
    fn new(name: &str, kind: NodeKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            pose: Pose::IDENTITY,
            visible: true,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// Retained scene graph. Owns every node, geometry and material; callers
/// hold typed handles and mutate poses through them.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    nodes: Vec<SceneNode>,
    geometries: Vec<Geometry>,
    materials: Vec<Material>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_geometry(&mut self, geometry: Geometry) -> Result<GeometryId, SceneError> {
        geometry.validate()?;
        self.geometries.push(geometry);
        Ok(GeometryId(self.geometries.len() - 1))
    }

    pub fn add_material(&mut self, material: Material) -> MaterialId {
        self.materials.push(material);
        MaterialId(self.materials.len() - 1)
    }

    pub fn add_group(&mut self, name: &str) -> NodeId {
        self.push(SceneNode::new(name, NodeKind::Group))
    }

    pub fn add_mesh(&mut self, name: &str, geometry: GeometryId, material: MaterialId) -> NodeId {
        self.push(SceneNode::new(name, NodeKind::Mesh { geometry, material }))
    }

    pub fn add_camera(&mut self, name: &str, camera: PerspectiveCamera) -> NodeId {
        self.push(SceneNode::new(name, NodeKind::Camera(camera)))
    }

    pub fn add_light(&mut self, name: &str, light: Light) -> NodeId {
        self.push(SceneNode::new(name, NodeKind::Light(light)))
    }

    fn push(&mut self, node: SceneNode) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    /// Makes `child` a child of `parent`, detaching it from any previous
    /// parent. The child's pose becomes relative to `parent`.
    pub fn attach(&mut self, parent: NodeId, child: NodeId) -> Result<(), SceneError> {
        self.check(parent)?;
        self.check(child)?;
        if parent == child {
            return Err(SceneError::SelfParent(child));
        }
        if self.ancestors(parent).any(|ancestor| ancestor == child) {
            return Err(SceneError::Cycle { parent, child });
        }
        if let Some(previous) = self.nodes[child.0].parent.take() {
            self.nodes[previous.0].children.retain(|&c| c != child);
        }
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
        Ok(())
    }

    fn check(&self, id: NodeId) -> Result<(), SceneError> {
        if id.0 < self.nodes.len() {
            Ok(())
        } else {
            Err(SceneError::UnknownNode(id))
        }
    }

    /// Iterates over the parent chain of `id`, nearest first.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.get(id).and_then(SceneNode::parent), move |current| {
            self.nodes[current.0].parent
        })
    }

    pub fn get(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id.0)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(id.0)
    }

    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|node| node.name == name)
            .map(NodeId)
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &SceneNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (NodeId(index), node))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn geometry(&self, id: GeometryId) -> &Geometry {
        &self.geometries[id.0]
    }

    pub fn material(&self, id: MaterialId) -> &Material {
        &self.materials[id.0]
    }

    pub fn material_mut(&mut self, id: MaterialId) -> &mut Material {
        &mut self.materials[id.0]
    }

    pub fn local_matrix(&self, id: NodeId) -> Mat4 {
        self[id].pose.matrix()
    }

    /// Composes the poses from the root down to `id`.
    pub fn world_matrix(&self, id: NodeId) -> Mat4 {
        self.ancestors(id)
            .fold(self.local_matrix(id), |world, ancestor| {
                self.local_matrix(ancestor) * world
            })
    }

    pub fn world_position(&self, id: NodeId) -> Vec3 {
        self.world_matrix(id).w_axis.truncate()
    }

    /// Unit vector the camera at `id` looks along, in world space.
    pub fn camera_world_direction(&self, id: NodeId) -> Result<Vec3, SceneError> {
        match self.get(id).map(|node| &node.kind) {
            Some(NodeKind::Camera(_)) => Ok(forward_from_world(self.world_matrix(id))),
            Some(_) => Err(SceneError::NotACamera(id)),
            None => Err(SceneError::UnknownNode(id)),
        }
    }
}

impl Index<NodeId> for Scene {
    type Output = SceneNode;

    fn index(&self, id: NodeId) -> &SceneNode {
        &self.nodes[id.0]
    }
}

impl IndexMut<NodeId> for Scene {
    fn index_mut(&mut self, id: NodeId) -> &mut SceneNode {
        &mut self.nodes[id.0]
    }
}
