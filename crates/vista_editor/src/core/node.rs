//! Scene node handles and the scene-query collaborator interface.
//!
//! The editing core does not own the scene graph; it sees nodes through
//! [`SceneQuery`]/[`SceneEdit`]. [`SceneNodes`] is a flat reference
//! implementation used by embedders and tests.

use std::collections::HashMap;

use glam::{Mat4, Quat, Vec3};
use vista_math::Aabb;

/// Opaque handle to a scene entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Coarse node type tag, used to route selection paths.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Regular drawable scene actor
    #[default]
    Actor,
    /// Placeholder/grouping node with no drawable content
    Empty,
    /// UI control element
    UiControl,
    /// UI canvas root
    UiCanvas,
}

impl NodeKind {
    /// UI nodes are picked through a separate 2D path.
    pub fn is_ui(&self) -> bool {
        matches!(self, NodeKind::UiControl | NodeKind::UiCanvas)
    }
}

/// World transform of a scene node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeTransform {
    pub translation: Vec3,
    pub orientation: Quat,
    pub scale: Vec3,
}

impl Default for NodeTransform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl NodeTransform {
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Default::default()
        }
    }

    /// Build the world matrix for this transform.
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.orientation, self.translation)
    }
}

/// A scene node as seen by the editing core.
#[derive(Clone, Debug)]
pub struct SceneNode {
    /// Unique identifier
    pub id: NodeId,
    /// Display name
    pub name: String,
    /// World transform
    pub transform: NodeTransform,
    /// Picking bounds in local space
    pub local_bounds: Aabb,
    /// Node type tag
    pub kind: NodeKind,
    /// Whether the node can be picked at all
    pub selectable: bool,
    /// Whether the node may be transformed while the scene is simulating
    pub transformable: bool,
    /// Whether the node is drawn
    pub visible: bool,
    /// Whether the node is active in the hierarchy
    pub active: bool,
    /// UI node attached under a screen-space (2D) canvas
    pub under_2d_canvas: bool,
}

impl SceneNode {
    pub fn new(id: NodeId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            transform: NodeTransform::default(),
            local_bounds: Aabb::default(),
            kind: NodeKind::Actor,
            selectable: true,
            transformable: true,
            visible: true,
            active: true,
            under_2d_canvas: false,
        }
    }

    pub fn with_transform(mut self, transform: NodeTransform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_translation(mut self, translation: Vec3) -> Self {
        self.transform.translation = translation;
        self
    }

    pub fn with_bounds(mut self, bounds: Aabb) -> Self {
        self.local_bounds = bounds;
        self
    }

    pub fn with_kind(mut self, kind: NodeKind) -> Self {
        self.kind = kind;
        self
    }

    /// Picking bounds in world space.
    pub fn world_bounds(&self) -> Aabb {
        self.local_bounds.transform(&self.transform.matrix())
    }
}

/// Read access to the scene graph (external collaborator).
pub trait SceneQuery {
    /// Enumerate all actors, optionally including inactive ones.
    fn enumerate_actors(&self, include_inactive: bool) -> Vec<NodeId>;

    /// Look up a node by handle. `None` if it was destroyed.
    fn node(&self, id: NodeId) -> Option<&SceneNode>;
}

/// Mutating access to the scene graph (scene-editing sink).
pub trait SceneEdit: SceneQuery {
    fn node_mut(&mut self, id: NodeId) -> Option<&mut SceneNode>;
    fn spawn(&mut self, node: SceneNode) -> NodeId;
    fn remove(&mut self, id: NodeId) -> Option<SceneNode>;
}

/// Flat scene node store (Vec plus id lookup map).
#[derive(Debug, Default)]
pub struct SceneNodes {
    nodes: Vec<SceneNode>,
    index: HashMap<NodeId, usize>,
    next_id: u64,
}

impl SceneNodes {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            index: HashMap::new(),
            next_id: 1,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SceneNode> {
        self.nodes.iter()
    }

    fn next_id(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        id
    }
}

impl SceneQuery for SceneNodes {
    fn enumerate_actors(&self, include_inactive: bool) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|n| include_inactive || n.active)
            .map(|n| n.id)
            .collect()
    }

    fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.index.get(&id).map(|&idx| &self.nodes[idx])
    }
}

impl SceneEdit for SceneNodes {
    fn node_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.index.get(&id).map(|&idx| &mut self.nodes[idx])
    }

    fn spawn(&mut self, mut node: SceneNode) -> NodeId {
        if node.id.0 == 0 {
            node.id = self.next_id();
        } else {
            self.next_id = self.next_id.max(node.id.0 + 1);
        }
        let id = node.id;
        let idx = self.nodes.len();
        self.nodes.push(node);
        self.index.insert(id, idx);
        id
    }

    fn remove(&mut self, id: NodeId) -> Option<SceneNode> {
        let idx = self.index.remove(&id)?;
        let node = self.nodes.remove(idx);
        for slot in self.index.values_mut() {
            if *slot > idx {
                *slot -= 1;
            }
        }
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_assigns_ids() {
        let mut scene = SceneNodes::new();
        let a = scene.spawn(SceneNode::new(NodeId(0), "a"));
        let b = scene.spawn(SceneNode::new(NodeId(0), "b"));
        assert_ne!(a, b);
        assert_eq!(scene.node(a).unwrap().name, "a");
    }

    #[test]
    fn test_remove_keeps_lookup_consistent() {
        let mut scene = SceneNodes::new();
        let a = scene.spawn(SceneNode::new(NodeId(0), "a"));
        let b = scene.spawn(SceneNode::new(NodeId(0), "b"));
        let c = scene.spawn(SceneNode::new(NodeId(0), "c"));

        scene.remove(a);
        assert!(scene.node(a).is_none());
        assert_eq!(scene.node(b).unwrap().name, "b");
        assert_eq!(scene.node(c).unwrap().name, "c");
    }

    #[test]
    fn test_enumerate_skips_inactive() {
        let mut scene = SceneNodes::new();
        scene.spawn(SceneNode::new(NodeId(0), "on"));
        let off = scene.spawn(SceneNode::new(NodeId(0), "off"));
        scene.node_mut(off).unwrap().active = false;

        assert_eq!(scene.enumerate_actors(false).len(), 1);
        assert_eq!(scene.enumerate_actors(true).len(), 2);
    }

    #[test]
    fn test_world_bounds_follow_translation() {
        let node = SceneNode::new(NodeId(1), "n")
            .with_translation(Vec3::new(10.0, 0.0, 0.0))
            .with_bounds(Aabb::from_center_half_extents(Vec3::ZERO, Vec3::ONE));
        let bounds = node.world_bounds();
        assert!((bounds.center() - Vec3::new(10.0, 0.0, 0.0)).length() < 1e-6);
    }
}
