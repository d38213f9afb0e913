//! Live scene graph
//!
//! Nodes are stored in an arena and linked by [`NodeId`]. The graph always
//! has a root group; everything a scene description produces hangs below it.
//! Nodes hold keys into [`GpuResources`](crate::render::GpuResources) rather
//! than the resources themselves, so tearing a subtree down is a walk over
//! those keys followed by removing the nodes.

use slotmap::{new_key_type, SlotMap};

use crate::foundation::math::{Mat4, Transform};
use crate::render::{GeometryKey, Light, MaterialKey};

new_key_type! {
    /// Handle to a node in a [`SceneGraph`]
    pub struct NodeId;
}

/// Materials held by a mesh node
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MaterialSlot {
    /// No material
    #[default]
    None,
    /// One material for the whole geometry
    Single(MaterialKey),
    /// One material per geometry group
    Multi(Vec<MaterialKey>),
}

impl MaterialSlot {
    /// Every material key held, in slot order
    pub fn keys(&self) -> &[MaterialKey] {
        match self {
            MaterialSlot::None => &[],
            MaterialSlot::Single(key) => std::slice::from_ref(key),
            MaterialSlot::Multi(keys) => keys,
        }
    }
}

/// Renderable payload of a mesh node
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MeshNode {
    /// Geometry resource, if any
    pub geometry: Option<GeometryKey>,
    /// Material resource(s)
    pub materials: MaterialSlot,
}

/// Closed set of node variants
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Pure transform node
    Group,
    /// Light source
    Light(Light),
    /// Renderable mesh
    Mesh(MeshNode),
}

/// A scene graph node
#[derive(Debug, Clone)]
pub struct Node {
    /// Optional name, empty when unnamed
    pub name: String,
    /// Variant payload
    pub kind: NodeKind,
    /// Local transform relative to the parent
    pub transform: Transform,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    /// Create a detached node
    pub fn new(kind: NodeKind) -> Self {
        Self {
            name: String::new(),
            kind,
            transform: Transform::identity(),
            parent: None,
            children: Vec::new(),
        }
    }

    /// Create an empty group
    pub fn group() -> Self {
        Self::new(NodeKind::Group)
    }

    /// Create a light node
    pub fn light(light: Light) -> Self {
        Self::new(NodeKind::Light(light))
    }

    /// Create a mesh node
    pub fn mesh(mesh: MeshNode) -> Self {
        Self::new(NodeKind::Mesh(mesh))
    }

    /// Set the node name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the local transform
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Parent node, `None` when detached or for the root
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Child nodes in insertion order
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Mesh payload, if this is a mesh
    pub fn as_mesh(&self) -> Option<&MeshNode> {
        match &self.kind {
            NodeKind::Mesh(mesh) => Some(mesh),
            _ => None,
        }
    }

    /// Light payload, if this is a light
    pub fn as_light(&self) -> Option<&Light> {
        match &self.kind {
            NodeKind::Light(light) => Some(light),
            _ => None,
        }
    }

    /// Whether this is a group node
    pub fn is_group(&self) -> bool {
        matches!(self.kind, NodeKind::Group)
    }
}

/// Arena-backed tree of scene nodes
pub struct SceneGraph {
    nodes: SlotMap<NodeId, Node>,
    root: NodeId,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph {
    /// Create a graph holding only the root group
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(Node::group().with_name("Scene"));
        Self { nodes, root }
    }

    /// Root node
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Insert a node without attaching it
    pub fn insert(&mut self, node: Node) -> NodeId {
        let mut node = node;
        node.parent = None;
        node.children.clear();
        self.nodes.insert(node)
    }

    /// Attach `child` under `parent`, detaching it from any previous parent
    ///
    /// Returns false when either node is missing, `child` is the root, or the
    /// attachment would create a cycle.
    pub fn attach(&mut self, parent: NodeId, child: NodeId) -> bool {
        if child == self.root || !self.nodes.contains_key(parent) || !self.nodes.contains_key(child) {
            return false;
        }
        if parent == child || self.is_ancestor(child, parent) {
            return false;
        }
        self.detach(child);
        self.nodes[child].parent = Some(parent);
        self.nodes[parent].children.push(child);
        true
    }

    /// Insert a node and attach it under `parent`
    pub fn add(&mut self, parent: NodeId, node: Node) -> NodeId {
        let id = self.insert(node);
        self.attach(parent, id);
        id
    }

    /// Detach a node from its parent; returns false if it had none
    pub fn detach(&mut self, id: NodeId) -> bool {
        let Some(parent) = self.nodes.get_mut(id).and_then(|node| node.parent.take()) else {
            return false;
        };
        if let Some(parent_node) = self.nodes.get_mut(parent) {
            parent_node.children.retain(|&c| c != id);
        }
        true
    }

    /// Detach a node and remove it with all descendants
    ///
    /// The root is never removed; use [`SceneGraph::descendants`] on the root
    /// and remove its children instead. Returns the number of nodes removed.
    pub fn remove_subtree(&mut self, id: NodeId) -> usize {
        if id == self.root || !self.nodes.contains_key(id) {
            return 0;
        }
        self.detach(id);
        let mut stack = vec![id];
        let mut removed = 0;
        while let Some(next) = stack.pop() {
            if let Some(node) = self.nodes.remove(next) {
                stack.extend(node.children);
                removed += 1;
            }
        }
        removed
    }

    /// Node by id, if it is still in the graph
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Node by id, mutable
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    /// Whether the node is still in the graph
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Children of a node (empty for unknown ids)
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(id).map(|node| node.children.as_slice()).unwrap_or(&[])
    }

    /// Parent of a node
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id).and_then(|node| node.parent)
    }

    /// First direct child of `parent` with the given name
    pub fn find_child(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        self.children(parent)
            .iter()
            .copied()
            .find(|&child| self.nodes[child].name == name)
    }

    /// First node below the root matching `predicate`, depth-first
    pub fn find(&self, predicate: impl Fn(&Node) -> bool) -> Option<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .find(|&id| predicate(&self.nodes[id]))
    }

    /// First node below the root with the given name
    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.find(|node| node.name == name)
    }

    /// All descendants of `id` in depth-first pre-order, excluding `id`
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }

    /// Accumulated transform from the node up to the root
    pub fn world_matrix(&self, id: NodeId) -> Mat4 {
        let mut matrix = Mat4::identity();
        let mut current = Some(id);
        while let Some(node) = current.and_then(|c| self.nodes.get(c)) {
            matrix = node.transform.to_matrix() * matrix;
            current = node.parent;
        }
        matrix
    }

    /// Total number of nodes, root included
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of light nodes attached below the root
    pub fn light_count(&self) -> usize {
        self.descendants(self.root)
            .iter()
            .filter(|&&id| self.nodes[id].as_light().is_some())
            .count()
    }

    /// Number of mesh nodes attached below the root
    pub fn mesh_count(&self) -> usize {
        self.descendants(self.root)
            .iter()
            .filter(|&&id| self.nodes[id].as_mesh().is_some())
            .count()
    }

    fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = self.parent(id);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.parent(node);
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{Vec3, Vec4};
    use approx::assert_relative_eq;

    #[test]
    fn test_add_and_find() {
        let mut graph = SceneGraph::new();
        let root = graph.root();
        let group = graph.add(root, Node::group().with_name("ojos"));
        let eye = graph.add(group, Node::mesh(MeshNode::default()).with_name("eye"));

        assert_eq!(graph.parent(eye), Some(group));
        assert_eq!(graph.find_child(root, "ojos"), Some(group));
        assert_eq!(graph.find_by_name("eye"), Some(eye));
        assert_eq!(graph.find(|n| n.is_group()), Some(group));
        assert_eq!(graph.descendants(root), vec![group, eye]);
        assert_eq!(graph.mesh_count(), 1);
    }

    #[test]
    fn test_attach_rejects_cycles_and_root() {
        let mut graph = SceneGraph::new();
        let root = graph.root();
        let a = graph.add(root, Node::group());
        let b = graph.add(a, Node::group());

        assert!(!graph.attach(b, a));
        assert!(!graph.attach(a, a));
        assert!(!graph.attach(a, root));
        assert!(graph.attach(root, b));
        assert_eq!(graph.children(root), &[a, b]);
        assert!(graph.children(a).is_empty());
    }

    #[test]
    fn test_remove_subtree_drops_descendants() {
        let mut graph = SceneGraph::new();
        let root = graph.root();
        let a = graph.add(root, Node::group());
        let b = graph.add(a, Node::group());
        graph.add(b, Node::group());

        assert_eq!(graph.remove_subtree(a), 3);
        assert_eq!(graph.node_count(), 1);
        assert!(graph.children(root).is_empty());
        assert_eq!(graph.remove_subtree(root), 0);
    }

    #[test]
    fn test_world_matrix_composes_parents() {
        let mut graph = SceneGraph::new();
        let root = graph.root();
        let parent = graph.add(
            root,
            Node::group().with_transform(Transform::from_position(Vec3::new(1.0, 0.0, 0.0))),
        );
        let child = graph.add(
            parent,
            Node::group().with_transform(Transform::from_position(Vec3::new(0.0, 2.0, 0.0))),
        );

        let p = graph.world_matrix(child) * Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert_relative_eq!(p.x, 1.0);
        assert_relative_eq!(p.y, 2.0);
    }
}
