use glam::Vec3;
use oasis_common::{Aabb, Color, NodeId, Ray, Transform};

/// Description of a node to create.
///
/// The transform is local to the parent. `bounds` is a local-space box used
/// for hit-testing; nodes without bounds are never hit.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeSpec {
    pub parent: Option<NodeId>,
    pub label: String,
    pub transform: Transform,
    pub bounds: Option<Aabb>,
    pub color: Option<Color>,
}

impl NodeSpec {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            parent: None,
            label: label.into(),
            transform: Transform::default(),
            bounds: None,
            color: None,
        }
    }

    pub fn child_of(mut self, parent: NodeId) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn at(mut self, position: Vec3) -> Self {
        self.transform.position = position;
        self
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Solid box centered on the node origin.
    pub fn with_box(mut self, half_extents: Vec3) -> Self {
        self.bounds = Some(Aabb::from_half_extents(half_extents));
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }
}

/// A ray hit against a node's bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub node: NodeId,
    pub distance: f32,
}

/// Errors from scene operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SceneError {
    #[error("scene node {0:?} not found")]
    NodeNotFound(NodeId),
}

/// The primitive calls the core issues against the rendering engine.
///
/// Camera, materials and lighting stay on the engine side. The core only
/// creates, moves and removes nodes and asks what a ray hits.
pub trait SceneGraph {
    /// Create a node. Fails if the requested parent does not exist.
    fn create_node(&mut self, spec: NodeSpec) -> Result<NodeId, SceneError>;

    /// Remove a node and its whole subtree. Returns false if the node was
    /// already gone.
    fn remove_node(&mut self, node: NodeId) -> bool;

    /// Replace a node's local transform.
    fn set_transform(&mut self, node: NodeId, transform: Transform) -> Result<(), SceneError>;

    /// Local transform of a node.
    fn transform(&self, node: NodeId) -> Option<Transform>;

    /// Parent of a node, `None` for roots and unknown nodes.
    fn parent(&self, node: NodeId) -> Option<NodeId>;

    fn contains(&self, node: NodeId) -> bool;

    fn node_count(&self) -> usize;

    /// Every node whose bounds the ray crosses, nearest first.
    fn intersect(&self, ray: &Ray) -> Vec<Hit>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_spec_builder() {
        let parent = NodeId::new();
        let spec = NodeSpec::new("cabinet")
            .child_of(parent)
            .at(Vec3::new(1.0, 2.0, 3.0))
            .with_box(Vec3::ONE)
            .with_color(Color::WHITE);
        assert_eq!(spec.parent, Some(parent));
        assert_eq!(spec.transform.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(spec.bounds, Some(Aabb::from_half_extents(Vec3::ONE)));
        assert_eq!(spec.color, Some(Color::WHITE));
    }

    #[test]
    fn node_spec_defaults_to_root_without_bounds() {
        let spec = NodeSpec::new("group");
        assert!(spec.parent.is_none());
        assert!(spec.bounds.is_none());
        assert_eq!(spec.transform, Transform::default());
    }
}
