use glam::Mat4;
use oasis_common::{Aabb, Color, NodeId, Ray, Transform};
use std::collections::BTreeMap;

use crate::graph::{Hit, NodeSpec, SceneError, SceneGraph};

#[derive(Debug, Clone)]
struct SceneNode {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    label: String,
    transform: Transform,
    bounds: Option<Aabb>,
    color: Option<Color>,
}

/// In-process scene graph.
///
/// Stands in for the rendering engine in the CLI and in tests. Nodes live in
/// a BTreeMap and hit-testing transforms each node's local box into world
/// space through its ancestor chain.
#[derive(Debug, Clone, Default)]
pub struct MemoryScene {
    nodes: BTreeMap<NodeId, SceneNode>,
}

impl MemoryScene {
    pub fn new() -> Self {
        Self::default()
    }

    /// First node carrying the given label.
    pub fn find(&self, label: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .find(|(_, n)| n.label == label)
            .map(|(id, _)| *id)
    }

    pub fn label(&self, node: NodeId) -> Option<&str> {
        self.nodes.get(&node).map(|n| n.label.as_str())
    }

    pub fn color(&self, node: NodeId) -> Option<Color> {
        self.nodes.get(&node).and_then(|n| n.color)
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes
            .get(&node)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn roots(&self) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|(_, n)| n.parent.is_none())
            .map(|(id, _)| *id)
            .collect()
    }

    /// Local-to-world matrix of a node.
    pub fn world_matrix(&self, node: NodeId) -> Option<Mat4> {
        let mut data = self.nodes.get(&node)?;
        let mut matrix = data.transform.matrix();
        while let Some(parent) = data.parent {
            data = self.nodes.get(&parent)?;
            matrix = data.transform.matrix() * matrix;
        }
        Some(matrix)
    }

    /// Human-readable dump of the scene tree.
    pub fn describe(&self) -> String {
        let mut out = format!("=== Scene ({} nodes) ===\n", self.nodes.len());
        let mut roots = self.roots();
        roots.sort_by(|a, b| self.label(*a).cmp(&self.label(*b)));
        for root in roots {
            self.describe_node(root, 1, &mut out);
        }
        out
    }

    fn describe_node(&self, node: NodeId, depth: usize, out: &mut String) {
        let Some(data) = self.nodes.get(&node) else {
            return;
        };
        let p = data.transform.position;
        out.push_str(&format!(
            "{}[{}] {} pos=({:.2}, {:.2}, {:.2})",
            "  ".repeat(depth),
            node.short(),
            data.label,
            p.x,
            p.y,
            p.z
        ));
        if let Some(color) = data.color {
            out.push_str(&format!(" color={color}"));
        }
        out.push('\n');
        for child in &data.children {
            self.describe_node(*child, depth + 1, out);
        }
    }

    fn collect_subtree(&self, node: NodeId, out: &mut Vec<NodeId>) {
        out.push(node);
        if let Some(data) = self.nodes.get(&node) {
            for child in &data.children {
                self.collect_subtree(*child, out);
            }
        }
    }
}

impl SceneGraph for MemoryScene {
    fn create_node(&mut self, spec: NodeSpec) -> Result<NodeId, SceneError> {
        if let Some(parent) = spec.parent {
            if !self.nodes.contains_key(&parent) {
                return Err(SceneError::NodeNotFound(parent));
            }
        }
        let id = NodeId::new();
        if let Some(parent) = spec.parent {
            if let Some(p) = self.nodes.get_mut(&parent) {
                p.children.push(id);
            }
        }
        self.nodes.insert(
            id,
            SceneNode {
                parent: spec.parent,
                children: Vec::new(),
                label: spec.label,
                transform: spec.transform,
                bounds: spec.bounds,
                color: spec.color,
            },
        );
        Ok(id)
    }

    fn remove_node(&mut self, node: NodeId) -> bool {
        let Some(parent) = self.nodes.get(&node).map(|n| n.parent) else {
            return false;
        };
        if let Some(p) = parent.and_then(|p| self.nodes.get_mut(&p)) {
            p.children.retain(|c| *c != node);
        }
        let mut doomed = Vec::new();
        self.collect_subtree(node, &mut doomed);
        tracing::trace!(node = %node.short(), removed = doomed.len(), "scene subtree removed");
        for id in doomed {
            self.nodes.remove(&id);
        }
        true
    }

    fn set_transform(&mut self, node: NodeId, transform: Transform) -> Result<(), SceneError> {
        let data = self
            .nodes
            .get_mut(&node)
            .ok_or(SceneError::NodeNotFound(node))?;
        data.transform = transform;
        Ok(())
    }

    fn transform(&self, node: NodeId) -> Option<Transform> {
        self.nodes.get(&node).map(|n| n.transform)
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(&node).and_then(|n| n.parent)
    }

    fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains_key(&node)
    }

    fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn intersect(&self, ray: &Ray) -> Vec<Hit> {
        let mut hits: Vec<Hit> = self
            .nodes
            .iter()
            .filter_map(|(id, data)| {
                let bounds = data.bounds?;
                let world = bounds.transformed(&self.world_matrix(*id)?);
                world
                    .intersect_ray(ray)
                    .map(|distance| Hit { node: *id, distance })
            })
            .collect();
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }
}
