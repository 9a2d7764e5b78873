use super::{Node, NodeId, SceneGraph, SceneNode};
use std::collections::HashMap;

/// Flat reference scene graph owning its nodes by id
#[derive(Debug, Default)]
pub struct Scene {
    nodes: HashMap<NodeId, Node>,
    next_id: u64,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a node and return its id
    pub fn spawn(&mut self, name: impl Into<String>) -> NodeId {
        self.next_id += 1;
        let id = NodeId(self.next_id);
        self.nodes.insert(id, Node::new(id, name));
        id
    }

    /// Remove a node, returning it if it existed
    pub fn despawn(&mut self, id: NodeId) -> Option<Node> {
        self.nodes.remove(&id)
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate nodes in id order
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        let mut nodes: Vec<_> = self.nodes.values().collect();
        nodes.sort_by_key(|node| node.id());
        nodes.into_iter()
    }
}

impl SceneGraph for Scene {
    type Node = Node;

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_assigns_unique_ids() {
        let mut scene = Scene::new();
        let a = scene.spawn("a");
        let b = scene.spawn("b");
        assert_ne!(a, b);
        assert_eq!(scene.len(), 2);
        assert_eq!(scene.get(a).map(|n| n.name()), Some("a"));
    }

    #[test]
    fn test_despawn() {
        let mut scene = Scene::new();
        let a = scene.spawn("a");
        assert!(scene.despawn(a).is_some());
        assert!(scene.node_mut(a).is_none());
        assert!(scene.is_empty());
    }

    #[test]
    fn test_iter_is_ordered() {
        let mut scene = Scene::new();
        for name in ["c", "a", "b"] {
            scene.spawn(name);
        }
        let names: Vec<_> = scene.iter().map(|n| n.name().to_string()).collect();
        assert_eq!(names, vec!["c", "a", "b"]);
    }
}
