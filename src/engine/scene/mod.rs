// Minimal scene-graph interface the physics manager writes results into

mod graph;
mod node;

pub use graph::Scene;
pub use node::{Node, NodeId};

use glam::Mat4;

/// A caller-owned, transformable scene entity backed by a physics actor
pub trait SceneNode {
    /// Stable identifier used as the actor's back-reference
    fn id(&self) -> NodeId;

    /// Display name, copied onto the actor at spawn time
    fn name(&self) -> &str;

    /// Receive the simulated global pose (column-major 4x4)
    fn set_pose(&mut self, pose: Mat4);

    /// Receive the actor's sleep state after a step
    fn on_sleep(&mut self, sleeping: bool);
}

/// Lookup from back-references to live nodes during synchronization
pub trait SceneGraph {
    type Node: SceneNode;

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Self::Node>;
}
