// Physics system using rapier3d

pub mod body;
mod collision;
pub mod debug;
mod manager;

pub use body::{ActorBuilder, ActorKind};
pub use collision::{ContactEvent, ContactEventQueue};
pub use debug::{ContactRecord, DebugFrame, DebugLines, DebugRecorder, DebugVertex, SceneQueryRecord};
pub use manager::{ActorHandle, ActorInfo, PhysicsManager, PickHit, GROUND_PLANE_NAME};

use crate::engine::scene::NodeId;

/// Physics manager errors
#[derive(Debug, thiserror::Error)]
pub enum PhysicsError {
    #[error("Invalid timestep: {0} (must be finite and positive)")]
    InvalidTimestep(f32),

    #[error("Invalid shape: {0}")]
    InvalidShape(String),

    #[error("Invalid ray: direction must be finite and non-zero, origin finite")]
    InvalidDirection,

    #[error("Node {0} already has an actor")]
    DuplicateNode(NodeId),

    #[error("No actor for node {0}")]
    UnknownNode(NodeId),

    #[error("Invalid config: {0}")]
    Config(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_physics_error_display() {
        let err = PhysicsError::DuplicateNode(NodeId::from_u64(7));
        assert_eq!(err.to_string(), "Node #7 already has an actor");

        let err = PhysicsError::InvalidTimestep(-1.0);
        assert!(err.to_string().contains("-1"));
    }
}
