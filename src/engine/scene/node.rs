use super::SceneNode;
use glam::{Mat4, Quat, Vec3};
use std::fmt;

/// Unique identifier for a scene node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u64);

impl NodeId {
    pub fn from_u64(id: u64) -> Self {
        Self(id)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Reference scene node: a named transform plus the last reported sleep state
#[derive(Debug, Clone)]
pub struct Node {
    id: NodeId,
    name: String,
    pose: Mat4,
    sleeping: bool,
    /// Number of awake -> asleep transitions observed
    sleep_count: u32,
}

impl Node {
    pub fn new(id: NodeId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            pose: Mat4::IDENTITY,
            sleeping: false,
            sleep_count: 0,
        }
    }

    /// Current global pose
    pub fn pose(&self) -> Mat4 {
        self.pose
    }

    /// World-space position extracted from the pose
    pub fn position(&self) -> Vec3 {
        self.pose.w_axis.truncate()
    }

    /// World-space orientation extracted from the pose
    pub fn rotation(&self) -> Quat {
        let (_, rotation, _) = self.pose.to_scale_rotation_translation();
        rotation
    }

    pub fn is_sleeping(&self) -> bool {
        self.sleeping
    }

    pub fn sleep_count(&self) -> u32 {
        self.sleep_count
    }
}

impl SceneNode for Node {
    fn id(&self) -> NodeId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn set_pose(&mut self, pose: Mat4) {
        self.pose = pose;
    }

    fn on_sleep(&mut self, sleeping: bool) {
        if sleeping && !self.sleeping {
            self.sleep_count += 1;
            log::debug!("Node '{}' fell asleep", self.name);
        } else if !sleeping && self.sleeping {
            log::debug!("Node '{}' woke up", self.name);
        }
        self.sleeping = sleeping;
    }
}
