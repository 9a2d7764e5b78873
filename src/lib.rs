//! Rigid-body physics manager that drives scene-graph nodes.
//!
//! `PhysicsManager` wraps a rapier3d world: it spawns actors for scene nodes,
//! steps the simulation, writes poses and sleep state back onto the nodes and
//! offers a ray-cast "pick and push" interaction.

pub mod core;
pub mod engine;

pub use engine::config::{DebuggerConfig, MaterialConfig, PhysicsConfig, PickConfig};
pub use engine::physics::{ActorHandle, ActorInfo, ActorKind, PhysicsError, PhysicsManager, PickHit};
pub use engine::scene::{Node, NodeId, Scene, SceneGraph, SceneNode};
pub use engine::stepper::FixedStepper;
