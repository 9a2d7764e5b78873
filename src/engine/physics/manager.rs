use rapier3d::prelude::*;
use std::collections::HashMap;

use glam::Vec3;

use super::body::{presets, ActorBuilder, ActorKind};
use super::collision::{ContactEvent, ContactEventQueue};
use super::debug::{ContactRecord, DebugLines, DebugRecorder, SceneQueryRecord};
use super::PhysicsError;
use crate::core::math::{all_positive, from_point, from_vector, isometry_to_mat4, to_point, to_vector};
use crate::engine::config::PhysicsConfig;
use crate::engine::scene::{NodeId, SceneGraph, SceneNode};

/// Handle to an actor created by the manager
pub type ActorHandle = RigidBodyHandle;

/// Name given to the ground plane created at initialization
pub const GROUND_PLANE_NAME: &str = "Ground_Plane";

/// Bookkeeping for one actor
#[derive(Debug, Clone, PartialEq)]
pub struct ActorInfo {
    pub name: String,
    /// Back-reference to the scene node this actor drives
    pub node: Option<NodeId>,
    pub kind: ActorKind,
}

/// Result of a pick ray cast
#[derive(Debug, Clone, PartialEq)]
pub struct PickHit {
    pub handle: ActorHandle,
    pub name: String,
    pub node: Option<NodeId>,
    /// World-space hit point
    pub point: Vec3,
    /// Distance along the normalized ray
    pub distance: f32,
    /// Whether an impulse was applied (dynamic actors only)
    pub pushed: bool,
}

/// Owns the engine state and shuttles results onto scene nodes
pub struct PhysicsManager {
    /// Settings the manager was initialized with
    config: PhysicsConfig,

    /// Gravity vector (default: -9.81 m/s² in y-axis)
    gravity: Vector<Real>,

    /// Integration parameters; `dt` is set on every `simulate` call
    integration_parameters: IntegrationParameters,

    /// Physics pipeline handles collision detection and solving
    physics_pipeline: PhysicsPipeline,

    /// Island manager for sleeping bodies
    island_manager: IslandManager,

    /// Broad phase collision detection
    broad_phase: DefaultBroadPhase,

    /// Narrow phase collision detection
    narrow_phase: NarrowPhase,

    /// Impulse joint set (unused by the spawn operations, required by the pipeline)
    impulse_joint_set: ImpulseJointSet,

    /// Multibody joint set
    multibody_joint_set: MultibodyJointSet,

    /// CCD solver for fast-moving objects
    ccd_solver: CCDSolver,

    /// Query pipeline for pick ray casts
    query_pipeline: QueryPipeline,

    /// Rigid body set
    rigid_body_set: RigidBodySet,

    /// Collider set
    collider_set: ColliderSet,

    /// Collision event handler
    contact_queue: ContactEventQueue,

    /// Contact transitions raised by the last step
    contacts: Vec<ContactEvent>,

    /// Name, node back-reference and kind of every actor
    actors: HashMap<ActorHandle, ActorInfo>,

    /// Reverse lookup from scene node to its actor
    node_to_actor: HashMap<NodeId, ActorHandle>,

    /// The ground plane, when enabled
    ground: Option<ActorHandle>,

    /// In-process capture of contacts and scene queries
    debugger: DebugRecorder,

    /// Steps completed since initialization
    step_count: u64,
}

impl PhysicsManager {
    /// Initialize the engine from a validated configuration
    pub fn new(config: PhysicsConfig) -> Result<Self, PhysicsError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: PhysicsConfig) -> Self {
        log::info!("Initializing physics");

        let mut manager = Self {
            gravity: to_vector(config.gravity_vec()),
            integration_parameters: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            contact_queue: ContactEventQueue::new(),
            contacts: Vec::new(),
            actors: HashMap::new(),
            node_to_actor: HashMap::new(),
            ground: None,
            debugger: DebugRecorder::new(config.debugger),
            step_count: 0,
            config,
        };

        if manager.config.ground_plane {
            let builder = presets::ground_plane(&manager.config);
            let handle = manager.insert(builder, GROUND_PLANE_NAME.to_string(), None);
            manager.ground = Some(handle);
        }

        manager
    }

    /// Advance the simulation by `delta` seconds and wait for the results
    pub fn simulate(&mut self, delta: f32) -> Result<(), PhysicsError> {
        if !(delta.is_finite() && delta > 0.0) {
            return Err(PhysicsError::InvalidTimestep(delta));
        }
        self.integration_parameters.dt = delta;

        self.contact_queue.clear();
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &self.contact_queue,
        );
        self.step_count += 1;
        self.contacts = self.contact_queue.take();

        if !self.contacts.is_empty() {
            log::trace!(
                "Step {}: {} contact transitions",
                self.step_count,
                self.contacts.len()
            );
        }

        if self.debugger.captures_contacts() && !self.contacts.is_empty() {
            let records = self
                .contacts
                .iter()
                .map(|event| {
                    let (a, b) = event.bodies();
                    ContactRecord {
                        started: event.is_started(),
                        first: self.display_name(a),
                        second: self.display_name(b),
                    }
                })
                .collect();
            self.debugger.record_contacts(self.step_count, records);
        }

        Ok(())
    }

    /// Spawn a dynamic 2x2x2 cube driving `node`
    pub fn create_cube<N: SceneNode + ?Sized>(
        &mut self,
        position: Vec3,
        node: &N,
        velocity: Vec3,
    ) -> Result<ActorHandle, PhysicsError> {
        let builder = presets::cube(&self.config, position, velocity);
        self.spawn(builder, node)
    }

    /// Spawn a static box driving `node`
    pub fn create_static_cube<N: SceneNode + ?Sized>(
        &mut self,
        position: Vec3,
        half_extents: Vec3,
        node: &N,
    ) -> Result<ActorHandle, PhysicsError> {
        if !all_positive(half_extents) {
            return Err(PhysicsError::InvalidShape(format!(
                "half extents must be positive, got {}",
                half_extents
            )));
        }
        let builder = presets::static_cube(&self.config, position, half_extents);
        self.spawn(builder, node)
    }

    /// Spawn a dynamic sphere driving `node`
    pub fn create_sphere<N: SceneNode + ?Sized>(
        &mut self,
        position: Vec3,
        radius: f32,
        node: &N,
        velocity: Vec3,
    ) -> Result<ActorHandle, PhysicsError> {
        if !(radius.is_finite() && radius > 0.0) {
            return Err(PhysicsError::InvalidShape(format!(
                "radius must be positive, got {}",
                radius
            )));
        }
        let builder = presets::sphere(&self.config, position, radius, velocity);
        self.spawn(builder, node)
    }

    fn spawn<N: SceneNode + ?Sized>(
        &mut self,
        builder: ActorBuilder,
        node: &N,
    ) -> Result<ActorHandle, PhysicsError> {
        let id = node.id();
        if self.node_to_actor.contains_key(&id) {
            return Err(PhysicsError::DuplicateNode(id));
        }

        let kind = builder.kind();
        let handle = self.insert(builder, node.name().to_string(), Some(id));
        self.node_to_actor.insert(id, handle);
        log::debug!("Spawned {:?} actor '{}' for node {}", kind, node.name(), id);
        Ok(handle)
    }

    fn insert(&mut self, builder: ActorBuilder, name: String, node: Option<NodeId>) -> ActorHandle {
        let kind = builder.kind();
        let (body, collider) = builder.build();
        let handle = self.rigid_body_set.insert(body);
        self.collider_set
            .insert_with_parent(collider, handle, &mut self.rigid_body_set);

        // Mass and inertia are available right away rather than after the next step
        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            body.recompute_mass_properties_from_colliders(&self.collider_set);
        }

        self.actors.insert(handle, ActorInfo { name, node, kind });
        handle
    }

    /// Remove the actor driving `node`
    pub fn remove_actor(&mut self, node: NodeId) -> Result<ActorInfo, PhysicsError> {
        let handle = self
            .node_to_actor
            .remove(&node)
            .ok_or(PhysicsError::UnknownNode(node))?;

        self.rigid_body_set.remove(
            handle,
            &mut self.island_manager,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            true, // remove attached colliders
        );
        let info = self
            .actors
            .remove(&handle)
            .ok_or(PhysicsError::UnknownNode(node))?;
        log::debug!("Removed actor '{}' for node {}", info.name, node);
        Ok(info)
    }

    /// Push the simulated pose and sleep state of every actor onto its node.
    ///
    /// Returns the number of nodes updated.
    pub fn update_nodes<G: SceneGraph + ?Sized>(&self, scene: &mut G) -> usize {
        let mut updated = 0;

        for (handle, body) in self.rigid_body_set.iter() {
            if !(body.is_dynamic() || body.is_fixed()) {
                continue;
            }
            let sleeping = body.is_dynamic() && body.is_sleeping();

            let Some(node_id) = self.actors.get(&handle).and_then(|info| info.node) else {
                continue;
            };
            match scene.node_mut(node_id) {
                Some(node) => {
                    node.set_pose(isometry_to_mat4(body.position()));
                    node.on_sleep(sleeping);
                    updated += 1;
                }
                None => log::trace!("Node {} missing from scene, skipping", node_id),
            }
        }

        updated
    }

    /// Cast a ray against every actor and push the closest one if it is dynamic.
    ///
    /// Actors spawned or removed since the last step are taken into account.
    pub fn ray_cast(&mut self, origin: Vec3, direction: Vec3) -> Result<Option<PickHit>, PhysicsError> {
        let direction = direction.normalize_or_zero();
        if direction == Vec3::ZERO || !origin.is_finite() {
            return Err(PhysicsError::InvalidDirection);
        }

        // The pipeline is otherwise only refreshed inside `step`
        self.query_pipeline.update(&self.rigid_body_set, &self.collider_set);

        let max_distance = self.config.pick.max_distance;
        let ray = Ray::new(to_point(origin), to_vector(direction));
        let hit = self.query_pipeline.cast_ray(
            &self.rigid_body_set,
            &self.collider_set,
            &ray,
            max_distance,
            true,
            QueryFilter::default(),
        );

        let result = match hit {
            Some((collider, distance)) => {
                match self.collider_set.get(collider).and_then(|c| c.parent()) {
                    Some(handle) => {
                        let (name, node) = self
                            .actors
                            .get(&handle)
                            .map(|info| (info.name.clone(), info.node))
                            .unwrap_or_default();
                        log::info!("Item Picked: {}", name);

                        let pushed = self.push(handle);
                        Some(PickHit {
                            handle,
                            name,
                            node,
                            point: from_point(&ray.point_at(distance)),
                            distance,
                            pushed,
                        })
                    }
                    None => None,
                }
            }
            None => None,
        };

        self.debugger.record_query(
            self.step_count,
            SceneQueryRecord {
                origin,
                direction,
                max_distance,
                hit: result.as_ref().map(|h| (h.name.clone(), h.distance)),
            },
        );

        Ok(result)
    }

    /// Apply the configured pick impulse at the configured local point
    fn push(&mut self, handle: ActorHandle) -> bool {
        let pick = self.config.pick;
        let Some(body) = self.rigid_body_set.get_mut(handle) else {
            return false;
        };
        if !body.is_dynamic() {
            return false;
        }

        let point = body.position() * to_point(Vec3::from_array(pick.local_offset));
        body.apply_impulse_at_point(to_vector(Vec3::from_array(pick.impulse)), point, true);
        true
    }

    fn display_name(&self, handle: Option<ActorHandle>) -> String {
        handle
            .and_then(|h| self.actors.get(&h))
            .map(|info| info.name.clone())
            .unwrap_or_else(|| "<unknown>".to_string())
    }

    pub fn actor(&self, handle: ActorHandle) -> Option<&ActorInfo> {
        self.actors.get(&handle)
    }

    pub fn actor_for_node(&self, node: NodeId) -> Option<ActorHandle> {
        self.node_to_actor.get(&node).copied()
    }

    /// Number of actors, ground plane included
    pub fn actor_count(&self) -> usize {
        self.actors.len()
    }

    pub fn ground(&self) -> Option<ActorHandle> {
        self.ground
    }

    /// Engine body behind an actor, for read-only inspection
    pub fn body(&self, handle: ActorHandle) -> Option<&RigidBody> {
        self.rigid_body_set.get(handle)
    }

    /// Linear velocity of an actor
    pub fn linear_velocity(&self, handle: ActorHandle) -> Option<Vec3> {
        self.rigid_body_set.get(handle).map(|b| from_vector(b.linvel()))
    }

    pub fn gravity(&self) -> Vec3 {
        from_vector(&self.gravity)
    }

    pub fn set_gravity(&mut self, gravity: Vec3) {
        self.gravity = to_vector(gravity);
    }

    /// Number of completed steps
    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    /// Contact transitions raised by the last step
    pub fn contacts(&self) -> &[ContactEvent] {
        &self.contacts
    }

    pub fn debugger(&self) -> &DebugRecorder {
        &self.debugger
    }

    /// Wireframe of every collider in its current pose
    pub fn debug_lines(&self) -> DebugLines {
        DebugLines::from_world(&self.rigid_body_set, &self.collider_set)
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }
}

impl Default for PhysicsManager {
    fn default() -> Self {
        Self::build(PhysicsConfig::default())
    }
}

impl Drop for PhysicsManager {
    fn drop(&mut self) {
        log::info!(
            "Cleaning physics ({} actors, {} steps)",
            self.actors.len(),
            self.step_count
        );
    }
}
