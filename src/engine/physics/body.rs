use crate::core::math::to_vector;
use crate::engine::config::{MaterialConfig, PhysicsConfig};
use glam::Vec3;
use rapier3d::prelude::*;

/// Half extent of the cubes spawned by `PhysicsManager::create_cube`
pub const CUBE_HALF_EXTENT: Real = 1.0;

/// Whether an actor is simulated or immovable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActorKind {
    Dynamic,
    Static,
}

/// Builder for a rigid body and its single collider
pub struct ActorBuilder {
    kind: ActorKind,
    shape: SharedShape,
    position: Vec3,
    linvel: Vec3,
    angular_damping: Real,
    density: Real,
    material: MaterialConfig,
}

impl ActorBuilder {
    /// Create a dynamic actor (affected by gravity, forces and contacts)
    pub fn dynamic(shape: SharedShape) -> Self {
        Self {
            kind: ActorKind::Dynamic,
            shape,
            position: Vec3::ZERO,
            linvel: Vec3::ZERO,
            angular_damping: 0.0,
            density: 1.0,
            material: MaterialConfig::default(),
        }
    }

    /// Create a static actor (never moves)
    pub fn fixed(shape: SharedShape) -> Self {
        Self {
            kind: ActorKind::Static,
            ..Self::dynamic(shape)
        }
    }

    pub fn position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Initial linear velocity; ignored for static actors
    pub fn linvel(mut self, linvel: Vec3) -> Self {
        self.linvel = linvel;
        self
    }

    pub fn angular_damping(mut self, damping: Real) -> Self {
        self.angular_damping = damping;
        self
    }

    /// Density the engine derives mass and inertia from
    pub fn density(mut self, density: Real) -> Self {
        self.density = density;
        self
    }

    pub fn material(mut self, material: MaterialConfig) -> Self {
        self.material = material;
        self
    }

    pub fn kind(&self) -> ActorKind {
        self.kind
    }

    /// Build the body and the collider to attach to it
    pub fn build(self) -> (RigidBody, Collider) {
        let body = match self.kind {
            ActorKind::Dynamic => RigidBodyBuilder::dynamic()
                .translation(to_vector(self.position))
                .linvel(to_vector(self.linvel))
                .angular_damping(self.angular_damping)
                .build(),
            ActorKind::Static => RigidBodyBuilder::fixed()
                .translation(to_vector(self.position))
                .build(),
        };

        let mut collider = ColliderBuilder::new(self.shape)
            .friction(self.material.dynamic_friction)
            .restitution(self.material.restitution)
            .active_events(ActiveEvents::COLLISION_EVENTS);
        if self.kind == ActorKind::Dynamic {
            collider = collider.density(self.density);
        }

        (body, collider.build())
    }
}

/// Actor configurations used by the manager's spawn operations
pub mod presets {
    use super::*;

    /// Dynamic 2x2x2 cube
    pub fn cube(config: &PhysicsConfig, position: Vec3, velocity: Vec3) -> ActorBuilder {
        ActorBuilder::dynamic(SharedShape::cuboid(
            CUBE_HALF_EXTENT,
            CUBE_HALF_EXTENT,
            CUBE_HALF_EXTENT,
        ))
        .position(position)
        .linvel(velocity)
        .angular_damping(config.angular_damping)
        .density(config.density)
        .material(config.material)
    }

    /// Static box with arbitrary half extents
    pub fn static_cube(config: &PhysicsConfig, position: Vec3, half_extents: Vec3) -> ActorBuilder {
        ActorBuilder::fixed(SharedShape::cuboid(
            half_extents.x,
            half_extents.y,
            half_extents.z,
        ))
        .position(position)
        .material(config.material)
    }

    /// Dynamic ball
    pub fn sphere(config: &PhysicsConfig, position: Vec3, radius: Real, velocity: Vec3) -> ActorBuilder {
        ActorBuilder::dynamic(SharedShape::ball(radius))
            .position(position)
            .linvel(velocity)
            .angular_damping(config.angular_damping)
            .density(config.density)
            .material(config.material)
    }

    /// Infinite static plane through the origin, facing +Y
    pub fn ground_plane(config: &PhysicsConfig) -> ActorBuilder {
        ActorBuilder::fixed(SharedShape::halfspace(Vector::y_axis())).material(config.material)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dynamic_builder() {
        let (body, collider) = ActorBuilder::dynamic(SharedShape::ball(0.5))
            .position(Vec3::new(1.0, 2.0, 3.0))
            .linvel(Vec3::new(4.0, 0.0, 0.0))
            .angular_damping(0.5)
            .build();

        assert_eq!(body.body_type(), RigidBodyType::Dynamic);
        assert_eq!(body.translation().x, 1.0);
        assert_eq!(body.translation().y, 2.0);
        assert_eq!(body.translation().z, 3.0);
        assert_eq!(body.linvel().x, 4.0);
        assert_eq!(body.angular_damping(), 0.5);
        assert!(collider.shape().as_ball().is_some());
    }

    #[test]
    fn test_fixed_builder_ignores_velocity() {
        let (body, _) = ActorBuilder::fixed(SharedShape::cuboid(1.0, 1.0, 1.0))
            .linvel(Vec3::new(1.0, 0.0, 0.0))
            .build();

        assert_eq!(body.body_type(), RigidBodyType::Fixed);
        assert_eq!(body.linvel().x, 0.0);
    }

    #[test]
    fn test_material_applied_to_collider() {
        let config = PhysicsConfig::default();
        let (_, collider) = presets::static_cube(&config, Vec3::ZERO, Vec3::new(2.0, 0.5, 2.0)).build();

        assert_eq!(collider.friction(), 0.5);
        assert_eq!(collider.restitution(), 0.6);
        let cuboid = collider.shape().as_cuboid().unwrap();
        assert_eq!(cuboid.half_extents.x, 2.0);
        assert_eq!(cuboid.half_extents.y, 0.5);
    }

    #[test]
    fn test_cube_preset() {
        let config = PhysicsConfig::default();
        let builder = presets::cube(&config, Vec3::new(0.0, 5.0, 0.0), Vec3::ZERO);
        assert_eq!(builder.kind(), ActorKind::Dynamic);

        let (body, collider) = builder.build();
        assert_eq!(body.angular_damping(), 0.5);
        let cuboid = collider.shape().as_cuboid().unwrap();
        assert_eq!(cuboid.half_extents.z, CUBE_HALF_EXTENT);
    }

    #[test]
    fn test_ground_plane_preset() {
        let config = PhysicsConfig::default();
        let builder = presets::ground_plane(&config);
        assert_eq!(builder.kind(), ActorKind::Static);

        let (body, collider) = builder.build();
        let plane = collider.shape().as_halfspace().unwrap();
        assert_eq!(plane.normal.y, 1.0);
        assert_eq!(body.translation().y, 0.0);
        assert_eq!(collider.restitution(), 0.6);
    }
}
