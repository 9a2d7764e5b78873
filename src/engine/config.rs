// Physics manager configuration
//
// Every field has a default, so an empty TOML document is a valid config.

use crate::engine::physics::PhysicsError;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level configuration for a `PhysicsManager`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// World gravity (m/s²)
    pub gravity: [f32; 3],

    /// Material shared by every actor the manager creates
    pub material: MaterialConfig,

    /// Density used to derive mass and inertia of dynamic actors
    pub density: f32,

    /// Angular damping applied to dynamic actors
    pub angular_damping: f32,

    /// Add an infinite static ground plane at y = 0
    pub ground_plane: bool,

    pub pick: PickConfig,

    pub debugger: DebuggerConfig,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: [0.0, -9.81, 0.0],
            material: MaterialConfig::default(),
            density: 10.0,
            angular_damping: 0.5,
            ground_plane: true,
            pick: PickConfig::default(),
            debugger: DebuggerConfig::default(),
        }
    }
}

impl PhysicsConfig {
    /// Parse a configuration from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self, PhysicsError> {
        let config: Self =
            toml::from_str(text).map_err(|e| PhysicsError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PhysicsError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| PhysicsError::Config(format!("{}: {}", path.display(), e)))?;
        let config = Self::from_toml_str(&text)?;
        log::info!("Loaded physics config from {}", path.display());
        Ok(config)
    }

    /// Reject values the engine cannot simulate sensibly
    pub fn validate(&self) -> Result<(), PhysicsError> {
        if !self.gravity.iter().all(|g| g.is_finite()) {
            return Err(PhysicsError::Config("gravity must be finite".into()));
        }
        if !(self.density.is_finite() && self.density > 0.0) {
            return Err(PhysicsError::Config(format!(
                "density must be positive, got {}",
                self.density
            )));
        }
        if self.angular_damping < 0.0 {
            return Err(PhysicsError::Config(
                "angular_damping must not be negative".into(),
            ));
        }
        self.material.validate()?;
        self.pick.validate()?;
        Ok(())
    }

    pub fn gravity_vec(&self) -> Vec3 {
        Vec3::from_array(self.gravity)
    }
}

/// Surface material (friction and bounciness)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialConfig {
    /// Kept for parity with engines that separate static friction; rapier uses
    /// a single coefficient, so only `dynamic_friction` reaches the solver
    pub static_friction: f32,
    pub dynamic_friction: f32,
    pub restitution: f32,
}

impl Default for MaterialConfig {
    fn default() -> Self {
        Self {
            static_friction: 0.5,
            dynamic_friction: 0.5,
            restitution: 0.6,
        }
    }
}

impl MaterialConfig {
    fn validate(&self) -> Result<(), PhysicsError> {
        if self.static_friction < 0.0 || self.dynamic_friction < 0.0 {
            return Err(PhysicsError::Config("friction must not be negative".into()));
        }
        if self.restitution < 0.0 {
            return Err(PhysicsError::Config(
                "restitution must not be negative".into(),
            ));
        }
        Ok(())
    }
}

/// Parameters of the ray-cast "pick and push" interaction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickConfig {
    /// Maximum ray length
    pub max_distance: f32,

    /// Impulse applied to a picked dynamic actor
    pub impulse: [f32; 3],

    /// Application point of the impulse, in the actor's local frame
    pub local_offset: [f32; 3],
}

impl Default for PickConfig {
    fn default() -> Self {
        Self {
            max_distance: 2000.0,
            impulse: [0.1, 900.0, 120.3],
            local_offset: [0.1, 0.5, 0.3],
        }
    }
}

impl PickConfig {
    fn validate(&self) -> Result<(), PhysicsError> {
        if !(self.max_distance.is_finite() && self.max_distance > 0.0) {
            return Err(PhysicsError::Config(format!(
                "pick.max_distance must be positive, got {}",
                self.max_distance
            )));
        }
        Ok(())
    }
}

/// In-process debugger capture settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebuggerConfig {
    pub enabled: bool,

    /// Record contact start/stop events per step
    pub transmit_contacts: bool,

    /// Record ray casts and their outcome
    pub transmit_scene_queries: bool,

    /// Number of frames kept before the oldest is dropped
    pub history: usize,
}

impl Default for DebuggerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            transmit_contacts: true,
            transmit_scene_queries: true,
            history: 120,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PhysicsConfig::default();
        assert_eq!(config.gravity, [0.0, -9.81, 0.0]);
        assert_eq!(config.material.restitution, 0.6);
        assert_eq!(config.density, 10.0);
        assert_eq!(config.pick.max_distance, 2000.0);
        assert!(config.ground_plane);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config = PhysicsConfig::from_toml_str("").unwrap();
        assert_eq!(config, PhysicsConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let text = r#"
            gravity = [0.0, -1.62, 0.0]
            ground_plane = false

            [material]
            restitution = 0.1

            [debugger]
            history = 8
        "#;
        let config = PhysicsConfig::from_toml_str(text).unwrap();
        assert_eq!(config.gravity_vec(), Vec3::new(0.0, -1.62, 0.0));
        assert!(!config.ground_plane);
        assert_eq!(config.material.restitution, 0.1);
        assert_eq!(config.material.dynamic_friction, 0.5);
        assert_eq!(config.debugger.history, 8);
        assert!(config.debugger.transmit_contacts);
    }

    #[test]
    fn test_rejects_bad_density() {
        let err = PhysicsConfig::from_toml_str("density = 0.0").unwrap_err();
        assert!(matches!(err, PhysicsError::Config(_)));
    }

    #[test]
    fn test_rejects_negative_friction() {
        let err = PhysicsConfig::from_toml_str("[material]\ndynamic_friction = -1.0").unwrap_err();
        assert!(matches!(err, PhysicsError::Config(_)));
    }

    #[test]
    fn test_rejects_malformed_toml() {
        let err = PhysicsConfig::from_toml_str("gravity = \"down\"").unwrap_err();
        assert!(err.to_string().starts_with("Invalid config"));
    }

    #[test]
    fn test_shipped_config_matches_defaults() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config/physics.toml");
        let config = PhysicsConfig::load(path).unwrap();
        assert_eq!(config, PhysicsConfig::default());
    }

    #[test]
    fn test_load_missing_file() {
        let err = PhysicsConfig::load("/nonexistent/physics.toml").unwrap_err();
        assert!(matches!(err, PhysicsError::Config(_)));
    }
}
