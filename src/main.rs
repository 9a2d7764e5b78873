use anyhow::{Context, Result};
use glam::Vec3;
use log::info;
use std::time::Duration;

use scene_physics::{FixedStepper, PhysicsConfig, PhysicsManager, Scene, SceneNode};

/// Frames rendered by the headless demo
const DEMO_FRAMES: u32 = 600;

/// Simulated frame time (a slightly uneven 60 Hz display)
const FRAME_TIME: Duration = Duration::from_micros(16_900);

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    info!("Starting physics demo...");

    let config = match std::env::args().nth(1) {
        Some(path) => PhysicsConfig::load(&path)
            .with_context(|| format!("Failed to load config from {}", path))?,
        None => PhysicsConfig::default(),
    };

    let mut scene = Scene::new();
    let mut physics = PhysicsManager::new(config)?;

    // A short tower of cubes
    for level in 0..4 {
        let id = scene.spawn(format!("Cube_{}", level));
        let node = scene.get(id).context("node vanished after spawn")?;
        let y = 1.0 + level as f32 * 2.05;
        physics.create_cube(Vec3::new(0.0, y, 0.0), node, Vec3::ZERO)?;
    }

    let platform = scene.spawn("Platform");
    physics.create_static_cube(
        Vec3::new(6.0, 1.0, 0.0),
        Vec3::new(2.0, 1.0, 2.0),
        scene.get(platform).context("node vanished after spawn")?,
    )?;

    let ball = scene.spawn("Ball");
    physics.create_sphere(
        Vec3::new(6.0, 8.0, 0.0),
        0.75,
        scene.get(ball).context("node vanished after spawn")?,
        Vec3::new(-1.5, 0.0, 0.0),
    )?;

    info!("Scene ready with {} actors", physics.actor_count());

    let mut stepper = FixedStepper::default();
    for frame in 0..DEMO_FRAMES {
        for _ in 0..stepper.advance(FRAME_TIME) {
            physics.simulate(stepper.timestep())?;
        }
        physics.update_nodes(&mut scene);

        // Poke the top of the tower once it has settled
        if frame == DEMO_FRAMES / 2 {
            match physics.ray_cast(Vec3::new(0.0, 30.0, 0.0), Vec3::NEG_Y)? {
                Some(hit) => info!(
                    "Picked '{}' at {:.2} (distance {:.2}, pushed: {})",
                    hit.name, hit.point, hit.distance, hit.pushed
                ),
                None => info!("Pick ray hit nothing"),
            }
        }
    }

    for node in scene.iter() {
        info!(
            "{:<10} position {:.2} sleeping: {}",
            node.name(),
            node.position(),
            node.is_sleeping()
        );
    }

    let lines = physics.debug_lines();
    info!(
        "Ran {} steps, debugger holds {} frames, wireframe has {} lines",
        physics.step_count(),
        physics.debugger().len(),
        lines.line_count()
    );

    Ok(())
}
