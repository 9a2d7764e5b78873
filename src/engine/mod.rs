// Engine modules: physics, scene graph, configuration, stepping

pub mod config;
pub mod physics;
pub mod scene;
pub mod stepper;
