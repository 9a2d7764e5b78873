//! Fixed timestep driver for the physics manager
//!
//! Converts variable frame durations into a whole number of fixed physics
//! steps. The caller measures frame time however it likes (wall clock, a
//! replay, a headless loop) and feeds it to `advance`.

use crate::engine::physics::PhysicsError;
use std::time::Duration;

/// Default physics rate (60 steps per second)
pub const DEFAULT_TIMESTEP: f32 = 1.0 / 60.0;

/// Maximum number of physics steps per frame to prevent spiral of death
pub const DEFAULT_MAX_STEPS: u32 = 5;

#[derive(Debug, Clone)]
pub struct FixedStepper {
    step: Duration,
    max_steps: u32,
    accumulator: Duration,
    paused: bool,
    total_steps: u64,
    /// Frames whose backlog was discarded because of `max_steps`
    dropped_frames: u64,
}

impl FixedStepper {
    /// Create a stepper running `timestep` second steps, at most `max_steps`
    /// per frame.
    ///
    /// The timestep must be finite and long enough to be non-zero at
    /// nanosecond resolution.
    pub fn new(timestep: f32, max_steps: u32) -> Result<Self, PhysicsError> {
        let step = Duration::try_from_secs_f32(timestep)
            .ok()
            .filter(|step| !step.is_zero())
            .ok_or(PhysicsError::InvalidTimestep(timestep))?;
        Ok(Self::with_step(step, max_steps))
    }

    fn with_step(step: Duration, max_steps: u32) -> Self {
        Self {
            step,
            max_steps: max_steps.max(1),
            accumulator: Duration::ZERO,
            paused: false,
            total_steps: 0,
            dropped_frames: 0,
        }
    }

    /// Feed one frame's elapsed time, returns the number of steps to simulate
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        if self.paused {
            return 0;
        }

        self.accumulator += elapsed;

        let mut steps = 0;
        while self.accumulator >= self.step && steps < self.max_steps {
            self.accumulator -= self.step;
            steps += 1;
        }

        // Drop the backlog instead of carrying it into the next frame
        if self.accumulator >= self.step {
            self.accumulator = Duration::ZERO;
            self.dropped_frames += 1;
            log::warn!("Physics fell behind, dropping accumulated time");
        }

        self.total_steps += steps as u64;
        steps
    }

    /// Fixed step length in seconds
    pub fn timestep(&self) -> f32 {
        self.step.as_secs_f32()
    }

    /// Fraction of a step left in the accumulator, for render interpolation
    pub fn alpha(&self) -> f32 {
        self.accumulator.as_secs_f32() / self.step.as_secs_f32()
    }

    pub fn total_steps(&self) -> u64 {
        self.total_steps
    }

    pub fn dropped_frames(&self) -> u64 {
        self.dropped_frames
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn pause(&mut self) {
        if !self.paused {
            self.paused = true;
            log::info!("Physics paused");
        }
    }

    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            // Reset accumulator to prevent update burst
            self.accumulator = Duration::ZERO;
            log::info!("Physics resumed");
        }
    }

    pub fn toggle_pause(&mut self) {
        if self.paused {
            self.resume();
        } else {
            self.pause();
        }
    }
}

impl Default for FixedStepper {
    fn default() -> Self {
        Self::with_step(Duration::from_secs_f32(DEFAULT_TIMESTEP), DEFAULT_MAX_STEPS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    #[test]
    fn test_default_timestep() {
        let stepper = FixedStepper::default();
        assert!((stepper.timestep() - 1.0 / 60.0).abs() < 1e-6);
        assert_eq!(stepper.total_steps(), 0);
    }

    #[test]
    fn test_accumulates_partial_frames() {
        let mut stepper = FixedStepper::new(0.01, 5).unwrap();
        assert_eq!(stepper.advance(ms(6)), 0);
        assert_eq!(stepper.advance(ms(6)), 1);
        assert!(stepper.alpha() > 0.1 && stepper.alpha() < 0.3);
        assert_eq!(stepper.total_steps(), 1);
    }

    #[test]
    fn test_multiple_steps_per_frame() {
        let mut stepper = FixedStepper::new(0.01, 5).unwrap();
        assert_eq!(stepper.advance(ms(35)), 3);
    }

    #[test]
    fn test_max_steps_limit() {
        let mut stepper = FixedStepper::new(0.01, 5).unwrap();
        assert_eq!(stepper.advance(ms(300)), 5);
        assert_eq!(stepper.dropped_frames(), 1);
        // Backlog was discarded
        assert_eq!(stepper.advance(ms(1)), 0);
    }

    #[test]
    fn test_paused_no_steps() {
        let mut stepper = FixedStepper::new(0.01, 5).unwrap();
        stepper.pause();
        assert_eq!(stepper.advance(ms(50)), 0);

        stepper.toggle_pause();
        assert!(!stepper.is_paused());
        assert_eq!(stepper.advance(ms(10)), 1);
    }

    #[test]
    fn test_rejects_invalid_timestep() {
        for timestep in [-0.01, 0.0, 1e-12, f32::NAN, f32::INFINITY] {
            let err = FixedStepper::new(timestep, 5).unwrap_err();
            assert!(matches!(err, PhysicsError::InvalidTimestep(_)));
        }
    }

    #[test]
    fn test_alpha_range() {
        let mut stepper = FixedStepper::default();
        stepper.advance(ms(25));
        let alpha = stepper.alpha();
        assert!((0.0..1.0).contains(&alpha));
    }
}
