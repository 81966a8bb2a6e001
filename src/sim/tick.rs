//! Fixed timestep driver
//!
//! Wall-clock frame time goes into an accumulator; the physics world is
//! stepped in fixed increments drawn from it. After stepping, bodies that
//! left the world bounds are collected for recycling.

use serde::{Deserialize, Serialize};

use super::physics::{Body, BodyId, PhysicsWorld, Role};
use crate::config::PhysicsConfig;
use crate::consts::{BOUNDS_MIN_X, BOUNDS_MIN_Y};

/// What the catch-up loop compares the accumulator against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StepThreshold {
    /// Step while at least one fixed step is banked
    #[default]
    FixedStep,
    /// Step while the accumulator holds at least this frame's delta.
    /// Over- or under-steps whenever frame delta and fixed step differ.
    FrameDelta,
}

/// Accumulator-based fixed step scheduler
#[derive(Debug, Clone)]
pub struct FixedStepDriver {
    accumulator: f32,
    time_step: f32,
    velocity_iterations: u32,
    position_iterations: u32,
    threshold: StepThreshold,
    max_frame_delta: f32,
}

impl FixedStepDriver {
    pub fn new(config: &PhysicsConfig) -> Self {
        Self {
            accumulator: 0.0,
            time_step: config.time_step,
            velocity_iterations: config.velocity_iterations,
            position_iterations: config.position_iterations,
            threshold: config.step_threshold,
            max_frame_delta: config.max_frame_delta,
        }
    }

    pub fn accumulator(&self) -> f32 {
        self.accumulator
    }

    pub fn time_step(&self) -> f32 {
        self.time_step
    }

    pub fn threshold(&self) -> StepThreshold {
        self.threshold
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }

    /// Bank a frame's time and return how many fixed steps to run now
    pub fn consume(&mut self, frame_delta: f32) -> u32 {
        let delta = frame_delta.clamp(0.0, self.max_frame_delta);
        self.accumulator += delta;

        let threshold = match self.threshold {
            StepThreshold::FixedStep => self.time_step,
            StepThreshold::FrameDelta => delta,
        };

        let mut steps = 0;
        // A zero threshold would spin until the accumulator went negative
        if threshold > 0.0 {
            while self.accumulator >= threshold {
                self.accumulator -= self.time_step;
                steps += 1;
            }
        }

        self.accumulator = self.accumulator.max(0.0);
        steps
    }

    /// Run a single fixed step on the world
    pub fn step(&self, world: &mut PhysicsWorld) {
        world.step(
            self.time_step,
            self.velocity_iterations,
            self.position_iterations,
        );
    }
}

/// Ground and boundaries never leave; runners and enemies leave past the
/// left edge or below the floor limit
pub fn body_in_bounds(body: &Body) -> bool {
    match body.role {
        Role::Runner | Role::Enemy => body.max_x() > BOUNDS_MIN_X && body.max_y() > BOUNDS_MIN_Y,
        Role::Ground | Role::Boundary => true,
    }
}

/// Single pass over every body, returning the ones out of bounds
pub fn scan_bounds(world: &PhysicsWorld) -> Vec<(BodyId, Role)> {
    world
        .bodies()
        .iter()
        .filter(|b| !body_in_bounds(b))
        .map(|b| (b.id, b.role))
        .collect()
}

#[cfg(test)]
mod tests {
    use glam::Vec2;
    use proptest::prelude::*;

    use super::*;
    use crate::consts::*;
    use crate::sim::physics::{BodyDef, BodyType};

    fn driver(threshold: StepThreshold) -> FixedStepDriver {
        FixedStepDriver::new(&PhysicsConfig {
            step_threshold: threshold,
            ..PhysicsConfig::default()
        })
    }

    #[test]
    fn test_consume_banks_remainder() {
        let mut d = driver(StepThreshold::FixedStep);
        assert_eq!(d.consume(SIM_DT * 2.5), 2);
        assert!((d.accumulator() - SIM_DT * 0.5).abs() < 1e-5);

        // Leftover plus 0.6 step is enough for one more
        assert_eq!(d.consume(SIM_DT * 0.6), 1);
        assert!(d.accumulator() < SIM_DT);
    }

    #[test]
    fn test_consume_small_frames_accumulate() {
        let mut d = driver(StepThreshold::FixedStep);
        assert_eq!(d.consume(SIM_DT * 0.4), 0);
        assert_eq!(d.consume(SIM_DT * 0.4), 0);
        assert_eq!(d.consume(SIM_DT * 0.4), 1);
    }

    #[test]
    fn test_consume_clamps_long_frames() {
        let mut d = driver(StepThreshold::FixedStep);
        let steps = d.consume(10.0);
        let max = (MAX_FRAME_DELTA / SIM_DT).ceil() as u32;
        assert!(steps <= max && steps + 1 >= max, "steps {steps}");
    }

    #[test]
    fn test_consume_negative_and_zero_delta() {
        let mut d = driver(StepThreshold::FixedStep);
        assert_eq!(d.consume(-1.0), 0);
        assert_eq!(d.accumulator(), 0.0);

        let mut legacy = driver(StepThreshold::FrameDelta);
        assert_eq!(legacy.consume(0.0), 0);
        assert_eq!(legacy.accumulator(), 0.0);
    }

    #[test]
    fn test_frame_delta_threshold_steps_until_below_delta() {
        let mut d = driver(StepThreshold::FrameDelta);
        // 2.5 steps of time: loop runs while acc >= 2.5 steps, so only once
        assert_eq!(d.consume(SIM_DT * 2.5), 1);
        assert!((d.accumulator() - SIM_DT * 1.5).abs() < 1e-5);

        // Frames shorter than a step still step once and clamp at zero
        let mut d = driver(StepThreshold::FrameDelta);
        assert_eq!(d.consume(SIM_DT * 0.5), 1);
        assert_eq!(d.accumulator(), 0.0);
    }

    #[test]
    fn test_bounds_rules() {
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        let half = Vec2::new(0.5, 0.5);
        let gone = world.create_body(BodyDef::new(
            BodyType::Kinematic,
            Role::Enemy,
            Vec2::new(-0.6, 1.5),
            half,
        ));
        world.create_body(BodyDef::new(
            BodyType::Kinematic,
            Role::Enemy,
            Vec2::new(-0.4, 1.5),
            half,
        ));
        let fallen = world.create_body(BodyDef::new(
            BodyType::Dynamic,
            Role::Runner,
            Vec2::new(2.0, -6.0),
            half,
        ));
        world.create_body(BodyDef::new(
            BodyType::Static,
            Role::Ground,
            Vec2::new(-100.0, -100.0),
            half,
        ));

        let out = scan_bounds(&world);
        assert_eq!(out, vec![(gone, Role::Enemy), (fallen, Role::Runner)]);
    }

    proptest! {
        #[test]
        fn prop_accumulator_stays_non_negative(
            frames in proptest::collection::vec(-0.05f32..0.3, 1..100),
            legacy in any::<bool>(),
        ) {
            let threshold = if legacy { StepThreshold::FrameDelta } else { StepThreshold::FixedStep };
            let mut d = driver(threshold);
            for frame in frames {
                d.consume(frame);
                prop_assert!(d.accumulator() >= 0.0);
                if !legacy {
                    prop_assert!(d.accumulator() < SIM_DT);
                }
            }
        }
    }
}
