//! The player-controlled runner
//!
//! Runner flags mirror what the contact classifier and the input mapper need:
//! hit, dodging, power-stomping, jumping and landed. The body lives in the
//! physics world; every action takes the world to apply impulses.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::difficulty::DifficultyTier;
use super::physics::{BodyDef, BodyId, BodyType, PhysicsWorld, Role};
use crate::consts::*;

/// Per-session action counters, reported on game over
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunnerCounts {
    pub jumps: u32,
    pub double_jumps: u32,
    pub power_stomps: u32,
}

/// The runner entity
#[derive(Debug, Clone)]
pub struct Runner {
    pub body: BodyId,
    hit: bool,
    dodging: bool,
    power_stomping: bool,
    jumping: bool,
    double_jumping: bool,
    landed: bool,
    counts: RunnerCounts,
    jump_impulse: Vec2,
}

impl Runner {
    /// Create the runner body standing on the ground
    pub fn spawn(world: &mut PhysicsWorld, tier: &DifficultyTier) -> Self {
        let mut def = BodyDef::new(
            BodyType::Dynamic,
            Role::Runner,
            Vec2::new(RUNNER_X, RUNNER_Y),
            Self::standing_half_extents(),
        );
        def.density = RUNNER_DENSITY;
        def.gravity_scale = tier.runner_gravity_scale;
        let body = world.create_body(def);

        Self {
            body,
            hit: false,
            dodging: false,
            power_stomping: false,
            jumping: false,
            double_jumping: false,
            landed: false,
            counts: RunnerCounts::default(),
            jump_impulse: tier.runner_jump_impulse,
        }
    }

    pub fn standing_half_extents() -> Vec2 {
        Vec2::new(RUNNER_WIDTH, RUNNER_HEIGHT) / 2.0
    }

    /// Crouched box: the standing box turned on its side
    pub fn dodging_half_extents() -> Vec2 {
        Vec2::new(RUNNER_HEIGHT, RUNNER_WIDTH) / 2.0
    }

    pub fn is_hit(&self) -> bool {
        self.hit
    }

    pub fn is_dodging(&self) -> bool {
        self.dodging
    }

    pub fn is_power_stomping(&self) -> bool {
        self.power_stomping
    }

    pub fn is_jumping(&self) -> bool {
        self.jumping
    }

    pub fn is_double_jumping(&self) -> bool {
        self.double_jumping
    }

    pub fn is_landed(&self) -> bool {
        self.landed
    }

    pub fn counts(&self) -> RunnerCounts {
        self.counts
    }

    /// Ground jump, or a single mid-air double jump
    pub fn jump(&mut self, world: &mut PhysicsWorld) {
        if self.hit || self.dodging {
            return;
        }

        if !self.jumping {
            world.apply_linear_impulse(self.body, self.jump_impulse);
            self.jumping = true;
            self.landed = false;
            self.counts.jumps += 1;
        } else if !self.double_jumping && !self.power_stomping {
            // Kill the fall first so the second jump always has the same lift
            if let Some(body) = world.body(self.body) {
                let vel = Vec2::new(body.vel.x, 0.0);
                world.set_linear_velocity(self.body, vel);
            }
            world.apply_linear_impulse(self.body, self.jump_impulse);
            self.double_jumping = true;
            self.counts.double_jumps += 1;
        }
    }

    /// Crouch on the ground, power stomp in the air
    pub fn dodge(&mut self, world: &mut PhysicsWorld) {
        if self.hit {
            return;
        }

        if self.jumping {
            if !self.power_stomping {
                world.apply_linear_impulse(self.body, RUNNER_POWER_STOMP_IMPULSE);
                self.power_stomping = true;
                self.counts.power_stomps += 1;
            }
        } else if !self.dodging {
            world.set_transform(
                self.body,
                Vec2::new(RUNNER_DODGE_X, RUNNER_DODGE_Y),
                Self::dodging_half_extents(),
            );
            self.dodging = true;
        }
    }

    pub fn stop_dodge(&mut self, world: &mut PhysicsWorld) {
        if !self.dodging {
            return;
        }
        self.dodging = false;
        if !self.hit {
            world.set_transform(
                self.body,
                Vec2::new(RUNNER_X, RUNNER_Y),
                Self::standing_half_extents(),
            );
        }
    }

    /// Touched the ground: jumps and the stomp are available again
    pub fn landed(&mut self) {
        self.landed = true;
        self.jumping = false;
        self.double_jumping = false;
        self.power_stomping = false;
    }

    pub fn hit(&mut self, world: &mut PhysicsWorld) {
        self.hit = true;
        world.apply_linear_impulse(self.body, RUNNER_HIT_IMPULSE);
    }

    /// Pick up the jump and gravity parameters of a new tier
    pub fn on_difficulty_change(&mut self, world: &mut PhysicsWorld, tier: &DifficultyTier) {
        self.jump_impulse = tier.runner_jump_impulse;
        world.set_gravity_scale(self.body, tier.runner_gravity_scale);
    }
}
