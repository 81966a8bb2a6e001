//! Earthling Run - side-scrolling endless runner core
//!
//! Core modules:
//! - `sim`: Fixed-timestep simulation (physics, contacts, difficulty, spawning)
//! - `session`: Game lifecycle and the per-frame entry point
//! - `input`: Pointer event mapping (menu dispatch vs. jump/dodge)
//! - `platform`: Presentation and viewport collaborators
//! - `services`: Score submission, stats, leaderboard
//! - `config`: Startup configuration and validation

pub mod audio;
pub mod config;
pub mod highscores;
pub mod input;
pub mod platform;
pub mod services;
pub mod session;
pub mod settings;
pub mod sim;

pub use config::{ConfigError, GameConfig};
pub use highscores::HighScores;
pub use session::GameSession;
pub use settings::Settings;

use glam::Vec2;

use platform::Rect;

/// Game configuration constants
pub mod consts {
    use glam::Vec2;

    /// Fixed simulation timestep (300 Hz)
    pub const SIM_DT: f32 = 1.0 / 300.0;
    /// Solver iterations per step
    pub const VELOCITY_ITERATIONS: u32 = 6;
    pub const POSITION_ITERATIONS: u32 = 2;
    /// Longest frame the driver will try to catch up on
    pub const MAX_FRAME_DELTA: f32 = 0.25;

    /// Layout (stage) size in virtual pixels
    pub const APP_WIDTH: f32 = 800.0;
    pub const APP_HEIGHT: f32 = 480.0;
    /// Physics units to layout pixels
    pub const WORLD_TO_SCREEN: f32 = 32.0;

    pub const WORLD_GRAVITY: Vec2 = Vec2::new(0.0, -10.0);
    /// Contact tolerance (boxes closer than this count as touching)
    pub const LINEAR_SLOP: f32 = 0.005;

    /// Ground slab, centered on (GROUND_X, GROUND_Y)
    pub const GROUND_X: f32 = 12.5;
    pub const GROUND_Y: f32 = 0.0;
    pub const GROUND_WIDTH: f32 = 50.0;
    pub const GROUND_HEIGHT: f32 = 2.0;

    /// Optional ceiling boundary (just above the visible area)
    pub const CEILING_Y: f32 = APP_HEIGHT / WORLD_TO_SCREEN + 1.0;
    pub const CEILING_HEIGHT: f32 = 2.0;

    /// Runner defaults - standing on top of the ground
    pub const RUNNER_X: f32 = 2.0;
    pub const RUNNER_Y: f32 = GROUND_Y + GROUND_HEIGHT;
    pub const RUNNER_WIDTH: f32 = 1.0;
    pub const RUNNER_HEIGHT: f32 = 2.0;
    pub const RUNNER_DENSITY: f32 = 0.5;
    /// Crouched pose (box lies on its side)
    pub const RUNNER_DODGE_X: f32 = 2.0;
    pub const RUNNER_DODGE_Y: f32 = 1.5;
    pub const RUNNER_POWER_STOMP_IMPULSE: Vec2 = Vec2::new(0.0, -20.0);
    pub const RUNNER_HIT_IMPULSE: Vec2 = Vec2::new(-3.0, 6.0);

    /// Enemies enter from the right edge
    pub const ENEMY_X: f32 = 25.0;
    pub const ENEMY_DENSITY: f32 = 1.0;
    pub const RUNNING_SHORT_ENEMY_Y: f32 = 1.5;
    pub const RUNNING_LONG_ENEMY_Y: f32 = 2.0;
    pub const FLYING_ENEMY_Y: f32 = 3.0;

    /// Bodies past these limits are out of bounds
    pub const BOUNDS_MIN_X: f32 = 0.0;
    pub const BOUNDS_MIN_Y: f32 = -5.0;
}

/// Convert a physics-space point to layout pixels
#[inline]
pub fn world_to_stage(pos: Vec2) -> Vec2 {
    pos * consts::WORLD_TO_SCREEN
}

/// Layout rectangle covering a physics box given by center and half extents
pub fn box_to_stage_rect(center: Vec2, half_extents: Vec2) -> Rect {
    let min = world_to_stage(center - half_extents);
    let size = world_to_stage(half_extents * 2.0);
    Rect::new(min.x, min.y, size.x, size.y)
}
