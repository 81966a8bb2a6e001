//! Startup configuration
//!
//! Everything tunable is loaded once, validated, and handed to the session.
//! A config that could strand the simulation (empty or gappy tier table,
//! zero time step) is rejected here instead of being guarded every frame.

use std::path::{Path, PathBuf};

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::settings::Settings;
use crate::sim::difficulty::DifficultyTable;
use crate::sim::tick::StepThreshold;

/// Configuration errors (all fatal at startup)
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("difficulty tier table is empty")]
    EmptyTierTable,
    #[error("difficulty tiers must be consecutive: expected level {expected}, found {found}")]
    NonContiguousTiers { expected: u32, found: u32 },
    #[error("enemies at difficulty level {level} never leave the screen")]
    EnemyNotLeaving { level: u32 },
    #[error("physics time step must be positive, got {0}")]
    InvalidTimeStep(f32),
    #[error("max frame delta must be positive, got {0}")]
    InvalidMaxFrameDelta(f32),
    #[error("solver iteration counts must be non-zero")]
    ZeroIterations,
    #[error("viewport must have a positive size, got {width}x{height}")]
    InvalidViewport { width: f32, height: f32 },
}

/// Layout and screen sizes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    /// Virtual layout size every control rectangle is expressed in
    pub layout: Vec2,
    /// Initial screen size in pixels
    pub screen: Vec2,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            layout: Vec2::new(APP_WIDTH, APP_HEIGHT),
            screen: Vec2::new(APP_WIDTH, APP_HEIGHT),
        }
    }
}

/// Fixed-step physics settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub time_step: f32,
    pub velocity_iterations: u32,
    pub position_iterations: u32,
    pub gravity: Vec2,
    pub step_threshold: StepThreshold,
    /// Frame deltas are clamped to this before being banked
    pub max_frame_delta: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            time_step: SIM_DT,
            velocity_iterations: VELOCITY_ITERATIONS,
            position_iterations: POSITION_ITERATIONS,
            gravity: WORLD_GRAVITY,
            step_threshold: StepThreshold::FixedStep,
            max_frame_delta: MAX_FRAME_DELTA,
        }
    }
}

/// Difficulty ladder settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultyConfig {
    /// Seconds per level in the advance threshold
    pub scale: u32,
    /// Force the scale back to 1 before every threshold check
    pub reset_scale_each_check: bool,
    pub tiers: DifficultyTable,
}

impl Default for DifficultyConfig {
    fn default() -> Self {
        Self {
            scale: 1,
            reset_scale_each_check: true,
            tiers: DifficultyTable::default(),
        }
    }
}

/// Static world layout options
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Add a boundary body above the visible area
    pub ceiling: bool,
}

/// Complete startup configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub viewport: ViewportConfig,
    pub physics: PhysicsConfig,
    pub difficulty: DifficultyConfig,
    pub world: WorldConfig,
    pub settings: Settings,
    /// Seed for enemy variant selection
    pub seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            viewport: ViewportConfig::default(),
            physics: PhysicsConfig::default(),
            difficulty: DifficultyConfig::default(),
            world: WorldConfig::default(),
            settings: Settings::default(),
            seed: 0x5eed_2014,
        }
    }
}

impl GameConfig {
    /// Read and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse and validate a JSON config (missing fields take defaults)
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject settings the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let physics = &self.physics;
        if !(physics.time_step > 0.0 && physics.time_step.is_finite()) {
            return Err(ConfigError::InvalidTimeStep(physics.time_step));
        }
        if !(physics.max_frame_delta > 0.0 && physics.max_frame_delta.is_finite()) {
            return Err(ConfigError::InvalidMaxFrameDelta(physics.max_frame_delta));
        }
        if physics.velocity_iterations == 0 || physics.position_iterations == 0 {
            return Err(ConfigError::ZeroIterations);
        }

        for size in [self.viewport.layout, self.viewport.screen] {
            if size.x <= 0.0 || size.y <= 0.0 {
                return Err(ConfigError::InvalidViewport {
                    width: size.x,
                    height: size.y,
                });
            }
        }

        // Re-check the ladder in case the table was built in code
        DifficultyTable::new(self.difficulty.tiers.iter().cloned().collect())?;
        Ok(())
    }
}
