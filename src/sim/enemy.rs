//! Enemy variants and the spawner
//!
//! Enemies are kinematic boxes that enter at the right edge and slide left at
//! the speed of the difficulty tier that was current when they spawned.

use glam::Vec2;
use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::difficulty::DifficultyTier;
use super::physics::{BodyDef, BodyId, BodyType, PhysicsWorld, Role};
use super::registry::{EntityKind, EntityRegistry};
use crate::box_to_stage_rect;
use crate::consts::*;
use crate::platform::{Node, Presenter};

/// Enemy shapes: ground runners to jump over, flyers to duck under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyKind {
    RunningSmall,
    RunningWide,
    RunningLong,
    RunningBig,
    FlyingSmall,
    FlyingWide,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 6] = [
        EnemyKind::RunningSmall,
        EnemyKind::RunningWide,
        EnemyKind::RunningLong,
        EnemyKind::RunningBig,
        EnemyKind::FlyingSmall,
        EnemyKind::FlyingWide,
    ];

    /// Full width and height in world units
    pub fn size(&self) -> Vec2 {
        match self {
            EnemyKind::RunningSmall | EnemyKind::FlyingSmall => Vec2::new(1.0, 1.0),
            EnemyKind::RunningWide | EnemyKind::FlyingWide => Vec2::new(2.0, 1.0),
            EnemyKind::RunningLong => Vec2::new(1.0, 2.0),
            EnemyKind::RunningBig => Vec2::new(2.0, 2.0),
        }
    }

    /// Center height in world units
    pub fn y(&self) -> f32 {
        match self {
            EnemyKind::RunningSmall | EnemyKind::RunningWide => RUNNING_SHORT_ENEMY_Y,
            EnemyKind::RunningLong | EnemyKind::RunningBig => RUNNING_LONG_ENEMY_Y,
            EnemyKind::FlyingSmall | EnemyKind::FlyingWide => FLYING_ENEMY_Y,
        }
    }

    pub fn is_flying(&self) -> bool {
        matches!(self, EnemyKind::FlyingSmall | EnemyKind::FlyingWide)
    }
}

/// Creates enemies with seeded variant selection
#[derive(Debug, Clone)]
pub struct EnemySpawner {
    rng: Pcg32,
    spawned: u32,
}

impl EnemySpawner {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            spawned: 0,
        }
    }

    /// Total enemies created by this spawner
    pub fn spawned(&self) -> u32 {
        self.spawned
    }

    pub fn next_kind(&mut self) -> EnemyKind {
        EnemyKind::ALL[self.rng.random_range(0..EnemyKind::ALL.len())]
    }

    /// Create, register and show one enemy moving at the tier's speed
    pub fn spawn_enemy(
        &mut self,
        tier: &DifficultyTier,
        world: &mut PhysicsWorld,
        registry: &mut EntityRegistry,
        presenter: &mut impl Presenter,
    ) -> BodyId {
        let kind = self.next_kind();
        let half = kind.size() / 2.0;
        let pos = Vec2::new(ENEMY_X, kind.y());

        let mut def = BodyDef::new(BodyType::Kinematic, Role::Enemy, pos, half);
        def.density = ENEMY_DENSITY;
        def.linear_velocity = tier.enemy_linear_velocity;
        let body = world.create_body(def);

        let node = presenter.add_node(Node::Enemy, box_to_stage_rect(pos, half));
        registry.insert(body, EntityKind::Enemy(kind), Some(node));
        self.spawned += 1;

        log::debug!(
            "Spawned {:?} (body {}) at speed {}",
            kind,
            body.0,
            tier.enemy_linear_velocity.x
        );
        body
    }
}
