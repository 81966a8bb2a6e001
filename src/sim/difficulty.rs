//! Difficulty ladder
//!
//! Difficulty climbs one tier at a time as running time passes. Tier `n` is
//! left once the session has been running for more than `n * scale` seconds.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// One rung of the difficulty ladder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifficultyTier {
    pub level: u32,
    pub runner_gravity_scale: f32,
    pub runner_jump_impulse: Vec2,
    pub enemy_linear_velocity: Vec2,
    pub score_multiplier: u32,
}

/// (level, gravity scale, jump impulse, enemy speed, score multiplier)
const DEFAULT_TIERS: [(u32, f32, f32, f32, u32); 13] = [
    (1, 3.0, 13.0, -10.0, 5),
    (2, 3.1, 13.0, -11.0, 10),
    (3, 3.2, 13.5, -12.0, 15),
    (4, 3.3, 13.5, -13.0, 20),
    (5, 3.4, 14.0, -14.0, 25),
    (6, 3.5, 14.0, -15.0, 30),
    (7, 3.6, 14.5, -16.0, 35),
    (8, 3.7, 14.5, -17.0, 40),
    (9, 3.8, 15.0, -18.0, 45),
    (10, 3.9, 15.0, -19.0, 50),
    (11, 4.0, 15.5, -20.0, 55),
    (12, 4.1, 15.5, -21.0, 60),
    (13, 4.2, 16.0, -22.0, 65),
];

/// Validated tier list: non-empty, levels consecutive, enemies move left
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<DifficultyTier>", into = "Vec<DifficultyTier>")]
pub struct DifficultyTable {
    tiers: Vec<DifficultyTier>,
}

impl Default for DifficultyTable {
    fn default() -> Self {
        let tiers = DEFAULT_TIERS
            .iter()
            .map(|&(level, gravity, jump, enemy_speed, multiplier)| DifficultyTier {
                level,
                runner_gravity_scale: gravity,
                runner_jump_impulse: Vec2::new(0.0, jump),
                enemy_linear_velocity: Vec2::new(enemy_speed, 0.0),
                score_multiplier: multiplier,
            })
            .collect();
        Self { tiers }
    }
}

impl TryFrom<Vec<DifficultyTier>> for DifficultyTable {
    type Error = ConfigError;

    fn try_from(tiers: Vec<DifficultyTier>) -> Result<Self, Self::Error> {
        Self::new(tiers)
    }
}

impl From<DifficultyTable> for Vec<DifficultyTier> {
    fn from(table: DifficultyTable) -> Self {
        table.tiers
    }
}

impl DifficultyTable {
    /// Build a table, rejecting any ladder the controller could fall off
    pub fn new(tiers: Vec<DifficultyTier>) -> Result<Self, ConfigError> {
        let Some(first) = tiers.first() else {
            return Err(ConfigError::EmptyTierTable);
        };

        let mut expected = first.level;
        for tier in &tiers {
            if tier.level != expected {
                return Err(ConfigError::NonContiguousTiers {
                    expected,
                    found: tier.level,
                });
            }
            if tier.enemy_linear_velocity.x >= 0.0 {
                return Err(ConfigError::EnemyNotLeaving { level: tier.level });
            }
            expected += 1;
        }

        Ok(Self { tiers })
    }

    pub fn base(&self) -> &DifficultyTier {
        // Non-empty by construction
        &self.tiers[0]
    }

    pub fn tier(&self, level: u32) -> Option<&DifficultyTier> {
        let index = level.checked_sub(self.base().level)?;
        self.tiers.get(index as usize)
    }

    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DifficultyTier> {
        self.tiers.iter()
    }
}

/// Per-session difficulty state and the escalation rule
#[derive(Debug, Clone)]
pub struct DifficultyController {
    table: DifficultyTable,
    /// Index of the current tier
    current: usize,
    scale: u32,
    reset_scale_each_check: bool,
}

impl DifficultyController {
    pub fn new(table: DifficultyTable, scale: u32, reset_scale_each_check: bool) -> Self {
        Self {
            table,
            current: 0,
            scale,
            reset_scale_each_check,
        }
    }

    pub fn table(&self) -> &DifficultyTable {
        &self.table
    }

    pub fn tier(&self) -> &DifficultyTier {
        &self.table.tiers[self.current]
    }

    pub fn level(&self) -> u32 {
        self.tier().level
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }

    pub fn set_scale(&mut self, scale: u32) {
        self.scale = scale;
    }

    pub fn is_max(&self) -> bool {
        self.current + 1 >= self.table.tiers.len()
    }

    /// Back to the base tier
    pub fn reset(&mut self) {
        self.current = 0;
    }

    /// Evaluate the ladder against total running time
    ///
    /// Returns the new tier when it advanced. At most one level per call.
    pub fn tick(&mut self, elapsed_running_time: f32) -> Option<&DifficultyTier> {
        if self.is_max() {
            return None;
        }

        if self.reset_scale_each_check {
            self.scale = 1;
        }

        let threshold = self.level() as f32 * self.scale as f32;
        if elapsed_running_time <= threshold {
            return None;
        }

        self.current += 1;
        let tier = &self.table.tiers[self.current];
        log::info!(
            "Difficulty {} reached at {:.2}s (enemy speed {}, multiplier {})",
            tier.level,
            elapsed_running_time,
            tier.enemy_linear_velocity.x,
            tier.score_multiplier
        );
        Some(tier)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn controller() -> DifficultyController {
        DifficultyController::new(DifficultyTable::default(), 1, true)
    }

    #[test]
    fn test_default_table_is_valid() {
        let table = DifficultyTable::default();
        let rebuilt = DifficultyTable::new(table.iter().cloned().collect());
        assert!(rebuilt.is_ok());
        assert_eq!(table.len(), 13);
        assert_eq!(table.base().level, 1);
        assert_eq!(table.tier(13).unwrap().level, 13);
        assert!(table.tier(14).is_none());
        assert!(table.tier(0).is_none());
    }

    #[test]
    fn test_table_rejects_gaps_and_empty() {
        assert!(matches!(
            DifficultyTable::new(Vec::new()),
            Err(ConfigError::EmptyTierTable)
        ));

        let mut tiers: Vec<_> = DifficultyTable::default().iter().cloned().collect();
        tiers.remove(3);
        assert!(matches!(
            DifficultyTable::new(tiers),
            Err(ConfigError::NonContiguousTiers {
                expected: 4,
                found: 5
            })
        ));
    }

    #[test]
    fn test_table_rejects_enemies_that_never_leave() {
        let mut tiers: Vec<_> = DifficultyTable::default().iter().cloned().collect();
        tiers[2].enemy_linear_velocity = Vec2::new(0.0, 0.0);
        assert!(matches!(
            DifficultyTable::new(tiers),
            Err(ConfigError::EnemyNotLeaving { level: 3 })
        ));
    }

    #[test]
    fn test_tick_advances_one_level_past_threshold() {
        let mut ctl = controller();
        assert_eq!(ctl.level(), 1);

        // Exactly on the threshold is not past it
        assert!(ctl.tick(1.0).is_none());

        let tier = ctl.tick(1.01).cloned().unwrap();
        assert_eq!(tier.level, 2);
        assert_eq!(tier.enemy_linear_velocity, Vec2::new(-11.0, 0.0));
        assert_eq!(tier.score_multiplier, 10);
        assert_eq!(ctl.level(), 2);
    }

    #[test]
    fn test_tick_never_skips_levels() {
        let mut ctl = controller();
        // Far past several thresholds: still one level per check
        ctl.tick(100.0);
        assert_eq!(ctl.level(), 2);
        ctl.tick(100.0);
        assert_eq!(ctl.level(), 3);
    }

    #[test]
    fn test_tick_stops_at_max() {
        let mut ctl = controller();
        for _ in 0..50 {
            ctl.tick(1000.0);
        }
        assert!(ctl.is_max());
        assert_eq!(ctl.level(), 13);
        assert!(ctl.tick(1000.0).is_none());

        ctl.reset();
        assert_eq!(ctl.level(), 1);
        assert!(!ctl.is_max());
    }

    #[test]
    fn test_scale_reset_each_check() {
        let mut ctl = controller();
        ctl.set_scale(10);
        // Scale is forced back to 1, so 1.5s is past level 1
        assert!(ctl.tick(1.5).is_some());
        assert_eq!(ctl.scale(), 1);

        let mut keep = DifficultyController::new(DifficultyTable::default(), 10, false);
        assert!(keep.tick(1.5).is_none());
        assert!(keep.tick(10.5).is_some());
        assert_eq!(keep.scale(), 10);
    }

    proptest! {
        #[test]
        fn prop_level_is_monotonic(steps in proptest::collection::vec(0.0f32..0.5, 1..200)) {
            let mut ctl = controller();
            let mut elapsed = 0.0;
            let mut last = ctl.level();
            for dt in steps {
                elapsed += dt;
                ctl.tick(elapsed);
                prop_assert!(ctl.level() >= last);
                prop_assert!(ctl.level() <= last + 1);
                last = ctl.level();
            }
        }
    }
}
