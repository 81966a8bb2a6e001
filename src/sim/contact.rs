//! Contact classification
//!
//! Turns raw contact notifications into gameplay events. Only contact begin
//! means anything to the game; the other hooks exist for the physics side.

use serde::{Deserialize, Serialize};

use super::physics::{Contact, ContactEvent, Role};
use super::runner::Runner;

/// Gameplay meaning of a contact begin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameplayEvent {
    /// Runner ran into an enemy and is not protected
    RunnerHit,
    /// Runner touched the ground
    RunnerLanded,
}

/// Receives physics notifications
pub trait CollisionObserver {
    fn begin_contact(&mut self, contact: &Contact);
    fn end_contact(&mut self, contact: &Contact);
    fn pre_solve(&mut self, contact: &Contact);
    fn post_solve(&mut self, contact: &Contact);
}

/// Route one notification to the matching hook
pub fn dispatch_contact(observer: &mut impl CollisionObserver, event: &ContactEvent) {
    match event {
        ContactEvent::Begin(c) => observer.begin_contact(c),
        ContactEvent::End(c) => observer.end_contact(c),
        ContactEvent::PreSolve(c) => observer.pre_solve(c),
        ContactEvent::PostSolve(c) => observer.post_solve(c),
    }
}

/// Map a contact begin to a gameplay event, order-independent
///
/// A runner that is already hit or mid power stomp ignores enemies.
pub fn classify(contact: &Contact, runner: Option<&Runner>) -> Option<GameplayEvent> {
    let runner = runner?;
    if contact.a != runner.body && contact.b != runner.body {
        return None;
    }

    if contact.is_pair(Role::Runner, Role::Enemy) {
        if runner.is_hit() || runner.is_power_stomping() {
            return None;
        }
        Some(GameplayEvent::RunnerHit)
    } else if contact.is_pair(Role::Runner, Role::Ground) {
        Some(GameplayEvent::RunnerLanded)
    } else {
        None
    }
}

/// Snapshot of a finished session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub score: u32,
    pub multiplier: u32,
    pub jumps: u32,
    pub double_jumps: u32,
    pub power_stomps: u32,
    pub difficulty_level: u32,
    pub difficulty_scale: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::WORLD_GRAVITY;
    use crate::sim::difficulty::DifficultyTable;
    use crate::sim::physics::{BodyId, PhysicsWorld};

    fn contact(a: BodyId, role_a: Role, b: BodyId, role_b: Role) -> Contact {
        Contact {
            a,
            b,
            role_a,
            role_b,
        }
    }

    fn setup() -> (PhysicsWorld, Runner) {
        let mut world = PhysicsWorld::new(WORLD_GRAVITY);
        let runner = Runner::spawn(&mut world, DifficultyTable::default().base());
        (world, runner)
    }

    #[test]
    fn test_classify_runner_enemy_either_order() {
        let (_, runner) = setup();
        let enemy = BodyId(99);

        let ab = contact(runner.body, Role::Runner, enemy, Role::Enemy);
        let ba = contact(enemy, Role::Enemy, runner.body, Role::Runner);
        assert_eq!(classify(&ab, Some(&runner)), Some(GameplayEvent::RunnerHit));
        assert_eq!(classify(&ba, Some(&runner)), Some(GameplayEvent::RunnerHit));
    }

    #[test]
    fn test_classify_guarded_when_hit_or_stomping() {
        let (mut world, mut runner) = setup();
        let c = contact(runner.body, Role::Runner, BodyId(99), Role::Enemy);

        runner.jump(&mut world);
        runner.dodge(&mut world);
        assert!(runner.is_power_stomping());
        assert_eq!(classify(&c, Some(&runner)), None);

        runner.landed();
        runner.hit(&mut world);
        assert_eq!(classify(&c, Some(&runner)), None);
    }

    #[test]
    fn test_classify_ground_and_others() {
        let (_, runner) = setup();
        let ground = contact(BodyId(50), Role::Ground, runner.body, Role::Runner);
        assert_eq!(classify(&ground, Some(&runner)), Some(GameplayEvent::RunnerLanded));

        let boundary = contact(runner.body, Role::Runner, BodyId(51), Role::Boundary);
        assert_eq!(classify(&boundary, Some(&runner)), None);

        let enemy_ground = contact(BodyId(50), Role::Ground, BodyId(52), Role::Enemy);
        assert_eq!(classify(&enemy_ground, Some(&runner)), None);
    }

    #[test]
    fn test_classify_without_runner() {
        let c = contact(BodyId(1), Role::Runner, BodyId(2), Role::Enemy);
        assert_eq!(classify(&c, None), None);
    }

    #[derive(Default)]
    struct Tally {
        begins: u32,
        others: u32,
    }

    impl CollisionObserver for Tally {
        fn begin_contact(&mut self, _contact: &Contact) {
            self.begins += 1;
        }
        fn end_contact(&mut self, _contact: &Contact) {
            self.others += 1;
        }
        fn pre_solve(&mut self, _contact: &Contact) {
            self.others += 1;
        }
        fn post_solve(&mut self, _contact: &Contact) {
            self.others += 1;
        }
    }

    #[test]
    fn test_dispatch_routes_hooks() {
        let c = contact(BodyId(1), Role::Runner, BodyId(2), Role::Ground);
        let mut tally = Tally::default();
        dispatch_contact(&mut tally, &ContactEvent::Begin(c));
        dispatch_contact(&mut tally, &ContactEvent::End(c));
        dispatch_contact(&mut tally, &ContactEvent::PreSolve(c));
        assert_eq!(tally.begins, 1);
        assert_eq!(tally.others, 2);
    }
}
