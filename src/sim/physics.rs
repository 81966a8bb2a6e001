//! Rigid-body world
//!
//! A small box-only physics world: static, kinematic and dynamic bodies,
//! gravity, an iterative contact solver and contact begin/end tracking.
//! Bodies are kept sorted by id so every pass iterates in the same order.

use std::collections::BTreeSet;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{box_box_collision, remove_approach_velocity};

/// Stable handle to a body in the world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyId(pub u32);

/// Gameplay role attached to every body (the user data of the body)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Runner,
    Enemy,
    Ground,
    Boundary,
}

/// How the solver treats a body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyType {
    /// Never moves
    Static,
    /// Moves at its set velocity, ignores gravity and contacts
    Kinematic,
    /// Affected by gravity, impulses and static contacts
    Dynamic,
}

/// Construction parameters for a body
#[derive(Debug, Clone)]
pub struct BodyDef {
    pub body_type: BodyType,
    pub role: Role,
    pub position: Vec2,
    pub half_extents: Vec2,
    pub linear_velocity: Vec2,
    pub density: f32,
    pub gravity_scale: f32,
}

impl BodyDef {
    pub fn new(body_type: BodyType, role: Role, position: Vec2, half_extents: Vec2) -> Self {
        Self {
            body_type,
            role,
            position,
            half_extents,
            linear_velocity: Vec2::ZERO,
            density: 1.0,
            gravity_scale: 1.0,
        }
    }
}

/// A simulated box
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub id: BodyId,
    pub body_type: BodyType,
    pub role: Role,
    pub pos: Vec2,
    pub vel: Vec2,
    pub half_extents: Vec2,
    pub density: f32,
    pub gravity_scale: f32,
}

impl Body {
    /// Mass from density and box area (static/kinematic bodies report 0)
    pub fn mass(&self) -> f32 {
        match self.body_type {
            BodyType::Dynamic => self.density * self.half_extents.x * self.half_extents.y * 4.0,
            _ => 0.0,
        }
    }

    /// Right edge in world units
    #[inline]
    pub fn max_x(&self) -> f32 {
        self.pos.x + self.half_extents.x
    }

    /// Top edge in world units
    #[inline]
    pub fn max_y(&self) -> f32 {
        self.pos.y + self.half_extents.y
    }
}

/// Two touching bodies with their role tags, lower id first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contact {
    pub a: BodyId,
    pub b: BodyId,
    pub role_a: Role,
    pub role_b: Role,
}

impl Contact {
    /// True when the pair is exactly {first, second}, in either order
    pub fn is_pair(&self, first: Role, second: Role) -> bool {
        (self.role_a == first && self.role_b == second)
            || (self.role_a == second && self.role_b == first)
    }
}

/// Notifications raised while stepping or destroying bodies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactEvent {
    Begin(Contact),
    End(Contact),
    PreSolve(Contact),
    PostSolve(Contact),
}

/// The physics world
#[derive(Debug, Clone)]
pub struct PhysicsWorld {
    gravity: Vec2,
    /// Sorted by id
    bodies: Vec<Body>,
    /// Pairs currently touching, lower id first
    touching: BTreeSet<(BodyId, BodyId)>,
    /// Notifications not yet drained
    events: Vec<ContactEvent>,
    next_id: u32,
}

impl PhysicsWorld {
    pub fn new(gravity: Vec2) -> Self {
        Self {
            gravity,
            bodies: Vec::new(),
            touching: BTreeSet::new(),
            events: Vec::new(),
            next_id: 1,
        }
    }

    pub fn gravity(&self) -> Vec2 {
        self.gravity
    }

    pub fn create_body(&mut self, def: BodyDef) -> BodyId {
        let id = BodyId(self.next_id);
        self.next_id += 1;
        // Ids only grow, so pushing keeps the list sorted
        self.bodies.push(Body {
            id,
            body_type: def.body_type,
            role: def.role,
            pos: def.position,
            vel: match def.body_type {
                BodyType::Static => Vec2::ZERO,
                _ => def.linear_velocity,
            },
            half_extents: def.half_extents,
            density: def.density,
            gravity_scale: def.gravity_scale,
        });
        id
    }

    /// Remove a body, ending any contact it was part of
    pub fn destroy_body(&mut self, id: BodyId) -> Option<Body> {
        let idx = self.index_of(id)?;

        let ended: Vec<(BodyId, BodyId)> = self
            .touching
            .iter()
            .filter(|(a, b)| *a == id || *b == id)
            .copied()
            .collect();
        for key in ended {
            if let Some(contact) = self.contact_for(key) {
                self.events.push(ContactEvent::End(contact));
            }
            self.touching.remove(&key);
        }

        Some(self.bodies.remove(idx))
    }

    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.index_of(id).map(|i| &self.bodies[i])
    }

    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.index_of(id).map(|i| &mut self.bodies[i])
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Whether the two bodies are currently in contact
    pub fn is_touching(&self, a: BodyId, b: BodyId) -> bool {
        self.touching.contains(&pair_key(a, b))
    }

    /// Instant velocity change of `impulse / mass` (dynamic bodies only)
    pub fn apply_linear_impulse(&mut self, id: BodyId, impulse: Vec2) {
        if let Some(body) = self.body_mut(id) {
            let mass = body.mass();
            if mass > 0.0 {
                body.vel += impulse / mass;
            }
        }
    }

    pub fn set_linear_velocity(&mut self, id: BodyId, vel: Vec2) {
        if let Some(body) = self.body_mut(id) {
            if body.body_type != BodyType::Static {
                body.vel = vel;
            }
        }
    }

    pub fn set_gravity_scale(&mut self, id: BodyId, scale: f32) {
        if let Some(body) = self.body_mut(id) {
            body.gravity_scale = scale;
        }
    }

    /// Replace a body's box and teleport it (used for the crouch pose)
    pub fn set_transform(&mut self, id: BodyId, pos: Vec2, half_extents: Vec2) {
        if let Some(body) = self.body_mut(id) {
            body.pos = pos;
            body.half_extents = half_extents;
        }
    }

    /// Take all pending contact notifications
    pub fn drain_events(&mut self) -> Vec<ContactEvent> {
        std::mem::take(&mut self.events)
    }

    /// Advance the world by `dt` seconds
    pub fn step(&mut self, dt: f32, velocity_iterations: u32, position_iterations: u32) {
        // Gravity
        for body in &mut self.bodies {
            if body.body_type == BodyType::Dynamic {
                body.vel += self.gravity * body.gravity_scale * dt;
            }
        }

        // Solid contacts: (dynamic index, static index, normal out of the static body)
        let solid = self.solid_contacts();
        for &(di, si, _) in &solid {
            if let Some(contact) = self.contact_for(pair_key(self.bodies[di].id, self.bodies[si].id)) {
                self.events.push(ContactEvent::PreSolve(contact));
            }
        }

        for _ in 0..velocity_iterations {
            for &(di, _, normal) in &solid {
                let body = &mut self.bodies[di];
                body.vel = remove_approach_velocity(body.vel, normal);
            }
        }

        // Integrate positions
        for body in &mut self.bodies {
            if body.body_type != BodyType::Static {
                body.pos += body.vel * dt;
            }
        }

        for _ in 0..position_iterations {
            self.resolve_penetration();
        }

        for &(di, si, _) in &solid {
            if let Some(contact) = self.contact_for(pair_key(self.bodies[di].id, self.bodies[si].id)) {
                self.events.push(ContactEvent::PostSolve(contact));
            }
        }

        self.update_contacts();
    }

    /// Push dynamic bodies out of static ones along the shallow axis
    fn resolve_penetration(&mut self) {
        for di in 0..self.bodies.len() {
            if self.bodies[di].body_type != BodyType::Dynamic {
                continue;
            }
            for si in 0..self.bodies.len() {
                if self.bodies[si].body_type != BodyType::Static {
                    continue;
                }
                let (s_pos, s_half) = (self.bodies[si].pos, self.bodies[si].half_extents);
                let body = &mut self.bodies[di];
                let result = box_box_collision(s_pos, s_half, body.pos, body.half_extents);
                if result.hit && result.penetration > 0.0 {
                    body.pos += result.normal * result.penetration;
                    body.vel = remove_approach_velocity(body.vel, result.normal);
                }
            }
        }
    }

    fn solid_contacts(&self) -> Vec<(usize, usize, Vec2)> {
        let mut out = Vec::new();
        for (di, dynamic) in self.bodies.iter().enumerate() {
            if dynamic.body_type != BodyType::Dynamic {
                continue;
            }
            for (si, fixed) in self.bodies.iter().enumerate() {
                if fixed.body_type != BodyType::Static {
                    continue;
                }
                let result =
                    box_box_collision(fixed.pos, fixed.half_extents, dynamic.pos, dynamic.half_extents);
                if result.hit {
                    out.push((di, si, result.normal));
                }
            }
        }
        out
    }

    /// Diff the touching set against the previous step and queue begin/end
    fn update_contacts(&mut self) {
        let mut now = BTreeSet::new();
        for (i, a) in self.bodies.iter().enumerate() {
            for b in &self.bodies[i + 1..] {
                if !can_collide(a, b) {
                    continue;
                }
                if box_box_collision(a.pos, a.half_extents, b.pos, b.half_extents).hit {
                    now.insert(pair_key(a.id, b.id));
                }
            }
        }

        let ended: Vec<_> = self.touching.difference(&now).copied().collect();
        let began: Vec<_> = now.difference(&self.touching).copied().collect();
        self.touching = now;

        for key in ended {
            if let Some(contact) = self.contact_for(key) {
                self.events.push(ContactEvent::End(contact));
            }
        }
        for key in began {
            if let Some(contact) = self.contact_for(key) {
                self.events.push(ContactEvent::Begin(contact));
            }
        }
    }

    fn contact_for(&self, (a, b): (BodyId, BodyId)) -> Option<Contact> {
        let role_a = self.body(a)?.role;
        let role_b = self.body(b)?.role;
        Some(Contact {
            a,
            b,
            role_a,
            role_b,
        })
    }

    fn index_of(&self, id: BodyId) -> Option<usize> {
        self.bodies.binary_search_by_key(&id, |b| b.id).ok()
    }
}

/// Contacts only exist when at least one side is dynamic
fn can_collide(a: &Body, b: &Body) -> bool {
    a.body_type == BodyType::Dynamic || b.body_type == BodyType::Dynamic
}

fn pair_key(a: BodyId, b: BodyId) -> (BodyId, BodyId) {
    if a < b { (a, b) } else { (b, a) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;

    fn ground_def() -> BodyDef {
        BodyDef::new(
            BodyType::Static,
            Role::Ground,
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 1.0),
        )
    }

    fn box_def(role: Role, body_type: BodyType, pos: Vec2) -> BodyDef {
        BodyDef::new(body_type, role, pos, Vec2::new(0.5, 1.0))
    }

    fn begins(events: &[ContactEvent]) -> usize {
        events
            .iter()
            .filter(|e| matches!(e, ContactEvent::Begin(_)))
            .count()
    }

    #[test]
    fn test_dynamic_body_lands_and_rests() {
        let mut world = PhysicsWorld::new(WORLD_GRAVITY);
        let ground = world.create_body(ground_def());
        let runner = world.create_body(box_def(Role::Runner, BodyType::Dynamic, Vec2::new(0.0, 3.0)));

        for _ in 0..600 {
            world.step(SIM_DT, VELOCITY_ITERATIONS, POSITION_ITERATIONS);
        }

        let body = world.body(runner).unwrap();
        assert!((body.pos.y - 2.0).abs() < 0.01, "resting height {}", body.pos.y);
        assert!(body.vel.y.abs() < 0.01);
        assert!(world.is_touching(ground, runner));

        // Exactly one begin over the whole fall
        let events = world.drain_events();
        assert_eq!(begins(&events), 1);
    }

    #[test]
    fn test_resting_contact_does_not_repeat_begin() {
        let mut world = PhysicsWorld::new(WORLD_GRAVITY);
        world.create_body(ground_def());
        world.create_body(box_def(Role::Runner, BodyType::Dynamic, Vec2::new(0.0, 2.0)));

        world.step(SIM_DT, VELOCITY_ITERATIONS, POSITION_ITERATIONS);
        assert_eq!(begins(&world.drain_events()), 1);

        for _ in 0..100 {
            world.step(SIM_DT, VELOCITY_ITERATIONS, POSITION_ITERATIONS);
        }
        let events = world.drain_events();
        assert_eq!(begins(&events), 0);
        assert!(!events.iter().any(|e| matches!(e, ContactEvent::End(_))));
    }

    #[test]
    fn test_kinematic_moves_through_and_reports_contact() {
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        let runner = world.create_body(box_def(Role::Runner, BodyType::Dynamic, Vec2::new(0.0, 0.0)));
        let mut def = box_def(Role::Enemy, BodyType::Kinematic, Vec2::new(3.0, 0.0));
        def.linear_velocity = Vec2::new(-10.0, 0.0);
        let enemy = world.create_body(def);

        let mut began = 0;
        let mut ended = 0;
        for _ in 0..300 {
            world.step(SIM_DT, VELOCITY_ITERATIONS, POSITION_ITERATIONS);
            for event in world.drain_events() {
                match event {
                    ContactEvent::Begin(c) => {
                        assert!(c.is_pair(Role::Runner, Role::Enemy));
                        began += 1;
                    }
                    ContactEvent::End(_) => ended += 1,
                    _ => {}
                }
            }
        }
        assert_eq!(began, 1);
        assert_eq!(ended, 1);
        // Kinematic bodies are not pushed around
        assert!(world.body(enemy).unwrap().pos.x < -5.0);
        assert!(world.body(runner).unwrap().pos.x.abs() < 1e-6);
    }

    #[test]
    fn test_destroy_body_ends_contacts() {
        let mut world = PhysicsWorld::new(WORLD_GRAVITY);
        let ground = world.create_body(ground_def());
        let runner = world.create_body(box_def(Role::Runner, BodyType::Dynamic, Vec2::new(0.0, 2.0)));
        world.step(SIM_DT, VELOCITY_ITERATIONS, POSITION_ITERATIONS);
        world.drain_events();

        assert!(world.destroy_body(runner).is_some());
        let events = world.drain_events();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], ContactEvent::End(c) if c.a == ground && c.b == runner));
        assert!(world.body(runner).is_none());
        assert!(world.destroy_body(runner).is_none());
    }

    #[test]
    fn test_impulse_uses_mass() {
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        let mut def = box_def(Role::Runner, BodyType::Dynamic, Vec2::ZERO);
        def.density = 0.5;
        let id = world.create_body(def);
        // 0.5 density * 1x2 box = mass 1
        world.apply_linear_impulse(id, Vec2::new(0.0, 13.0));
        assert_eq!(world.body(id).unwrap().vel, Vec2::new(0.0, 13.0));

        // Static bodies ignore impulses
        let ground = world.create_body(ground_def());
        world.apply_linear_impulse(ground, Vec2::new(0.0, 13.0));
        assert_eq!(world.body(ground).unwrap().vel, Vec2::ZERO);
    }
}
