//! Entity registry
//!
//! Tracks which bodies are live gameplay entities, what they are, and which
//! presenter node draws them. The physics world owns the bodies; entries here
//! only reference them by id.

use std::collections::BTreeMap;

use super::enemy::EnemyKind;
use super::physics::{BodyId, PhysicsWorld, Role};
use crate::platform::{NodeId, Presenter};

/// What a registered body is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Runner,
    Enemy(EnemyKind),
    Ground,
    Boundary,
}

impl EntityKind {
    pub fn role(&self) -> Role {
        match self {
            EntityKind::Runner => Role::Runner,
            EntityKind::Enemy(_) => Role::Enemy,
            EntityKind::Ground => Role::Ground,
            EntityKind::Boundary => Role::Boundary,
        }
    }
}

/// A registered entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entity {
    pub kind: EntityKind,
    pub node: Option<NodeId>,
}

/// Live entities, iterated in body id order
#[derive(Debug, Clone, Default)]
pub struct EntityRegistry {
    entries: BTreeMap<BodyId, Entity>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, body: BodyId, kind: EntityKind, node: Option<NodeId>) {
        self.entries.insert(body, Entity { kind, node });
    }

    pub fn get(&self, body: BodyId) -> Option<&Entity> {
        self.entries.get(&body)
    }

    pub fn role_of(&self, body: BodyId) -> Option<Role> {
        self.entries.get(&body).map(|e| e.kind.role())
    }

    pub fn ids(&self) -> Vec<BodyId> {
        self.entries.keys().copied().collect()
    }

    pub fn count(&self, role: Role) -> usize {
        self.entries.values().filter(|e| e.kind.role() == role).count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove an entity from the world, the registry and the presenter together
    pub fn despawn(
        &mut self,
        body: BodyId,
        world: &mut PhysicsWorld,
        presenter: &mut impl Presenter,
    ) -> Option<Entity> {
        world.destroy_body(body);
        let entity = self.entries.remove(&body)?;
        if let Some(node) = entity.node {
            presenter.remove_node(node);
        }
        log::debug!("Despawned {:?} (body {})", entity.kind, body.0);
        Some(entity)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::platform::{Node, Rect, RecordingPresenter};
    use crate::sim::physics::{BodyDef, BodyType};

    #[test]
    fn test_despawn_removes_everywhere() {
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        let mut registry = EntityRegistry::new();
        let mut presenter = RecordingPresenter::new();

        let body = world.create_body(BodyDef::new(
            BodyType::Kinematic,
            Role::Enemy,
            Vec2::ZERO,
            Vec2::ONE,
        ));
        let node = presenter.add_node(Node::Enemy, Rect::new(0.0, 0.0, 1.0, 1.0));
        registry.insert(body, EntityKind::Enemy(EnemyKind::RunningSmall), Some(node));
        assert_eq!(registry.count(Role::Enemy), 1);

        let removed = registry.despawn(body, &mut world, &mut presenter);
        assert!(removed.is_some());
        assert_eq!(registry.count(Role::Enemy), 0);
        assert!(world.body(body).is_none());
        assert!(!presenter.contains(Node::Enemy));

        // Second despawn is a no-op
        assert!(registry.despawn(body, &mut world, &mut presenter).is_none());
    }
}
