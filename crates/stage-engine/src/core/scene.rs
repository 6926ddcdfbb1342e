use crate::api::types::EntityId;
use crate::components::entity::Entity;

/// Every entity on the stage, in spawn order.
///
/// Lookups are linear. A stage holds a few dozen nodes, so a flat Vec beats
/// any map here and keeps draw order stable for free.
#[derive(Default)]
pub struct Scene {
    nodes: Vec<Entity>,
}

impl Scene {
    pub fn new() -> Self {
        Self { nodes: Vec::with_capacity(256) }
    }

    pub fn spawn(&mut self, entity: Entity) -> EntityId {
        let id = entity.id;
        self.nodes.push(entity);
        id
    }

    /// Removes one node, preserving the order of the others.
    pub fn despawn(&mut self, id: EntityId) -> Option<Entity> {
        let at = self.index_of(id)?;
        Some(self.nodes.remove(at))
    }

    /// Removes every listed node in one pass. Ids not on stage are ignored;
    /// the return value counts only nodes that were actually removed.
    pub fn despawn_all(&mut self, ids: &[EntityId]) -> usize {
        let count = self.nodes.len();
        self.nodes.retain(|node| !ids.contains(&node.id));
        count - self.nodes.len()
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.index_of(id).map(|at| &self.nodes[at])
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        let at = self.index_of(id)?;
        Some(&mut self.nodes[at])
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.index_of(id).is_some()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Entity> {
        self.nodes.iter()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn index_of(&self, id: EntityId) -> Option<usize> {
        self.nodes.iter().position(|node| node.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn stage_of(n: u32) -> Scene {
        let mut scene = Scene::new();
        for i in 1..=n {
            scene.spawn(Entity::new(EntityId(i)));
        }
        scene
    }

    #[test]
    fn spawned_node_is_reachable_by_id() {
        let mut scene = Scene::new();
        let id = scene.spawn(Entity::new(EntityId(4)).with_pos(Vec2::new(10.0, 20.0)));
        assert_eq!(scene.get(id).map(|e| e.pos), Some(Vec2::new(10.0, 20.0)));

        if let Some(e) = scene.get_mut(id) {
            e.pos.x = 11.0;
        }
        assert_eq!(scene.get(id).map(|e| e.pos.x), Some(11.0));
    }

    #[test]
    fn despawn_preserves_remaining_order() {
        let mut scene = stage_of(3);
        assert!(scene.despawn(EntityId(1)).is_some());
        let ids: Vec<_> = scene.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![EntityId(2), EntityId(3)]);
        assert!(scene.despawn(EntityId(1)).is_none());
    }

    #[test]
    fn despawn_all_ignores_missing_ids() {
        let mut scene = stage_of(2);
        assert_eq!(scene.despawn_all(&[EntityId(2), EntityId(9)]), 1);
        assert!(scene.contains(EntityId(1)));
        assert!(!scene.contains(EntityId(2)));
        assert_eq!(scene.len(), 1);
    }
}
