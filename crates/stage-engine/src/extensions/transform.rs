// extensions/transform.rs
//
// Parent/child links between entities. Each entity keeps its local transform;
// `propagate` folds the chain into `Entity::world` once per frame.
//
// Usage:
//   let mut graph = TransformGraph::new();
//   graph.set_parent(child_id, Some(parent_id));
//   graph.propagate(&mut scene);

use std::collections::HashMap;
use glam::Vec2;
use crate::api::types::EntityId;
use crate::components::entity::WorldTransform;
use crate::core::scene::Scene;

#[derive(Debug, Clone, Default)]
struct TransformNode {
    parent: Option<EntityId>,
    children: Vec<EntityId>,
}

/// Parent links between scene entities, kept outside the entities themselves.
#[derive(Debug, Default)]
pub struct TransformGraph {
    nodes: HashMap<EntityId, TransformNode>,
}

impl TransformGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach `child` under `parent`, or detach it with `None`.
    /// Siblings keep attach order, which is also their draw order.
    pub fn set_parent(&mut self, child: EntityId, parent: Option<EntityId>) {
        let previous = std::mem::replace(&mut self.nodes.entry(child).or_default().parent, parent);
        if let Some(node) = previous.and_then(|old| self.nodes.get_mut(&old)) {
            node.children.retain(|&c| c != child);
        }
        if let Some(parent) = parent {
            let siblings = &mut self.nodes.entry(parent).or_default().children;
            if !siblings.contains(&child) {
                siblings.push(child);
            }
        }
    }

    pub fn parent(&self, id: EntityId) -> Option<EntityId> {
        self.nodes.get(&id)?.parent
    }

    pub fn children(&self, id: EntityId) -> &[EntityId] {
        self.nodes.get(&id).map_or(&[], |node| node.children.as_slice())
    }

    /// The entity and all of its descendants, parents before children.
    pub fn subtree(&self, id: EntityId) -> Vec<EntityId> {
        let mut out = vec![id];
        let mut i = 0;
        while i < out.len() {
            out.extend_from_slice(self.children(out[i]));
            i += 1;
        }
        out
    }

    /// Detach an entity and forget it and its descendants.
    /// Returns the removed ids so the caller can despawn them.
    pub fn remove_subtree(&mut self, id: EntityId) -> Vec<EntityId> {
        let ids = self.subtree(id);
        if let Some(parent) = self.parent(id) {
            if let Some(parent_node) = self.nodes.get_mut(&parent) {
                parent_node.children.retain(|&c| c != id);
            }
        }
        for removed in &ids {
            self.nodes.remove(removed);
        }
        ids
    }

    /// Write `Entity::world` for every node, parents before children.
    /// Entities the graph has never seen resolve as roots.
    pub fn propagate(&self, scene: &mut Scene) {
        let mut pending: Vec<(EntityId, WorldTransform)> = scene
            .iter()
            .filter(|e| self.parent(e.id).is_none())
            .map(|e| (e.id, WorldTransform::default()))
            .collect();
        pending.reverse();

        while let Some((id, frame)) = pending.pop() {
            let Some(entity) = scene.get_mut(id) else { continue };
            entity.world = compose(frame, entity.local());
            let world = entity.world;
            pending.extend(self.children(id).iter().rev().map(|&child| (child, world)));
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Apply a child's local transform inside its parent's frame.
/// The child offset is scaled in the parent's unrotated frame, then rotated.
pub fn compose(parent: WorldTransform, local: WorldTransform) -> WorldTransform {
    let offset = Vec2::from_angle(parent.rotation).rotate(local.pos * parent.scale);
    WorldTransform {
        pos: parent.pos + offset,
        rotation: parent.rotation + local.rotation,
        scale: parent.scale * local.scale,
        alpha: parent.alpha * local.alpha,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::entity::Entity;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn reparenting_moves_the_child() {
        let mut graph = TransformGraph::new();
        graph.set_parent(EntityId(3), Some(EntityId(1)));
        graph.set_parent(EntityId(3), Some(EntityId(2)));

        assert_eq!(graph.parent(EntityId(3)), Some(EntityId(2)));
        assert!(graph.children(EntityId(1)).is_empty());
        assert_eq!(graph.children(EntityId(2)), [EntityId(3)].as_slice());

        graph.set_parent(EntityId(3), None);
        assert_eq!(graph.parent(EntityId(3)), None);
        assert!(graph.children(EntityId(2)).is_empty());
    }

    #[test]
    fn grandchildren_accumulate_offsets() {
        let mut graph = TransformGraph::new();
        let mut scene = Scene::new();

        // Spawned child-first so propagation cannot rely on scene order.
        let leaf = scene.spawn(Entity::new(EntityId(3)).with_pos(Vec2::new(0.0, 5.0)));
        let mid = scene.spawn(Entity::new(EntityId(2)).with_pos(Vec2::new(50.0, 0.0)));
        let root = scene.spawn(Entity::new(EntityId(1)).with_pos(Vec2::new(100.0, 100.0)));
        graph.set_parent(mid, Some(root));
        graph.set_parent(leaf, Some(mid));

        graph.propagate(&mut scene);

        assert_eq!(scene.get(mid).unwrap().world.pos, Vec2::new(150.0, 100.0));
        assert_eq!(scene.get(leaf).unwrap().world.pos, Vec2::new(150.0, 105.0));
    }

    #[test]
    fn rotation_and_scale_carry_to_children() {
        let mut graph = TransformGraph::new();
        let mut scene = Scene::new();

        let parent = scene.spawn(
            Entity::new(EntityId(1))
                .with_rotation(FRAC_PI_2)
                .with_scale(Vec2::new(1.0, 2.0))
                .with_alpha(0.5),
        );
        let child = scene.spawn(Entity::new(EntityId(2)).with_pos(Vec2::new(0.0, -10.0)));
        graph.set_parent(child, Some(parent));
        graph.propagate(&mut scene);

        let world = scene.get(child).unwrap().world;
        // (0,-20) after scale, rotated a quarter turn clockwise in y-down space -> (20, 0)
        assert!((world.pos - Vec2::new(20.0, 0.0)).length() < 1e-3);
        assert_eq!(world.scale, Vec2::new(1.0, 2.0));
        assert_eq!(world.alpha, 0.5);
    }

    #[test]
    fn remove_subtree_returns_descendants() {
        let mut graph = TransformGraph::new();
        graph.set_parent(EntityId(2), Some(EntityId(1)));
        graph.set_parent(EntityId(3), Some(EntityId(2)));
        graph.set_parent(EntityId(4), Some(EntityId(1)));

        let removed = graph.remove_subtree(EntityId(1));
        assert_eq!(removed, vec![EntityId(1), EntityId(2), EntityId(4), EntityId(3)]);
        assert!(graph.is_empty());
    }
}
