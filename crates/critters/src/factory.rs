//! Builds the visual subtree of one creature.
//!
//! ```text
//! group   (stage position of the creature's base, on the ground line)
//! ├── handle  (invisible; its local position is the live drag offset)
//! └── figure  (pivot at the base; rotation/scale/follow offset)
//!     ├── leg, leg
//!     └── body
//! ```

use glam::Vec2;
use stage_engine::{EngineContext, Entity, EntityId, Footprint, Scene, TransformGraph, Visual};

/// Appearance of one creature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Look {
    pub color: u32,
    /// Body diameter.
    pub size: f32,
    pub leg_length: f32,
}

impl Look {
    pub fn radius(&self) -> f32 {
        self.size * 0.5
    }

    /// Total height from the ground to the top of the body.
    pub fn height(&self) -> f32 {
        self.size + self.leg_length
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CreatureParts {
    pub group: EntityId,
    pub handle: EntityId,
    pub figure: EntityId,
    pub body: EntityId,
    pub legs: [EntityId; 2],
    /// Hit area of the handle, covering the whole creature.
    pub footprint: Footprint,
}

/// Scale every channel of 0xRRGGBB by `factor`.
fn shade(color: u32, factor: f32) -> u32 {
    let channel = |shift: u32| {
        let c = ((color >> shift) & 0xff) as f32 * factor;
        (c.round().clamp(0.0, 255.0) as u32) << shift
    };
    channel(16) | channel(8) | channel(0)
}

/// Spawn the parts of a creature whose base sits at `at`.
pub fn build_creature(ctx: &mut EngineContext, graph: &mut TransformGraph, look: Look, at: Vec2, tag: &str) -> CreatureParts {
    let r = look.radius();
    let leg_width = (look.size * 0.14).max(2.0);
    let leg_color = shade(look.color, 0.8);

    let group = ctx.next_id();
    ctx.scene.spawn(Entity::new(group).with_tag(tag).with_pos(at));

    let handle = ctx.next_id();
    ctx.scene.spawn(Entity::new(handle).with_tag("handle"));
    graph.set_parent(handle, Some(group));

    let figure = ctx.next_id();
    ctx.scene.spawn(Entity::new(figure).with_tag("figure"));
    graph.set_parent(figure, Some(group));

    let mut legs = [EntityId(0); 2];
    for (leg, side) in legs.iter_mut().zip([-1.0, 1.0]) {
        *leg = ctx.next_id();
        ctx.scene.spawn(
            Entity::new(*leg)
                .with_tag("leg")
                .with_pos(Vec2::new(side * r / 3.0, -look.leg_length))
                .with_visual(Visual::capsule(leg_width, look.leg_length, leg_color)),
        );
        graph.set_parent(*leg, Some(figure));
    }

    let body = ctx.next_id();
    ctx.scene.spawn(
        Entity::new(body)
            .with_tag("body")
            .with_pos(Vec2::new(0.0, -look.leg_length - r))
            .with_visual(Visual::circle(look.size, look.color)),
    );
    graph.set_parent(body, Some(figure));

    CreatureParts {
        group,
        handle,
        figure,
        body,
        legs,
        footprint: Footprint::new(look.size, look.height()),
    }
}

/// Remove every entity of the subtree. Returns how many were despawned.
pub fn destroy_parts(scene: &mut Scene, graph: &mut TransformGraph, parts: &CreatureParts) -> usize {
    let ids = graph.remove_subtree(parts.group);
    scene.despawn_all(&ids)
}
