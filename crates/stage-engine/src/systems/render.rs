use crate::components::entity::Entity;
use crate::components::layer::RenderLayer;
use crate::components::visual::Visual;
use crate::components::entity::WorldTransform;
use crate::renderer::instance::{RenderBuffer, RenderInstance};
use crate::systems::particles::ParticleSystem;

fn instance(world: &WorldTransform, visual: &Visual, style: u32) -> RenderInstance {
    RenderInstance {
        x: world.pos.x,
        y: world.pos.y,
        rotation: world.rotation,
        scale_x: world.scale.x,
        scale_y: world.scale.y,
        alpha: world.alpha,
        width: visual.size.x,
        height: visual.size.y,
        shape: visual.shape.code(),
        color: visual.color,
        glyph: visual.shape.glyph(),
        style,
    }
}

/// Build the render buffer from the scene's resolved world transforms and the
/// visible particles. Entities are grouped by layer (stable within a layer);
/// particles follow on top.
pub fn build_render_buffer<'a>(
    entities: impl Iterator<Item = &'a Entity>,
    particles: &ParticleSystem,
    buffer: &mut RenderBuffer,
) {
    buffer.clear();

    let mut drawn: Vec<(RenderLayer, RenderInstance)> = entities
        .filter(|e| e.active)
        .filter_map(|e| {
            let visual = e.visual.as_ref()?;
            Some((visual.layer, instance(&e.world, visual, RenderInstance::NO_STYLE)))
        })
        .collect();
    drawn.sort_by_key(|(layer, _)| *layer);

    for (_, inst) in drawn {
        buffer.push(inst);
    }

    for p in particles.visible() {
        let world = WorldTransform {
            pos: p.position(),
            rotation: 0.0,
            scale: glam::Vec2::ONE,
            alpha: p.alpha(),
        };
        if !buffer.push(instance(&world, &p.visual(), p.spec.style)) {
            break;
        }
    }
}
