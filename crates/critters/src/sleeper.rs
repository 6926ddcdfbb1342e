//! The permanent sleeper: never dragged, never leaves, always dozing.
//!
//! It breathes like an idle creature, snores on a fixed cadence driven by
//! the stage scheduler, grows a little while hovered and asks the host to
//! open a link when clicked.

use glam::Vec2;
use stage_engine::{
    Cue, EngineContext, Easing, ParticleSystem, Rng, Scene, Timeline, TimelineId, TimelineState, Tween,
};

use crate::creature::{breathing_timeline, CreatureSystems};
use crate::emitter;
use crate::factory::{build_creature, CreatureParts, Look};

/// Timeline owner tag of the sleeper. Creature ids start at 1.
pub const SLEEPER_OWNER: u32 = 0;

const HOVER_SCALE: f32 = 1.15;
const HOVER_TIME: f32 = 0.2;
const HOVER_DONE: u32 = 1;

#[derive(Debug)]
pub struct Sleeper {
    parts: CreatureParts,
    look: Look,
    hovered: bool,
    breathing: TimelineId,
    hover: Option<TimelineId>,
    snores: u32,
}

impl Sleeper {
    /// Place the sleeper on the ground, `inset` units from the right edge.
    pub fn spawn(ctx: &mut EngineContext, systems: &mut CreatureSystems, look: Look, inset: f32) -> Self {
        let x = (ctx.viewport.width() - inset - look.radius()).max(look.radius());
        let at = Vec2::new(x, ctx.viewport.ground_y());
        let parts = build_creature(ctx, &mut systems.graph, look, at, "sleeper");
        let breathing = systems.timelines.add(breathing_timeline(SLEEPER_OWNER, parts.figure));
        log::debug!("sleeper: dozing at ({:.0}, {:.0})", at.x, at.y);
        Self {
            parts,
            look,
            hovered: false,
            breathing,
            hover: None,
            snores: 0,
        }
    }

    pub fn parts(&self) -> &CreatureParts {
        &self.parts
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    /// Glyphs emitted so far.
    pub fn snores(&self) -> u32 {
        self.snores
    }

    pub fn is_breathing(&self, timelines: &TimelineState) -> bool {
        timelines.is_alive(self.breathing)
    }

    /// Whether `point` is over the sleeper.
    pub fn contains(&self, scene: &Scene, point: Vec2) -> bool {
        scene
            .get(self.parts.group)
            .is_some_and(|group| self.parts.footprint.contains(group.world.pos, point))
    }

    /// Track the pointer; `None` means it left the stage. Returns whether hover changed.
    pub fn pointer_moved(&mut self, point: Option<Vec2>, scene: &Scene, timelines: &mut TimelineState) -> bool {
        let inside = point.is_some_and(|p| self.contains(scene, p));
        if inside == self.hovered {
            return false;
        }
        self.hovered = inside;

        let from = scene.get(self.parts.group).map(|g| g.scale).unwrap_or(Vec2::ONE);
        let to = if inside { Vec2::splat(HOVER_SCALE) } else { Vec2::ONE };
        if let Some(old) = self.hover.take() {
            timelines.kill(old);
        }
        self.hover = Some(timelines.add(
            Timeline::new(SLEEPER_OWNER)
                .then(Tween::scale(self.parts.group, from, to, HOVER_TIME, Easing::BackOut))
                .on_complete(HOVER_DONE),
        ));
        true
    }

    /// Breath cues are ignored here; snoring runs on the stage scheduler.
    pub fn on_cue(&mut self, cue: Cue) {
        if cue.id == HOVER_DONE && Some(cue.timeline) == self.hover {
            self.hover = None;
        }
    }

    pub fn snore(&mut self, scene: &Scene, particles: &mut ParticleSystem, rng: &mut Rng) {
        let Some(body) = scene.get(self.parts.body) else { return };
        let top = body.world.pos - Vec2::new(0.0, self.look.radius() * body.world.scale.y);
        if emitter::snore_glyph(particles, rng, top, self.look.size / 80.0).is_some() {
            self.snores += 1;
        }
    }
}
