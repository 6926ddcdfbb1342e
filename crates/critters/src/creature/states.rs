//! Enter/exit/tick functions of every creature state, looked up by table.

use std::f32::consts::PI;

use glam::Vec2;
use stage_engine::{EntityId, Easing, Timeline, Tween};

use super::{cues, part, Creature, CreatureEnv, CreatureState, TickFn};
use crate::emitter;
use crate::factory::destroy_parts;
use crate::geometry::{angle_degrees, map_range, smooth_damp, vector_length};

// Spawning
const SPAWN_TIME: f32 = 1.0;

// Idle
pub(super) const BREATH_TIME: f32 = 1.3;   // One half of a breath
const BREATH_SCALE: Vec2 = Vec2::new(1.04, 0.96);
const SETTLE_TIME: f32 = 0.35;

// Pulling
const PULL_DEBRIS: usize = 20;
const PULL_SPREAD: f32 = 40.0;         // Degrees either side of the pull direction
const MIN_AIM: f32 = 1.0;              // Below this distance the figure stays upright

// Dragging
const FOLLOW_SMOOTH_TIME: f32 = 0.1;
const RELAX_TIME: f32 = 0.6;
const UNLOCK_DISTANCE: f32 = 20.0;
const LAG_STRETCH_CAP: f32 = 50.0;

// Dropping
const SQUASH_TIME: f32 = 0.08;
const RECOVER_TIME: f32 = 0.7;
const IMPACT_SPREAD: f32 = 70.0;

// Leaving
const STRIDES_PER_TURN: f32 = 8.0;
const WALK_SETTLE: f32 = 0.3;
const SWING_TIME: f32 = 0.12;
const STEP_TIME: f32 = 0.22;
const LEG_SWING: f32 = 0.45;           // Radians
const BODY_TILT: f32 = 0.1;

pub(crate) struct StateHooks {
    pub enter: fn(&mut Creature, Option<CreatureState>, &mut CreatureEnv),
    pub exit: fn(&mut Creature, CreatureState, &mut CreatureEnv),
    pub tick: Option<TickFn>,
}

/// Indexed by `CreatureState as usize`.
static HOOKS: [StateHooks; 7] = [
    StateHooks { enter: enter_spawning, exit: exit_spawning, tick: None },
    StateHooks { enter: enter_idle, exit: exit_nothing, tick: None },
    StateHooks { enter: enter_pulling, exit: exit_nothing, tick: Some(tick_pulling) },
    StateHooks { enter: enter_dragging, exit: exit_nothing, tick: Some(tick_dragging) },
    StateHooks { enter: enter_dropping, exit: exit_nothing, tick: None },
    StateHooks { enter: enter_leaving, exit: exit_nothing, tick: None },
    StateHooks { enter: enter_destroyed, exit: exit_nothing, tick: None },
];

pub(crate) fn hooks(state: CreatureState) -> &'static StateHooks {
    &HOOKS[state as usize]
}

fn exit_nothing(_: &mut Creature, _: CreatureState, _: &mut CreatureEnv) {}

/// Upright figure with no distortion.
fn straighten(figure: EntityId, env: &mut CreatureEnv) {
    if let Some(e) = env.scene.get_mut(figure) {
        e.rotation = 0.0;
        e.scale = Vec2::ONE;
    }
}

/// Rotation that points the figure's up axis along `angle_deg`, in (-PI, PI].
fn aim(angle_deg: f32) -> f32 {
    let deg = angle_deg + 90.0;
    let deg = if deg > 180.0 { deg - 360.0 } else { deg };
    deg.to_radians()
}

/// Elongate along the pull axis and thin out across it.
fn pull_scale(stretch: f32) -> Vec2 {
    Vec2::new(1.0 - 0.25 * stretch, 1.0 + 0.5 * stretch)
}

/// Endless breathing on `figure`; raises `cues::BREATH` once per breath.
pub fn breathing_timeline(owner: u32, figure: EntityId) -> Timeline {
    Timeline::new(owner)
        .then(Tween::scale(figure, Vec2::ONE, BREATH_SCALE, BREATH_TIME, Easing::SineInOut))
        .cue(cues::BREATH)
        .then(Tween::scale(figure, BREATH_SCALE, Vec2::ONE, BREATH_TIME, Easing::SineInOut))
        .repeat_forever(0.0)
}

// ── Spawning ────────────────────────────────────────────────────────────

fn enter_spawning(c: &mut Creature, _: Option<CreatureState>, env: &mut CreatureEnv) {
    env.drags.set_enabled(c.binding, false);
    if let Some(e) = env.scene.get_mut(c.parts.figure) {
        e.scale = Vec2::ZERO;
    }
    let grow = Timeline::new(c.id)
        .then(Tween::scale(c.parts.figure, Vec2::ZERO, Vec2::ONE, SPAWN_TIME, Easing::ELASTIC_OUT))
        .on_complete(cues::SPAWNED);
    c.start_timeline(grow, env);
}

fn exit_spawning(c: &mut Creature, _: CreatureState, env: &mut CreatureEnv) {
    straighten(c.parts.figure, env);
}

// ── Idle ────────────────────────────────────────────────────────────────

fn enter_idle(c: &mut Creature, from: Option<CreatureState>, env: &mut CreatureEnv) {
    c.stretch = 0.0;
    env.drags.set_enabled(c.binding, true);

    if from != Some(CreatureState::Pulling) {
        start_breathing(c, env);
        return;
    }

    // Released early: spring the handle home and straighten up first.
    let figure = part(env.scene, c.parts.figure);
    let (rotation, scale) = (figure.rotation, figure.scale);
    let home = Timeline::new(c.id)
        .then(Tween::position(c.parts.handle, c.drag, Vec2::ZERO, SETTLE_TIME, Easing::BackOut))
        .with(Tween::rotation(c.parts.figure, rotation, 0.0, SETTLE_TIME, Easing::BackOut))
        .with(Tween::scale(c.parts.figure, scale, Vec2::ONE, SETTLE_TIME, Easing::BackOut))
        .on_complete(cues::SETTLED);
    c.start_timeline(home, env);
}

fn start_breathing(c: &mut Creature, env: &mut CreatureEnv) {
    straighten(c.parts.figure, env);
    c.start_timeline(breathing_timeline(c.id, c.parts.figure), env);
}

/// The handle is home: pin it exactly at rest and resume breathing.
pub(super) fn settle_at_rest(c: &mut Creature, env: &mut CreatureEnv) {
    c.set_drag(Vec2::ZERO, env);
    start_breathing(c, env);
}

/// One breath completed: let out a sleep glyph above the body.
pub(super) fn exhale(c: &mut Creature, env: &mut CreatureEnv) {
    let Some(body) = env.scene.get(c.parts.body) else { return };
    let top = body.world.pos - Vec2::new(0.0, c.look.radius());
    emitter::snore_glyph(env.particles, env.rng, top, c.look.size / 80.0);
}

// ── Pulling ─────────────────────────────────────────────────────────────

fn enter_pulling(c: &mut Creature, _: Option<CreatureState>, env: &mut CreatureEnv) {
    c.stretch = 0.0;
    straighten(c.parts.figure, env);
}

fn tick_pulling(c: &mut Creature, env: &mut CreatureEnv) -> Option<CreatureState> {
    let rest = c.rest;
    let target = rest + c.drag;
    let dist = vector_length(c.drag.x, c.drag.y);
    let angle = angle_degrees(rest.x, rest.y, target.x, target.y);
    let stretch = map_range(dist, 0.0, 0.5 * env.stage.y, 0.0, 1.0);
    c.stretch = stretch;

    if let Some(figure) = env.scene.get_mut(c.parts.figure) {
        figure.rotation = if dist > MIN_AIM { aim(angle) } else { 0.0 };
        figure.scale = pull_scale(stretch);
    }

    if stretch >= 1.0 {
        emitter::debris_burst(env.particles, env.rng, rest, PULL_DEBRIS, angle, PULL_SPREAD, 1.0);
        return Some(CreatureState::Dragging);
    }
    None
}

// ── Dragging ────────────────────────────────────────────────────────────

fn enter_dragging(c: &mut Creature, _: Option<CreatureState>, env: &mut CreatureEnv) {
    let figure = part(env.scene, c.parts.figure);
    let (pos, rotation, scale) = (figure.pos, figure.rotation, figure.scale);
    c.follow = pos;
    c.follow_vel = Vec2::ZERO;
    c.drag_at_entry = c.drag;
    c.distort_locked = true;

    let relax = Timeline::new(c.id)
        .then(Tween::rotation(c.parts.figure, rotation, 0.0, RELAX_TIME, Easing::ELASTIC_OUT))
        .with(Tween::scale(c.parts.figure, scale, Vec2::ONE, RELAX_TIME, Easing::ELASTIC_OUT))
        .on_complete(cues::RELAXED);
    c.start_timeline(relax, env);
}

fn tick_dragging(c: &mut Creature, env: &mut CreatureEnv) -> Option<CreatureState> {
    let (pos, vel) = smooth_damp(c.follow, c.drag, c.follow_vel, FOLLOW_SMOOTH_TIME, env.dt);
    c.follow = pos;
    c.follow_vel = vel;

    if c.distort_locked && (c.drag - c.drag_at_entry).length() > UNLOCK_DISTANCE {
        c.distort_locked = false;
        if let Some(relax) = c.timeline.take() {
            env.timelines.kill(relax);
        }
    }

    let Some(figure) = env.scene.get_mut(c.parts.figure) else { return None };
    figure.pos = pos;
    if !c.distort_locked {
        let lag = c.drag - pos;
        let len = lag.length().min(LAG_STRETCH_CAP);
        figure.rotation = if len > MIN_AIM {
            aim(angle_degrees(0.0, 0.0, lag.x, lag.y))
        } else {
            0.0
        };
        figure.scale = pull_scale(len / LAG_STRETCH_CAP);
    }
    None
}

// ── Dropping ────────────────────────────────────────────────────────────

fn enter_dropping(c: &mut Creature, _: Option<CreatureState>, env: &mut CreatureEnv) {
    env.drags.set_enabled(c.binding, false);

    let figure = part(env.scene, c.parts.figure);
    let (pos, rotation, scale) = (figure.pos, figure.rotation, figure.scale);
    let fall = (-pos.y).max(0.0);
    let f = map_range(fall, 0.0, env.stage.y, 0.0, 1.0);
    let fall_time = 0.2 + 0.5 * f;
    let squish = map_range(f, 0.0, 1.0, 0.25, 1.0);
    let squashed = Vec2::new(1.0 + 0.5 * squish, 1.0 - 0.5 * squish);
    c.impact = f;

    let figure = c.parts.figure;
    let drop = Timeline::new(c.id)
        .at(0.0, Tween::rotation(figure, rotation, 0.0, fall_time * 0.5, Easing::QuadOut))
        .with(Tween::scale(figure, scale, Vec2::ONE, fall_time * 0.5, Easing::QuadOut))
        .at(0.0, Tween::position_y(figure, pos.y, 0.0, fall_time, Easing::ExpoIn))
        .cue_at(fall_time, cues::IMPACT)
        .at(fall_time, Tween::scale(figure, Vec2::ONE, squashed, SQUASH_TIME, Easing::QuadOut))
        .then(Tween::scale(figure, squashed, Vec2::ONE, RECOVER_TIME, Easing::ELASTIC_OUT))
        .on_complete(cues::LANDED);
    c.start_timeline(drop, env);
}

/// The figure hit the ground: kick up debris sized by the fall height.
pub(super) fn impact(c: &mut Creature, env: &mut CreatureEnv) {
    let x = env.scene.get(c.parts.figure).map(|e| e.pos.x).unwrap_or(0.0);
    let count = map_range(c.impact, 0.0, 1.0, 4.0, 20.0).round() as usize;
    let speed = map_range(c.impact, 0.0, 1.0, 1.0, 4.0);
    let at = c.rest + Vec2::new(x, 0.0);
    emitter::debris_burst(env.particles, env.rng, at, count, -90.0, IMPACT_SPREAD, speed);
}

// ── Leaving ─────────────────────────────────────────────────────────────

/// Number of strides needed to carry a creature at `x` fully past the edge it walks to.
pub(crate) fn steps_to_edge(x: f32, direction: f32, stage_width: f32, size: f32) -> u32 {
    let stride = PI * size / STRIDES_PER_TURN;
    let edge = if direction > 0.0 { stage_width - x } else { x };
    let needed = (edge.max(0.0) + size * 0.5) / stride;
    (needed.ceil() as u32).max(1)
}

fn enter_leaving(c: &mut Creature, _: Option<CreatureState>, env: &mut CreatureEnv) {
    let direction = env.rng.sign();
    let figure = c.parts.figure;
    let [left, right] = c.parts.legs;
    let start_x = part(env.scene, figure).pos.x;
    let stride = PI * c.look.size / STRIDES_PER_TURN;
    let steps = steps_to_edge(c.rest.x + start_x, direction, env.stage.x, c.look.size);

    let settle = Vec2::new(1.05, 0.95);
    let mut walk = Timeline::new(c.id)
        .then(Tween::scale(figure, Vec2::ONE, settle, WALK_SETTLE * 0.5, Easing::QuadOut))
        .then(Tween::scale(figure, settle, Vec2::ONE, WALK_SETTLE * 0.5, Easing::QuadIn));

    let mut t = WALK_SETTLE;
    let mut x = start_x;
    for i in 0..steps {
        let swing = if i % 2 == 0 { LEG_SWING } else { -LEG_SWING };
        let next = x + direction * stride;
        walk = walk
            .at(t, Tween::rotation(left, 0.0, swing, SWING_TIME, Easing::QuadOut))
            .with(Tween::rotation(right, 0.0, -swing, SWING_TIME, Easing::QuadOut))
            .at(t + SWING_TIME, Tween::position_x(figure, x, next, STEP_TIME, Easing::QuadInOut))
            .with(Tween::rotation(left, swing, 0.0, STEP_TIME, Easing::QuadInOut))
            .with(Tween::rotation(right, -swing, 0.0, STEP_TIME, Easing::QuadInOut))
            .with(Tween::rotation(figure, 0.0, direction * BODY_TILT, STEP_TIME * 0.5, Easing::QuadOut))
            .at(
                t + SWING_TIME + STEP_TIME * 0.5,
                Tween::rotation(figure, direction * BODY_TILT, 0.0, STEP_TIME * 0.5, Easing::QuadIn),
            );
        t += SWING_TIME + STEP_TIME;
        x = next;
    }
    log::debug!("creature {}: leaving over {} steps", c.id, steps);
    c.start_timeline(walk.on_complete(cues::GONE), env);
}

// ── Destroyed ───────────────────────────────────────────────────────────

fn enter_destroyed(c: &mut Creature, _: Option<CreatureState>, env: &mut CreatureEnv) {
    env.drags.unbind(c.binding);
    let removed = destroy_parts(env.scene, env.graph, &c.parts);
    debug_assert_eq!(removed, 6, "creature subtree incomplete");
    log::info!("creature {}: left the stage", c.id);
}
