//! Creature state machine.
//!
//! A creature is always in exactly one `CreatureState`. Moving between states
//! goes through `Creature::transition`, which checks the transition table,
//! runs the outgoing state's `exit`, cancels its timeline and frame tick, then
//! runs the incoming state's `enter` and registers its tick. The per-state
//! functions live in `states`.

mod herd;
mod states;

pub use herd::Herd;
pub use states::breathing_timeline;

use glam::Vec2;
use stage_engine::{
    BindingId, Cue, DragEvent, DragTracker, EngineContext, Entity, EntityId, ParticleSystem, Rng, Scene, Ticker,
    TimelineId, TimelineState, TransformGraph,
};
use thiserror::Error;

use crate::factory::{CreatureParts, Look};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CreatureState {
    Spawning = 0,
    Idle = 1,
    Pulling = 2,
    Dragging = 3,
    Dropping = 4,
    Leaving = 5,
    Destroyed = 6,
}

impl CreatureState {
    /// Whether the transition table has an edge `self -> to`.
    pub fn can_become(self, to: CreatureState) -> bool {
        use CreatureState::*;
        matches!(
            (self, to),
            (Spawning, Idle)
                | (Idle, Pulling)
                | (Pulling, Idle)
                | (Pulling, Dragging)
                | (Dragging, Dropping)
                | (Dropping, Leaving)
                | (Leaving, Destroyed)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("creature {id}: no transition from {from:?} to {to:?}")]
pub struct TransitionError {
    pub id: u32,
    pub from: CreatureState,
    pub to: CreatureState,
}

/// Cue ids raised by creature timelines.
pub mod cues {
    pub const SPAWNED: u32 = 1;
    pub const SETTLED: u32 = 2;
    pub const BREATH: u32 = 3;
    pub const RELAXED: u32 = 4;
    pub const IMPACT: u32 = 5;
    pub const LANDED: u32 = 6;
    pub const GONE: u32 = 7;
}

/// Per-frame callback of a state. Returns a transition to take, if any.
pub type TickFn = fn(&mut Creature, &mut CreatureEnv) -> Option<CreatureState>;

/// Systems the stage owns on behalf of all creatures.
#[derive(Debug, Default)]
pub struct CreatureSystems {
    pub timelines: TimelineState,
    pub ticker: Ticker<u32, TickFn>,
    pub drags: DragTracker,
    pub graph: TransformGraph,
}

impl CreatureSystems {
    pub fn new() -> Self {
        Self::default()
    }

    /// Borrow everything a creature may touch during one call.
    pub fn env<'a>(&'a mut self, ctx: &'a mut EngineContext) -> CreatureEnv<'a> {
        let stage = ctx.viewport.size();
        let dt = ctx.dt();
        CreatureEnv {
            scene: &mut ctx.scene,
            particles: &mut ctx.particles,
            rng: &mut ctx.rng,
            timelines: &mut self.timelines,
            ticker: &mut self.ticker,
            drags: &mut self.drags,
            graph: &mut self.graph,
            stage,
            dt,
        }
    }
}

pub struct CreatureEnv<'a> {
    pub scene: &'a mut Scene,
    pub particles: &'a mut ParticleSystem,
    pub rng: &'a mut Rng,
    pub timelines: &'a mut TimelineState,
    pub ticker: &'a mut Ticker<u32, TickFn>,
    pub drags: &'a mut DragTracker,
    pub graph: &'a mut TransformGraph,
    /// Live stage size; `stage.y` is the ground line.
    pub stage: Vec2,
    pub dt: f32,
}

#[derive(Debug)]
pub struct Creature {
    id: u32,
    parts: CreatureParts,
    binding: BindingId,
    look: Look,
    /// Base position on the ground where the creature was placed.
    rest: Vec2,
    /// Live handle offset from `rest`, as reported by the drag tracker.
    drag: Vec2,
    state: CreatureState,
    previous: Option<CreatureState>,
    /// The single transition-bound timeline, if one is running.
    timeline: Option<TimelineId>,
    stretch: f32,
    follow: Vec2,
    follow_vel: Vec2,
    drag_at_entry: Vec2,
    distort_locked: bool,
    /// Normalized fall height of the current drop.
    impact: f32,
}

impl Creature {
    /// Bind the parts to the drag tracker and start the entry animation.
    pub fn spawn(id: u32, parts: CreatureParts, look: Look, env: &mut CreatureEnv) -> Self {
        let binding = env.drags.bind(parts.handle, parts.footprint);
        let rest = part(env.scene, parts.group).pos;
        let mut creature = Self {
            id,
            parts,
            binding,
            look,
            rest,
            drag: Vec2::ZERO,
            state: CreatureState::Spawning,
            previous: None,
            timeline: None,
            stretch: 0.0,
            follow: Vec2::ZERO,
            follow_vel: Vec2::ZERO,
            drag_at_entry: Vec2::ZERO,
            distort_locked: false,
            impact: 0.0,
        };
        let hooks = states::hooks(CreatureState::Spawning);
        (hooks.enter)(&mut creature, None, env);
        if let Some(tick) = hooks.tick {
            env.ticker.add(id, tick);
        }
        log::debug!("creature {}: spawned at ({:.0}, {:.0})", id, rest.x, rest.y);
        creature
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn state(&self) -> CreatureState {
        self.state
    }

    pub fn previous(&self) -> Option<CreatureState> {
        self.previous
    }

    pub fn parts(&self) -> &CreatureParts {
        &self.parts
    }

    pub fn binding(&self) -> BindingId {
        self.binding
    }

    pub fn look(&self) -> Look {
        self.look
    }

    pub fn rest(&self) -> Vec2 {
        self.rest
    }

    pub fn drag(&self) -> Vec2 {
        self.drag
    }

    /// Normalized pull distance of the last pulling frame, in [0, 1].
    pub fn stretch(&self) -> f32 {
        self.stretch
    }

    pub fn is_destroyed(&self) -> bool {
        self.state == CreatureState::Destroyed
    }

    /// Move to `to`, running `exit` of the current state before `enter` of the next.
    /// Returns the state left behind.
    pub fn transition(&mut self, to: CreatureState, env: &mut CreatureEnv) -> Result<CreatureState, TransitionError> {
        let from = self.state;
        if !from.can_become(to) {
            return Err(TransitionError { id: self.id, from, to });
        }

        (states::hooks(from).exit)(self, to, env);
        if let Some(timeline) = self.timeline.take() {
            env.timelines.kill(timeline);
        }
        env.ticker.remove(self.id);

        self.previous = Some(from);
        self.state = to;
        log::debug!("creature {}: {:?} -> {:?}", self.id, from, to);

        let hooks = states::hooks(to);
        (hooks.enter)(self, Some(from), env);
        if let Some(tick) = hooks.tick {
            env.ticker.add(self.id, tick);
        }
        Ok(from)
    }

    /// React to a gesture on this creature's handle.
    pub fn on_drag(&mut self, event: DragEvent, env: &mut CreatureEnv) -> Result<(), TransitionError> {
        match (event, self.state) {
            (DragEvent::Press { offset, .. }, CreatureState::Idle) => {
                self.set_drag(offset, env);
                self.transition(CreatureState::Pulling, env)?;
            }
            (DragEvent::Move { offset, .. }, CreatureState::Pulling | CreatureState::Dragging) => {
                self.set_drag(offset, env);
            }
            (DragEvent::Release { offset, .. }, CreatureState::Pulling) => {
                self.set_drag(offset, env);
                self.transition(CreatureState::Idle, env)?;
            }
            (DragEvent::Release { offset, .. }, CreatureState::Dragging) => {
                self.set_drag(offset, env);
                self.transition(CreatureState::Dropping, env)?;
            }
            _ => {}
        }
        Ok(())
    }

    /// Handle a cue raised by one of this creature's timelines.
    /// Cues from timelines that are no longer current are ignored.
    pub fn on_cue(&mut self, cue: Cue, env: &mut CreatureEnv) -> Result<(), TransitionError> {
        if self.timeline != Some(cue.timeline) {
            return Ok(());
        }
        if cue.complete {
            self.timeline = None;
        }
        match cue.id {
            cues::SPAWNED => {
                self.transition(CreatureState::Idle, env)?;
            }
            cues::SETTLED => states::settle_at_rest(self, env),
            cues::BREATH => states::exhale(self, env),
            cues::RELAXED => self.distort_locked = false,
            cues::IMPACT => states::impact(self, env),
            cues::LANDED => {
                self.transition(CreatureState::Leaving, env)?;
            }
            cues::GONE => {
                self.transition(CreatureState::Destroyed, env)?;
            }
            other => log::warn!("creature {}: unknown cue {}", self.id, other),
        }
        Ok(())
    }

    fn set_drag(&mut self, offset: Vec2, env: &mut CreatureEnv) {
        self.drag = offset;
        if let Some(handle) = env.scene.get_mut(self.parts.handle) {
            handle.pos = offset;
        }
    }

    fn start_timeline(&mut self, timeline: stage_engine::Timeline, env: &mut CreatureEnv) {
        if let Some(old) = self.timeline.take() {
            env.timelines.kill(old);
        }
        self.timeline = Some(env.timelines.add(timeline));
    }
}

/// A node `build_creature` made for this creature. A missing part breaks the
/// construction contract and panics.
pub(crate) fn part(scene: &Scene, id: EntityId) -> &Entity {
    match scene.get(id) {
        Some(entity) => entity,
        None => panic!("creature part {:?} is not in the scene", id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::build_creature;
    use stage_engine::InputEvent;

    const DT: f32 = 1.0 / 60.0;
    const ID: u32 = 1;

    struct Bench {
        ctx: EngineContext,
        systems: CreatureSystems,
        herd: Herd,
    }

    fn bench(x: f32) -> Bench {
        let mut ctx = EngineContext::new();
        let mut systems = CreatureSystems::new();
        let look = Look { color: 0xffffff, size: 80.0, leg_length: 28.0 };
        let at = Vec2::new(x, ctx.viewport.ground_y());
        let parts = build_creature(&mut ctx, &mut systems.graph, look, at, "creature");
        let mut herd = Herd::new();
        {
            let mut env = systems.env(&mut ctx);
            herd.push(Creature::spawn(ID, parts, look, &mut env));
            env.graph.propagate(env.scene);
        }
        Bench { ctx, systems, herd }
    }

    impl Bench {
        fn creature(&self) -> &Creature {
            self.herd.get(ID).unwrap()
        }

        fn frame(&mut self, input: &[InputEvent]) {
            let bounds = self.ctx.viewport.size();
            {
                let mut env = self.systems.env(&mut self.ctx);
                for event in input {
                    if let Some(drag) = env.drags.process(event, env.scene, bounds) {
                        self.herd.route_drag(drag, &mut env);
                    }
                }
                self.herd.run_ticks(&mut env);
                env.timelines.tick(DT, env.scene);
                for cue in env.timelines.drain_cues() {
                    self.herd.route_cue(cue, &mut env);
                }
                env.graph.propagate(env.scene);
            }
            self.ctx.particles.tick(DT);
        }

        fn idle_frames(&mut self, n: usize) {
            for _ in 0..n {
                self.frame(&[]);
            }
        }

        fn run_until(&mut self, state: CreatureState, max_frames: usize) -> bool {
            for _ in 0..max_frames {
                if self.creature().state() == state {
                    return true;
                }
                self.frame(&[]);
            }
            self.creature().state() == state
        }

        fn handle_world(&self) -> Vec2 {
            self.ctx.scene.get(self.creature().parts().handle).unwrap().world.pos
        }
    }

    fn down(x: f32, y: f32) -> InputEvent {
        InputEvent::PointerDown { x, y }
    }

    fn to(x: f32, y: f32) -> InputEvent {
        InputEvent::PointerMove { x, y }
    }

    fn up(x: f32, y: f32) -> InputEvent {
        InputEvent::PointerUp { x, y }
    }

    #[test]
    fn table_has_exactly_the_documented_edges() {
        use CreatureState::*;
        let all = [Spawning, Idle, Pulling, Dragging, Dropping, Leaving, Destroyed];
        let edges = all
            .iter()
            .flat_map(|&a| all.iter().map(move |&b| (a, b)))
            .filter(|&(a, b)| a.can_become(b))
            .count();
        assert_eq!(edges, 7);
        assert!(Pulling.can_become(Idle));
        assert!(!Idle.can_become(Dragging));
        assert!(!Destroyed.can_become(Spawning));
    }

    #[test]
    fn spawn_grows_in_then_idles() {
        let mut b = bench(100.0);
        assert_eq!(b.creature().state(), CreatureState::Spawning);
        assert!(!b.systems.drags.is_enabled(b.creature().binding()));

        b.idle_frames(30);
        assert_eq!(b.creature().state(), CreatureState::Spawning);
        assert!(b.run_until(CreatureState::Idle, 40));
        assert_eq!(b.creature().previous(), Some(CreatureState::Spawning));
        assert!(b.systems.drags.is_enabled(b.creature().binding()));
        assert!(b.systems.ticker.is_empty());
    }

    #[test]
    fn breathing_lets_out_sleep_glyphs() {
        let mut b = bench(100.0);
        assert!(b.run_until(CreatureState::Idle, 70));
        let before = b.ctx.particles.spawned();
        // Two full breaths.
        b.idle_frames((4.0 * states::BREATH_TIME / DT) as usize + 2);
        assert_eq!(b.ctx.particles.spawned() - before, 2);
    }

    #[test]
    fn invalid_transition_changes_nothing() {
        let mut ctx = EngineContext::new();
        let mut systems = CreatureSystems::new();
        let look = Look { color: 0xffffff, size: 80.0, leg_length: 28.0 };
        let parts = build_creature(&mut ctx, &mut systems.graph, look, Vec2::new(100.0, 600.0), "creature");
        let mut env = systems.env(&mut ctx);
        let mut c = Creature::spawn(ID, parts, look, &mut env);

        let err = c.transition(CreatureState::Dragging, &mut env).unwrap_err();
        assert_eq!(err, TransitionError { id: ID, from: CreatureState::Spawning, to: CreatureState::Dragging });
        assert!(err.to_string().contains("Spawning"));
        assert_eq!(c.state(), CreatureState::Spawning);
        assert!(c.previous().is_none());
        // The entry animation is still running.
        assert_eq!(env.timelines.len(), 1);
    }

    #[test]
    fn full_drag_reaches_dragging_with_twenty_debris() {
        let mut b = bench(100.0);
        assert!(b.run_until(CreatureState::Idle, 70));
        let h = b.ctx.viewport.height();

        b.frame(&[down(100.0, h)]);
        assert_eq!(b.creature().state(), CreatureState::Pulling);

        let before = b.ctx.particles.spawned();
        b.frame(&[to(100.0, h - h * 0.5)]);
        assert_eq!(b.creature().stretch(), 1.0);
        assert_eq!(b.creature().state(), CreatureState::Dragging);
        assert_eq!(b.ctx.particles.spawned() - before, 20);
    }

    #[test]
    fn stretch_rises_with_distance_and_trips_on_the_threshold_frame() {
        let mut b = bench(100.0);
        assert!(b.run_until(CreatureState::Idle, 70));
        let h = b.ctx.viewport.height();
        b.frame(&[down(100.0, h)]);

        let mut last = 0.0;
        let steps = 30;
        for k in 1..=steps {
            let y = h - (h * 0.5) * k as f32 / steps as f32;
            b.frame(&[to(100.0, y)]);
            let c = b.creature();
            assert!(c.stretch() >= last);
            assert!((0.0..=1.0).contains(&c.stretch()));
            if k < steps {
                assert!(c.stretch() < 1.0);
                assert_eq!(c.state(), CreatureState::Pulling, "tripped early at step {}", k);
            } else {
                assert_eq!(c.state(), CreatureState::Dragging);
            }
            last = c.stretch();
        }
    }

    #[test]
    fn overshooting_pull_clamps_to_one() {
        let mut b = bench(100.0);
        assert!(b.run_until(CreatureState::Idle, 70));
        let h = b.ctx.viewport.height();
        b.frame(&[down(100.0, h)]);
        b.frame(&[to(100.0, -500.0)]);
        assert_eq!(b.creature().stretch(), 1.0);
        // The tracker keeps the handle on the stage.
        assert_eq!(b.creature().drag(), Vec2::new(0.0, -h));
    }

    #[test]
    fn sideways_pull_leans_and_stretches() {
        let mut b = bench(400.0);
        assert!(b.run_until(CreatureState::Idle, 70));
        let h = b.ctx.viewport.height();
        b.frame(&[down(400.0, h - 10.0)]);
        b.frame(&[to(400.0 + 0.25 * h, h - 10.0)]);
        let c = b.creature();
        assert!((c.stretch() - 0.5).abs() < 1e-4);
        let figure = b.ctx.scene.get(c.parts().figure).unwrap();
        assert!((figure.rotation - std::f32::consts::FRAC_PI_2).abs() < 1e-4);
        assert!((figure.scale.y - 1.25).abs() < 1e-4);
    }

    #[test]
    fn early_release_springs_the_handle_back_to_rest() {
        let mut b = bench(100.0);
        assert!(b.run_until(CreatureState::Idle, 70));
        let h = b.ctx.viewport.height();
        let rest = b.handle_world();

        b.frame(&[down(100.0, h)]);
        let y = h - 0.3 * (h * 0.5);
        b.frame(&[to(100.0, y)]);
        assert!((b.creature().stretch() - 0.3).abs() < 1e-4);

        b.frame(&[up(100.0, y)]);
        assert_eq!(b.creature().state(), CreatureState::Idle);
        assert_eq!(b.creature().previous(), Some(CreatureState::Pulling));

        b.idle_frames(30);
        assert_eq!(b.creature().drag(), Vec2::ZERO);
        let handle = b.ctx.scene.get(b.creature().parts().handle).unwrap();
        assert_eq!(handle.pos, Vec2::ZERO);
        assert_eq!(b.handle_world(), rest);
        let figure = b.ctx.scene.get(b.creature().parts().figure).unwrap();
        assert_eq!(figure.rotation, 0.0);
    }

    #[test]
    fn lifetime_is_a_path_through_the_table() {
        let mut b = bench(300.0);
        let mut path = vec![b.creature().state()];
        fn observe(b: &Bench, path: &mut Vec<CreatureState>) {
            let s = b.creature().state();
            if path.last() != Some(&s) {
                path.push(s);
            }
        }

        assert!(b.run_until(CreatureState::Idle, 70));
        observe(&b, &mut path);
        let h = b.ctx.viewport.height();
        b.frame(&[down(300.0, h)]);
        observe(&b, &mut path);
        b.frame(&[to(300.0, h * 0.5)]);
        observe(&b, &mut path);
        for i in 0..30 {
            b.frame(&[to(300.0 + i as f32, h * 0.5)]);
            observe(&b, &mut path);
        }
        b.frame(&[up(330.0, h * 0.5)]);
        observe(&b, &mut path);
        assert!(!b.systems.drags.is_enabled(b.creature().binding()));

        for _ in 0..3000 {
            if b.creature().is_destroyed() {
                break;
            }
            b.frame(&[]);
            observe(&b, &mut path);
        }

        use CreatureState::*;
        assert_eq!(path, vec![Spawning, Idle, Pulling, Dragging, Dropping, Leaving, Destroyed]);
        for pair in path.windows(2) {
            assert!(pair[0].can_become(pair[1]));
        }
        let gone = b.herd.take_departed();
        assert_eq!(gone.len(), 1);
        assert!(b.herd.is_empty());
        assert!(b.ctx.scene.is_empty());
        assert!(b.systems.drags.is_empty());
        assert!(b.systems.ticker.is_empty());
        assert!(b.systems.timelines.is_empty());
    }

    #[test]
    fn landing_bursts_debris_by_fall_height() {
        let mut b = bench(300.0);
        assert!(b.run_until(CreatureState::Idle, 70));
        let h = b.ctx.viewport.height();
        b.frame(&[down(300.0, h)]);
        b.frame(&[to(300.0, h * 0.5)]);
        // Let the figure catch up with the pointer.
        for _ in 0..90 {
            b.frame(&[to(300.0, h * 0.5)]);
        }
        let before = b.ctx.particles.spawned();
        b.frame(&[up(300.0, h * 0.5)]);
        assert_eq!(b.creature().state(), CreatureState::Dropping);
        assert!(b.run_until(CreatureState::Leaving, 120));
        // Half the stage height: round(4 + 16 * 0.5) bits.
        assert_eq!(b.ctx.particles.spawned() - before, 12);

        let figure = b.ctx.scene.get(b.creature().parts().figure).unwrap();
        assert!(figure.pos.y.abs() < 1e-3);
    }

    #[test]
    fn pressing_a_dropping_creature_does_nothing() {
        let mut b = bench(300.0);
        assert!(b.run_until(CreatureState::Idle, 70));
        let h = b.ctx.viewport.height();
        b.frame(&[down(300.0, h)]);
        b.frame(&[to(300.0, h * 0.5)]);
        b.frame(&[up(300.0, h * 0.5)]);
        assert_eq!(b.creature().state(), CreatureState::Dropping);
        b.frame(&[down(300.0, h - 5.0)]);
        assert!(b.systems.drags.active().is_none());
        assert_eq!(b.creature().state(), CreatureState::Dropping);
    }

    #[test]
    #[should_panic(expected = "is not in the scene")]
    fn spawning_without_a_group_node_fails_fast() {
        let mut ctx = EngineContext::new();
        let mut systems = CreatureSystems::new();
        let look = Look { color: 0xffffff, size: 80.0, leg_length: 28.0 };
        let parts = build_creature(&mut ctx, &mut systems.graph, look, Vec2::new(100.0, 600.0), "creature");
        ctx.scene.despawn(parts.group);
        let mut env = systems.env(&mut ctx);
        Creature::spawn(ID, parts, look, &mut env);
    }

    /// Idle creature at x = 100, pulled straight up into `Dragging`.
    fn dragging_bench() -> Bench {
        let mut b = bench(100.0);
        assert!(b.run_until(CreatureState::Idle, 70));
        let h = b.ctx.viewport.height();
        b.frame(&[down(100.0, h)]);
        b.frame(&[to(100.0, h * 0.5)]);
        assert_eq!(b.creature().state(), CreatureState::Dragging);
        b
    }

    fn relax_running(b: &Bench) -> bool {
        b.creature().timeline.is_some_and(|id| b.systems.timelines.is_alive(id))
    }

    #[test]
    fn small_moves_keep_distortion_locked_during_relaxation() {
        let mut b = dragging_bench();
        let h = b.ctx.viewport.height();
        assert!(b.creature().distort_locked);
        for i in 1..=10 {
            b.frame(&[to(100.0 + 1.5 * i as f32, h * 0.5)]);
            assert!(b.creature().distort_locked, "unlocked after {} frames", i);
            assert!(relax_running(&b));
        }
    }

    #[test]
    fn moving_past_the_unlock_distance_cuts_the_relaxation_short() {
        let mut b = dragging_bench();
        let h = b.ctx.viewport.height();
        let relax = b.creature().timeline.unwrap();

        b.frame(&[to(120.0, h * 0.5)]);
        assert!(b.creature().distort_locked);

        b.frame(&[to(121.0, h * 0.5)]);
        let c = b.creature();
        assert!(!c.distort_locked);
        assert!(c.timeline.is_none());
        assert!(!b.systems.timelines.is_alive(relax));

        // From here the figure leans into the lag.
        let figure = b.ctx.scene.get(c.parts().figure).unwrap();
        let lag = (c.drag() - figure.pos).length().min(50.0);
        let expected = Vec2::new(1.0 - 0.25 * lag / 50.0, 1.0 + 0.5 * lag / 50.0);
        assert!((figure.scale - expected).length() < 1e-5);
    }

    #[test]
    fn relaxation_end_unlocks_and_lag_stretch_is_capped() {
        let mut b = dragging_bench();
        let h = b.ctx.viewport.height();

        // Hold still past the 0.6 s relaxation.
        b.idle_frames(45);
        assert!(!b.creature().distort_locked);
        assert!(b.creature().timeline.is_none());

        // A far jump leaves the figure more than 50 units behind.
        b.frame(&[to(400.0, h * 0.5)]);
        let c = b.creature();
        let figure = b.ctx.scene.get(c.parts().figure).unwrap();
        assert!((c.drag() - figure.pos).length() > 50.0);
        assert_eq!(figure.scale, Vec2::new(0.75, 1.5));
    }
}
