// extensions/timeline.rs
//
// Timeline system: sequenced tweens on scene entities plus numbered cues.
// Completely decoupled from Entity internals beyond the animated fields.
//
// Usage:
//   let mut timelines = TimelineState::new();
//   let id = timelines.add(
//       Timeline::new(owner)
//           .then(Tween::scale(body, Vec2::ZERO, Vec2::ONE, 1.0, Easing::ELASTIC_OUT))
//           .cue(LANDED)
//           .on_complete(DONE),
//   );
//   timelines.tick(dt, &mut scene);
//   for cue in timelines.drain_cues() { ... }

use glam::Vec2;
use crate::api::types::EntityId;
use crate::core::scene::Scene;
use super::easing::{Easing, ease, ease_vec2};

/// What property a tween animates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TweenTarget {
    /// Animate Entity.pos
    Position { from: Vec2, to: Vec2 },
    /// Animate Entity.pos.x only
    PositionX { from: f32, to: f32 },
    /// Animate Entity.pos.y only
    PositionY { from: f32, to: f32 },
    /// Animate Entity.rotation (radians)
    Rotation { from: f32, to: f32 },
    /// Animate Entity.scale
    Scale { from: Vec2, to: Vec2 },
}

/// A single property animation on one entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    pub entity: EntityId,
    pub target: TweenTarget,
    /// Duration in seconds. Zero means "set instantly".
    pub duration: f32,
    pub easing: Easing,
}

impl Tween {
    pub fn new(entity: EntityId, target: TweenTarget, duration: f32, easing: Easing) -> Self {
        Self {
            entity,
            target,
            duration: duration.max(0.0),
            easing,
        }
    }

    pub fn position(entity: EntityId, from: Vec2, to: Vec2, duration: f32, easing: Easing) -> Self {
        Self::new(entity, TweenTarget::Position { from, to }, duration, easing)
    }

    pub fn position_x(entity: EntityId, from: f32, to: f32, duration: f32, easing: Easing) -> Self {
        Self::new(entity, TweenTarget::PositionX { from, to }, duration, easing)
    }

    pub fn position_y(entity: EntityId, from: f32, to: f32, duration: f32, easing: Easing) -> Self {
        Self::new(entity, TweenTarget::PositionY { from, to }, duration, easing)
    }

    pub fn rotation(entity: EntityId, from: f32, to: f32, duration: f32, easing: Easing) -> Self {
        Self::new(entity, TweenTarget::Rotation { from, to }, duration, easing)
    }

    pub fn scale(entity: EntityId, from: Vec2, to: Vec2, duration: f32, easing: Easing) -> Self {
        Self::new(entity, TweenTarget::Scale { from, to }, duration, easing)
    }

    /// Write the tween's value at normalized progress `t` into the scene.
    fn apply(&self, t: f32, scene: &mut Scene) {
        let Some(entity) = scene.get_mut(self.entity) else { return };
        let e = self.easing;
        match self.target {
            TweenTarget::Position { from, to } => entity.pos = ease_vec2(from, to, t, e),
            TweenTarget::PositionX { from, to } => entity.pos.x = ease(from, to, t, e),
            TweenTarget::PositionY { from, to } => entity.pos.y = ease(from, to, t, e),
            TweenTarget::Rotation { from, to } => entity.rotation = ease(from, to, t, e),
            TweenTarget::Scale { from, to } => entity.scale = ease_vec2(from, to, t, e),
        }
    }
}

/// Handle to a timeline for later reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimelineId(pub u32);

/// A numbered signal raised by a timeline, either at a marked offset or on completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cue {
    pub timeline: TimelineId,
    /// Owner tag given to `Timeline::new`.
    pub owner: u32,
    pub id: u32,
    /// True when this cue is the timeline's completion cue.
    pub complete: bool,
}

#[derive(Debug, Clone)]
struct Step {
    at: f32,
    tween: Tween,
    done: bool,
}

#[derive(Debug, Clone)]
struct Mark {
    at: f32,
    id: u32,
    fired: bool,
}

/// A choreographed sequence of tweens and cues.
#[derive(Debug, Clone)]
pub struct Timeline {
    owner: u32,
    steps: Vec<Step>,
    marks: Vec<Mark>,
    /// End of the sequence built so far; `then` appends here.
    cursor: f32,
    /// Start of the most recently added step; `with` starts here.
    last_start: f32,
    elapsed: f32,
    /// `Some(delay)` restarts the timeline forever, pausing `delay` between cycles.
    repeat_delay: Option<f32>,
    on_complete: Option<u32>,
}

impl Timeline {
    pub fn new(owner: u32) -> Self {
        Self {
            owner,
            steps: Vec::new(),
            marks: Vec::new(),
            cursor: 0.0,
            last_start: 0.0,
            elapsed: 0.0,
            repeat_delay: None,
            on_complete: None,
        }
    }

    // -- Builder methods --

    /// Append a tween after everything added so far.
    pub fn then(self, tween: Tween) -> Self {
        let at = self.cursor;
        self.at(at, tween)
    }

    /// Start a tween together with the previously added one.
    pub fn with(self, tween: Tween) -> Self {
        let at = self.last_start;
        self.at(at, tween)
    }

    /// Place a tween at an absolute offset in seconds.
    pub fn at(mut self, at: f32, tween: Tween) -> Self {
        let at = at.max(0.0);
        self.cursor = self.cursor.max(at + tween.duration);
        self.last_start = at;
        self.steps.push(Step { at, tween, done: false });
        self
    }

    /// Raise cue `id` at the current end of the sequence.
    pub fn cue(self, id: u32) -> Self {
        let at = self.cursor;
        self.cue_at(at, id)
    }

    /// Raise cue `id` at an absolute offset.
    pub fn cue_at(mut self, at: f32, id: u32) -> Self {
        let at = at.max(0.0);
        self.cursor = self.cursor.max(at);
        self.marks.push(Mark { at, id, fired: false });
        self
    }

    pub fn repeat_forever(mut self, delay: f32) -> Self {
        self.repeat_delay = Some(delay.max(0.0));
        self
    }

    pub fn on_complete(mut self, id: u32) -> Self {
        self.on_complete = Some(id);
        self
    }

    /// Apply every step and mark due at `time` within the current pass.
    fn render(&mut self, time: f32, id: TimelineId, scene: &mut Scene, cues: &mut Vec<Cue>) {
        for step in self.steps.iter_mut().filter(|s| !s.done && s.at <= time) {
            let t = if step.tween.duration > 0.0 {
                ((time - step.at) / step.tween.duration).min(1.0)
            } else {
                1.0
            };
            step.tween.apply(t, scene);
            if t >= 1.0 {
                step.done = true;
            }
        }
        for mark in self.marks.iter_mut().filter(|m| !m.fired && m.at <= time) {
            mark.fired = true;
            cues.push(Cue {
                timeline: id,
                owner: self.owner,
                id: mark.id,
                complete: false,
            });
        }
    }

    fn rewind(&mut self) {
        for step in &mut self.steps {
            step.done = false;
        }
        for mark in &mut self.marks {
            mark.fired = false;
        }
    }

    /// Advance by `dt`. Returns true once a non-repeating timeline has finished.
    fn advance(&mut self, dt: f32, id: TimelineId, scene: &mut Scene, cues: &mut Vec<Cue>) -> bool {
        self.elapsed += dt.max(0.0);
        let duration = self.cursor;

        match self.repeat_delay {
            Some(delay) if duration + delay > 0.0 => {
                let cycle = duration + delay;
                while self.elapsed >= cycle {
                    self.render(duration, id, scene, cues);
                    self.rewind();
                    self.elapsed -= cycle;
                }
                let time = self.elapsed.min(duration);
                self.render(time, id, scene, cues);
                false
            }
            _ => {
                let time = self.elapsed.min(duration);
                self.render(time, id, scene, cues);
                if self.elapsed >= duration {
                    if let Some(done) = self.on_complete {
                        cues.push(Cue {
                            timeline: id,
                            owner: self.owner,
                            id: done,
                            complete: true,
                        });
                    }
                    true
                } else {
                    false
                }
            }
        }
    }
}

/// Manages all live timelines. Ticks them in creation order.
#[derive(Debug, Default)]
pub struct TimelineState {
    timelines: Vec<(TimelineId, Timeline)>,
    next_id: u32,
    /// Cues raised since the last drain.
    cues: Vec<Cue>,
}

impl TimelineState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a timeline. Returns a handle for later control.
    pub fn add(&mut self, timeline: Timeline) -> TimelineId {
        let id = TimelineId(self.next_id);
        self.next_id += 1;
        self.timelines.push((id, timeline));
        id
    }

    /// Stop a timeline where it is. Values stay as last rendered; no cues fire.
    pub fn kill(&mut self, id: TimelineId) -> bool {
        let before = self.timelines.len();
        self.timelines.retain(|(tid, _)| *tid != id);
        // Drop cues it raised this frame so a killed timeline never reaches its owner.
        self.cues.retain(|c| c.timeline != id);
        self.timelines.len() != before
    }

    pub fn is_alive(&self, id: TimelineId) -> bool {
        self.timelines.iter().any(|(tid, _)| *tid == id)
    }

    /// Advance all timelines and apply them to entities in the scene.
    /// Returns the number of timelines that completed this tick.
    pub fn tick(&mut self, dt: f32, scene: &mut Scene) -> usize {
        let mut finished = Vec::new();
        for (id, timeline) in self.timelines.iter_mut() {
            if timeline.advance(dt, *id, scene, &mut self.cues) {
                finished.push(*id);
            }
        }
        self.timelines.retain(|(id, _)| !finished.contains(id));
        finished.len()
    }

    /// Take the cues raised since the last drain, in the order they fired.
    pub fn drain_cues(&mut self) -> Vec<Cue> {
        std::mem::take(&mut self.cues)
    }

    /// Number of live timelines.
    pub fn len(&self) -> usize {
        self.timelines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timelines.is_empty()
    }
}
