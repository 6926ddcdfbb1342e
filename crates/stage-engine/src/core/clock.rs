//! Injectable clock + timer scheduling.
//!
//! Nothing in the engine reads wall-clock time. The host (or a test) drives
//! the clock with explicit `advance(dt)` calls and receives the actions whose
//! deadline has passed, in deadline order.

/// Handle to a scheduled action for later cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(pub u32);

/// A clock that can run deferred actions.
pub trait Scheduler<A> {
    /// Seconds elapsed since the clock was created.
    fn now(&self) -> f32;

    /// Move time forward and return every action that became due.
    fn advance(&mut self, dt: f32) -> Vec<A>;

    /// Run `action` once `delay` seconds from now have elapsed.
    fn schedule(&mut self, delay: f32, action: A) -> TimerId;

    /// Cancel a pending action. Returns false if it already fired or never existed.
    fn cancel(&mut self, id: TimerId) -> bool;

    /// Number of actions still waiting.
    fn pending(&self) -> usize;
}

#[derive(Debug)]
struct Timer<A> {
    id: TimerId,
    due: f32,
    action: A,
}

/// Frame-driven scheduler. Time only moves when `advance` is called.
#[derive(Debug)]
pub struct FrameClock<A> {
    now: f32,
    next_id: u32,
    timers: Vec<Timer<A>>,
}

impl<A> FrameClock<A> {
    pub fn new() -> Self {
        Self {
            now: 0.0,
            next_id: 0,
            timers: Vec::new(),
        }
    }
}

impl<A> Default for FrameClock<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> Scheduler<A> for FrameClock<A> {
    fn now(&self) -> f32 {
        self.now
    }

    fn advance(&mut self, dt: f32) -> Vec<A> {
        self.now += dt.max(0.0);
        let now = self.now;

        let mut due = Vec::new();
        let mut i = 0;
        while i < self.timers.len() {
            if self.timers[i].due <= now {
                due.push(self.timers.remove(i));
            } else {
                i += 1;
            }
        }
        // Stable sort keeps schedule order for equal deadlines.
        due.sort_by(|a, b| a.due.total_cmp(&b.due));
        due.into_iter().map(|t| t.action).collect()
    }

    fn schedule(&mut self, delay: f32, action: A) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.timers.push(Timer {
            id,
            due: self.now + delay.max(0.0),
            action,
        });
        id
    }

    fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.id != id);
        self.timers.len() != before
    }

    fn pending(&self) -> usize {
        self.timers.len()
    }
}
