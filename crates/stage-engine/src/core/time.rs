/// Turns variable frame deltas into a whole number of fixed steps.
pub struct FixedTimestep {
    dt: f32,
    banked: f32,
    /// A backgrounded tab can hand us seconds at once; beyond this many
    /// steps the backlog is discarded rather than replayed.
    max_steps: u32,
}

impl FixedTimestep {
    pub fn new(dt: f32) -> Self {
        Self { dt, banked: 0.0, max_steps: 10 }
    }

    /// Bank `frame_dt` and return how many steps to run now.
    pub fn accumulate(&mut self, frame_dt: f32) -> u32 {
        // Host clocks occasionally jump backwards.
        self.banked += frame_dt.max(0.0);
        let due = (self.banked / self.dt + 1e-4) as u32;
        if due >= self.max_steps {
            self.banked = 0.0;
            return self.max_steps;
        }
        self.banked = (self.banked - due as f32 * self.dt).max(0.0);
        due
    }

    pub fn dt(&self) -> f32 {
        self.dt
    }
}
