//! Live stage dimensions.
//!
//! The host reports container resizes; the engine keeps the last observed
//! width/height in shared cells so every clone of the `Viewport` reads the
//! same value. Observation is scoped: `observe` hands back a `Teardown`
//! which, once run, makes further resize reports no-ops.

use std::cell::Cell;
use std::rc::Rc;

use glam::Vec2;

#[derive(Debug, Clone)]
pub struct Viewport {
    width: Rc<Cell<f32>>,
    height: Rc<Cell<f32>>,
    observing: Rc<Cell<bool>>,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: Rc::new(Cell::new(width)),
            height: Rc::new(Cell::new(height)),
            observing: Rc::new(Cell::new(false)),
        }
    }

    pub fn width(&self) -> f32 {
        self.width.get()
    }

    pub fn height(&self) -> f32 {
        self.height.get()
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width(), self.height())
    }

    /// Y coordinate of the stage floor. Entities rest with their base here.
    pub fn ground_y(&self) -> f32 {
        self.height()
    }

    /// Start applying resize reports. The returned handle stops observation.
    pub fn observe(&self) -> Teardown {
        self.observing.set(true);
        log::debug!("viewport: observing {}x{}", self.width(), self.height());
        Teardown {
            observing: Rc::clone(&self.observing),
            done: Cell::new(false),
        }
    }

    pub fn is_observing(&self) -> bool {
        self.observing.get()
    }

    /// Record a new container size. Ignored unless observation is active.
    /// Returns whether the size was applied.
    pub fn notify_resize(&self, width: f32, height: f32) -> bool {
        if !self.observing.get() || width <= 0.0 || height <= 0.0 {
            return false;
        }
        self.width.set(width);
        self.height.set(height);
        true
    }
}

/// Scoped handle returned by [`Viewport::observe`].
#[derive(Debug)]
pub struct Teardown {
    observing: Rc<Cell<bool>>,
    done: Cell<bool>,
}

impl Teardown {
    /// Stop resize observation. Calling it again does nothing.
    pub fn run(&self) {
        if self.done.replace(true) {
            return;
        }
        self.observing.set(false);
        log::info!("viewport: resize observation stopped");
    }

    pub fn has_run(&self) -> bool {
        self.done.get()
    }
}
