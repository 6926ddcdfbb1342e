//! Pointer drag tracking for bound scene nodes.
//!
//! A binding ties a node (the drag handle) to a hit footprint. While a
//! gesture is active the tracker reports the handle's offset from where the
//! gesture started, clamped so the handle stays inside the stage bounds.
//! The tracker never moves entities itself.

use glam::Vec2;
use crate::api::types::EntityId;
use crate::core::scene::Scene;
use crate::input::queue::InputEvent;

/// Hit area anchored at the bottom-centre of a node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Footprint {
    pub size: Vec2,
}

impl Footprint {
    pub fn new(width: f32, height: f32) -> Self {
        Self { size: Vec2::new(width, height) }
    }

    /// Whether `point` lies inside the footprint whose base centre is at `base`.
    pub fn contains(&self, base: Vec2, point: Vec2) -> bool {
        let half = self.size.x * 0.5;
        point.x >= base.x - half
            && point.x <= base.x + half
            && point.y >= base.y - self.size.y
            && point.y <= base.y
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BindingId(pub u32);

#[derive(Debug, Clone, Copy)]
struct DragBinding {
    id: BindingId,
    node: EntityId,
    footprint: Footprint,
    enabled: bool,
}

#[derive(Debug, Clone, Copy)]
struct ActiveDrag {
    binding: BindingId,
    press_point: Vec2,
    start_offset: Vec2,
    /// Stage position the offset is measured from.
    origin: Vec2,
    offset: Vec2,
}

/// What happened to a bound handle this event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragEvent {
    Press { binding: BindingId, offset: Vec2 },
    Move { binding: BindingId, offset: Vec2 },
    Release { binding: BindingId, offset: Vec2 },
}

impl DragEvent {
    pub fn binding(&self) -> BindingId {
        match *self {
            DragEvent::Press { binding, .. }
            | DragEvent::Move { binding, .. }
            | DragEvent::Release { binding, .. } => binding,
        }
    }
}

#[derive(Debug, Default)]
pub struct DragTracker {
    bindings: Vec<DragBinding>,
    active: Option<ActiveDrag>,
    next_id: u32,
}

impl DragTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `node` draggable. Later bindings sit on top for hit testing.
    pub fn bind(&mut self, node: EntityId, footprint: Footprint) -> BindingId {
        let id = BindingId(self.next_id);
        self.next_id += 1;
        self.bindings.push(DragBinding {
            id,
            node,
            footprint,
            enabled: true,
        });
        id
    }

    /// Release a binding. Any gesture on it ends without a Release event.
    pub fn unbind(&mut self, id: BindingId) -> bool {
        if self.active.is_some_and(|a| a.binding == id) {
            self.active = None;
        }
        let before = self.bindings.len();
        self.bindings.retain(|b| b.id != id);
        self.bindings.len() != before
    }

    /// Enable or disable a binding. Disabling ends an active gesture silently.
    pub fn set_enabled(&mut self, id: BindingId, enabled: bool) {
        if let Some(b) = self.bindings.iter_mut().find(|b| b.id == id) {
            b.enabled = enabled;
        }
        if !enabled && self.active.is_some_and(|a| a.binding == id) {
            self.active = None;
        }
    }

    pub fn is_enabled(&self, id: BindingId) -> bool {
        self.bindings.iter().any(|b| b.id == id && b.enabled)
    }

    /// Binding of the gesture in progress, if any.
    pub fn active(&self) -> Option<BindingId> {
        self.active.map(|a| a.binding)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Feed one pointer event. `bounds` is the stage size; handles are kept inside it.
    pub fn process(&mut self, event: &InputEvent, scene: &Scene, bounds: Vec2) -> Option<DragEvent> {
        match *event {
            InputEvent::PointerDown { x, y } => self.press(Vec2::new(x, y), scene),
            InputEvent::PointerMove { x, y } => {
                let drag = self.active.as_mut()?;
                drag.offset = clamp_offset(drag, Vec2::new(x, y), bounds);
                Some(DragEvent::Move {
                    binding: drag.binding,
                    offset: drag.offset,
                })
            }
            InputEvent::PointerUp { x, y } => {
                let mut drag = self.active.take()?;
                drag.offset = clamp_offset(&drag, Vec2::new(x, y), bounds);
                Some(DragEvent::Release {
                    binding: drag.binding,
                    offset: drag.offset,
                })
            }
            InputEvent::PointerLeave => {
                let drag = self.active.take()?;
                Some(DragEvent::Release {
                    binding: drag.binding,
                    offset: drag.offset,
                })
            }
            InputEvent::Custom { .. } => None,
        }
    }

    fn press(&mut self, point: Vec2, scene: &Scene) -> Option<DragEvent> {
        if self.active.is_some() {
            return None;
        }
        let (binding, entity) = self.bindings.iter().rev().filter(|b| b.enabled).find_map(|b| {
            let entity = scene.get(b.node).filter(|e| e.active)?;
            b.footprint
                .contains(entity.world.pos, point)
                .then_some((b.id, entity))
        })?;

        let start_offset = entity.pos;
        self.active = Some(ActiveDrag {
            binding,
            press_point: point,
            start_offset,
            origin: entity.world.pos - start_offset,
            offset: start_offset,
        });
        Some(DragEvent::Press {
            binding,
            offset: start_offset,
        })
    }
}

fn clamp_offset(drag: &ActiveDrag, point: Vec2, bounds: Vec2) -> Vec2 {
    let wanted = drag.origin + drag.start_offset + (point - drag.press_point);
    wanted.clamp(Vec2::ZERO, bounds.max(Vec2::ZERO)) - drag.origin
}
