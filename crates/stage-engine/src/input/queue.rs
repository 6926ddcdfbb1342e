/// Pointer and host events, already converted to stage coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown { x: f32, y: f32 },
    PointerUp { x: f32, y: f32 },
    PointerMove { x: f32, y: f32 },
    /// Cursor left the stage container. Any active drag is released.
    PointerLeave,
    /// Opaque host event; `kind` is game-defined.
    Custom { kind: u32, a: f32, b: f32, c: f32 },
}

/// Events collected between frames. The host pushes, the runner hands the
/// batch to the first fixed step and then discards it.
#[derive(Debug, Default)]
pub struct InputQueue {
    pending: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self { pending: Vec::with_capacity(32) }
    }

    pub fn push(&mut self, event: InputEvent) {
        self.pending.push(event);
    }

    /// Take the pending batch, leaving the queue empty.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.pending)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, InputEvent> {
        self.pending.iter()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_empties_queue_in_order() {
        let mut queue = InputQueue::new();
        queue.push(InputEvent::PointerDown { x: 10.0, y: 20.0 });
        queue.push(InputEvent::PointerLeave);
        assert_eq!(queue.len(), 2);

        let batch = queue.drain();
        assert_eq!(batch[0], InputEvent::PointerDown { x: 10.0, y: 20.0 });
        assert_eq!(batch[1], InputEvent::PointerLeave);
        assert!(queue.is_empty());
    }

    #[test]
    fn reading_leaves_events_pending() {
        let mut queue = InputQueue::new();
        queue.push(InputEvent::Custom { kind: 7, a: 1.5, b: 2.5, c: 3.5 });
        assert_eq!(queue.iter().count(), 1);
        assert_eq!(queue.len(), 1);
    }
}
