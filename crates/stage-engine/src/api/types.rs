use bytemuck::{Pod, Zeroable};

/// Handle to a scene node. Issued by `EngineContext::next_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u32);

/// Outbound notice for the host page, read straight out of linear memory.
/// The game decides what `kind` means and how `a`, `b`, `c` are used.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct GameEvent {
    pub kind: f32,
    pub a: f32,
    pub b: f32,
    pub c: f32,
}

impl GameEvent {
    pub const FLOATS: usize = 4;

    pub fn new(kind: f32) -> Self {
        Self { kind, ..Default::default() }
    }

    pub fn with_payload(self, a: f32, b: f32, c: f32) -> Self {
        Self { a, b, c, ..self }
    }
}
