use bytemuck::{Pod, Zeroable};

/// Per-instance render data read by the host renderer.
/// Must match the host protocol: 12 words = 48 bytes stride.
/// The first eight words are f32; the last four are u32 (read via a Uint32Array view).
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct RenderInstance {
    /// X position in stage space.
    pub x: f32,
    /// Y position in stage space.
    pub y: f32,
    /// Rotation in radians.
    pub rotation: f32,
    pub scale_x: f32,
    pub scale_y: f32,
    /// Opacity (0.0 = invisible, 1.0 = opaque).
    pub alpha: f32,
    /// Unscaled width in world units.
    pub width: f32,
    /// Unscaled height in world units.
    pub height: f32,
    /// `Shape::code()`.
    pub shape: u32,
    /// 0xRRGGBB.
    pub color: u32,
    /// Unicode scalar for glyphs, 0 otherwise.
    pub glyph: u32,
    /// Style class for particles, `u32::MAX` for entities.
    pub style: u32,
}

impl RenderInstance {
    pub const WORDS: usize = 12;
    pub const STRIDE_BYTES: usize = Self::WORDS * 4;
    pub const NO_STYLE: u32 = u32::MAX;
}

/// Render buffer containing all instances, back-to-front.
pub struct RenderBuffer {
    pub instances: Vec<RenderInstance>,
    capacity: usize,
}

impl RenderBuffer {
    pub fn new() -> Self {
        Self::with_capacity(512)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            instances: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn clear(&mut self) {
        self.instances.clear();
    }

    /// Append an instance. Returns false once the buffer is full.
    pub fn push(&mut self, instance: RenderInstance) -> bool {
        if self.instances.len() >= self.capacity {
            return false;
        }
        self.instances.push(instance);
        true
    }

    pub fn instance_count(&self) -> u32 {
        self.instances.len() as u32
    }

    /// Raw pointer to instance data for host reads.
    pub fn instances_ptr(&self) -> *const f32 {
        self.instances.as_ptr() as *const f32
    }
}

impl Default for RenderBuffer {
    fn default() -> Self {
        Self::new()
    }
}
