use glam::Vec2;
use crate::api::types::EntityId;
use crate::components::visual::Visual;

/// Resolved transform in stage space, written by `TransformGraph::propagate`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldTransform {
    pub pos: Vec2,
    pub rotation: f32,
    pub scale: Vec2,
    pub alpha: f32,
}

impl Default for WorldTransform {
    fn default() -> Self {
        Self {
            pos: Vec2::ZERO,
            rotation: 0.0,
            scale: Vec2::ONE,
            alpha: 1.0,
        }
    }
}

/// One node of the stage's visual tree.
///
/// The transform fields are relative to the parent node, or to the stage
/// for roots. Rendering and hit tests read `world`, never the locals.
#[derive(Debug, Clone)]
pub struct Entity {
    pub id: EntityId,
    /// Role name, for logs and tests.
    pub tag: String,
    /// Inactive nodes are skipped by the render pass.
    pub active: bool,
    pub pos: Vec2,
    /// Radians, clockwise in the y-down stage. Pivot is `pos`.
    pub rotation: f32,
    pub scale: Vec2,
    pub alpha: f32,
    /// `None` for grouping and hit-area nodes.
    pub visual: Option<Visual>,
    pub world: WorldTransform,
}

impl Entity {
    pub fn new(id: EntityId) -> Self {
        Self {
            id,
            tag: String::new(),
            active: true,
            pos: Vec2::ZERO,
            rotation: 0.0,
            scale: Vec2::ONE,
            alpha: 1.0,
            visual: None,
            world: WorldTransform::default(),
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn with_pos(mut self, pos: Vec2) -> Self {
        self.pos = pos;
        self
    }

    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: Vec2) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_visual(mut self, visual: Visual) -> Self {
        self.visual = Some(visual);
        self
    }

    /// The local fields packed as a transform, for composing with a parent.
    pub fn local(&self) -> WorldTransform {
        WorldTransform {
            pos: self.pos,
            rotation: self.rotation,
            scale: self.scale,
            alpha: self.alpha,
        }
    }
}
