use glam::Vec2;
use crate::components::layer::RenderLayer;

/// Primitive the host renderer draws for an entity or particle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Shape {
    /// Filled circle; `size.x` is the diameter.
    #[default]
    Circle,
    /// Rounded bar anchored at its top edge; `size` is (width, length).
    Capsule,
    /// Text glyph; `size.y` is the font size.
    Glyph(char),
}

impl Shape {
    /// Numeric code written to the render buffer.
    pub fn code(self) -> u32 {
        match self {
            Shape::Circle => 0,
            Shape::Capsule => 1,
            Shape::Glyph(_) => 2,
        }
    }

    pub fn glyph(self) -> u32 {
        match self {
            Shape::Glyph(c) => c as u32,
            _ => 0,
        }
    }
}

/// Visual component: defines how an entity appears.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Visual {
    pub shape: Shape,
    /// Unscaled size in world units (see `Shape`).
    pub size: Vec2,
    /// Fill colour as 0xRRGGBB.
    pub color: u32,
    pub layer: RenderLayer,
}

impl Visual {
    pub fn circle(diameter: f32, color: u32) -> Self {
        Self {
            shape: Shape::Circle,
            size: Vec2::splat(diameter),
            color,
            layer: RenderLayer::Creatures,
        }
    }

    pub fn capsule(width: f32, length: f32, color: u32) -> Self {
        Self {
            shape: Shape::Capsule,
            size: Vec2::new(width, length),
            color,
            layer: RenderLayer::Creatures,
        }
    }

    pub fn glyph(c: char, font_size: f32, color: u32) -> Self {
        Self {
            shape: Shape::Glyph(c),
            size: Vec2::splat(font_size),
            color,
            layer: RenderLayer::Particles,
        }
    }

    pub fn on_layer(mut self, layer: RenderLayer) -> Self {
        self.layer = layer;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glyph_code_carries_char() {
        let v = Visual::glyph('Z', 16.0, 0xffffff);
        assert_eq!(v.shape.code(), 2);
        assert_eq!(v.shape.glyph(), 'Z' as u32);
        assert_eq!(v.layer, RenderLayer::Particles);
    }

    #[test]
    fn non_glyph_shapes_have_no_codepoint() {
        assert_eq!(Shape::Circle.glyph(), 0);
        assert_eq!(Visual::capsule(4.0, 20.0, 0).size, Vec2::new(4.0, 20.0));
    }
}
