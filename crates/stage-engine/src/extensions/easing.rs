// extensions/easing.rs
//
// Progress curves for tweens. Input and output are normalized progress;
// Back and Elastic leave [0, 1] mid-curve but always end on 1.
//
//   let y = Easing::BackOut.apply(0.5);
//   let x = ease(0.0, 40.0, t, Easing::ExpoIn);

use glam::Vec2;
use std::f32::consts::{PI, TAU};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Easing {
    #[default]
    Linear,
    QuadIn,
    QuadOut,
    QuadInOut,
    CubicOut,
    /// Half a cosine; the breathing curve.
    SineInOut,
    /// Near zero for most of the span, then a steep finish. Falls use it.
    ExpoIn,
    ExpoOut,
    /// Overshoots by about 10% before settling.
    BackOut,
    /// Damped spring. `amplitude` (at least 1) scales the overshoot and a
    /// shorter `period` makes the wobble stiffer.
    Elastic { amplitude: f32, period: f32 },
}

impl Easing {
    pub const ELASTIC_OUT: Easing = Easing::Elastic { amplitude: 1.0, period: 0.3 };

    /// Map progress `t` (clamped to [0, 1]) through the curve.
    #[inline]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        let rev = 1.0 - t;
        match self {
            Easing::Linear => t,
            Easing::QuadIn => t * t,
            Easing::QuadOut => 1.0 - rev * rev,
            Easing::QuadInOut if t < 0.5 => 2.0 * t * t,
            Easing::QuadInOut => 1.0 - 2.0 * rev * rev,
            Easing::CubicOut => 1.0 - rev * rev * rev,
            Easing::SineInOut => 0.5 - 0.5 * (PI * t).cos(),
            Easing::ExpoIn if t <= 0.0 => 0.0,
            Easing::ExpoIn => 2f32.powf(10.0 * (t - 1.0)),
            Easing::ExpoOut if t >= 1.0 => 1.0,
            Easing::ExpoOut => 1.0 - 2f32.powf(-10.0 * t),
            Easing::BackOut => back_out(t),
            Easing::Elastic { amplitude, period } => spring(t, amplitude, period),
        }
    }
}

fn back_out(t: f32) -> f32 {
    const OVERSHOOT: f32 = 1.70158;
    let u = t - 1.0;
    1.0 + u * u * ((OVERSHOOT + 1.0) * u + OVERSHOOT)
}

fn spring(t: f32, amplitude: f32, period: f32) -> f32 {
    if t <= 0.0 || t >= 1.0 {
        return t;
    }
    let amplitude = amplitude.max(1.0);
    let period = period.max(0.01);
    let phase = period / TAU * amplitude.recip().asin();
    let decay = 2f32.powf(-10.0 * t);
    amplitude * decay * ((t - phase) * TAU / period).sin() + 1.0
}

#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[inline]
pub fn lerp_vec2(a: Vec2, b: Vec2, t: f32) -> Vec2 {
    a.lerp(b, t)
}

/// `lerp` with the progress run through `easing` first.
#[inline]
pub fn ease(a: f32, b: f32, t: f32, easing: Easing) -> f32 {
    lerp(a, b, easing.apply(t))
}

#[inline]
pub fn ease_vec2(a: Vec2, b: Vec2, t: f32, easing: Easing) -> Vec2 {
    lerp_vec2(a, b, easing.apply(t))
}
