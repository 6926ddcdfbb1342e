// extensions/mod.rs
//
// Optional extension modules for the stage engine.
// Decoupled from Scene storage; games opt in by owning these systems.

pub mod easing;
pub mod timeline;
pub mod transform;

pub use easing::{Easing, lerp, lerp_vec2, ease, ease_vec2};
pub use timeline::{Cue, Timeline, TimelineId, TimelineState, Tween, TweenTarget};
pub use transform::TransformGraph;
