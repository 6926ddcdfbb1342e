pub mod api;
pub mod core;
pub mod components;
pub mod systems;
pub mod renderer;
pub mod input;
pub mod extensions;

// Re-export key types at crate root for convenience
pub use api::error::ConfigError;
pub use api::game::{Game, GameConfig, EngineContext, RenderContext};
pub use api::types::{EntityId, GameEvent};
pub use components::entity::{Entity, WorldTransform};
pub use components::layer::RenderLayer;
pub use components::visual::{Shape, Visual};
pub use crate::core::clock::{FrameClock, Scheduler, TimerId};
pub use crate::core::rng::Rng;
pub use crate::core::scene::Scene;
pub use crate::core::ticker::Ticker;
pub use crate::core::time::FixedTimestep;
pub use crate::core::viewport::{Teardown, Viewport};
pub use renderer::instance::{RenderInstance, RenderBuffer};
pub use input::queue::{InputEvent, InputQueue};
pub use input::drag::{BindingId, DragEvent, DragTracker, Footprint};
pub use systems::particles::{Particle, ParticleId, ParticleSpec, ParticleSystem};

// Extensions: decoupled optional systems
pub use extensions::{
    Easing, lerp, lerp_vec2, ease, ease_vec2,
    TransformGraph,
    Cue, Timeline, TimelineId, TimelineState, Tween, TweenTarget,
};
