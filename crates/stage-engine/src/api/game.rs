use crate::api::error::ConfigError;
use crate::api::types::{EntityId, GameEvent};
use crate::core::rng::Rng;
use crate::core::scene::Scene;
use crate::core::viewport::Viewport;
use crate::input::queue::InputQueue;
use crate::renderer::instance::RenderBuffer;
use crate::systems::particles::ParticleSystem;

/// Engine sizing and timing, chosen by the game before init.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Simulation step in seconds.
    pub fixed_dt: f32,
    /// Stage size at mount. Resizes later go through `EngineContext::viewport`.
    pub world_width: f32,
    pub world_height: f32,
    /// Render buffer capacity; extra draws are dropped.
    pub max_instances: usize,
    pub max_particles: usize,
    /// Host events the runner reserves room for each frame.
    pub max_events: usize,
    pub seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            world_width: 800.0,
            world_height: 600.0,
            max_instances: 512,
            max_particles: 1024,
            max_events: 32,
            seed: 42,
        }
    }
}

/// What the runner drives. Everything except `init` and `update` has a
/// do-nothing default.
pub trait Game {
    fn config(&self) -> GameConfig {
        GameConfig::default()
    }

    /// Host JSON, offered once before `init`. An error leaves the game on
    /// its defaults.
    fn load_config(&mut self, _json: &str) -> Result<(), ConfigError> {
        Ok(())
    }

    fn init(&mut self, ctx: &mut EngineContext);

    /// One fixed step. Only the first step of a frame sees that frame's input.
    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue);

    /// Append extra draws after the scene and particles.
    fn render(&self, _ctx: &mut RenderContext) {}

    /// Detach from the host. The runner calls this at most once, but
    /// implementations should tolerate repeats.
    fn teardown(&mut self, _ctx: &mut EngineContext) {}
}

/// Shared engine state handed to `Game` hooks.
pub struct EngineContext {
    pub scene: Scene,
    pub particles: ParticleSystem,
    pub events: Vec<GameEvent>,
    pub viewport: Viewport,
    pub rng: Rng,
    dt: f32,
    next_id: u32,
}

impl EngineContext {
    pub fn new() -> Self {
        Self::with_config(&GameConfig::default())
    }

    pub fn with_config(config: &GameConfig) -> Self {
        Self {
            scene: Scene::new(),
            particles: ParticleSystem::with_capacity(config.max_particles),
            events: Vec::with_capacity(config.max_events),
            viewport: Viewport::new(config.world_width, config.world_height),
            rng: Rng::new(config.seed),
            dt: config.fixed_dt,
            next_id: 1,
        }
    }

    /// Ids start at 1 and are never reused.
    pub fn next_id(&mut self) -> EntityId {
        self.next_id += 1;
        EntityId(self.next_id - 1)
    }

    pub fn dt(&self) -> f32 {
        self.dt
    }

    pub fn set_dt(&mut self, dt: f32) {
        self.dt = dt;
    }

    /// Queue an event for the host to read after this frame.
    pub fn emit_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Start-of-frame reset. Events from the previous frame are gone after this.
    pub fn clear_frame_data(&mut self) {
        self.events.clear();
    }
}

impl Default for EngineContext {
    fn default() -> Self {
        Self::new()
    }
}

pub struct RenderContext<'a> {
    pub render_buffer: &'a mut RenderBuffer,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_ids_count_up_from_one() {
        let mut ctx = EngineContext::new();
        assert_eq!(ctx.next_id(), EntityId(1));
        assert_eq!(ctx.next_id(), EntityId(2));
    }

    #[test]
    fn context_takes_world_size_from_config() {
        let config = GameConfig {
            world_width: 1024.0,
            world_height: 300.0,
            ..Default::default()
        };
        let ctx = EngineContext::with_config(&config);
        assert_eq!(ctx.viewport.width(), 1024.0);
        assert_eq!(ctx.viewport.height(), 300.0);
        assert_eq!(ctx.dt(), config.fixed_dt);
    }

    #[test]
    fn events_last_one_frame() {
        let mut ctx = EngineContext::new();
        ctx.emit_event(GameEvent::new(1.0));
        ctx.clear_frame_data();
        assert!(ctx.events.is_empty());
    }
}
