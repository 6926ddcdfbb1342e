use stage_engine::systems::render::build_render_buffer;
use stage_engine::{
    ConfigError, EngineContext, FixedTimestep, Game, GameConfig, InputEvent, InputQueue,
    RenderBuffer, RenderContext,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Created,
    Running,
    TornDown,
}

/// Owns one `Game` plus the engine state around it and drives the frame loop.
///
/// wasm-bindgen cannot export a generic struct, so `export_game!` parks a
/// concrete `GameRunner<G>` in a thread-local and forwards free functions to it.
pub struct GameRunner<G: Game> {
    game: G,
    ctx: EngineContext,
    input: InputQueue,
    render_buffer: RenderBuffer,
    timestep: FixedTimestep,
    config: GameConfig,
    phase: Phase,
}

impl<G: Game> GameRunner<G> {
    pub fn new(game: G) -> Self {
        let config = game.config();
        Self {
            ctx: EngineContext::with_config(&config),
            input: InputQueue::new(),
            render_buffer: RenderBuffer::with_capacity(config.max_instances),
            timestep: FixedTimestep::new(config.fixed_dt),
            config,
            game,
            phase: Phase::Created,
        }
    }

    /// Forward host JSON to the game. Once the game is running this is a no-op.
    pub fn load_config(&mut self, json: &str) -> Result<(), ConfigError> {
        if self.phase != Phase::Created {
            log::warn!("runner: late config ignored");
            return Ok(());
        }
        self.game.load_config(json)
    }

    pub fn init(&mut self) {
        if self.phase == Phase::Created {
            self.game.init(&mut self.ctx);
            self.phase = Phase::Running;
        }
    }

    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Returns true when the viewport accepted the new size.
    pub fn resize(&mut self, width: f32, height: f32) -> bool {
        self.ctx.viewport.notify_resize(width, height)
    }

    /// Advance by one host frame of `dt` seconds and rebuild the draw list.
    pub fn tick(&mut self, dt: f32) {
        if self.phase == Phase::Created {
            return;
        }
        self.ctx.clear_frame_data();

        let step = self.timestep.dt();
        self.ctx.set_dt(step);
        for _ in 0..self.timestep.accumulate(dt) {
            self.game.update(&mut self.ctx, &self.input);
            self.ctx.particles.tick(step);
            // Later steps of the same frame see an empty queue.
            self.input.drain();
        }

        build_render_buffer(self.ctx.scene.iter(), &self.ctx.particles, &mut self.render_buffer);
        self.game.render(&mut RenderContext { render_buffer: &mut self.render_buffer });
    }

    /// Detach the game from the host. Repeat calls are ignored.
    pub fn teardown(&mut self) {
        if self.phase == Phase::Running {
            self.game.teardown(&mut self.ctx);
            self.phase = Phase::TornDown;
        }
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn context(&self) -> &EngineContext {
        &self.ctx
    }

    pub fn instances_ptr(&self) -> *const f32 {
        self.render_buffer.instances_ptr()
    }

    pub fn instance_count(&self) -> u32 {
        self.render_buffer.instance_count()
    }

    /// Events are `GameEvent::FLOATS` f32s each.
    pub fn game_events_ptr(&self) -> *const f32 {
        self.ctx.events.as_ptr().cast()
    }

    pub fn game_events_len(&self) -> u32 {
        self.ctx.events.len() as u32
    }

    /// Live stage size, which follows resizes.
    pub fn world_width(&self) -> f32 {
        self.ctx.viewport.width()
    }

    pub fn world_height(&self) -> f32 {
        self.ctx.viewport.height()
    }

    pub fn particle_count(&self) -> u32 {
        self.ctx.particles.len() as u32
    }

    pub fn max_instances(&self) -> u32 {
        self.config.max_instances as u32
    }

    pub fn max_events(&self) -> u32 {
        self.config.max_events as u32
    }
}
