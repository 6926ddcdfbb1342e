//! Stage controller: population, spawn policy, the sleeper and the frame loop.

use glam::Vec2;
use stage_engine::{
    ConfigError, EngineContext, FrameClock, Game, GameConfig, GameEvent, InputEvent, InputQueue, Rng,
    Scheduler, Teardown,
};

use crate::config::{parse_hex_color, StageConfig, WeightedPalette};
use crate::creature::{Creature, CreatureSystems, Herd};
use crate::factory::{build_creature, Look};
use crate::sleeper::{Sleeper, SLEEPER_OWNER};

/// Game event kinds sent to the host page.
pub mod events {
    /// Open `SLEEPER_LINK` in a new browsing context.
    pub const OPEN_LINK: f32 = 1.0;
}

const FALLBACK_COLOR: u32 = 0xffffff;

/// Deferred stage work run by the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StageAction {
    Snore,
}

pub struct StageController {
    config: StageConfig,
    palette: WeightedPalette,
    systems: CreatureSystems,
    herd: Herd,
    sleeper: Sleeper,
    clock: FrameClock<StageAction>,
    next_creature: u32,
    departed: u64,
}

impl StageController {
    /// Start observing the stage size, place the opening batch and the sleeper.
    /// The returned handle stops resize observation.
    pub fn mount(ctx: &mut EngineContext, config: StageConfig) -> (Self, Teardown) {
        let teardown = ctx.viewport.observe();
        if let Some(seed) = config.seed {
            ctx.rng = Rng::new(seed);
        }

        let palette = WeightedPalette::from_entries(&config.palette).unwrap_or_else(|err| {
            log::warn!("stage: {}; falling back to a single colour", err);
            WeightedPalette::single(FALLBACK_COLOR)
        });

        let mut systems = CreatureSystems::new();
        let sleeper_look = Look {
            color: color_or_fallback(&config.sleeper.color),
            size: config.sleeper.size,
            leg_length: config.sleeper.size * config.leg_ratio,
        };
        let sleeper = Sleeper::spawn(ctx, &mut systems, sleeper_look, config.sleeper.inset);

        let mut clock = FrameClock::new();
        clock.schedule(config.sleeper.snore_interval, StageAction::Snore);

        let mut stage = Self {
            config,
            palette,
            systems,
            herd: Herd::new(),
            sleeper,
            clock,
            next_creature: SLEEPER_OWNER + 1,
            departed: 0,
        };

        let width = ctx.viewport.width();
        let batch: Vec<(f32, Look)> = stage
            .config
            .initial
            .iter()
            .map(|entry| {
                let look = Look {
                    color: color_or_fallback(&entry.color),
                    size: entry.size,
                    leg_length: entry.size * stage.config.leg_ratio,
                };
                (entry.x * width, look)
            })
            .collect();
        for (x, look) in batch {
            stage.spawn_creature(ctx, look, x);
        }
        // A short opening batch is filled up to the floor.
        while stage.population() < stage.config.min_population {
            stage.spawn_random(ctx);
        }

        stage.systems.graph.propagate(&mut ctx.scene);
        log::info!(
            "stage: mounted {}x{} with {} creatures",
            ctx.viewport.width(),
            ctx.viewport.height(),
            stage.herd.len()
        );
        (stage, teardown)
    }

    /// Active creatures, not counting the sleeper.
    pub fn population(&self) -> usize {
        self.herd.active_count()
    }

    pub fn herd(&self) -> &Herd {
        &self.herd
    }

    pub fn sleeper(&self) -> &Sleeper {
        &self.sleeper
    }

    pub fn systems(&self) -> &CreatureSystems {
        &self.systems
    }

    pub fn config(&self) -> &StageConfig {
        &self.config
    }

    /// Creatures that have finished leaving since mount.
    pub fn departed(&self) -> u64 {
        self.departed
    }

    /// Place a creature with its base on the ground line at `x`. Returns its id.
    pub fn spawn_creature(&mut self, ctx: &mut EngineContext, look: Look, x: f32) -> u32 {
        let id = self.next_creature;
        self.next_creature += 1;

        let r = look.radius();
        let width = ctx.viewport.width();
        let x = if width > 2.0 * r { x.clamp(r, width - r) } else { width * 0.5 };
        let at = Vec2::new(x, ctx.viewport.ground_y());

        let parts = build_creature(ctx, &mut self.systems.graph, look, at, "creature");
        let mut env = self.systems.env(ctx);
        self.herd.push(Creature::spawn(id, parts, look, &mut env));
        log::debug!("stage: creature {} spawned at x={:.0} size={:.0}", id, x, look.size);
        id
    }

    /// A creature with a random palette colour, size and position.
    pub fn spawn_random(&mut self, ctx: &mut EngineContext) -> u32 {
        let color = self.palette.pick(&mut ctx.rng);
        let size = ctx.rng.range(self.config.size_min, self.config.size_max);
        let look = Look {
            color,
            size,
            leg_length: size * self.config.leg_ratio,
        };
        let r = look.radius();
        let x = ctx.rng.range(r, (ctx.viewport.width() - r).max(r));
        self.spawn_creature(ctx, look, x)
    }

    /// Completion callback of a departed creature: always replace it, and
    /// add one more while the stage is below its floor.
    pub fn on_creature_left(&mut self, ctx: &mut EngineContext) {
        self.departed += 1;
        self.spawn_random(ctx);
        if self.population() < self.config.min_population {
            self.spawn_random(ctx);
        }
        log::info!("stage: population now {}", self.population());
    }

    /// One fixed step of the stage.
    pub fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue) {
        let bounds = ctx.viewport.size();

        // Input: drags first, then the sleeper's hover/click.
        for event in input.iter() {
            if let Some(drag) = self.systems.drags.process(event, &ctx.scene, bounds) {
                let mut env = self.systems.env(ctx);
                self.herd.route_drag(drag, &mut env);
                continue;
            }
            self.sleeper_input(event, ctx);
        }

        {
            let mut env = self.systems.env(ctx);
            self.herd.run_ticks(&mut env);

            let dt = env.dt;
            env.timelines.tick(dt, env.scene);

            for cue in env.timelines.drain_cues() {
                if cue.owner == SLEEPER_OWNER {
                    self.sleeper.on_cue(cue);
                } else if !self.herd.route_cue(cue, &mut env) {
                    log::debug!("stage: cue {} for unknown owner {}", cue.id, cue.owner);
                }
            }
        }

        for action in self.clock.advance(ctx.dt()) {
            match action {
                StageAction::Snore => {
                    self.sleeper.snore(&ctx.scene, &mut ctx.particles, &mut ctx.rng);
                    self.clock.schedule(self.config.sleeper.snore_interval, StageAction::Snore);
                }
            }
        }

        for creature in self.herd.take_departed() {
            log::debug!("stage: creature {} departed", creature.id());
            self.on_creature_left(ctx);
        }

        self.systems.graph.propagate(&mut ctx.scene);
    }

    fn sleeper_input(&mut self, event: &InputEvent, ctx: &mut EngineContext) {
        match *event {
            InputEvent::PointerMove { x, y } => {
                self.sleeper
                    .pointer_moved(Some(Vec2::new(x, y)), &ctx.scene, &mut self.systems.timelines);
            }
            InputEvent::PointerLeave => {
                self.sleeper.pointer_moved(None, &ctx.scene, &mut self.systems.timelines);
            }
            InputEvent::PointerDown { x, y } if self.sleeper.contains(&ctx.scene, Vec2::new(x, y)) => {
                log::info!("stage: sleeper clicked, opening {}", crate::SLEEPER_LINK);
                ctx.emit_event(GameEvent::new(events::OPEN_LINK));
            }
            _ => {}
        }
    }
}

fn color_or_fallback(hex: &str) -> u32 {
    parse_hex_color(hex).unwrap_or_else(|err| {
        log::warn!("stage: {}", err);
        FALLBACK_COLOR
    })
}

/// The creature stage as a `Game` for the web runner.
pub struct Critters {
    config: StageConfig,
    stage: Option<StageController>,
    teardown: Option<Teardown>,
}

impl Critters {
    pub fn new() -> Self {
        Self {
            config: StageConfig::default(),
            stage: None,
            teardown: None,
        }
    }

    pub fn stage(&self) -> Option<&StageController> {
        self.stage.as_ref()
    }
}

impl Default for Critters {
    fn default() -> Self {
        Self::new()
    }
}

impl Game for Critters {
    fn config(&self) -> GameConfig {
        GameConfig {
            world_width: 960.0,
            world_height: 320.0,
            ..GameConfig::default()
        }
    }

    fn load_config(&mut self, json: &str) -> Result<(), ConfigError> {
        self.config = StageConfig::from_json(json)?;
        Ok(())
    }

    fn init(&mut self, ctx: &mut EngineContext) {
        let (stage, teardown) = StageController::mount(ctx, self.config.clone());
        self.stage = Some(stage);
        self.teardown = Some(teardown);
    }

    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue) {
        if let Some(stage) = self.stage.as_mut() {
            stage.update(ctx, input);
        }
    }

    fn teardown(&mut self, _ctx: &mut EngineContext) {
        if let Some(teardown) = &self.teardown {
            teardown.run();
        }
    }
}
