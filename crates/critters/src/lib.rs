use wasm_bindgen::prelude::*;
use stage_engine::InputEvent;

pub mod config;
pub mod creature;
pub mod emitter;
pub mod factory;
pub mod geometry;
pub mod sleeper;
pub mod stage;

pub use config::{StageConfig, WeightedPalette};
pub use creature::{Creature, CreatureState, TransitionError};
pub use stage::{events, Critters, StageController};

/// Where a click on the sleeper takes the visitor.
pub const SLEEPER_LINK: &str = "https://github.com/";

stage_web::export_game!(Critters, "critters");

/// URL the host opens when it receives an `OPEN_LINK` event.
#[wasm_bindgen]
pub fn sleeper_link_url() -> String {
    SLEEPER_LINK.to_string()
}
