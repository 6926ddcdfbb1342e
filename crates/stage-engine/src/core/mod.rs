pub mod clock;
pub mod rng;
pub mod scene;
pub mod ticker;
pub mod time;
pub mod viewport;
