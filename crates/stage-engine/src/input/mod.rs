pub mod drag;
pub mod queue;
