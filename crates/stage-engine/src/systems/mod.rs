pub mod particles;
pub mod render;
