pub mod board;
pub mod renderer;

pub use board::TileBuffer;
pub use renderer::{Controls, Renderer};
