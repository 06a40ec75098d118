pub mod play;

pub use play::{Controller, PlayMode};
