//! Steering: keyboard mapping and the two input sources

pub mod handler;
pub mod source;

pub use handler::{InputHandler, KeyAction};
pub use source::{Autopilot, InputSource, PlayerInput};
