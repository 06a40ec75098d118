//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! Changes to the board are reported through [`TileSink`], and headings come from
//! an [`InputSource`](crate::input::InputSource).

pub mod action;
pub mod config;
pub mod engine;
pub mod grid;
pub mod navigation;
pub mod session;
pub mod state;
pub mod tiles;

// Re-export commonly used types
pub use action::Direction;
pub use config::GameConfig;
pub use engine::{GameEngine, StepInfo, StepResult};
pub use grid::OccupancyGrid;
pub use navigation::{Precedence, decide};
pub use session::{RoundSummary, Session};
pub use state::{DeathCause, GameState, GameStatus, Position, Snake};
pub use tiles::{NullSink, Tile, TileDelta, TileSink};
