//! Blind Snake - Snake on a fixed grid with a self-driving mode
//!
//! This library provides:
//! - Core game logic and the autopilot heuristic (game module)
//! - Keyboard and autopilot input sources (input module)
//! - Tamper-evident high score storage (score module)
//! - TUI rendering (render module)
//! - The interactive play loop (modes module)

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
pub mod rng;
pub mod score;
