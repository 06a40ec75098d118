use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width of the game grid
    pub grid_width: usize,
    /// Height of the game grid
    pub grid_height: usize,
    /// Ticks the snake keeps its tail at the start of a round
    pub start_grow_budget: u32,
    /// Ticks added to the grow budget per apple
    pub growth_increment: u32,
    /// Simulation ticks per second
    pub updates_per_second: u32,
    /// Tick rates above this disable high score updates
    pub highscore_rate_limit: u32,
    /// Autopilot tendency to keep its heading among equally ranked moves
    pub laziness: u8,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 30,
            grid_height: 20,
            start_grow_budget: 2,
            growth_increment: 3,
            updates_per_second: 3,
            highscore_rate_limit: 20,
            laziness: 2,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            grid_width: width,
            grid_height: height,
            ..Default::default()
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(10, 10)
    }

    /// Load a configuration from a JSON file; missing fields take defaults
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse config {:?}", path))
    }

    /// Whether a session at this tick rate may update the stored high score
    pub fn highscore_eligible(&self) -> bool {
        self.updates_per_second <= self.highscore_rate_limit
    }

    /// Parse a tick rate given on the command line
    pub fn parse_framerate(raw: &str) -> Option<u32> {
        raw.trim().parse::<u32>().ok().filter(|&fps| fps > 0)
    }
}
