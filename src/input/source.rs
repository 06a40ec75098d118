use crate::game::{Direction, GameState, navigation};
use crate::rng::{GameRng, session_rng};

/// Something that steers the snake, polled once per tick
pub trait InputSource {
    /// Heading for the coming tick; `state.snake.direction` is the current one
    fn next_direction(&mut self, state: &GameState) -> Direction;
}

/// Keyboard control
///
/// Holds the latest requested heading until the next tick. A request to
/// reverse the current heading is ignored.
#[derive(Debug, Default)]
pub struct PlayerInput {
    pending: Option<Direction>,
}

impl PlayerInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&mut self, direction: Direction) {
        self.pending = Some(direction);
    }

    pub fn clear(&mut self) {
        self.pending = None;
    }
}

impl InputSource for PlayerInput {
    fn next_direction(&mut self, state: &GameState) -> Direction {
        let current = state.snake.direction;
        match self.pending.take() {
            Some(requested) if !current.is_opposite(requested) => requested,
            _ => current,
        }
    }
}

/// Self-driving control backed by the precedence heuristic
pub struct Autopilot {
    rng: GameRng,
    laziness: u8,
}

impl Autopilot {
    pub fn new(laziness: u8) -> Self {
        Self::with_rng(laziness, session_rng())
    }

    pub fn with_rng(laziness: u8, rng: GameRng) -> Self {
        Self { rng, laziness }
    }
}

impl InputSource for Autopilot {
    fn next_direction(&mut self, state: &GameState) -> Direction {
        navigation::decide(
            state.apple,
            state.snake.head(),
            state.snake.direction,
            &state.grid,
            self.laziness,
            &mut self.rng,
        )
    }
}
