use std::collections::VecDeque;

use super::action::Direction;
use super::grid::OccupancyGrid;

/// A position on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }
}

/// The snake in the game
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, tail at the front and head at the back
    pub body: VecDeque<Position>,
    /// Current direction of movement
    pub direction: Direction,
    /// Upcoming ticks during which the tail is kept
    pub grow_budget: u32,
}

impl Snake {
    /// Create a snake of `length` segments ending at `head`, trailing away
    /// from `direction`
    pub fn new(head: Position, direction: Direction, length: usize) -> Self {
        let (dx, dy) = direction.delta();
        let length = length.max(1) as i32;

        let body = (0..length)
            .rev()
            .map(|i| head.moved_by(-dx * i, -dy * i))
            .collect();

        Self {
            body,
            direction,
            grow_budget: 0,
        }
    }

    pub fn with_grow_budget(mut self, grow_budget: u32) -> Self {
        self.grow_budget = grow_budget;
        self
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    /// Get the tail position
    #[cfg(test)]
    pub fn tail(&self) -> Position {
        self.body[0]
    }

    pub fn push_head(&mut self, pos: Position) {
        self.body.push_back(pos);
    }

    pub fn pop_tail(&mut self) -> Option<Position> {
        self.body.pop_front()
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Check if the snake is empty (should never happen in practice)
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Why a round ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeathCause {
    /// The head left the grid
    Wall,
    /// The head ran into the body
    SelfCollision,
    /// The player closed the game mid-round
    Quit,
    /// No free tile was left for a new apple
    BoardFull,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Running,
    Dead(DeathCause),
}

/// Complete game state
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub snake: Snake,
    pub apple: Position,
    pub grid: OccupancyGrid,
    pub status: GameStatus,
    pub ticks: u32,
}

impl GameState {
    /// Create a state with the grid marked under the snake body
    pub fn new(snake: Snake, apple: Position, grid_width: usize, grid_height: usize) -> Self {
        let mut grid = OccupancyGrid::new(grid_width, grid_height);
        for &segment in &snake.body {
            grid.set(segment);
        }

        Self {
            snake,
            apple,
            grid,
            status: GameStatus::Running,
            ticks: 0,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.status == GameStatus::Running
    }

    /// Body segment count, the value recorded as a high score
    pub fn length(&self) -> u32 {
        u32::try_from(self.snake.len()).unwrap_or(u32::MAX)
    }

    /// Check if a position is within the grid bounds
    pub fn is_in_bounds(&self, pos: Position) -> bool {
        self.grid.contains(pos)
    }
}
