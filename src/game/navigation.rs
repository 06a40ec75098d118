//! Autopilot heading choice
//!
//! The snake has no map of the board beyond its four neighbouring tiles. Each
//! direction gets a precedence from 0 to 3:
//!
//! - 3: moves toward the apple
//! - 2: neutral
//! - 1: sideways while already lined up with the apple
//! - 0: off the grid or into the body
//!
//! The best ranked direction wins, with random tie-breaks that lean toward
//! the current heading.

use rand::Rng;

use super::action::Direction;
use super::grid::OccupancyGrid;
use super::state::Position;

pub const MAX_PRECEDENCE: u8 = 3;
const NEUTRAL: u8 = 2;
const DISCOURAGED: u8 = 1;
const FORBIDDEN: u8 = 0;

/// Returned when no precedence level yields a candidate. Every direction
/// always holds some level in `0..=MAX_PRECEDENCE`, so this is never used.
pub const FALLBACK_DIRECTION: Direction = Direction::Up;

/// Per-direction precedence, indexed by [`Direction::index`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Precedence([u8; 4]);

impl Precedence {
    pub fn neutral() -> Self {
        Self([NEUTRAL; 4])
    }

    pub fn from_levels(levels: [u8; 4]) -> Self {
        Self(levels)
    }

    pub fn get(&self, direction: Direction) -> u8 {
        self.0[direction.index()]
    }

    pub fn set(&mut self, direction: Direction, level: u8) {
        self.0[direction.index()] = level;
    }

    /// Score the four directions from the head's point of view
    pub fn rank(
        apple: Position,
        head: Position,
        current: Direction,
        grid: &OccupancyGrid,
    ) -> Self {
        let mut precedence = Self::neutral();

        let moving_away_y = (head.y < apple.y && current == Direction::Down)
            || (head.y > apple.y && current == Direction::Up);
        let moving_away_x = (head.x < apple.x && current == Direction::Left)
            || (head.x > apple.x && current == Direction::Right);

        if head.x < apple.x {
            precedence.set(Direction::Right, MAX_PRECEDENCE);
        } else if head.x > apple.x {
            precedence.set(Direction::Left, MAX_PRECEDENCE);
        } else if !moving_away_y {
            // Same column: sideways steps are wasted
            precedence.set(Direction::Left, DISCOURAGED);
            precedence.set(Direction::Right, DISCOURAGED);
        }

        if head.y < apple.y {
            precedence.set(Direction::Up, MAX_PRECEDENCE);
        } else if head.y > apple.y {
            precedence.set(Direction::Down, MAX_PRECEDENCE);
        } else if !moving_away_x {
            precedence.set(Direction::Up, DISCOURAGED);
            precedence.set(Direction::Down, DISCOURAGED);
        }

        // Also rules out reversing, but only when the tile behind is body
        for direction in Direction::ALL {
            if grid.is_blocked(head.moved_in_direction(direction)) {
                precedence.set(direction, FORBIDDEN);
            }
        }

        precedence
    }

    /// Directions ranked exactly `level`, in index order
    pub fn candidates(&self, level: u8) -> Vec<Direction> {
        Direction::ALL
            .into_iter()
            .filter(|&direction| self.get(direction) == level)
            .collect()
    }

    /// Highest level any direction holds
    #[cfg(test)]
    pub fn best_level(&self) -> u8 {
        self.0.iter().copied().max().unwrap_or(FORBIDDEN)
    }

    /// Pick a direction from the highest populated level
    ///
    /// `laziness` weights the current heading: when it is among the
    /// candidates it is kept with probability `laziness / (laziness + 1)`
    /// before falling back to a uniform draw.
    pub fn select<R: Rng + ?Sized>(
        &self,
        current: Direction,
        laziness: u8,
        rng: &mut R,
    ) -> Option<Direction> {
        if self.get(current) == MAX_PRECEDENCE && rng.gen_bool(0.5) {
            return Some(current);
        }

        (0..=MAX_PRECEDENCE).rev().find_map(|level| {
            let candidates = self.candidates(level);
            if candidates.is_empty() {
                return None;
            }
            if candidates.contains(&current) && rng.gen_range(0..=laziness) > 0 {
                return Some(current);
            }
            Some(candidates[rng.gen_range(0..candidates.len())])
        })
    }
}

/// Next heading for a snake whose head is at `head`
pub fn decide<R: Rng + ?Sized>(
    apple: Position,
    head: Position,
    current: Direction,
    grid: &OccupancyGrid,
    laziness: u8,
    rng: &mut R,
) -> Direction {
    Precedence::rank(apple, head, current, grid)
        .select(current, laziness, rng)
        .unwrap_or(FALLBACK_DIRECTION)
}
