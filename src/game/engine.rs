use rand::Rng;
use tracing::debug;

use super::{
    action::Direction,
    config::GameConfig,
    grid::OccupancyGrid,
    state::{DeathCause, GameState, GameStatus, Position, Snake},
    tiles::{Tile, TileSink},
};
use crate::rng::{GameRng, session_rng};

/// Information about a step
#[derive(Debug, Clone, PartialEq)]
pub struct StepInfo {
    /// Whether the snake ate the apple this step
    pub ate_apple: bool,
    /// Why the round ended, if it ended this step
    pub death_cause: Option<DeathCause>,
}

/// Result of a game step
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// Whether the round is over
    pub terminated: bool,
    /// Additional information about the step
    pub info: StepInfo,
}

impl StepResult {
    fn alive(ate_apple: bool) -> Self {
        Self {
            terminated: false,
            info: StepInfo {
                ate_apple,
                death_cause: None,
            },
        }
    }

    fn died(cause: DeathCause, ate_apple: bool) -> Self {
        Self {
            terminated: true,
            info: StepInfo {
                ate_apple,
                death_cause: Some(cause),
            },
        }
    }
}

/// The game engine that handles all game logic
pub struct GameEngine {
    config: GameConfig,
    rng: GameRng,
}

impl GameEngine {
    /// Create a new game engine with the given configuration
    pub fn new(config: GameConfig) -> Self {
        Self::with_rng(config, session_rng())
    }

    pub fn with_rng(config: GameConfig, rng: GameRng) -> Self {
        Self { config, rng }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Start a round and draw the whole board into `sink`
    pub fn reset(&mut self, sink: &mut impl TileSink) -> GameState {
        let center_x = (self.config.grid_width / 2) as i32;
        let center_y = (self.config.grid_height / 2) as i32;

        let snake = Snake::new(Position::new(center_x, center_y), Direction::Right, 1)
            .with_grow_budget(self.config.start_grow_budget);

        // Placeholder until the grid exists to sample against
        let mut state = GameState::new(
            snake,
            Position::new(0, 0),
            self.config.grid_width,
            self.config.grid_height,
        );

        for pos in state.grid.positions() {
            let tile = if state.grid.is_occupied(pos) {
                Tile::Snake
            } else {
                Tile::Empty
            };
            sink.draw_tile(pos, tile);
        }

        match self.spawn_apple(&state.grid) {
            Some(apple) => {
                state.apple = apple;
                sink.draw_tile(apple, Tile::Apple);
            }
            None => state.status = GameStatus::Dead(DeathCause::BoardFull),
        }

        state
    }

    /// Advance one tick with the snake heading `direction`
    pub fn step(
        &mut self,
        state: &mut GameState,
        direction: Direction,
        sink: &mut impl TileSink,
    ) -> StepResult {
        if let GameStatus::Dead(cause) = state.status {
            return StepResult::died(cause, false);
        }

        state.snake.direction = direction;
        let next_head = state.snake.head().moved_in_direction(direction);

        if !state.is_in_bounds(next_head) {
            return self.kill(state, DeathCause::Wall);
        }

        // The tail goes first so the head may take the tile it just left
        if state.snake.grow_budget > 0 {
            state.snake.grow_budget -= 1;
        } else if let Some(tail) = state.snake.pop_tail() {
            state.grid.clear(tail);
            sink.draw_tile(tail, Tile::Empty);
        }

        if state.grid.is_occupied(next_head) {
            return self.kill(state, DeathCause::SelfCollision);
        }

        state.snake.push_head(next_head);
        state.grid.set(next_head);
        sink.draw_tile(next_head, Tile::Snake);
        state.ticks += 1;

        let ate_apple = next_head == state.apple;
        if ate_apple {
            state.snake.grow_budget += self.config.growth_increment;
            match self.spawn_apple(&state.grid) {
                Some(apple) => {
                    state.apple = apple;
                    sink.draw_tile(apple, Tile::Apple);
                }
                None => {
                    self.kill(state, DeathCause::BoardFull);
                    return StepResult::died(DeathCause::BoardFull, true);
                }
            }
        }

        StepResult::alive(ate_apple)
    }

    /// End the round early, e.g. when the player quits
    pub fn abandon(&mut self, state: &mut GameState) -> StepResult {
        match state.status {
            GameStatus::Running => self.kill(state, DeathCause::Quit),
            GameStatus::Dead(cause) => StepResult::died(cause, false),
        }
    }

    fn kill(&mut self, state: &mut GameState, cause: DeathCause) -> StepResult {
        debug!(?cause, length = state.snake.len(), ticks = state.ticks, "round over");
        state.status = GameStatus::Dead(cause);
        StepResult::died(cause, false)
    }

    /// Random free tile, or `None` when the snake fills the grid
    fn spawn_apple(&mut self, grid: &OccupancyGrid) -> Option<Position> {
        if grid.occupied_count() >= grid.tile_count() {
            return None;
        }

        loop {
            let x = self.rng.gen_range(0..grid.width()) as i32;
            let y = self.rng.gen_range(0..grid.height()) as i32;
            let pos = Position::new(x, y);

            if !grid.is_occupied(pos) {
                return Some(pos);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::tiles::{NullSink, TileDelta};
    use crate::rng::seeded_rng;

    fn engine() -> GameEngine {
        GameEngine::with_rng(GameConfig::small(), seeded_rng(11))
    }

    fn assert_grid_matches_body(state: &GameState) {
        assert_eq!(state.grid.occupied_count(), state.snake.len());
        for &segment in &state.snake.body {
            assert!(state.grid.is_occupied(segment));
        }
    }

    #[test]
    fn test_reset() {
        let mut engine = engine();
        let mut deltas: Vec<TileDelta> = Vec::new();
        let state = engine.reset(&mut deltas);

        assert!(state.is_alive());
        assert_eq!(state.ticks, 0);
        assert_eq!(state.snake.len(), 1);
        assert_eq!(state.snake.head(), Position::new(5, 5));
        assert_eq!(state.snake.direction, Direction::Right);
        assert_eq!(state.snake.grow_budget, 2);
        assert!(!state.grid.is_occupied(state.apple));

        // Full board plus the apple
        assert_eq!(deltas.len(), 101);
        assert_eq!(
            deltas.last(),
            Some(&TileDelta {
                pos: state.apple,
                tile: Tile::Apple
            })
        );
        assert_eq!(
            deltas.iter().filter(|d| d.tile == Tile::Snake).count(),
            1
        );
    }

    #[test]
    fn test_basic_movement_emits_deltas() {
        let mut engine = engine();
        let mut state = GameState::new(
            Snake::new(Position::new(5, 5), Direction::Right, 2),
            Position::new(0, 0),
            10,
            10,
        );
        let mut deltas: Vec<TileDelta> = Vec::new();

        let result = engine.step(&mut state, Direction::Right, &mut deltas);

        assert!(!result.terminated);
        assert!(!result.info.ate_apple);
        assert_eq!(state.ticks, 1);
        assert_eq!(state.snake.head(), Position::new(6, 5));
        assert_eq!(
            deltas,
            vec![
                TileDelta {
                    pos: Position::new(4, 5),
                    tile: Tile::Empty
                },
                TileDelta {
                    pos: Position::new(6, 5),
                    tile: Tile::Snake
                },
            ]
        );
        assert_grid_matches_body(&state);
    }

    #[test]
    fn test_wall_collision_skips_tail_and_head() {
        let mut engine = engine();
        let mut state = GameState::new(
            Snake::new(Position::new(1, 5), Direction::Left, 2),
            Position::new(5, 5),
            10,
            10,
        );
        engine.step(&mut state, Direction::Left, &mut NullSink);

        let mut deltas: Vec<TileDelta> = Vec::new();
        let body_before = state.snake.clone();
        let result = engine.step(&mut state, Direction::Left, &mut deltas);

        assert!(result.terminated);
        assert_eq!(result.info.death_cause, Some(DeathCause::Wall));
        assert_eq!(state.status, GameStatus::Dead(DeathCause::Wall));
        assert_eq!(state.snake, body_before);
        assert!(deltas.is_empty());
    }

    #[test]
    fn test_wall_collision_on_far_edges() {
        let mut engine = engine();
        let mut state = GameState::new(
            Snake::new(Position::new(9, 9), Direction::Up, 1),
            Position::new(0, 0),
            10,
            10,
        );
        let result = engine.step(&mut state, Direction::Up, &mut NullSink);
        assert_eq!(result.info.death_cause, Some(DeathCause::Wall));
    }

    #[test]
    fn test_tail_is_vacated_before_collision_check() {
        // Ring of four: stepping into the tail is safe while not growing
        let mut engine = engine();
        let mut snake = Snake::new(Position::new(4, 4), Direction::Right, 1);
        snake.body = [(4, 5), (5, 5), (5, 4), (4, 4)]
            .into_iter()
            .map(|(x, y)| Position::new(x, y))
            .collect();
        let mut state = GameState::new(snake, Position::new(0, 0), 10, 10);

        let result = engine.step(&mut state, Direction::Up, &mut NullSink);

        assert!(!result.terminated);
        assert_eq!(state.snake.head(), Position::new(4, 5));
        assert_eq!(state.snake.len(), 4);
        assert_grid_matches_body(&state);
    }

    #[test]
    fn test_stepping_into_tail_while_growing_is_fatal() {
        let mut engine = engine();
        let mut snake = Snake::new(Position::new(4, 4), Direction::Right, 1).with_grow_budget(1);
        snake.body = [(4, 5), (5, 5), (5, 4), (4, 4)]
            .into_iter()
            .map(|(x, y)| Position::new(x, y))
            .collect();
        let mut state = GameState::new(snake, Position::new(0, 0), 10, 10);

        let result = engine.step(&mut state, Direction::Up, &mut NullSink);

        assert!(result.terminated);
        assert_eq!(result.info.death_cause, Some(DeathCause::SelfCollision));
        assert_eq!(state.snake.grow_budget, 0);
    }

    #[test]
    fn test_reversing_into_neck_is_fatal() {
        // Moving Right, then turning back onto the segment behind the head
        let mut engine = engine();
        let mut state = GameState::new(
            Snake::new(Position::new(5, 5), Direction::Right, 3),
            Position::new(0, 0),
            10,
            10,
        );

        let result = engine.step(&mut state, Direction::Left, &mut NullSink);

        assert!(result.terminated);
        assert_eq!(result.info.death_cause, Some(DeathCause::SelfCollision));
        // Tail was popped before the check
        assert_eq!(state.snake.len(), 2);
        assert_grid_matches_body(&state);
    }

    #[test]
    fn test_single_segment_can_reverse() {
        let mut engine = engine();
        let mut state = GameState::new(
            Snake::new(Position::new(5, 5), Direction::Right, 1),
            Position::new(0, 0),
            10,
            10,
        );

        let result = engine.step(&mut state, Direction::Left, &mut NullSink);
        assert!(!result.terminated);
        assert_eq!(state.snake.head(), Position::new(4, 5));
    }

    #[test]
    fn test_apple_growth() {
        let mut engine = engine();
        let mut state = GameState::new(
            Snake::new(Position::new(5, 5), Direction::Right, 2),
            Position::new(6, 5),
            10,
            10,
        );
        let mut deltas: Vec<TileDelta> = Vec::new();

        let result = engine.step(&mut state, Direction::Right, &mut deltas);

        assert!(result.info.ate_apple);
        assert_eq!(state.snake.len(), 2);
        assert_eq!(state.snake.grow_budget, 3);
        assert_ne!(state.apple, Position::new(6, 5));
        assert!(!state.snake.contains(state.apple));
        assert_eq!(
            deltas.last(),
            Some(&TileDelta {
                pos: state.apple,
                tile: Tile::Apple
            })
        );

        // Keep the new apple out of the way
        state.apple = Position::new(0, 9);
        let mut lengths = Vec::new();
        let mut budgets = Vec::new();
        for dir in [Direction::Up, Direction::Up, Direction::Up, Direction::Up] {
            engine.step(&mut state, dir, &mut NullSink);
            lengths.push(state.snake.len());
            budgets.push(state.snake.grow_budget);
        }

        assert_eq!(lengths, vec![3, 4, 5, 5]);
        assert_eq!(budgets, vec![2, 1, 0, 0]);
        assert_grid_matches_body(&state);
    }

    #[test]
    fn test_apple_never_lands_on_body() {
        let mut engine = GameEngine::with_rng(GameConfig::new(6, 6), seeded_rng(21));
        let mut state = GameState::new(
            Snake::new(Position::new(4, 0), Direction::Right, 5),
            Position::new(5, 0),
            6,
            6,
        );

        for _ in 0..200 {
            state.apple = state.snake.head().moved_in_direction(Direction::Right);
            if !state.is_in_bounds(state.apple) || state.grid.is_occupied(state.apple) {
                break;
            }
            engine.step(&mut state, Direction::Right, &mut NullSink);
            assert!(!state.snake.contains(state.apple));
        }

        for _ in 0..500 {
            let apple = engine.spawn_apple(&state.grid).unwrap();
            assert!(!state.snake.contains(apple));
        }
    }

    #[test]
    fn test_full_board_ends_round() {
        let mut engine = GameEngine::with_rng(GameConfig::new(3, 1), seeded_rng(5));
        let mut state = GameState::new(
            Snake::new(Position::new(1, 0), Direction::Right, 2),
            Position::new(2, 0),
            3,
            1,
        );
        state.snake.grow_budget = 1;

        let result = engine.step(&mut state, Direction::Right, &mut NullSink);

        assert!(result.terminated);
        assert!(result.info.ate_apple);
        assert_eq!(state.status, GameStatus::Dead(DeathCause::BoardFull));
        assert_eq!(state.snake.len(), 3);
    }

    #[test]
    fn test_abandon() {
        let mut engine = engine();
        let mut state = engine.reset(&mut NullSink);

        let result = engine.abandon(&mut state);
        assert_eq!(result.info.death_cause, Some(DeathCause::Quit));
        assert!(!state.is_alive());

        // A second abandon keeps the first cause
        let mut dead = state.clone();
        dead.status = GameStatus::Dead(DeathCause::Wall);
        assert_eq!(
            engine.abandon(&mut dead).info.death_cause,
            Some(DeathCause::Wall)
        );
    }

    #[test]
    fn test_terminated_game_no_update() {
        let mut engine = engine();
        let mut state = engine.reset(&mut NullSink);
        state.status = GameStatus::Dead(DeathCause::Wall);
        let ticks_before = state.ticks;

        let result = engine.step(&mut state, Direction::Right, &mut NullSink);

        assert!(result.terminated);
        assert_eq!(state.ticks, ticks_before);
    }
}
