use tracing::{debug, info, warn};

use super::{
    config::GameConfig,
    engine::{GameEngine, StepResult},
    state::{DeathCause, GameState},
    tiles::TileSink,
};
use crate::input::InputSource;
use crate::score::ScoreStore;

/// How a round ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundSummary {
    pub cause: DeathCause,
    pub length: u32,
    /// A new high score was written
    pub new_record: bool,
}

/// A sequence of rounds sharing one score store and eligibility setting
pub struct Session {
    engine: GameEngine,
    state: GameState,
    store: Option<ScoreStore>,
    eligible: bool,
    best: u32,
    summary: Option<RoundSummary>,
}

impl Session {
    /// Start the first round
    ///
    /// Without a store the session plays normally but never saves.
    pub fn new(config: GameConfig, store: Option<ScoreStore>, sink: &mut impl TileSink) -> Self {
        Self::with_engine(GameEngine::new(config), store, sink)
    }

    pub fn with_engine(
        mut engine: GameEngine,
        store: Option<ScoreStore>,
        sink: &mut impl TileSink,
    ) -> Self {
        let eligible = engine.config().highscore_eligible();
        let best = store.as_ref().map_or(0, ScoreStore::read);
        let state = engine.reset(sink);
        sink.present();

        debug!(eligible, best, "session started");

        Self {
            engine,
            state,
            store,
            eligible,
            best,
            summary: None,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &GameConfig {
        self.engine.config()
    }

    /// Whether rounds in this session may set a high score
    pub fn eligible(&self) -> bool {
        self.eligible
    }

    /// Best length known to the store
    pub fn best(&self) -> u32 {
        self.best
    }

    /// Outcome of the current round once it is over
    pub fn summary(&self) -> Option<RoundSummary> {
        self.summary
    }

    /// Poll `input` and advance one tick
    pub fn tick(&mut self, input: &mut dyn InputSource, sink: &mut impl TileSink) -> StepResult {
        let direction = if self.state.is_alive() {
            input.next_direction(&self.state)
        } else {
            self.state.snake.direction
        };

        let result = self.engine.step(&mut self.state, direction, sink);
        if let Some(cause) = result.info.death_cause {
            self.finish_round(cause);
        }
        sink.present();

        result
    }

    /// End the current round on a quit request, saving as a death would
    pub fn quit(&mut self) -> Option<RoundSummary> {
        let result = self.engine.abandon(&mut self.state);
        if let Some(cause) = result.info.death_cause {
            self.finish_round(cause);
        }
        self.summary
    }

    /// Start a new round
    pub fn restart(&mut self, sink: &mut impl TileSink) {
        if self.state.is_alive() {
            self.quit();
        }
        self.state = self.engine.reset(sink);
        self.summary = None;
        sink.present();
    }

    fn finish_round(&mut self, cause: DeathCause) {
        if self.summary.is_some() {
            return;
        }

        let length = self.state.length();
        let new_record = match &self.store {
            Some(store) => match store.submit(length, self.eligible) {
                Ok(written) => written,
                Err(err) => {
                    warn!(error = %err, length, "could not save high score");
                    false
                }
            },
            None => false,
        };

        if new_record {
            self.best = length;
        }
        info!(?cause, length, new_record, "round finished");

        self.summary = Some(RoundSummary {
            cause,
            length,
            new_record,
        });
    }
}
