use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::Duration;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info};

use crate::game::{GameConfig, Session};
use crate::input::{Autopilot, InputHandler, InputSource, KeyAction, PlayerInput};
use crate::metrics::GameMetrics;
use crate::render::{Controls, Renderer, TileBuffer};
use crate::score::ScoreStore;

/// Seconds the game-over panel stays up before the next round starts
const GAME_OVER_PAUSE_SECS: u32 = 2;

/// Who steers the snake
pub enum Controller {
    Human(PlayerInput),
    Autopilot(Autopilot),
}

impl Controller {
    pub fn human() -> Self {
        Self::Human(PlayerInput::new())
    }

    pub fn autopilot(laziness: u8) -> Self {
        Self::Autopilot(Autopilot::new(laziness))
    }

    fn source(&mut self) -> &mut dyn InputSource {
        match self {
            Self::Human(input) => input,
            Self::Autopilot(autopilot) => autopilot,
        }
    }

    fn controls(&self) -> Controls {
        match self {
            Self::Human(_) => Controls::Keyboard,
            Self::Autopilot(_) => Controls::Autopilot,
        }
    }
}

/// Interactive terminal game
pub struct PlayMode {
    session: Session,
    board: TileBuffer,
    controller: Controller,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    ticks_since_death: u32,
    should_quit: bool,
}

impl PlayMode {
    pub fn new(config: GameConfig, store: Option<ScoreStore>, controller: Controller) -> Self {
        let mut board = TileBuffer::new(config.grid_width, config.grid_height);
        let session = Session::new(config, store, &mut board);

        Self {
            session,
            board,
            controller,
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            ticks_since_death: 0,
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    /// Time between simulation ticks
    fn tick_interval(&self) -> Duration {
        let ups = self.session.config().updates_per_second.max(1);
        Duration::from_micros(1_000_000 / u64::from(ups))
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        let mut tick_timer = interval(self.tick_interval());
        tick_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

        // Render at 30 FPS (33ms per frame)
        let render_interval = Duration::from_millis(33);
        let mut render_timer = interval(render_interval);

        info!(
            ups = self.session.config().updates_per_second,
            eligible = self.session.eligible(),
            "game loop started"
        );

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(event),
                        Some(Err(err)) => return Err(err).context("Failed to read terminal event"),
                        // Input closed
                        None => self.quit(),
                    }
                }

                // Game logic tick
                _ = tick_timer.tick() => {
                    self.update_game();
                }

                // Render frame
                _ = render_timer.tick() => {
                    self.metrics.update();
                    terminal.draw(|frame| {
                        self.renderer.render(
                            frame,
                            &self.board,
                            &self.session,
                            &self.metrics,
                            self.controller.controls(),
                        );
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.quit();
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        if let Event::Key(key) = event {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return;
            }

            match self.input_handler.handle_key_event(key) {
                KeyAction::Turn(direction) => {
                    if let Controller::Human(input) = &mut self.controller {
                        input.request(direction);
                    }
                }
                KeyAction::Restart => self.reset_game(),
                KeyAction::Quit => self.quit(),
                KeyAction::None => {}
            }
        }
    }

    /// Ticks to hold the game-over panel before replaying
    fn restart_delay_ticks(&self) -> u32 {
        self.session
            .config()
            .updates_per_second
            .saturating_mul(GAME_OVER_PAUSE_SECS)
            .max(1)
    }

    fn update_game(&mut self) {
        if !self.session.state().is_alive() {
            self.ticks_since_death += 1;
            if self.ticks_since_death >= self.restart_delay_ticks() {
                self.reset_game();
            }
            return;
        }

        let result = self
            .session
            .tick(self.controller.source(), &mut self.board);

        if result.terminated {
            self.metrics.on_round_over(self.session.state().length());
        }
    }

    fn reset_game(&mut self) {
        if self.session.state().is_alive() {
            self.metrics.on_round_over(self.session.state().length());
        }
        self.session.restart(&mut self.board);
        self.ticks_since_death = 0;
        self.metrics.on_round_start();
        if let Controller::Human(input) = &mut self.controller {
            input.clear();
        }
        debug!("round restarted");
    }

    /// Leave the game; a round in progress ends as if the snake died
    fn quit(&mut self) {
        if self.session.state().is_alive() {
            self.session.quit();
            self.metrics.on_round_over(self.session.state().length());
        }
        self.should_quit = true;
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}
