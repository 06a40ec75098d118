use std::time::{Duration, Instant};

/// Per-process play statistics shown in the header
pub struct GameMetrics {
    pub start_time: Instant,
    pub elapsed_time: Duration,
    /// Longest snake seen this run, eligible or not
    pub best_length: u32,
    pub rounds_played: u32,
    stopped: bool,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            elapsed_time: Duration::ZERO,
            best_length: 0,
            rounds_played: 0,
            stopped: false,
        }
    }

    /// Refresh the round clock; frozen once the round is over
    pub fn update(&mut self) {
        if !self.stopped {
            self.elapsed_time = self.start_time.elapsed();
        }
    }

    pub fn on_round_start(&mut self) {
        self.start_time = Instant::now();
        self.elapsed_time = Duration::ZERO;
        self.stopped = false;
    }

    pub fn on_round_over(&mut self, final_length: u32) {
        self.update();
        self.stopped = true;
        self.rounds_played += 1;
        self.best_length = self.best_length.max(final_length);
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed_time.as_secs();
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;
        format!("{:02}:{:02}", minutes, seconds)
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}
