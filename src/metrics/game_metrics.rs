use std::time::{Duration, Instant};

/// Session counters for the TUI header: round clock, best score and rounds played
#[derive(Debug, Clone)]
pub struct GameMetrics {
    round_started: Instant,
    pub round_time: Duration,
    pub best_score: u32,
    pub games_played: u32,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self {
            round_started: Instant::now(),
            round_time: Duration::ZERO,
            best_score: 0,
            games_played: 0,
        }
    }

    /// Advance the clock of the round in progress
    pub fn tick_clock(&mut self) {
        self.round_time = self.round_started.elapsed();
    }

    pub fn start_round(&mut self) {
        self.round_started = Instant::now();
        self.round_time = Duration::ZERO;
    }

    pub fn finish_round(&mut self, score: u32) {
        self.tick_clock();
        self.games_played += 1;
        self.best_score = self.best_score.max(score);
    }

    /// Round clock as `mm:ss`
    pub fn clock(&self) -> String {
        let secs = self.round_time.as_secs();
        format!("{:02}:{:02}", secs / 60, secs % 60)
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}
