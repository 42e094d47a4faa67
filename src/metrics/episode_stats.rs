//! Per-episode statistics for batch runs
//!
//! Tracks episode rewards, lengths, scores and how episodes ended, with
//! rolling windows for smoothed means.

use std::collections::VecDeque;

use crate::game::Termination;

/// Episode statistics with rolling averages
///
/// # Example
///
/// ```rust
/// use snake_rl::metrics::EpisodeStats;
///
/// let mut stats = EpisodeStats::new(100);
/// stats.record_episode(10.0, 150, 2, None);
///
/// assert_eq!(stats.total_episodes(), 1);
/// println!("{}", stats.format_summary());
/// ```
#[derive(Debug, Clone)]
pub struct EpisodeStats {
    episode_rewards: VecDeque<f32>,
    episode_lengths: VecDeque<usize>,
    episode_scores: VecDeque<u32>,

    total_episodes: usize,
    total_steps: usize,
    best_score: u32,

    wall_deaths: usize,
    self_collisions: usize,
    stalls: usize,

    window_size: usize,
}

impl EpisodeStats {
    /// Create a tracker keeping the last `window_size` episodes for means
    pub fn new(window_size: usize) -> Self {
        Self {
            episode_rewards: VecDeque::with_capacity(window_size),
            episode_lengths: VecDeque::with_capacity(window_size),
            episode_scores: VecDeque::with_capacity(window_size),
            total_episodes: 0,
            total_steps: 0,
            best_score: 0,
            wall_deaths: 0,
            self_collisions: 0,
            stalls: 0,
            window_size,
        }
    }

    /// Record a finished episode.
    ///
    /// `termination` is `None` when the episode ended some other way, such as
    /// the snake filling the board.
    pub fn record_episode(
        &mut self,
        reward: f32,
        length: usize,
        score: u32,
        termination: Option<Termination>,
    ) {
        Self::push_deque(&mut self.episode_rewards, reward, self.window_size);
        Self::push_deque(&mut self.episode_lengths, length, self.window_size);
        Self::push_deque(&mut self.episode_scores, score, self.window_size);
        self.total_episodes += 1;
        self.total_steps += length;
        self.best_score = self.best_score.max(score);

        match termination {
            Some(Termination::Wall) => self.wall_deaths += 1,
            Some(Termination::SelfCollision) => self.self_collisions += 1,
            Some(Termination::Stall) => self.stalls += 1,
            None => {}
        }
    }

    pub fn mean_episode_reward(&self) -> f32 {
        if self.episode_rewards.is_empty() {
            0.0
        } else {
            self.episode_rewards.iter().sum::<f32>() / self.episode_rewards.len() as f32
        }
    }

    pub fn mean_episode_length(&self) -> f32 {
        let sum: usize = self.episode_lengths.iter().sum();
        if self.episode_lengths.is_empty() {
            0.0
        } else {
            sum as f32 / self.episode_lengths.len() as f32
        }
    }

    pub fn mean_episode_score(&self) -> f32 {
        let sum: u32 = self.episode_scores.iter().sum();
        if self.episode_scores.is_empty() {
            0.0
        } else {
            sum as f32 / self.episode_scores.len() as f32
        }
    }

    pub fn total_episodes(&self) -> usize {
        self.total_episodes
    }

    pub fn total_steps(&self) -> usize {
        self.total_steps
    }

    pub fn best_score(&self) -> u32 {
        self.best_score
    }

    /// Episode counts ended by wall, self-collision and stall
    pub fn terminations(&self) -> (usize, usize, usize) {
        (self.wall_deaths, self.self_collisions, self.stalls)
    }

    pub fn format_summary(&self) -> String {
        format!(
            "Episodes: {} | Steps: {} | Reward: {:.2} | Score: {:.2} | Best: {} | Len: {:.1} | Wall: {} | Self: {} | Stall: {}",
            self.total_episodes,
            self.total_steps,
            self.mean_episode_reward(),
            self.mean_episode_score(),
            self.best_score,
            self.mean_episode_length(),
            self.wall_deaths,
            self.self_collisions,
            self.stalls,
        )
    }

    fn push_deque<T>(deque: &mut VecDeque<T>, value: T, window_size: usize) {
        if deque.len() >= window_size {
            deque.pop_front();
        }
        deque.push_back(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let stats = EpisodeStats::new(100);
        assert_eq!(stats.total_episodes(), 0);
        assert_eq!(stats.total_steps(), 0);
        assert_eq!(stats.mean_episode_reward(), 0.0);
        assert_eq!(stats.mean_episode_score(), 0.0);
    }

    #[test]
    fn test_record_episode() {
        let mut stats = EpisodeStats::new(100);
        stats.record_episode(10.0, 50, 3, Some(Termination::Wall));

        assert_eq!(stats.total_episodes(), 1);
        assert_eq!(stats.total_steps(), 50);
        assert_eq!(stats.best_score(), 3);
        assert_eq!(stats.terminations(), (1, 0, 0));
        assert!((stats.mean_episode_reward() - 10.0).abs() < 1e-5);
        assert!((stats.mean_episode_length() - 50.0).abs() < 1e-5);
        assert!((stats.mean_episode_score() - 3.0).abs() < 1e-5);
    }

    #[test]
    fn test_rolling_average() {
        let mut stats = EpisodeStats::new(3);

        stats.record_episode(1.0, 10, 1, Some(Termination::Stall));
        stats.record_episode(2.0, 20, 2, Some(Termination::Stall));
        stats.record_episode(3.0, 30, 3, Some(Termination::SelfCollision));
        assert!((stats.mean_episode_reward() - 2.0).abs() < 1e-5);

        // a 4th episode evicts the first
        stats.record_episode(4.0, 40, 0, None);

        assert_eq!(stats.total_episodes(), 4);
        assert_eq!(stats.total_steps(), 100);
        assert!((stats.mean_episode_reward() - 3.0).abs() < 1e-5);
        assert_eq!(stats.best_score(), 3);
        assert_eq!(stats.terminations(), (0, 1, 2));
    }

    #[test]
    fn test_format_summary() {
        let mut stats = EpisodeStats::new(100);
        stats.record_episode(15.5, 150, 5, Some(Termination::Wall));

        let summary = stats.format_summary();
        assert!(summary.contains("Episodes: 1"));
        assert!(summary.contains("Steps: 150"));
        assert!(summary.contains("Reward: 15.50"));
        assert!(summary.contains("Score: 5.00"));
        assert!(summary.contains("Best: 5"));
        assert!(summary.contains("Wall: 1"));
    }
}
