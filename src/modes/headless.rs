//! Batch evaluation without a terminal
//!
//! Runs a policy for a fixed number of episodes as fast as the engine allows
//! and collects [`EpisodeStats`]. Useful for comparing policies or checking a
//! persisted model before watching it play.

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::game::{EpisodeController, GameConfig, GameError, Termination};
use crate::metrics::EpisodeStats;
use crate::policy::{Observation, Policy};

/// Outcome of one finished episode
#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeOutcome {
    pub reward: f32,
    pub frames: usize,
    pub score: u32,
    pub termination: Option<Termination>,
}

pub struct HeadlessMode<P: Policy> {
    controller: EpisodeController,
    policy: P,
    stats: EpisodeStats,
    num_episodes: usize,
    log_frequency: usize,
}

impl<P: Policy> HeadlessMode<P> {
    pub fn new(config: GameConfig, policy: P, num_episodes: usize) -> Result<Self> {
        let controller = EpisodeController::new(config).context("Failed to create game")?;

        Ok(Self {
            controller,
            policy,
            stats: EpisodeStats::new(100),
            num_episodes,
            log_frequency: 100,
        })
    }

    /// Log a progress summary every `every` episodes
    pub fn with_log_frequency(mut self, every: usize) -> Self {
        self.log_frequency = every.max(1);
        self
    }

    pub fn run(&mut self) -> Result<&EpisodeStats> {
        info!(
            policy = self.policy.name(),
            episodes = self.num_episodes,
            "starting headless run"
        );

        for episode in 0..self.num_episodes {
            let outcome = self.run_episode()?;
            self.stats.record_episode(
                outcome.reward,
                outcome.frames,
                outcome.score,
                outcome.termination,
            );
            debug!(
                episode,
                score = outcome.score,
                frames = outcome.frames,
                reward = outcome.reward,
                "episode finished"
            );

            if (episode + 1) % self.log_frequency == 0 {
                info!(summary = %self.stats.format_summary(), "progress");
            }
        }

        Ok(&self.stats)
    }

    /// Play one episode from reset to its terminal tick
    pub fn run_episode(&mut self) -> Result<EpisodeOutcome> {
        self.controller.reset().context("Failed to reset episode")?;
        let food_reward = self.controller.config().food_reward;
        let mut reward = 0.0;
        let mut frames = 0;

        loop {
            let Some(state) = self.controller.state() else {
                anyhow::bail!("episode vanished after reset");
            };
            let observation = Observation::from_state(state);
            let action = self.policy.choose_action(&observation);
            frames += 1;

            match self.controller.step(action) {
                Ok(result) => {
                    reward += result.reward;
                    if result.terminal {
                        return Ok(EpisodeOutcome {
                            reward,
                            frames,
                            score: result.score,
                            termination: result.info.termination,
                        });
                    }
                }
                // the last free cell was eaten
                Err(GameError::BoardFull) => {
                    let score = self.controller.state().map_or(0, |s| s.score);
                    return Ok(EpisodeOutcome {
                        reward: reward + food_reward,
                        frames,
                        score,
                        termination: None,
                    });
                }
                Err(err) => return Err(err).context("Game step failed"),
            }
        }
    }
}
