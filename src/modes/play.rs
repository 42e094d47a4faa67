//! Interactive terminal front-end
//!
//! Drives one [`EpisodeController`] from any [`Policy`] on a fixed tick and
//! redraws the board at 30 FPS. The keyboard steers the human policy and
//! moves between the start, playing and game-over screens.

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
use tokio::time::interval;
use tracing::{debug, info};

use crate::game::{EpisodeController, GameConfig, GameError};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::policy::{Observation, Policy};
use crate::render::{FrameInfo, Renderer, Screen};

pub struct PlayMode {
    controller: EpisodeController,
    policy: Box<dyn Policy>,
    screen: Screen,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    tick_interval: Duration,
    should_quit: bool,
}

impl PlayMode {
    pub fn new(
        config: GameConfig,
        policy: Box<dyn Policy>,
        tick_interval: Duration,
    ) -> Result<Self> {
        let controller = EpisodeController::new(config).context("Failed to create game")?;

        Ok(Self {
            controller,
            policy,
            screen: Screen::Start,
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            tick_interval,
            should_quit: false,
        })
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

        let result = self.run_game_loop(&mut terminal).await;

        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();
        let mut tick_timer = interval(self.tick_interval);

        // Render at 30 FPS (33ms per frame)
        let mut render_timer = interval(Duration::from_millis(33));

        loop {
            tokio::select! {
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event)?;
                    }
                }

                _ = tick_timer.tick() => {
                    if self.screen == Screen::Playing {
                        self.tick()?;
                    }
                }

                _ = render_timer.tick() => {
                    if self.screen == Screen::Playing {
                        self.metrics.tick_clock();
                    }
                    let info = FrameInfo {
                        screen: self.screen,
                        metrics: &self.metrics,
                        policy: self.policy.name(),
                    };
                    let snapshot = self.controller.snapshot();
                    terminal.draw(|frame| {
                        self.renderer.render(frame, snapshot, &info);
                    }).context("Failed to draw frame")?;
                }

                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) -> Result<()> {
        if let Event::Key(key) = event {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return Ok(());
            }

            match self.input_handler.handle_key_event(key) {
                KeyAction::Steer(direction) => {
                    if self.screen == Screen::Playing {
                        self.policy.on_steer(direction);
                    }
                }
                KeyAction::Start => {
                    if self.screen != Screen::Playing {
                        self.start_game()?;
                    }
                }
                KeyAction::Quit => {
                    self.should_quit = true;
                }
                KeyAction::None => {}
            }
        }

        Ok(())
    }

    fn start_game(&mut self) -> Result<()> {
        self.controller.reset().context("Failed to start episode")?;
        self.metrics.start_round();
        self.screen = Screen::Playing;
        Ok(())
    }

    /// Ask the policy for an action and advance the episode by one tick
    fn tick(&mut self) -> Result<()> {
        let Some(state) = self.controller.state() else {
            return Ok(());
        };
        let observation = Observation::from_state(state);
        let action = self.policy.choose_action(&observation);

        match self.controller.step(action) {
            Ok(result) => {
                debug!(reward = result.reward, score = result.score, "tick");
                if result.terminal {
                    self.finish_game(result.score);
                }
            }
            Err(GameError::BoardFull) => {
                let score = self.controller.state().map_or(0, |s| s.score);
                self.finish_game(score);
            }
            Err(err) => return Err(err).context("Game step failed"),
        }

        Ok(())
    }

    fn finish_game(&mut self, score: u32) {
        self.metrics.finish_round(score);
        info!(
            score,
            policy = self.policy.name(),
            games = self.metrics.games_played,
            "game over"
        );
        self.screen = Screen::GameOver { score };
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
