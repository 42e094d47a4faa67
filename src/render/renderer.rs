use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::game::{Point, RenderSnapshot};
use crate::metrics::GameMetrics;

/// Which screen the front-end is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Start,
    Playing,
    GameOver { score: u32 },
}

/// Everything a frame needs besides the board itself
pub struct FrameInfo<'a> {
    pub screen: Screen,
    pub metrics: &'a GameMetrics,
    pub policy: &'a str,
}

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(
        &self,
        frame: &mut Frame,
        snapshot: Option<RenderSnapshot<'_>>,
        info: &FrameInfo<'_>,
    ) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        let stats = self.render_stats(chunks[0], snapshot.as_ref(), info);
        frame.render_widget(stats, chunks[0]);

        let game_area = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(10),
                Constraint::Percentage(80),
                Constraint::Percentage(10),
            ])
            .split(chunks[1])[1];

        match (info.screen, snapshot) {
            (Screen::Playing, Some(snapshot)) => {
                let grid = self.render_grid(game_area, &snapshot);
                frame.render_widget(grid, game_area);
            }
            (Screen::GameOver { score }, _) => {
                let game_over = self.render_game_over(game_area, score);
                frame.render_widget(game_over, game_area);
            }
            _ => {
                let start = self.render_start(game_area, info.policy);
                frame.render_widget(start, game_area);
            }
        }

        let controls = self.render_controls(chunks[2]);
        frame.render_widget(controls, chunks[2]);
    }

    fn render_grid(&self, _area: Rect, snapshot: &RenderSnapshot<'_>) -> Paragraph<'_> {
        let bounds = snapshot.bounds;
        let head = snapshot.head();
        let mut lines = Vec::with_capacity(bounds.rows().max(0) as usize);

        for row in 0..bounds.rows() {
            let mut spans = Vec::with_capacity(bounds.columns().max(0) as usize);

            for col in 0..bounds.columns() {
                let cell = Point::new(col * bounds.block_size, row * bounds.block_size);

                let span = if Some(cell) == head {
                    Span::styled(
                        "■ ",
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    )
                } else if snapshot.snake.contains(&cell) {
                    Span::styled("□ ", Style::default().fg(Color::Green))
                } else if snapshot.food == Some(cell) {
                    Span::styled(
                        "● ",
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    )
                } else {
                    Span::styled(". ", Style::default().fg(Color::DarkGray))
                };

                spans.push(span);
            }

            lines.push(Line::from(spans));
        }

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(Color::White))
                    .title(" Snake "),
            )
            .alignment(Alignment::Center)
    }

    fn render_stats(
        &self,
        _area: Rect,
        snapshot: Option<&RenderSnapshot<'_>>,
        info: &FrameInfo<'_>,
    ) -> Paragraph<'_> {
        let score = snapshot.map_or(0, |s| s.score);
        let frames = snapshot.map_or(0, |s| s.frame_iteration);
        let label = Style::default().fg(Color::Yellow);
        let value = Style::default().fg(Color::White);

        let text = vec![Line::from(vec![
            Span::styled("Score: ", label),
            Span::styled(score.to_string(), value.add_modifier(Modifier::BOLD)),
            Span::raw("    "),
            Span::styled("Best: ", label),
            Span::styled(info.metrics.best_score.to_string(), value),
            Span::raw("    "),
            Span::styled("Games: ", label),
            Span::styled(info.metrics.games_played.to_string(), value),
            Span::raw("    "),
            Span::styled("Frame: ", label),
            Span::styled(frames.to_string(), value),
            Span::raw("    "),
            Span::styled("Time: ", label),
            Span::styled(info.metrics.clock(), value),
            Span::raw("    "),
            Span::styled("Policy: ", label),
            Span::styled(info.policy.to_string(), value),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_start(&self, _area: Rect, policy: &str) -> Paragraph<'_> {
        let text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "SNAKE",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Driver: ", Style::default().fg(Color::Yellow)),
                Span::styled(policy.to_string(), Style::default().fg(Color::White)),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "SPACE",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to start or ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "ESC",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to quit", Style::default().fg(Color::Gray)),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Green)),
        )
    }

    fn render_game_over(&self, _area: Rect, score: u32) -> Paragraph<'_> {
        let text = vec![
            Line::from(""),
            Line::from(vec![
                Span::styled(
                    "Game Over! ",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::styled("Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    score.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "SPACE",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to restart or ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "ESC",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to quit", Style::default().fg(Color::Gray)),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn render_controls(&self, _area: Rect) -> Paragraph<'_> {
        let text = vec![Line::from(vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" or "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" to steer | "),
            Span::styled("SPACE", Style::default().fg(Color::Green)),
            Span::raw(" to start | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" to quit"),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}
