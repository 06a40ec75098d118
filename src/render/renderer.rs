use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use super::board::TileBuffer;
use crate::game::{DeathCause, Position, RoundSummary, Session, Tile};
use crate::metrics::GameMetrics;

/// Who is steering, for the footer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Controls {
    Keyboard,
    Autopilot,
}

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(
        &self,
        frame: &mut Frame,
        board: &TileBuffer,
        session: &Session,
        metrics: &GameMetrics,
        controls: Controls,
    ) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        frame.render_widget(self.render_stats(session, metrics), chunks[0]);

        match session.summary() {
            None => frame.render_widget(self.render_grid(board, session), chunks[1]),
            Some(summary) => frame.render_widget(
                self.render_game_over(summary, session, metrics),
                chunks[1],
            ),
        }

        frame.render_widget(self.render_controls(controls), chunks[2]);
    }

    fn render_grid(&self, board: &TileBuffer, session: &Session) -> Paragraph<'_> {
        let head = session.state().snake.head();

        // Highest row first so that Up points up the screen
        let lines: Vec<Line> = (0..board.height())
            .rev()
            .map(|y| {
                let spans: Vec<Span> = (0..board.width())
                    .map(|x| {
                        let pos = Position::new(x as i32, y as i32);
                        self.cell(board.get(pos), pos == head)
                    })
                    .collect();
                Line::from(spans)
            })
            .collect();

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

    fn cell(&self, tile: Tile, is_head: bool) -> Span<'static> {
        match tile {
            Tile::Snake if is_head => Span::styled(
                "■ ",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Tile::Snake => Span::styled("■ ", Style::default().fg(Color::White)),
            Tile::Apple => Span::styled(
                "● ",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Tile::Empty => Span::styled(". ", Style::default().fg(Color::DarkGray)),
        }
    }

    fn render_stats(&self, session: &Session, metrics: &GameMetrics) -> Paragraph<'_> {
        let state = session.state();
        let mut spans = vec![
            Span::styled("Length: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                state.length().to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("Record: ", Style::default().fg(Color::Yellow)),
            Span::styled(session.best().to_string(), Style::default().fg(Color::White)),
            Span::raw("    "),
            Span::styled("Ticks: ", Style::default().fg(Color::Yellow)),
            Span::styled(state.ticks.to_string(), Style::default().fg(Color::White)),
            Span::raw("    "),
            Span::styled("Time: ", Style::default().fg(Color::Yellow)),
            Span::styled(metrics.format_time(), Style::default().fg(Color::White)),
        ];

        if !session.eligible() {
            spans.push(Span::raw("    "));
            spans.push(Span::styled(
                "record disabled at this speed",
                Style::default().fg(Color::DarkGray),
            ));
        }

        Paragraph::new(Line::from(spans)).alignment(Alignment::Center)
    }

    fn render_game_over(
        &self,
        summary: RoundSummary,
        session: &Session,
        metrics: &GameMetrics,
    ) -> Paragraph<'_> {
        let reason = match summary.cause {
            DeathCause::Wall => "Hit the wall",
            DeathCause::SelfCollision => "Ran into itself",
            DeathCause::Quit => "Quit",
            DeathCause::BoardFull => "Filled the board",
        };

        let mut text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "GAME OVER",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )]),
            Line::from(Span::styled(reason, Style::default().fg(Color::Gray))),
            Line::from(""),
            Line::from(vec![
                Span::styled("Final Length: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    summary.length.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
        ];

        if summary.new_record {
            text.push(Line::from(Span::styled(
                "New record!",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )));
        } else {
            text.push(Line::from(vec![
                Span::styled("Record: ", Style::default().fg(Color::Yellow)),
                Span::styled(session.best().to_string(), Style::default().fg(Color::White)),
            ]));
        }

        text.push(Line::from(vec![
            Span::styled("Best this run: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                metrics.best_length.to_string(),
                Style::default().fg(Color::White),
            ),
            Span::styled(
                format!(" over {} rounds", metrics.rounds_played),
                Style::default().fg(Color::Gray),
            ),
        ]));

        text.push(Line::from(""));
        text.push(Line::from(vec![
            Span::styled("Press ", Style::default().fg(Color::Gray)),
            Span::styled(
                "R",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" to restart or ", Style::default().fg(Color::Gray)),
            Span::styled(
                "Q",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Span::styled(" to quit", Style::default().fg(Color::Gray)),
        ]));

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn render_controls(&self, controls: Controls) -> Paragraph<'_> {
        let mut spans = match controls {
            Controls::Keyboard => vec![
                Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
                Span::raw(", "),
                Span::styled("WASD", Style::default().fg(Color::Cyan)),
                Span::raw(" or "),
                Span::styled("HJKL", Style::default().fg(Color::Cyan)),
                Span::raw(" to move | "),
            ],
            Controls::Autopilot => vec![Span::styled(
                "autopilot | ",
                Style::default().fg(Color::Cyan),
            )],
        };
        spans.push(Span::styled("R", Style::default().fg(Color::Green)));
        spans.push(Span::raw(" to restart | "));
        spans.push(Span::styled("Q", Style::default().fg(Color::Red)));
        spans.push(Span::raw(" to quit"));

        Paragraph::new(Line::from(spans)).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}
