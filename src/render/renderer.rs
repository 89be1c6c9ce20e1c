use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::game::{EndReason, GameState, Position};
use crate::session::{Phase, Session};

/// Below this width the compact (pointer) wording is used
const COMPACT_WIDTH: u16 = 60;

/// Columns per board cell: two when the board fits at double width, else one
pub fn cell_width_for(area_width: u16, grid_size: usize) -> usize {
    let wide = grid_size * 2 + 2;
    if area_width as usize >= wide { 2 } else { 1 }
}

pub fn is_compact(area_width: u16) -> bool {
    area_width < COMPACT_WIDTH
}

/// A `width` x `height` rect centered in `area`, clipped to it
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, session: &Session) {
        match session.phase() {
            Phase::NameEntry => self.render_name_entry(frame, session),
            phase => self.render_game(frame, session, phase),
        }
    }

    fn render_name_entry(&self, frame: &mut Frame, session: &Session) {
        let area = centered_rect(44, 11, frame.area());

        let mut field = vec![
            Span::styled("> ", Style::default().fg(Color::Cyan)),
            Span::styled(
                session.name_input().to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
        ];
        field.push(Span::styled(
            "_",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::SLOW_BLINK),
        ));

        let feedback = match session.name_error() {
            Some(message) => Line::from(Span::styled(
                message.to_string(),
                Style::default().fg(Color::Red),
            )),
            None => Line::from(""),
        };

        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                "Snake Game",
                Style::default()
                    .fg(Color::Magenta)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Enter your name to start playing!",
                Style::default().fg(Color::Gray),
            )),
            Line::from(""),
            Line::from(field),
            feedback,
            Line::from(""),
            Line::from(vec![
                Span::styled("Enter", Style::default().fg(Color::Green)),
                Span::raw(" to start | "),
                Span::styled("Esc", Style::default().fg(Color::Red)),
                Span::raw(" to quit"),
            ]),
        ];

        let form = Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(Color::Magenta)),
        );

        frame.render_widget(Clear, area);
        frame.render_widget(form, area);
    }

    fn render_game(&self, frame: &mut Frame, session: &Session, phase: Phase) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2), // Title and player
                Constraint::Length(1), // Score bar
                Constraint::Min(0),    // Board
                Constraint::Length(1), // Controls
            ])
            .split(frame.area());

        let compact = is_compact(frame.area().width);

        frame.render_widget(self.render_header(session), chunks[0]);
        frame.render_widget(self.render_stats(session), chunks[1]);

        let state = session.state();
        let cell_width = cell_width_for(chunks[2].width, state.grid_size);
        let board_area = centered_rect(
            (state.grid_size * cell_width + 2) as u16,
            (state.grid_size + 2) as u16,
            chunks[2],
        );
        frame.render_widget(self.render_grid(state, cell_width), board_area);

        if let Some(overlay) = self.render_overlay(phase, compact) {
            let overlay_area = centered_rect(board_area.width.saturating_sub(2).max(1), 5, board_area);
            frame.render_widget(Clear, overlay_area);
            frame.render_widget(overlay, overlay_area);
        }

        frame.render_widget(self.render_controls(compact), chunks[3]);
    }

    fn render_header(&self, session: &Session) -> Paragraph<'_> {
        let player = session.player().map(|p| p.as_str()).unwrap_or_default();
        let text = vec![
            Line::from(Span::styled(
                "Snake Game",
                Style::default()
                    .fg(Color::Magenta)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(vec![
                Span::styled("Player: ", Style::default().fg(Color::Gray)),
                Span::styled(player.to_string(), Style::default().fg(Color::White)),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_stats(&self, session: &Session) -> Paragraph<'_> {
        let text = vec![Line::from(vec![
            Span::styled("Score: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                session.state().score.to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("High Score: ", Style::default().fg(Color::Red)),
            Span::styled(
                session.high_score().to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("Time: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                session.metrics().format_time(),
                Style::default().fg(Color::White),
            ),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_grid(&self, state: &GameState, cell_width: usize) -> Paragraph<'_> {
        let pad = if cell_width > 1 { " " } else { "" };
        let head = state.snake.head();
        let mut lines = Vec::with_capacity(state.grid_size);

        for y in 0..state.grid_size {
            let mut spans = Vec::with_capacity(state.grid_size);

            for x in 0..state.grid_size {
                let pos = Position::new(x as i32, y as i32);

                let cell = if pos == head {
                    Span::styled(
                        format!("■{pad}"),
                        Style::default()
                            .fg(Color::LightGreen)
                            .add_modifier(Modifier::BOLD),
                    )
                } else if state.snake.contains(pos) {
                    Span::styled(format!("□{pad}"), Style::default().fg(Color::Green))
                } else if pos == state.food {
                    Span::styled(
                        format!("●{pad}"),
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    )
                } else {
                    Span::styled(format!(".{pad}"), Style::default().fg(Color::DarkGray))
                };

                spans.push(cell);
            }

            lines.push(Line::from(spans));
        }

        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Thick)
                .border_style(Style::default().fg(Color::Gray)),
        )
    }

    fn render_overlay(&self, phase: Phase, compact: bool) -> Option<Paragraph<'static>> {
        let (title, hint, color) = match phase {
            Phase::GameOver(EndReason::BoardFilled) => (
                "Board cleared!",
                if compact { "Tap to restart" } else { "Press Enter to restart" },
                Color::Green,
            ),
            Phase::GameOver(_) => (
                "Game Over!",
                if compact { "Tap to restart" } else { "Press Enter to restart" },
                Color::Red,
            ),
            Phase::Paused => (
                "Paused",
                if compact { "Tap to continue" } else { "Press Space to continue" },
                Color::Yellow,
            ),
            Phase::Running | Phase::NameEntry => return None,
        };

        let text = vec![
            Line::from(Span::styled(
                title,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(hint, Style::default().fg(Color::Gray))),
        ];

        Some(
            Paragraph::new(text).alignment(Alignment::Center).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(color)),
            ),
        )
    }

    fn render_controls(&self, compact: bool) -> Paragraph<'_> {
        let text = if compact {
            Line::from(vec![
                Span::styled("Swipe", Style::default().fg(Color::Cyan)),
                Span::raw(" to move | "),
                Span::styled("Tap", Style::default().fg(Color::Cyan)),
                Span::raw(" to pause"),
            ])
        } else {
            Line::from(vec![
                Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
                Span::raw(" or "),
                Span::styled("WASD", Style::default().fg(Color::Cyan)),
                Span::raw(" to move | "),
                Span::styled("Space", Style::default().fg(Color::Cyan)),
                Span::raw(" to pause | "),
                Span::styled("Q", Style::default().fg(Color::Red)),
                Span::raw(" to quit"),
            ])
        };

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}
