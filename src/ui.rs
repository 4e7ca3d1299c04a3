use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::App;
use wrdl::score::LetterStatus;
use wrdl::{MAX_ATTEMPTS, WORD_LENGTH};

const KEY_ROWS: [&str; 3] = ["QWERTYUIOP", "ASDFGHJKL", "ZXCVBNM"];

fn status_colors(status: LetterStatus) -> (Color, Color) {
    match status {
        LetterStatus::Correct => (Color::Black, Color::Green),
        LetterStatus::Present => (Color::Black, Color::Yellow),
        LetterStatus::Absent => (Color::White, Color::DarkGray),
    }
}

fn tile_span(letter: Option<char>, status: Option<LetterStatus>) -> Span<'static> {
    let text = match letter {
        Some(c) => format!(" {c} "),
        None => " · ".to_string(),
    };
    let style = match (letter, status) {
        (_, Some(status)) => {
            let (fg, bg) = status_colors(status);
            Style::default().fg(fg).bg(bg).add_modifier(Modifier::BOLD)
        }
        (Some(_), None) => Style::default().add_modifier(Modifier::BOLD),
        (None, None) => Style::default().add_modifier(Modifier::DIM),
    };
    Span::styled(text, style)
}

fn key_span(key: char, hint: Option<LetterStatus>) -> Span<'static> {
    let style = match hint {
        Some(status) => {
            let (fg, bg) = status_colors(status);
            Style::default().fg(fg).bg(bg)
        }
        None => Style::default().add_modifier(Modifier::DIM),
    };
    Span::styled(format!(" {key} "), style)
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let game = &self.game;

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .vertical_margin(1)
            .constraints(
                [
                    Constraint::Length(MAX_ATTEMPTS as u16 + 1), // board
                    Constraint::Length(2),                       // transient message
                    Constraint::Length(4),                       // keyboard
                    Constraint::Min(0),                          // outcome / help
                ]
                .as_ref(),
            )
            .split(area);

        self.render_board(chunks[0], buf);
        self.render_message(chunks[1], buf);
        self.render_keyboard(chunks[2], buf);

        if game.outcome().is_some() {
            self.render_outcome(chunks[3], buf);
        } else {
            let help = Paragraph::new(Span::styled(
                "type a word · enter to submit · backspace to erase · esc to leave",
                Style::default()
                    .add_modifier(Modifier::ITALIC)
                    .add_modifier(Modifier::DIM),
            ))
            .alignment(Alignment::Center);
            help.render(chunks[3], buf);
        }
    }
}

impl App {
    fn render_board(&self, area: Rect, buf: &mut Buffer) {
        let game = &self.game;
        let lines: Vec<Line> = (0..MAX_ATTEMPTS)
            .map(|row| {
                let spans: Vec<Span> = (0..WORD_LENGTH)
                    .map(|col| {
                        tile_span(game.session().letter_at(row, col), game.status_at(row, col))
                    })
                    .collect();
                Line::from(spans)
            })
            .collect();

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .render(area, buf);
    }

    fn render_message(&self, area: Rect, buf: &mut Buffer) {
        let Some(message) = self.game.message() else {
            return;
        };
        // keep the toast on one line even in a narrow terminal
        let text = if message.width() > area.width as usize {
            message.chars().take(area.width as usize).collect()
        } else {
            message.to_string()
        };
        Paragraph::new(Span::styled(
            text,
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(area, buf);
    }

    fn render_keyboard(&self, area: Rect, buf: &mut Buffer) {
        let hints = self.game.hints();
        let lines: Vec<Line> = KEY_ROWS
            .iter()
            .map(|row| {
                let spans: Vec<Span> = row.chars().map(|key| key_span(key, hints.get(key))).collect();
                Line::from(spans)
            })
            .collect();

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .render(area, buf);
    }

    fn render_outcome(&self, area: Rect, buf: &mut Buffer) {
        let game = &self.game;
        let Some((title, detail)) = game.outcome() else {
            return;
        };
        let stats = game.stats();

        let mut lines = vec![
            Line::from(Span::styled(
                detail,
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::default(),
        ];
        for row in game.session().share_grid().lines() {
            lines.push(Line::from(row.to_string()));
        }
        lines.push(Line::default());
        lines.push(Line::from(format!(
            "played {} · win rate {}% · streak {} · best {}",
            stats.games_played,
            stats.win_rate(),
            stats.current_streak,
            stats.max_streak
        )));

        let recent = game.recent_games(5);
        if !recent.is_empty() {
            lines.push(Line::default());
            for record in recent {
                let result = if record.won {
                    format!("{}/{}", record.attempts_used, MAX_ATTEMPTS)
                } else {
                    "X".to_string()
                };
                lines.push(Line::from(Span::styled(
                    format!("{}  {}", record.target, result),
                    Style::default().add_modifier(Modifier::DIM),
                )));
            }
        }

        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            "(n)ew game · (esc)ape",
            Style::default().add_modifier(Modifier::ITALIC),
        )));

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::TOP).title(title))
            .render(area, buf);
    }
}
