//! # StatusBar Component
//!
//! Footer under every screen. Shows, in priority order:
//!
//! 1. **Error**: the last failure, in red, until the next key press
//! 2. **Status**: the result of the last completed command
//! 3. **Key help**: short hints for the current screen, or the full list
//!    when help is toggled with `?`
//!
//! The right edge carries the last time the project set was loaded.

use chrono::{DateTime, Local};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::core::state::Screen;
use crate::tui::component::Component;

pub struct StatusBar<'a> {
    pub screen: Screen,
    pub status_message: &'a str,
    pub error: Option<&'a str>,
    pub last_synced: Option<DateTime<Local>>,
    pub show_help: bool,
}

impl StatusBar<'_> {
    /// Rows needed for the given screen and help state.
    pub fn height(screen: Screen, show_help: bool) -> u16 {
        if show_help {
            1 + (help_lines(screen).len() as u16).max(1)
        } else {
            2
        }
    }
}

fn short_help(screen: Screen) -> &'static str {
    match screen {
        Screen::ProjectsList => "↑/↓ move · enter edit · v variables · a add · d delete · p pull · ? help · q quit",
        Screen::VariablesList => "↑/↓ move · enter edit · a add · d delete · s save · q back · ? help",
        Screen::CreateProjectForm
        | Screen::EditProjectForm
        | Screen::CreateVariableForm
        | Screen::EditVariableForm => "enter next · esc cancel",
        Screen::Confirm => "←/→ choose · enter confirm · esc cancel",
        Screen::Loading => "q quit",
    }
}

fn help_lines(screen: Screen) -> &'static [&'static str] {
    match screen {
        Screen::ProjectsList => &[
            "↑/k ↓/j   move selection",
            "enter/e   edit project",
            "v         edit variables",
            "a         add project",
            "d         delete project",
            "p / P     pull selected / pull all to disk",
            "r         reload from store",
            "q ctrl+c  quit",
        ],
        Screen::VariablesList => &[
            "↑/k ↓/j   move selection",
            "enter/e   edit variable",
            "a         add variable",
            "d         delete variable",
            "s         save variables again",
            "q esc     back to projects",
        ],
        _ => &[],
    }
}

impl Component for StatusBar<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let [message_area, rest] =
            Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(area);

        let synced = self
            .last_synced
            .map(|t| format!("synced {}", t.format("%H:%M:%S")))
            .unwrap_or_default();
        let [left, right] = Layout::horizontal([
            Constraint::Min(0),
            Constraint::Length(synced.chars().count() as u16 + 1),
        ])
        .areas(message_area);

        let message = match self.error {
            Some(err) => Line::from(Span::styled(
                format!("✗ {err}"),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )),
            None => Line::from(Span::styled(
                self.status_message,
                Style::default().fg(Color::Gray),
            )),
        };
        frame.render_widget(Paragraph::new(message), left);
        frame.render_widget(
            Paragraph::new(Span::styled(synced, Style::default().fg(Color::DarkGray))),
            right,
        );

        let muted = Style::default().fg(Color::DarkGray);
        let help: Vec<Line> = if self.show_help && !help_lines(self.screen).is_empty() {
            help_lines(self.screen)
                .iter()
                .map(|l| Line::styled(*l, muted))
                .collect()
        } else {
            vec![Line::styled(short_help(self.screen), muted)]
        };
        frame.render_widget(Paragraph::new(help), rest);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::components::buffer_text;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn render(bar: &mut StatusBar, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, height)).unwrap();
        terminal.draw(|f| bar.render(f, f.area())).unwrap();
        buffer_text(&terminal)
    }

    #[test]
    fn test_error_wins_over_status() {
        let mut bar = StatusBar {
            screen: Screen::ProjectsList,
            status_message: "Saved 'web'",
            error: Some("update project failed: project 'web' not found"),
            last_synced: None,
            show_help: false,
        };
        let text = render(&mut bar, 2);
        assert!(text.contains("not found"));
        assert!(!text.contains("Saved 'web'"));
        assert!(text.contains("q quit"));
    }

    #[test]
    fn test_full_help_lists_every_key() {
        let mut bar = StatusBar {
            screen: Screen::ProjectsList,
            status_message: "",
            error: None,
            last_synced: None,
            show_help: true,
        };
        let height = StatusBar::height(Screen::ProjectsList, true);
        let text = render(&mut bar, height);
        assert!(text.contains("reload from store"));
        assert!(text.contains("pull selected"));
    }

    #[test]
    fn test_shows_last_sync_time() {
        let mut bar = StatusBar {
            screen: Screen::ProjectsList,
            status_message: "2 projects",
            error: None,
            last_synced: Some(Local::now()),
            show_help: false,
        };
        assert!(render(&mut bar, 2).contains("synced "));
    }
}
