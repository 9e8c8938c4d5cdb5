//! # LoadingView Component
//!
//! Spinner plus the name of the command in flight. The frame counter is
//! advanced by `Action::SpinnerTick`, so the animation stops as soon as the
//! session leaves `Loading`.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::component::Component;
use crate::tui::components::ACCENT;

const FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub struct LoadingView<'a> {
    pub operation: &'a str,
    pub frame: usize,
}

impl<'a> LoadingView<'a> {
    pub fn new(operation: &'a str, frame: usize) -> Self {
        Self { operation, frame }
    }
}

impl Component for LoadingView<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let [_, middle, _] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Fill(1),
        ])
        .areas(area);

        let line = Line::from(vec![
            Span::styled(FRAMES[self.frame % FRAMES.len()], Style::default().fg(ACCENT)),
            Span::raw(" "),
            Span::styled(
                format!("{}...", capitalize(self.operation)),
                Style::default().fg(Color::Gray),
            ),
        ]);
        frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), middle);
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
