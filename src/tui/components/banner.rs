//! # Banner Component
//!
//! The app name in the brand color, with the active screen as a subtitle.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::component::Component;
use crate::tui::components::ACCENT;

pub struct Banner<'a> {
    pub subtitle: &'a str,
}

impl<'a> Banner<'a> {
    pub fn new(subtitle: &'a str) -> Self {
        Self { subtitle }
    }
}

impl Component for Banner<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![Span::styled(
            " venom ",
            Style::default()
                .fg(Color::Black)
                .bg(ACCENT)
                .add_modifier(Modifier::BOLD),
        )];
        if !self.subtitle.is_empty() {
            spans.push(Span::raw("  "));
            spans.push(Span::styled(self.subtitle, Style::default().fg(ACCENT)));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::components::buffer_text;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    #[test]
    fn test_banner_shows_name_and_subtitle() {
        let mut terminal = Terminal::new(TestBackend::new(40, 1)).unwrap();
        terminal
            .draw(|f| Banner::new("Projects").render(f, f.area()))
            .unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("venom"));
        assert!(text.contains("Projects"));
    }
}
