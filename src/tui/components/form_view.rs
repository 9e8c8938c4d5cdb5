//! # FormView Component
//!
//! Draws a [`Form`]: text fields as labelled inputs with a cursor on the
//! focused one, and the confirm field as a `[Yes] No` toggle. Confirmation
//! dialogs use the same component in a centered overlay.

use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph, Wrap};
use unicode_width::UnicodeWidthStr;

use crate::core::form::{FieldKind, Form};
use crate::tui::component::Component;
use crate::tui::components::{ACCENT, centered_rect};

pub struct FormView<'a> {
    pub form: &'a Form,
    /// Draw as a centered overlay on top of whatever is behind it.
    pub overlay: bool,
}

impl<'a> FormView<'a> {
    pub fn new(form: &'a Form) -> Self {
        Self {
            form,
            overlay: false,
        }
    }

    pub fn overlay(form: &'a Form) -> Self {
        Self {
            form,
            overlay: true,
        }
    }

    fn lines(&self) -> (Vec<Line<'a>>, Option<(u16, u16)>) {
        let focused = Style::default().fg(ACCENT).add_modifier(Modifier::BOLD);
        let muted = Style::default().fg(Color::DarkGray);
        let mut lines = Vec::new();
        let mut cursor = None;

        for (i, field) in self.form.fields().iter().enumerate() {
            let is_focused = i == self.form.focus();
            let marker = if is_focused { "┃ " } else { "  " };
            let title_style = if is_focused { focused } else { Style::default() };
            lines.push(Line::from(vec![
                Span::styled(marker, focused),
                Span::styled(field.title.as_str(), title_style),
            ]));
            if let Some(description) = &field.description {
                lines.push(Line::from(vec![
                    Span::styled(marker, focused),
                    Span::styled(description.as_str(), muted),
                ]));
            }

            match &field.kind {
                FieldKind::Text { value, cursor: at } => {
                    if is_focused {
                        let col = 4 + value[..*at].width() as u16;
                        cursor = Some((col, lines.len() as u16));
                    }
                    lines.push(Line::from(vec![
                        Span::styled(marker, focused),
                        Span::styled("> ", muted),
                        Span::raw(value.as_str()),
                    ]));
                }
                FieldKind::Confirm {
                    value,
                    affirmative,
                    negative,
                } => {
                    let on = Style::default()
                        .fg(Color::Black)
                        .bg(ACCENT)
                        .add_modifier(Modifier::BOLD);
                    let (yes, no) = if *value { (on, muted) } else { (muted, on) };
                    lines.push(Line::from(vec![
                        Span::styled(marker, focused),
                        Span::styled(format!(" {affirmative} "), yes),
                        Span::raw("  "),
                        Span::styled(format!(" {negative} "), no),
                    ]));
                }
            }
            lines.push(Line::default());
        }

        lines.push(Line::styled(
            "enter next · shift+tab back · ←/→ toggle · esc cancel",
            muted,
        ));
        (lines, cursor)
    }
}

impl Component for FormView<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let area = if self.overlay {
            let dialog = centered_rect(60, 40, area);
            frame.render_widget(Clear, dialog);
            dialog
        } else {
            area
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(ACCENT))
            .title(format!(" {} ", self.form.title))
            .padding(Padding::horizontal(1));
        let inner = block.inner(area);

        let (lines, cursor) = self.lines();
        frame.render_widget(
            Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
            area,
        );

        if let Some((x, y)) = cursor {
            let pos = Position::new(inner.x + x, inner.y + y);
            if inner.contains(pos) {
                frame.set_cursor_position(pos);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::project::Project;
    use crate::tui::components::buffer_text;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    #[test]
    fn test_project_form_renders_fields() {
        let form = Form::project(&Project::new("web", "/srv/web", ".env"), false);
        let mut terminal = Terminal::new(TestBackend::new(80, 16)).unwrap();
        terminal
            .draw(|f| FormView::new(&form).render(f, f.area()))
            .unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("Editing Project"));
        assert!(text.contains("Target Folder"));
        assert!(text.contains("/srv/web"));
        assert!(text.contains("Confirm Changes"));
        assert!(!text.contains("Project Name"));
    }

    #[test]
    fn test_confirmation_overlay_shows_message_and_detail() {
        let form = Form::confirmation("Are you sure you want to delete", "Project 'web'");
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal
            .draw(|f| FormView::overlay(&form).render(f, f.area()))
            .unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("Are you sure you want to delete"));
        assert!(text.contains("Project 'web'"));
        assert!(text.contains("Yes"));
        assert!(text.contains("No"));
    }
}
