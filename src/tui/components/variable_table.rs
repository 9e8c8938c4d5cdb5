//! # VariableTable Component
//!
//! The `VariablesList` screen for the draft project, rows sorted by key.
//! An `unsaved` draft (a save failed and has not been retried) is flagged in
//! the title.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Paragraph, Row, Table, TableState};

use crate::core::project::Project;
use crate::tui::component::Component;
use crate::tui::components::{ACCENT, truncate_str};

const KEY_WIDTH: u16 = 50;
const VALUE_WIDTH: u16 = 50;

pub struct VariableTable<'a> {
    pub project: &'a Project,
    pub selected: usize,
    pub unsaved: bool,
    pub dimmed: bool,
}

impl<'a> VariableTable<'a> {
    pub fn new(project: &'a Project, selected: usize, unsaved: bool) -> Self {
        Self {
            project,
            selected,
            unsaved,
            dimmed: false,
        }
    }

    pub fn dimmed(mut self, dimmed: bool) -> Self {
        self.dimmed = dimmed;
        self
    }
}

impl Component for VariableTable<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let mut title = format!(
            " {} · {}/{} ",
            self.project.name, self.project.target_folder, self.project.file_name
        );
        if self.unsaved {
            title.push_str("[unsaved] ");
        }
        let border = if self.dimmed {
            Style::default().fg(Color::DarkGray)
        } else if self.unsaved {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(ACCENT)
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(title);

        let vars = self.project.sorted_variables();
        if vars.is_empty() {
            let empty = Paragraph::new("No variables. Press a to add one.")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(empty, area);
            return;
        }

        let header =
            Row::new(["Key", "Value"]).style(Style::default().add_modifier(Modifier::BOLD));
        let rows = vars.into_iter().map(|(key, value)| {
            Row::new(vec![
                truncate_str(key, KEY_WIDTH as usize),
                truncate_str(value, VALUE_WIDTH as usize),
            ])
        });

        let table = Table::new(
            rows,
            [Constraint::Length(KEY_WIDTH), Constraint::Length(VALUE_WIDTH)],
        )
        .header(header)
        .block(block)
        .row_highlight_style(
            Style::default()
                .fg(Color::Black)
                .bg(ACCENT)
                .add_modifier(Modifier::BOLD),
        );

        let mut state = TableState::default().with_selected(Some(self.selected));
        frame.render_stateful_widget(table, area, &mut state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_project;
    use crate::tui::components::buffer_text;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn render(project: &Project, unsaved: bool) -> String {
        let mut terminal = Terminal::new(TestBackend::new(110, 6)).unwrap();
        terminal
            .draw(|f| VariableTable::new(project, 0, unsaved).render(f, f.area()))
            .unwrap();
        buffer_text(&terminal)
    }

    #[test]
    fn test_renders_sorted_variables() {
        let project = sample_project("web")
            .with_variable("PORT", "80")
            .with_variable("HOST", "localhost");
        let text = render(&project, false);
        let host = text.find("HOST").unwrap();
        let port = text.find("PORT").unwrap();
        assert!(host < port);
        assert!(text.contains("localhost"));
        assert!(!text.contains("[unsaved]"));
    }

    #[test]
    fn test_zero_rows_after_last_delete() {
        let text = render(&sample_project("web"), false);
        assert!(text.contains("No variables"));
        assert!(!text.contains("Key"));
    }

    #[test]
    fn test_unsaved_marker() {
        let project = sample_project("web").with_variable("A", "1");
        assert!(render(&project, true).contains("[unsaved]"));
    }
}
