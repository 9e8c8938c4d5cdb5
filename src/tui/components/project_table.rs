//! # ProjectTable Component
//!
//! The `ProjectsList` screen: one row per cached project, ordered by name.
//!
//! ```text
//! Project                        Folder               File                           Vars
//! api                            /srv/api             .env                              0
//! ▶ web                          /srv/web             .env                              3
//! ```

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Text;
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState};

use crate::core::project::Project;
use crate::tui::component::Component;
use crate::tui::components::{ACCENT, truncate_str};

const NAME_WIDTH: u16 = 30;
const FOLDER_WIDTH: u16 = 20;
const FILE_WIDTH: u16 = 30;
const VARS_WIDTH: u16 = 4;

pub struct ProjectTable<'a> {
    pub projects: Vec<&'a Project>,
    pub selected: usize,
    /// Rendered dimmed behind a dialog.
    pub dimmed: bool,
}

impl<'a> ProjectTable<'a> {
    pub fn new(projects: Vec<&'a Project>, selected: usize) -> Self {
        Self {
            projects,
            selected,
            dimmed: false,
        }
    }

    pub fn dimmed(mut self, dimmed: bool) -> Self {
        self.dimmed = dimmed;
        self
    }
}

impl Component for ProjectTable<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let border = if self.dimmed {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default().fg(ACCENT)
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(format!(" Projects ({}) ", self.projects.len()));

        if self.projects.is_empty() {
            let empty = Paragraph::new(Text::from("No projects yet. Press a to add one."))
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(empty, area);
            return;
        }

        let header = Row::new(["Project", "Folder", "File", "Vars"])
            .style(Style::default().add_modifier(Modifier::BOLD));

        let rows = self.projects.iter().map(|p| {
            Row::new(vec![
                Cell::from(truncate_str(&p.name, NAME_WIDTH as usize)),
                Cell::from(truncate_str(&p.target_folder, FOLDER_WIDTH as usize)),
                Cell::from(truncate_str(&p.file_name, FILE_WIDTH as usize)),
                Cell::from(Text::from(p.variables.len().to_string()).alignment(Alignment::Right)),
            ])
        });

        let highlight = if self.dimmed {
            Style::default().add_modifier(Modifier::DIM)
        } else {
            Style::default()
                .fg(Color::Black)
                .bg(ACCENT)
                .add_modifier(Modifier::BOLD)
        };

        let table = Table::new(
            rows,
            [
                Constraint::Length(NAME_WIDTH),
                Constraint::Length(FOLDER_WIDTH),
                Constraint::Length(FILE_WIDTH),
                Constraint::Length(VARS_WIDTH),
            ],
        )
        .header(header)
        .block(block)
        .row_highlight_style(highlight);

        let mut state = TableState::default().with_selected(Some(self.selected));
        frame.render_stateful_widget(table, area, &mut state);
    }
}
