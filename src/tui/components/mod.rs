//! # TUI Components
//!
//! All UI components for the terminal interface. Every component is a
//! short-lived wrapper built each frame from borrowed `App` data ("props")
//! and drawn through the [`Component`](crate::tui::component::Component)
//! trait.
//!
//! ```text
//! components/
//! ├── mod.rs             (this file, shared layout helpers)
//! ├── banner.rs          (app name strip)
//! ├── project_table.rs   (ProjectsList)
//! ├── variable_table.rs  (VariablesList)
//! ├── form_view.rs       (project/variable forms and confirm dialogs)
//! ├── loading.rs         (spinner while a command is in flight)
//! └── status_bar.rs      (footer: status, errors, key help)
//! ```
//!
//! Components never reach into global state: everything they draw is passed
//! in, which keeps each one testable against a `TestBackend`.

use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Color;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub mod banner;
pub mod form_view;
pub mod loading;
pub mod project_table;
pub mod status_bar;
pub mod variable_table;

pub use banner::Banner;
pub use form_view::FormView;
pub use loading::LoadingView;
pub use project_table::ProjectTable;
pub use status_bar::StatusBar;
pub use variable_table::VariableTable;

/// Brand purple.
pub const ACCENT: Color = Color::Rgb(0x90, 0x8d, 0xfb);

/// Truncate a string to fit within `max_width` columns, adding "..." if needed.
pub fn truncate_str(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    if max_width <= 3 {
        return ".".repeat(max_width);
    }
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > max_width - 3 {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push_str("...");
    out
}

/// Compute a centered rect using percentage of the outer rect.
pub fn centered_rect(percent_x: u16, percent_y: u16, outer: Rect) -> Rect {
    let [_, center_v, _] = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .areas(outer);
    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .areas(center_v);
    center
}

#[cfg(test)]
pub(crate) fn buffer_text(terminal: &ratatui::Terminal<ratatui::backend::TestBackend>) -> String {
    terminal
        .backend()
        .buffer()
        .content()
        .iter()
        .map(|c| c.symbol())
        .collect()
}
