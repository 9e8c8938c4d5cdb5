//! # Application State
//!
//! Everything the session knows, in one place. The controller (`action.rs`)
//! is the only writer; the TUI only reads it to render.
//!
//! ```text
//! App
//! ├── screen: Screen                    // which handler receives input
//! ├── cache: ProjectCache               // last acknowledged remote state
//! ├── draft: Option<Project>            // working copy, project-scoped screens only
//! ├── form: Option<Form>                // active form or confirmation dialog
//! ├── pending: Option<PendingConfirmation>
//! ├── editing_key: Option<String>       // original key while editing a variable
//! ├── in_flight: Option<InFlight>       // the one outstanding remote command
//! ├── project_cursor / variable_cursor  // selected rows
//! ├── error: Option<String>             // failure shown in place
//! ├── status_message: String
//! ├── unsaved: bool                     // draft differs from the cache after a failed save
//! ├── spinner_frame / spinner_running
//! ├── show_help: bool
//! └── last_synced: Option<DateTime<Local>>
//! ```

use chrono::{DateTime, Local};

use crate::core::cache::ProjectCache;
use crate::core::form::Form;
use crate::core::project::Project;

/// Screens the session can be on. Each has exactly one input handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    ProjectsList,
    CreateProjectForm,
    EditProjectForm,
    VariablesList,
    CreateVariableForm,
    EditVariableForm,
    Loading,
    Confirm,
}

impl Screen {
    /// Screens that operate on the draft.
    pub fn is_project_scoped(self) -> bool {
        matches!(
            self,
            Screen::CreateProjectForm
                | Screen::EditProjectForm
                | Screen::VariablesList
                | Screen::CreateVariableForm
                | Screen::EditVariableForm
        )
    }
}

/// What a confirmation will do when accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingAction {
    DeleteProject(String),
    DeleteVariable(String),
}

impl PendingAction {
    /// Where the session lands after the accepted action completes.
    pub fn resume_on_accept(&self) -> Screen {
        match self {
            PendingAction::DeleteProject(_) => Screen::ProjectsList,
            PendingAction::DeleteVariable(_) => Screen::VariablesList,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingConfirmation {
    pub message: String,
    pub detail: String,
    pub action: PendingAction,
    /// Screen restored when the operator declines.
    pub resume: Screen,
}

/// The remote command currently running on behalf of the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InFlight {
    pub operation: &'static str,
    /// Screen restored if the command fails.
    pub resume: Screen,
}

#[derive(Debug)]
pub struct App {
    pub screen: Screen,
    pub cache: ProjectCache,
    pub draft: Option<Project>,
    pub form: Option<Form>,
    pub pending: Option<PendingConfirmation>,
    pub editing_key: Option<String>,
    pub in_flight: Option<InFlight>,
    pub project_cursor: usize,
    pub variable_cursor: usize,
    pub error: Option<String>,
    pub status_message: String,
    pub unsaved: bool,
    pub spinner_frame: usize,
    pub spinner_running: bool,
    pub show_help: bool,
    pub last_synced: Option<DateTime<Local>>,
}

impl App {
    /// A fresh session starts in `Loading`, waiting on the first full fetch.
    pub fn new() -> Self {
        Self {
            screen: Screen::Loading,
            cache: ProjectCache::new(),
            draft: None,
            form: None,
            pending: None,
            editing_key: None,
            in_flight: Some(InFlight {
                operation: "load projects",
                resume: Screen::ProjectsList,
            }),
            project_cursor: 0,
            variable_cursor: 0,
            error: None,
            status_message: String::from("Connecting..."),
            unsaved: false,
            spinner_frame: 0,
            spinner_running: false,
            show_help: false,
            last_synced: None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.screen == Screen::Loading
    }

    pub fn selected_project(&self) -> Option<&Project> {
        self.cache.nth(self.project_cursor)
    }

    /// `(key, value)` under the variables cursor, read from the draft.
    pub fn selected_variable(&self) -> Option<(String, String)> {
        let draft = self.draft.as_ref()?;
        draft
            .sorted_variables()
            .get(self.variable_cursor)
            .map(|(k, v)| (k.to_string(), v.to_string()))
    }

    pub fn variable_count(&self) -> usize {
        self.draft.as_ref().map_or(0, |d| d.variables.len())
    }

    /// Keeps both cursors inside their lists after the lists shrink.
    pub fn clamp_cursors(&mut self) {
        self.project_cursor = self.project_cursor.min(self.cache.len().saturating_sub(1));
        self.variable_cursor = self.variable_cursor.min(self.variable_count().saturating_sub(1));
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_new_defaults() {
        let app = App::new();
        assert_eq!(app.screen, Screen::Loading);
        assert!(app.draft.is_none());
        assert!(app.cache.is_empty());
        assert_eq!(
            app.in_flight.as_ref().map(|f| f.resume),
            Some(Screen::ProjectsList)
        );
    }

    #[test]
    fn test_selected_variable_follows_sorted_order() {
        let mut app = App::new();
        app.draft = Some(
            Project::new("web", "/w", ".env")
                .with_variable("B", "2")
                .with_variable("A", "1"),
        );
        app.variable_cursor = 1;
        assert_eq!(app.selected_variable(), Some(("B".to_string(), "2".to_string())));
    }

    #[test]
    fn test_clamp_cursors_on_empty_lists() {
        let mut app = App::new();
        app.project_cursor = 5;
        app.variable_cursor = 3;
        app.clamp_cursors();
        assert_eq!(app.project_cursor, 0);
        assert_eq!(app.variable_cursor, 0);
    }
}
