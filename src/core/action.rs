//! # Actions
//!
//! Everything that can happen in a session becomes an `Action`. The operator
//! pressed a key? That's `Action::Input(..)`. The store answered? That's
//! `Action::ProjectCreated(..)` or `Action::CommandFailed(..)`.
//!
//! `update()` takes the current state and one action, mutates the state and
//! returns the `Command` to run next. No I/O happens here.
//!
//! ```text
//! State + Action  →  update()  →  New State + Command
//! ```
//!
//! Input is routed by the current screen through a flat dispatch table
//! (`match app.screen`). Completion messages are handled the same way on
//! every screen.

use std::collections::HashMap;
use std::time::Duration;

use chrono::Local;
use log::{debug, info, warn};

use crate::core::command::{Command, StoreOp};
use crate::core::error::AppError;
use crate::core::form::{
    CONFIRM_KEY, Form, PROJECT_FILE_KEY, PROJECT_FOLDER_KEY, PROJECT_NAME_KEY, VARIABLE_KEY_KEY,
    VARIABLE_VALUE_KEY,
};
use crate::core::input::Input;
use crate::core::project::Project;
use crate::core::state::{App, InFlight, PendingAction, PendingConfirmation, Screen};

/// Delay between spinner frames while `Loading`.
pub const SPINNER_INTERVAL: Duration = Duration::from_millis(80);

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Input(Input),
    SpinnerTick,
    /// Switch screens. Sent as the last step of a remote-work sequence.
    Navigate(Screen),
    ProjectsLoaded(HashMap<String, Project>),
    ProjectCreated(Project),
    ProjectUpdated(Project),
    ProjectDeleted(String),
    VariablesSaved(Project),
    ProjectsExported(usize),
    CommandFailed(AppError),
}

impl Action {
    pub fn is_failure(&self) -> bool {
        matches!(self, Action::CommandFailed(_))
    }
}

/// The command a fresh session runs: spin while the first fetch is in flight.
pub fn init_command(app: &mut App) -> Command {
    Command::batch(vec![
        start_spinner(app),
        Command::sequence(vec![
            Command::store(StoreOp::LoadAll),
            Command::emit(Action::Navigate(Screen::ProjectsList)),
        ]),
    ])
}

pub fn update(app: &mut App, action: Action) -> Command {
    match action {
        Action::Input(input) => {
            // Failures are shown until the operator does something else.
            if !app.is_loading() {
                app.error = None;
            }
            match app.screen {
                Screen::ProjectsList => projects_list(app, input),
                Screen::CreateProjectForm | Screen::EditProjectForm => project_form(app, input),
                Screen::VariablesList => variables_list(app, input),
                Screen::CreateVariableForm | Screen::EditVariableForm => {
                    variable_form(app, input)
                }
                Screen::Loading => loading(app, input),
                Screen::Confirm => confirm(app, input),
            }
        }
        Action::SpinnerTick => {
            if app.is_loading() {
                app.spinner_frame = app.spinner_frame.wrapping_add(1);
                Command::Tick(SPINNER_INTERVAL)
            } else {
                app.spinner_running = false;
                Command::None
            }
        }
        Action::Navigate(screen) => {
            navigate(app, screen);
            Command::None
        }
        Action::ProjectsLoaded(projects) => {
            info!("Loaded {} projects", projects.len());
            app.cache.replace_all(projects);
            app.last_synced = Some(Local::now());
            app.status_message = format!("{} projects", app.cache.len());
            app.clamp_cursors();
            Command::None
        }
        Action::ProjectCreated(project) => {
            info!("Created project '{}'", project.name);
            app.status_message = if app.cache.contains(&project.name) {
                warn!("Create overwrote existing project '{}'", project.name);
                format!("Overwrote existing project '{}'", project.name)
            } else {
                format!("Created '{}'", project.name)
            };
            app.cache.upsert(&project.name.clone(), project);
            Command::None
        }
        Action::ProjectUpdated(project) => {
            info!("Updated project '{}'", project.name);
            app.status_message = format!("Saved '{}'", project.name);
            app.cache.upsert(&project.name.clone(), project);
            Command::None
        }
        Action::ProjectDeleted(name) => {
            info!("Deleted project '{}'", name);
            app.cache.remove(&name);
            app.status_message = format!("Deleted '{}'", name);
            app.clamp_cursors();
            Command::None
        }
        Action::VariablesSaved(project) => {
            info!(
                "Saved {} variables for '{}'",
                project.variables.len(),
                project.name
            );
            app.status_message = format!("Saved variables for '{}'", project.name);
            app.unsaved = false;
            if app.draft.is_some() {
                app.draft = Some(project.clone());
            }
            app.cache.upsert(&project.name.clone(), project);
            app.clamp_cursors();
            Command::None
        }
        Action::ProjectsExported(count) => {
            info!("Exported {} projects", count);
            app.status_message = format!("Exported {count} project(s)");
            Command::None
        }
        Action::CommandFailed(err) => {
            fail(app, err);
            Command::None
        }
    }
}

// ============================================================================
// Screen handlers
// ============================================================================

fn projects_list(app: &mut App, input: Input) -> Command {
    match input {
        Input::Char('q') | Input::Interrupt => Command::Quit,
        Input::Up | Input::Char('k') => {
            app.project_cursor = app.project_cursor.saturating_sub(1);
            Command::None
        }
        Input::Down | Input::Char('j') => {
            if app.project_cursor + 1 < app.cache.len() {
                app.project_cursor += 1;
            }
            Command::None
        }
        Input::Enter | Input::Char('e') => {
            let Some(selected) = app.selected_project().cloned() else {
                return Command::None;
            };
            app.form = Some(Form::project(&selected, false));
            app.draft = Some(selected);
            app.screen = Screen::EditProjectForm;
            Command::None
        }
        Input::Char('a') => {
            let draft = Project::default();
            app.form = Some(Form::project(&draft, true));
            app.draft = Some(draft);
            app.screen = Screen::CreateProjectForm;
            Command::None
        }
        Input::Char('v') => {
            let Some(selected) = app.selected_project().cloned() else {
                return Command::None;
            };
            app.draft = Some(selected);
            app.variable_cursor = 0;
            app.unsaved = false;
            app.screen = Screen::VariablesList;
            Command::None
        }
        Input::Char('d') => {
            let Some(name) = app.selected_project().map(|p| p.name.clone()) else {
                return Command::None;
            };
            raise_confirmation(
                app,
                "Are you sure you want to delete",
                format!("Project '{name}'"),
                PendingAction::DeleteProject(name),
                Screen::ProjectsList,
            );
            Command::None
        }
        Input::Char('p') => {
            let Some(selected) = app.selected_project().cloned() else {
                return Command::None;
            };
            begin_export(app, vec![selected])
        }
        Input::Char('P') => {
            if app.cache.is_empty() {
                return Command::None;
            }
            let all = app.cache.all().into_iter().cloned().collect();
            begin_export(app, all)
        }
        Input::Char('r') => begin_remote(app, StoreOp::LoadAll, Screen::ProjectsList),
        Input::Char('?') => {
            app.show_help = !app.show_help;
            Command::None
        }
        _ => Command::None,
    }
}

fn project_form(app: &mut App, input: Input) -> Command {
    let Some(form) = app.form.as_mut() else {
        navigate(app, Screen::ProjectsList);
        return Command::None;
    };
    if !form.update(&input) {
        return Command::None;
    }

    if !form.get_bool(CONFIRM_KEY) {
        debug!("Project form declined");
        navigate(app, Screen::ProjectsList);
        return Command::None;
    }

    let is_new = app.screen == Screen::CreateProjectForm;
    let folder = form.get_string(PROJECT_FOLDER_KEY).unwrap_or_default().to_string();
    let file = form.get_string(PROJECT_FILE_KEY).unwrap_or_default().to_string();
    let name = form.get_string(PROJECT_NAME_KEY).map(str::to_string);

    let draft = app.draft.get_or_insert_with(Project::default);
    if is_new {
        draft.name = name.unwrap_or_default();
    }
    draft.target_folder = folder;
    draft.file_name = file;

    let op = if is_new {
        StoreOp::Create(draft.clone())
    } else {
        StoreOp::Update(draft.clone())
    };
    begin_remote(app, op, Screen::ProjectsList)
}

fn variables_list(app: &mut App, input: Input) -> Command {
    match input {
        Input::Char('q') | Input::Esc | Input::Interrupt => {
            navigate(app, Screen::ProjectsList);
            Command::None
        }
        Input::Up | Input::Char('k') => {
            app.variable_cursor = app.variable_cursor.saturating_sub(1);
            Command::None
        }
        Input::Down | Input::Char('j') => {
            if app.variable_cursor + 1 < app.variable_count() {
                app.variable_cursor += 1;
            }
            Command::None
        }
        Input::Char('a') => {
            app.editing_key = None;
            app.form = Some(Form::variable("", "", true));
            app.screen = Screen::CreateVariableForm;
            Command::None
        }
        Input::Enter | Input::Char('e') => {
            let Some((key, value)) = app.selected_variable() else {
                return Command::None;
            };
            app.form = Some(Form::variable(&key, &value, false));
            app.editing_key = Some(key);
            app.screen = Screen::EditVariableForm;
            Command::None
        }
        Input::Char('d') => {
            let Some((key, _)) = app.selected_variable() else {
                return Command::None;
            };
            raise_confirmation(
                app,
                "Are you sure you want to delete",
                format!("Variable: {key}"),
                PendingAction::DeleteVariable(key),
                Screen::VariablesList,
            );
            Command::None
        }
        Input::Char('s') => match app.draft.clone() {
            Some(draft) => begin_remote(app, StoreOp::SaveVariables(draft), Screen::VariablesList),
            None => Command::None,
        },
        Input::Char('?') => {
            app.show_help = !app.show_help;
            Command::None
        }
        _ => Command::None,
    }
}

fn variable_form(app: &mut App, input: Input) -> Command {
    let Some(form) = app.form.as_mut() else {
        navigate(app, Screen::VariablesList);
        return Command::None;
    };
    if !form.update(&input) {
        return Command::None;
    }

    if !form.get_bool(CONFIRM_KEY) {
        debug!("Variable form declined");
        navigate(app, Screen::VariablesList);
        return Command::None;
    }

    let key = form.get_string(VARIABLE_KEY_KEY).unwrap_or_default().to_string();
    let value = form.get_string(VARIABLE_VALUE_KEY).unwrap_or_default().to_string();
    let original = app.editing_key.take();

    let Some(draft) = app.draft.as_mut() else {
        warn!("Variable form completed without a draft");
        navigate(app, Screen::ProjectsList);
        return Command::None;
    };
    match original {
        Some(original) if app.screen == Screen::EditVariableForm => {
            draft.rename_variable(&original, &key, value)
        }
        _ => draft.set_variable(key, value),
    }

    let op = StoreOp::SaveVariables(draft.clone());
    begin_remote(app, op, Screen::VariablesList)
}

fn loading(_app: &mut App, input: Input) -> Command {
    match input {
        Input::Char('q') | Input::Interrupt => Command::Quit,
        _ => Command::None,
    }
}

fn confirm(app: &mut App, input: Input) -> Command {
    let Some(form) = app.form.as_mut() else {
        navigate(app, Screen::ProjectsList);
        return Command::None;
    };
    if !form.update(&input) {
        return Command::None;
    }

    let accepted = form.get_bool(CONFIRM_KEY);
    app.form = None;
    let Some(pending) = app.pending.take() else {
        warn!("Confirmation completed with nothing pending");
        navigate(app, Screen::ProjectsList);
        return Command::None;
    };

    // Both outcomes start from the screen that raised the dialog, so a
    // failed delete lands back there too.
    app.screen = pending.resume;
    if !accepted {
        debug!("Declined {:?}", pending.action);
        return Command::None;
    }

    let then = pending.action.resume_on_accept();
    match pending.action {
        PendingAction::DeleteProject(name) => begin_remote(app, StoreOp::Delete(name), then),
        PendingAction::DeleteVariable(key) => {
            let Some(draft) = app.draft.as_mut() else {
                warn!("Variable delete accepted without a draft");
                navigate(app, Screen::ProjectsList);
                return Command::None;
            };
            draft.remove_variable(&key);
            let op = StoreOp::SaveVariables(draft.clone());
            begin_remote(app, op, then)
        }
    }
}

// ============================================================================
// Transitions
// ============================================================================

fn navigate(app: &mut App, screen: Screen) {
    debug!("Navigate {:?} -> {:?}", app.screen, screen);
    app.screen = screen;
    app.in_flight = None;
    app.form = None;
    app.editing_key = None;
    app.pending = None;
    if !screen.is_project_scoped() {
        app.draft = None;
        app.unsaved = false;
    }
    app.clamp_cursors();
}

fn raise_confirmation(
    app: &mut App,
    message: &str,
    detail: String,
    action: PendingAction,
    resume: Screen,
) {
    app.form = Some(Form::confirmation(message, &detail));
    app.pending = Some(PendingConfirmation {
        message: message.to_string(),
        detail,
        action,
        resume,
    });
    app.screen = Screen::Confirm;
}

fn start_spinner(app: &mut App) -> Command {
    if app.spinner_running {
        return Command::None;
    }
    app.spinner_running = true;
    Command::Tick(SPINNER_INTERVAL)
}

/// Show `Loading`, run `op`, then land on `then`. The screen that was
/// active is remembered so a failure can put the operator back there.
fn begin_remote(app: &mut App, op: StoreOp, then: Screen) -> Command {
    let resume = resume_screen(app);
    info!("Dispatching {} (resume={:?}, then={:?})", op.name(), resume, then);
    app.in_flight = Some(InFlight {
        operation: op.name(),
        resume,
    });
    app.screen = Screen::Loading;
    app.form = None;
    Command::batch(vec![
        start_spinner(app),
        Command::sequence(vec![
            Command::store(op),
            Command::emit(Action::Navigate(then)),
        ]),
    ])
}

fn begin_export(app: &mut App, projects: Vec<Project>) -> Command {
    info!("Dispatching export of {} projects", projects.len());
    app.in_flight = Some(InFlight {
        operation: "export",
        resume: Screen::ProjectsList,
    });
    app.screen = Screen::Loading;
    Command::batch(vec![
        start_spinner(app),
        Command::sequence(vec![
            Command::Export(projects),
            Command::emit(Action::Navigate(Screen::ProjectsList)),
        ]),
    ])
}

/// Confirmation dialogs are transient: a failure returns to whatever
/// raised them.
fn resume_screen(app: &App) -> Screen {
    match app.screen {
        Screen::Confirm => app
            .pending
            .as_ref()
            .map_or(Screen::ProjectsList, |p| p.resume),
        Screen::Loading => Screen::ProjectsList,
        other => other,
    }
}

/// Put the operator back where the failed command started, keeping the
/// cache and the draft untouched.
fn fail(app: &mut App, err: AppError) {
    warn!("Command failed: {}", err);
    let resume = app
        .in_flight
        .take()
        .map_or(Screen::ProjectsList, |f| f.resume);
    app.error = Some(err.to_string());
    app.screen = resume;
    app.pending = None;
    app.editing_key = None;

    match resume {
        Screen::CreateProjectForm | Screen::EditProjectForm => {
            let is_new = resume == Screen::CreateProjectForm;
            let draft = app.draft.get_or_insert_with(Project::default);
            app.form = Some(Form::project(draft, is_new));
        }
        Screen::CreateVariableForm | Screen::EditVariableForm | Screen::VariablesList => {
            // The variable edit already landed in the draft; keep it and
            // let the operator retry with `s`.
            app.screen = Screen::VariablesList;
            app.form = None;
            app.unsaved = app.draft.is_some();
        }
        _ => {
            app.form = None;
            if !resume.is_project_scoped() {
                app.draft = None;
            }
        }
    }
    app.clamp_cursors();
}
