use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};

use crate::core::state::{App, Screen};
use crate::tui::component::Component;
use crate::tui::components::{
    Banner, FormView, LoadingView, ProjectTable, StatusBar, VariableTable,
};

pub fn draw_ui(frame: &mut Frame, app: &App) {
    use Constraint::{Length, Min};
    let footer_height = StatusBar::height(app.screen, app.show_help);
    let layout = Layout::vertical([Length(1), Min(0), Length(footer_height)]);
    let [banner_area, main_area, footer_area] = layout.areas(frame.area());

    Banner::new(subtitle(app.screen)).render(frame, banner_area);

    match app.screen {
        Screen::ProjectsList => draw_projects(frame, main_area, app, false),
        Screen::VariablesList => draw_variables(frame, main_area, app, false),
        Screen::CreateProjectForm
        | Screen::EditProjectForm
        | Screen::CreateVariableForm
        | Screen::EditVariableForm => {
            if let Some(form) = &app.form {
                FormView::new(form).render(frame, main_area);
            }
        }
        Screen::Loading => {
            let operation = app.in_flight.as_ref().map_or("working", |f| f.operation);
            LoadingView::new(operation, app.spinner_frame).render(frame, main_area);
        }
        Screen::Confirm => {
            // The list that raised the dialog stays visible behind it
            match app.pending.as_ref().map(|p| p.resume) {
                Some(Screen::VariablesList) => draw_variables(frame, main_area, app, true),
                _ => draw_projects(frame, main_area, app, true),
            }
            if let Some(form) = &app.form {
                FormView::overlay(form).render(frame, main_area);
            }
        }
    }

    StatusBar {
        screen: app.screen,
        status_message: &app.status_message,
        error: app.error.as_deref(),
        last_synced: app.last_synced,
        show_help: app.show_help,
    }
    .render(frame, footer_area);
}

fn subtitle(screen: Screen) -> &'static str {
    match screen {
        Screen::ProjectsList => "Projects",
        Screen::CreateProjectForm => "New project",
        Screen::EditProjectForm => "Edit project",
        Screen::VariablesList => "Variables",
        Screen::CreateVariableForm => "New variable",
        Screen::EditVariableForm => "Edit variable",
        Screen::Loading => "",
        Screen::Confirm => "Confirm",
    }
}

fn draw_projects(frame: &mut Frame, area: Rect, app: &App, dimmed: bool) {
    ProjectTable::new(app.cache.all(), app.project_cursor)
        .dimmed(dimmed)
        .render(frame, area);
}

fn draw_variables(frame: &mut Frame, area: Rect, app: &App, dimmed: bool) {
    if let Some(draft) = &app.draft {
        VariableTable::new(draft, app.variable_cursor, app.unsaved)
            .dimmed(dimmed)
            .render(frame, area);
    }
}
