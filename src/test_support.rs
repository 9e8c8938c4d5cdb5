//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use crate::core::project::Project;
use crate::core::state::{App, Screen};

/// A project with a predictable folder and file and no variables.
pub fn sample_project(name: &str) -> Project {
    Project::new(name, format!("/srv/{name}"), ".env")
}

/// Creates a test App already past the initial load, sitting on the
/// projects list with one sample project per name.
pub fn app_with_projects(names: &[&str]) -> App {
    let mut app = App::new();
    for name in names {
        app.cache.upsert(name, sample_project(name));
    }
    app.screen = Screen::ProjectsList;
    app.in_flight = None;
    app.status_message.clear();
    app
}
