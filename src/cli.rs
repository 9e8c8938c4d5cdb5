//! # Headless Commands
//!
//! `venom pull` and `venom list` talk to the store and the exporter
//! directly, without the interactive session.

use std::fmt::Write as _;

use log::info;

use crate::core::error::AppError;
use crate::core::project::Project;
use crate::export::Exporter;
use crate::store::ProjectStore;

/// Placeholder printed instead of sensitive values.
pub const MASK: &str = "*****";

/// Keys containing these markers have their values masked by `list`.
const SENSITIVE_MARKERS: [&str; 2] = ["SECRET", "KEY"];

/// Exports one project (`name`) or every project. Returns a summary line.
pub async fn pull(
    store: &dyn ProjectStore,
    exporter: &dyn Exporter,
    name: Option<&str>,
) -> Result<String, AppError> {
    let projects = match name {
        Some(name) => vec![
            store
                .get(name)
                .await
                .map_err(|e| AppError::operation("get project", e))?,
        ],
        None => sorted(
            store
                .list_all()
                .await
                .map_err(|e| AppError::operation("load projects", e))?
                .into_values()
                .collect(),
        ),
    };

    exporter.export(&projects).map_err(AppError::ExportFailed)?;
    info!("Pulled {} projects", projects.len());

    Ok(match name {
        Some(name) => format!("Project {name} saved successfully."),
        None => format!("All projects saved successfully ({}).", projects.len()),
    })
}

/// Renders every project with sensitive values masked.
pub async fn list(store: &dyn ProjectStore) -> Result<String, AppError> {
    let projects = store
        .list_all()
        .await
        .map_err(|e| AppError::operation("load projects", e))?;
    Ok(render_list(&sorted(projects.into_values().collect())))
}

pub fn render_list(projects: &[Project]) -> String {
    let mut out = String::from("\nProjects:\n\n");
    for project in projects {
        let _ = writeln!(out, "Project Name: {}", project.name);
        let _ = writeln!(out, "  File: {}", project.file_name);
        let _ = writeln!(out, "  Target Folder: {}", project.target_folder);
        let _ = writeln!(out, "  Variables ({}):", project.variables.len());
        for (key, value) in project.sorted_variables() {
            let _ = writeln!(out, "    - {}: {}", key, mask_value(key, value));
        }
        out.push('\n');
    }
    out
}

pub fn mask_value<'a>(key: &str, value: &'a str) -> &'a str {
    if SENSITIVE_MARKERS.iter().any(|m| key.contains(m)) {
        MASK
    } else {
        value
    }
}

fn sorted(mut projects: Vec<Project>) -> Vec<Project> {
    projects.sort_by(|a, b| a.name.cmp(&b.name));
    projects
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::StoreError;
    use crate::export::FsExporter;
    use crate::store::InMemoryStore;
    use crate::test_support::sample_project;

    #[test]
    fn test_mask_value() {
        assert_eq!(mask_value("API_KEY", "abc"), MASK);
        assert_eq!(mask_value("DB_SECRET", "abc"), MASK);
        assert_eq!(mask_value("KEYRING_PATH", "/k"), MASK);
        assert_eq!(mask_value("PORT", "80"), "80");
        // Case-sensitive, like the markers
        assert_eq!(mask_value("api_key", "abc"), "abc");
    }

    #[test]
    fn test_render_list() {
        let project = sample_project("web")
            .with_variable("PORT", "80")
            .with_variable("API_KEY", "hunter2");
        let text = render_list(&[project]);
        assert!(text.contains("Project Name: web"));
        assert!(text.contains("  Target Folder: /srv/web"));
        assert!(text.contains("  Variables (2):"));
        assert!(text.contains("    - API_KEY: *****"));
        assert!(text.contains("    - PORT: 80"));
        assert!(!text.contains("hunter2"));
    }

    #[tokio::test]
    async fn test_pull_single_project() {
        let dir = tempfile::tempdir().unwrap();
        let store = InMemoryStore::with_projects([
            sample_project("web").with_variable("A", "1"),
            sample_project("api"),
        ]);
        let exporter = FsExporter::new(Some(dir.path().to_path_buf()));

        let summary = pull(&store, &exporter, Some("web")).await.unwrap();
        assert_eq!(summary, "Project web saved successfully.");
        let written = std::fs::read_to_string(dir.path().join("srv/web/.env")).unwrap();
        assert_eq!(written, "A=1\n");
        assert!(!dir.path().join("srv/api").exists());
    }

    #[tokio::test]
    async fn test_pull_all_projects() {
        let dir = tempfile::tempdir().unwrap();
        let store = InMemoryStore::with_projects([sample_project("web"), sample_project("api")]);
        let exporter = FsExporter::new(Some(dir.path().to_path_buf()));

        pull(&store, &exporter, None).await.unwrap();
        assert!(dir.path().join("srv/web/.env").exists());
        assert!(dir.path().join("srv/api/.env").exists());
    }

    #[tokio::test]
    async fn test_pull_missing_project_is_not_found() {
        let store = InMemoryStore::new();
        let exporter = FsExporter::new(None);
        let err = pull(&store, &exporter, Some("ghost")).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_list_surfaces_store_errors() {
        let store = InMemoryStore::new();
        store.fail_next("list", StoreError::Network("refused".into()));
        let err = list(&store).await.unwrap_err();
        assert_eq!(err.to_string(), "load projects failed: network error: refused");
    }
}
