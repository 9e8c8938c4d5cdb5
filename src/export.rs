//! # Export
//!
//! Writes each project's variables to `{base}/{target_folder}/{file_name}`
//! as `KEY=VALUE` lines, sorted by key. Existing files are truncated.

use std::fs;
use std::io::Write;
use std::path::{Component, Path, PathBuf};

use log::{info, warn};

use crate::core::error::ExportError;
use crate::core::project::Project;

pub trait Exporter: Send + Sync {
    fn export(&self, projects: &[Project]) -> Result<(), ExportError>;
}

/// Writes to the local filesystem, relative to a base directory.
pub struct FsExporter {
    /// `None` resolves to the working directory on each export.
    base_dir: Option<PathBuf>,
}

impl FsExporter {
    pub fn new(base_dir: Option<PathBuf>) -> Self {
        Self { base_dir }
    }

    fn base(&self) -> Result<PathBuf, ExportError> {
        match &self.base_dir {
            Some(dir) => Ok(dir.clone()),
            None => std::env::current_dir().map_err(|e| ExportError::WorkingDir(e.to_string())),
        }
    }

    fn write_project(&self, base: &Path, project: &Project) -> Result<PathBuf, ExportError> {
        let dir = base.join(relative(&project.target_folder));
        fs::create_dir_all(&dir).map_err(|e| ExportError::CreateDir {
            path: dir.clone(),
            reason: e.to_string(),
        })?;

        let path = dir.join(relative(&project.file_name));
        if path.exists() {
            warn!("Overwriting existing file {}", path.display());
        }

        let write_err = |e: std::io::Error| ExportError::Write {
            path: path.clone(),
            reason: e.to_string(),
        };
        let mut file = fs::File::create(&path).map_err(write_err)?;
        file.write_all(render(project).as_bytes()).map_err(write_err)?;
        Ok(path)
    }
}

impl Exporter for FsExporter {
    fn export(&self, projects: &[Project]) -> Result<(), ExportError> {
        let base = self.base()?;
        for project in projects {
            let path = self.write_project(&base, project)?;
            info!(
                "Exported {} variables for '{}' to {}",
                project.variables.len(),
                project.name,
                path.display()
            );
        }
        Ok(())
    }
}

/// `KEY=VALUE\n` per variable, sorted by key.
pub fn render(project: &Project) -> String {
    project
        .sorted_variables()
        .into_iter()
        .map(|(key, value)| format!("{key}={value}\n"))
        .collect()
}

/// Keeps only plain name components, so neither a leading `/` nor `..`
/// can leave the base.
fn relative(path: &str) -> PathBuf {
    Path::new(path)
        .components()
        .filter(|c| matches!(c, Component::Normal(_)))
        .collect()
}
