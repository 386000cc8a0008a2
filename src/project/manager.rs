// src/project/manager.rs

use super::{
    config::ProjectConfig,
    history::EditHistory,
};
use crate::error::{AppError, AppResult};
use itertools::Itertools;
use log::info;
use std::{
    fs,
    path::{Path, PathBuf},
};

const SUPPORTED_EXTENSIONS: [&str; 3] = ["json", "yaml", "yml"];

/// Owns the current project, its on-disk representation and its undo/redo
/// timeline. The file format is picked from the path extension.
pub struct ProjectManager {
    project: ProjectConfig,
    history: EditHistory<ProjectConfig>,
}

impl Default for ProjectManager {
    fn default() -> Self {
        Self::new(None, crate::constants::DEFAULT_MAX_HISTORY)
    }
}

impl ProjectManager {
    pub fn new(project: Option<ProjectConfig>, max_history: usize) -> Self {
        let project = project.unwrap_or_else(|| ProjectConfig::new("Untitled"));
        let mut history = EditHistory::new(max_history);
        history.push(project.clone(), "initial state");
        Self { project, history }
    }

    pub fn project(&self) -> &ProjectConfig {
        &self.project
    }

    pub fn project_mut(&mut self) -> &mut ProjectConfig {
        &mut self.project
    }

    /// Snapshots the current project onto the undo timeline.
    pub fn checkpoint(&mut self, description: impl Into<String>) {
        self.history.push(self.project.clone(), description);
    }

    pub fn undo(&mut self) -> Option<&ProjectConfig> {
        if let Some(state) = self.history.undo() {
            self.project = state.clone();
            return Some(&self.project);
        }
        None
    }

    pub fn redo(&mut self) -> Option<&ProjectConfig> {
        if let Some(state) = self.history.redo() {
            self.project = state.clone();
            return Some(&self.project);
        }
        None
    }

    pub fn history(&self) -> &EditHistory<ProjectConfig> {
        &self.history
    }

    pub fn new_project(&mut self, name: impl Into<String>, source_files: Vec<PathBuf>) -> &ProjectConfig {
        let mut project = ProjectConfig::new(name);
        project.source_files = source_files;
        self.project = project;
        self.history.clear();
        self.history.push(self.project.clone(), "initial state");
        &self.project
    }

    pub fn save(&self, path: &Path) -> AppResult<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let content = match extension_of(path)?.as_str() {
            "json" => serde_json::to_string_pretty(&self.project)?,
            _ => serde_yaml::to_string(&self.project)?,
        };
        fs::write(path, content)?;
        info!("saved project '{}' to {:?}", self.project.name, path);
        Ok(())
    }

    pub fn load(&mut self, path: &Path) -> AppResult<&ProjectConfig> {
        let extension = extension_of(path)?;
        let content = fs::read_to_string(path)?;
        self.project = match extension.as_str() {
            "json" => serde_json::from_str(&content)?,
            _ => serde_yaml::from_str(&content)?,
        };
        self.history.clear();
        self.history.push(self.project.clone(), "initial state");
        info!("loaded project '{}' from {:?}", self.project.name, path);
        Ok(&self.project)
    }

    /// All project files in a directory, sorted by path.
    pub fn list_projects(directory: &Path) -> AppResult<Vec<PathBuf>> {
        let mut projects = Vec::new();
        for entry in fs::read_dir(directory)? {
            let path = entry?.path();
            if path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| SUPPORTED_EXTENSIONS.contains(&e.to_lowercase().as_str()))
            {
                projects.push(path);
            }
        }
        Ok(projects.into_iter().sorted().collect())
    }
}

fn extension_of(path: &Path) -> AppResult<String> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();
    if SUPPORTED_EXTENSIONS.contains(&extension.as_str()) {
        Ok(extension)
    } else {
        Err(AppError::UnsupportedProjectFormat(
            path.to_string_lossy().into_owned(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::config::{EditOperation, OperationType};
    use serde_json::json;
    use tempfile::tempdir;

    fn manager_with_ops() -> ProjectManager {
        let mut manager = ProjectManager::new(Some(ProjectConfig::new("demo")), 50);
        manager
            .project_mut()
            .add_operation(EditOperation::new(OperationType::Trim, json!({"end": 5.0})));
        manager.checkpoint("trim");
        manager
            .project_mut()
            .add_operation(EditOperation::new(OperationType::Speed, json!({"rate": 2.0})));
        manager.checkpoint("speed");
        manager
    }

    #[test]
    fn test_undo_redo_restores_operation_lists() {
        let mut manager = manager_with_ops();
        assert_eq!(manager.project().operations.len(), 2);

        assert_eq!(manager.undo().unwrap().operations.len(), 1);
        assert_eq!(manager.undo().unwrap().operations.len(), 0);
        assert!(manager.undo().is_none());

        assert_eq!(manager.redo().unwrap().operations.len(), 1);
        assert_eq!(manager.history().get_redo_description(), Some("speed"));
    }

    #[test]
    fn test_json_save_load_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("demo.json");
        let manager = manager_with_ops();
        manager.save(&path).unwrap();

        let mut fresh = ProjectManager::new(None, 50);
        let loaded = fresh.load(&path).unwrap();
        assert_eq!(loaded.name, "demo");
        assert_eq!(loaded.operations.len(), 2);
        assert_eq!(loaded.operations[1].operation_type, OperationType::Speed);
        // loading resets the timeline to a fresh baseline
        assert!(!fresh.history().can_undo());
    }

    #[test]
    fn test_yaml_save_load_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("demo.yaml");
        manager_with_ops().save(&path).unwrap();

        let mut fresh = ProjectManager::new(None, 50);
        let loaded = fresh.load(&path).unwrap();
        assert_eq!(loaded.operations.len(), 2);
    }

    #[test]
    fn test_unsupported_extension_is_rejected() {
        let manager = ProjectManager::new(None, 50);
        let err = manager.save(Path::new("project.toml")).unwrap_err();
        assert!(matches!(err, AppError::UnsupportedProjectFormat(_)));
    }

    #[test]
    fn test_list_projects_sorted_and_filtered() {
        let dir = tempdir().unwrap();
        for name in ["b.yaml", "a.json", "c.yml", "notes.txt"] {
            fs::write(dir.path().join(name), "{}").unwrap();
        }
        let projects = ProjectManager::list_projects(dir.path()).unwrap();
        let names: Vec<_> = projects
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.json", "b.yaml", "c.yml"]);
    }
}
