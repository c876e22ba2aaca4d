//! `lamp.json`: the project file at the project root.
//!
//! Only `name` is read; it prefixes every component image reference
//! (`<name>-<component>:<tag>`).

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{io_err, ComponentError};
use crate::types::ComponentName;

/// Name of the project file.
pub const PROJECT_FILE: &str = "lamp.json";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProjectFile {
    pub name: String,
}

impl ProjectFile {
    /// `<project_dir>/lamp.json`: pure, no I/O.
    pub fn path_at(project_dir: &Path) -> PathBuf {
        project_dir.join(PROJECT_FILE)
    }

    /// Load `lamp.json` from `project_dir`.
    pub fn load_at(project_dir: &Path) -> Result<Self, ComponentError> {
        let path = Self::path_at(project_dir);
        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(ComponentError::ProjectFile {
                    path,
                    reason: "file not found".to_string(),
                })
            }
            Err(err) => return Err(io_err(&path, err)),
        };
        serde_json::from_str(&contents).map_err(|e| ComponentError::ProjectFile {
            path,
            reason: e.to_string(),
        })
    }

    /// `<project>-<component>:<tag>`
    pub fn image(&self, component: &ComponentName, tag: &str) -> String {
        format!("{}-{}:{}", self.name, component, tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn loads_name_and_ignores_other_fields() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(
            tmp.path().join(PROJECT_FILE),
            r#"{"name": "shop", "aladdin": {"version": "1.0"}}"#,
        )
        .unwrap();
        let project = ProjectFile::load_at(tmp.path()).unwrap();
        assert_eq!(project.name, "shop");
        assert_eq!(project.image(&"api".into(), "editor"), "shop-api:editor");
    }

    #[test]
    fn missing_file_is_project_file_error() {
        let tmp = TempDir::new().unwrap();
        let err = ProjectFile::load_at(tmp.path()).unwrap_err();
        assert!(matches!(err, ComponentError::ProjectFile { .. }), "got: {err}");
        assert!(err.to_string().contains(PROJECT_FILE));
    }

    #[test]
    fn missing_name_is_project_file_error() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join(PROJECT_FILE), "{}").unwrap();
        let err = ProjectFile::load_at(tmp.path()).unwrap_err();
        assert!(matches!(err, ComponentError::ProjectFile { .. }), "got: {err}");
    }
}
