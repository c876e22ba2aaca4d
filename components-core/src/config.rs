//! Per-component `component.yaml` loading.
//!
//! Loading never validates against the schema; graph construction only needs
//! `dependencies`, and the `validate` workflow applies the schema separately.
//! Configs are read fresh on every call.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{io_err, ComponentError};
use crate::types::{ComponentConfig, ComponentName};

/// Name of the per-component config file.
pub const CONFIG_FILE: &str = "component.yaml";

/// `<root>/<component>/component.yaml`: pure, no I/O.
pub fn config_path_at(root: &Path, component: &ComponentName) -> PathBuf {
    root.join(&component.0).join(CONFIG_FILE)
}

/// Read the raw YAML document for a component.
///
/// Returns `None` when the file is absent or holds an empty (null) document.
fn read_yaml_at(
    root: &Path,
    component: &ComponentName,
) -> Result<Option<(PathBuf, serde_yaml::Value)>, ComponentError> {
    let path = config_path_at(root, component);
    let contents = match std::fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(io_err(&path, err)),
    };
    let value: serde_yaml::Value = serde_yaml::from_str(&contents)
        .map_err(|e| ComponentError::ConfigParse { path: path.clone(), source: e })?;
    if value.is_null() {
        return Ok(None);
    }
    Ok(Some((path, value)))
}

/// Load the config document as JSON data, ready for schema validation.
///
/// `None` means the component has no config.
pub fn load_document_at(
    root: &Path,
    component: &ComponentName,
) -> Result<Option<serde_json::Value>, ComponentError> {
    let Some((path, value)) = read_yaml_at(root, component)? else {
        return Ok(None);
    };
    serde_yaml::from_value(value)
        .map(Some)
        .map_err(|e| ComponentError::ConfigParse { path, source: e })
}

/// Load a component's config.
///
/// An absent file yields [`ComponentConfig::empty`]. A file that is not valid
/// YAML, or whose `dependencies` is not a list of names, is
/// [`ComponentError::ConfigParse`] carrying the file path.
pub fn load_at(root: &Path, component: &ComponentName) -> Result<ComponentConfig, ComponentError> {
    let Some((path, value)) = read_yaml_at(root, component)? else {
        return Ok(ComponentConfig::empty());
    };
    serde_yaml::from_value(value).map_err(|e| ComponentError::ConfigParse { path, source: e })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(root: &Path, component: &str, contents: &str) {
        let dir = root.join(component);
        std::fs::create_dir_all(&dir).expect("mkdir");
        std::fs::write(dir.join(CONFIG_FILE), contents).expect("write");
    }

    #[test]
    fn absent_config_is_empty() {
        let tmp = TempDir::new().expect("tempdir");
        std::fs::create_dir_all(tmp.path().join("api")).expect("mkdir");
        let cfg = load_at(tmp.path(), &"api".into()).expect("load");
        assert_eq!(cfg, ComponentConfig::empty());
        assert!(load_document_at(tmp.path(), &"api".into()).expect("doc").is_none());
    }

    #[test]
    fn empty_file_is_treated_as_absent() {
        let tmp = TempDir::new().expect("tempdir");
        write_config(tmp.path(), "api", "");
        assert!(load_at(tmp.path(), &"api".into()).expect("load").dependencies.is_empty());
        assert!(load_document_at(tmp.path(), &"api".into()).expect("doc").is_none());
    }

    #[test]
    fn reads_dependencies() {
        let tmp = TempDir::new().expect("tempdir");
        write_config(tmp.path(), "api", "meta:\n  version: 1\ndependencies: [shared]\n");
        let cfg = load_at(tmp.path(), &"api".into()).expect("load");
        assert_eq!(cfg.dependencies, vec![ComponentName::from("shared")]);
    }

    #[test]
    fn malformed_yaml_reports_path() {
        let tmp = TempDir::new().expect("tempdir");
        write_config(tmp.path(), "api", "dependencies: [unclosed\n");
        let err = load_at(tmp.path(), &"api".into()).unwrap_err();
        assert!(matches!(err, ComponentError::ConfigParse { .. }), "got: {err}");
        assert!(err.to_string().contains(CONFIG_FILE));
    }

    #[test]
    fn wrong_dependency_shape_is_parse_error() {
        let tmp = TempDir::new().expect("tempdir");
        write_config(tmp.path(), "api", "dependencies: shared\n");
        let err = load_at(tmp.path(), &"api".into()).unwrap_err();
        assert!(matches!(err, ComponentError::ConfigParse { .. }), "got: {err}");
    }

    #[test]
    fn document_keeps_every_field() {
        let tmp = TempDir::new().expect("tempdir");
        write_config(tmp.path(), "api", "meta:\n  version: 1\nlanguage:\n  name: python\n");
        let doc = load_document_at(tmp.path(), &"api".into())
            .expect("doc")
            .expect("present");
        assert_eq!(doc["meta"]["version"], 1);
        assert_eq!(doc["language"]["name"], "python");
    }
}
