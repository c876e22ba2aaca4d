//! Component registry.
//!
//! # Layout
//!
//! ```text
//! <project>/
//!   lamp.json
//!   components/
//!     <component>/
//!       component.yaml   (optional)
//!       Dockerfile       (optional)
//!       poetry.lock      (optional, fingerprinted by `edit`)
//! ```
//!
//! Every subdirectory of `components/` is a component. A [`Registry`] is a
//! snapshot of that listing taken once per command; nothing is cached
//! across commands.

use std::path::{Path, PathBuf};

use crate::config::{self, CONFIG_FILE};
use crate::error::ComponentError;
use crate::types::{ComponentName, Definition};

/// Name of the component root directory inside a project.
pub const COMPONENTS_DIR: &str = "components";

/// Name of the alternative image definition file.
pub const DOCKERFILE: &str = "Dockerfile";

/// `<project>/components/`: pure, no I/O.
pub fn components_root_at(project_dir: &Path) -> PathBuf {
    project_dir.join(COMPONENTS_DIR)
}

/// Lists component names under `root`, sorted lexicographically.
///
/// Only directories count. Names that are not valid UTF-8 or start with `.`
/// are skipped.
pub fn list_components_at(root: &Path) -> Result<Vec<ComponentName>, ComponentError> {
    let entries = std::fs::read_dir(root).map_err(|e| ComponentError::RegistryUnavailable {
        path: root.to_path_buf(),
        source: e,
    })?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| ComponentError::RegistryUnavailable {
            path: root.to_path_buf(),
            source: e,
        })?;
        if !entry.file_type().map(|t| t.is_dir()).unwrap_or(false) {
            continue;
        }
        let Ok(name) = entry.file_name().into_string() else {
            tracing::warn!(path = %entry.path().display(), "skipping non UTF-8 component directory");
            continue;
        };
        if name.starts_with('.') {
            continue;
        }
        names.push(ComponentName::from(name));
    }
    names.sort();
    Ok(names)
}

/// A snapshot of the valid component identifiers for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registry {
    root: PathBuf,
    components: Vec<ComponentName>,
}

impl Registry {
    /// Discover the components under `<project_dir>/components/`.
    pub fn discover(project_dir: &Path) -> Result<Self, ComponentError> {
        Self::discover_root(components_root_at(project_dir))
    }

    /// Discover the components directly under `root`.
    pub fn discover_root(root: PathBuf) -> Result<Self, ComponentError> {
        let components = list_components_at(&root)?;
        tracing::debug!(root = %root.display(), count = components.len(), "discovered components");
        Ok(Self { root, components })
    }

    /// The component root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Registered components in lexicographic order.
    pub fn list(&self) -> &[ComponentName] {
        &self.components
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Membership test for user-supplied names.
    pub fn contains(&self, name: &str) -> bool {
        self.components
            .binary_search_by(|c| c.as_str().cmp(name))
            .is_ok()
    }

    /// Turn a user-supplied name into a registered [`ComponentName`].
    pub fn resolve(&self, name: &str) -> Result<ComponentName, ComponentError> {
        if self.contains(name) {
            Ok(ComponentName::from(name))
        } else {
            Err(ComponentError::UnknownComponent {
                name: name.to_owned(),
            })
        }
    }

    /// Resolve a list of names; an empty list selects every component.
    pub fn resolve_all(&self, names: &[String]) -> Result<Vec<ComponentName>, ComponentError> {
        if names.is_empty() {
            return Ok(self.components.clone());
        }
        let mut resolved = Vec::with_capacity(names.len());
        for name in names {
            let component = self.resolve(name)?;
            if !resolved.contains(&component) {
                resolved.push(component);
            }
        }
        Ok(resolved)
    }

    /// `<root>/<component>/`: pure, no I/O.
    pub fn component_dir(&self, component: &ComponentName) -> PathBuf {
        self.root.join(&component.0)
    }

    /// Which definition file(s) a component provides.
    pub fn definition(&self, component: &ComponentName) -> Definition {
        let dir = self.component_dir(component);
        if dir.join(CONFIG_FILE).is_file() {
            Definition::ComponentYaml
        } else if dir.join(DOCKERFILE).is_file() {
            Definition::Dockerfile
        } else {
            Definition::Missing
        }
    }

    /// Load a component's config; see [`config::load_at`].
    pub fn load_config(
        &self,
        component: &ComponentName,
    ) -> Result<crate::types::ComponentConfig, ComponentError> {
        config::load_at(&self.root, component)
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
