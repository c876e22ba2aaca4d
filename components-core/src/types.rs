//! Domain types for project components.
//!
//! All types are serializable/deserializable via serde + serde_yaml.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A strongly-typed component identifier (the name of its directory).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentName(pub String);

impl ComponentName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ComponentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for ComponentName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ComponentName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl AsRef<str> for ComponentName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// The parts of `component.yaml` the tooling reads.
///
/// Everything except `dependencies` is kept opaque in `extra`; the schema
/// validator is the only thing that looks inside it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentConfig {
    /// Components that must be built before this one, in declared order.
    #[serde(default)]
    pub dependencies: Vec<ComponentName>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ComponentConfig {
    /// The config used when a component has no `component.yaml`.
    pub fn empty() -> Self {
        Self::default()
    }
}

/// How a component describes its image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Definition {
    /// `component.yaml` present (a `Dockerfile` may also be present).
    ComponentYaml,
    /// Only a `Dockerfile`.
    Dockerfile,
    /// Neither; fails validation.
    Missing,
}

impl fmt::Display for Definition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Definition::ComponentYaml => write!(f, "component.yaml"),
            Definition::Dockerfile => write!(f, "Dockerfile"),
            Definition::Missing => write!(f, "-"),
        }
    }
}
