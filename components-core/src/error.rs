//! Error types for components-core.

use std::path::PathBuf;

use thiserror::Error;

use crate::schema::Violation;
use crate::types::ComponentName;

/// All errors that can arise from registry, config, schema and graph operations.
#[derive(Debug, Error)]
pub enum ComponentError {
    /// The component root directory could not be listed.
    #[error("cannot list components under {path}")]
    RegistryUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A `component.yaml` exists but is not valid YAML (or has the wrong shape).
    #[error("failed to parse component config at {path}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The packaged schema itself is malformed.
    #[error("component schema is invalid: {reason}")]
    SchemaInvalid { reason: String },

    /// A component's config does not satisfy the schema.
    #[error("invalid component.yaml for '{component}': {}", describe_violations(violations))]
    SchemaViolation {
        component: ComponentName,
        violations: Vec<Violation>,
    },

    /// A component has neither a `component.yaml` nor a `Dockerfile`.
    #[error("component '{component}' must provide either component.yaml or Dockerfile")]
    MissingDefinition { component: ComponentName },

    /// A declared dependency does not name a registered component.
    #[error("component '{component}' depends on unknown component '{missing}'")]
    UnknownDependency {
        component: ComponentName,
        missing: String,
    },

    /// The dependency edges form a cycle.
    #[error("cyclic component dependency: {}", join_names(cycle, " -> "))]
    CyclicDependency { cycle: Vec<ComponentName> },

    /// A user-supplied name is not a registered component.
    #[error("unknown component '{name}'")]
    UnknownComponent { name: String },

    /// `lamp.json` is missing or malformed.
    #[error("cannot read project file {path}: {reason}")]
    ProjectFile { path: PathBuf, reason: String },

    /// Any other filesystem failure, with the path attached.
    #[error("I/O error at {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ComponentError {
    /// Process exit code for this error kind.
    pub fn exit_code(&self) -> u8 {
        match self {
            ComponentError::RegistryUnavailable { .. } => 10,
            ComponentError::ConfigParse { .. } => 11,
            ComponentError::SchemaInvalid { .. } => 12,
            ComponentError::SchemaViolation { .. } | ComponentError::MissingDefinition { .. } => 13,
            ComponentError::UnknownDependency { .. } => 14,
            ComponentError::CyclicDependency { .. } => 15,
            ComponentError::UnknownComponent { .. } => 16,
            ComponentError::ProjectFile { .. } | ComponentError::Io { .. } => 1,
        }
    }
}

/// Convenience constructor for [`ComponentError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> ComponentError {
    ComponentError::Io {
        path: path.into(),
        source,
    }
}

/// Join component names with `sep` for messages.
pub fn join_names(names: &[ComponentName], sep: &str) -> String {
    names
        .iter()
        .map(|n| n.0.as_str())
        .collect::<Vec<_>>()
        .join(sep)
}

fn describe_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(Violation::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_message_lists_path() {
        let err = ComponentError::CyclicDependency {
            cycle: vec!["a".into(), "b".into(), "a".into()],
        };
        assert_eq!(err.to_string(), "cyclic component dependency: a -> b -> a");
    }

    #[test]
    fn wrapped_causes_are_left_to_the_source_chain() {
        let source = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied by policy");
        let err = ComponentError::RegistryUnavailable {
            path: PathBuf::from("components"),
            source,
        };
        assert_eq!(err.to_string(), "cannot list components under components");
        let cause = std::error::Error::source(&err).expect("io source");
        assert_eq!(cause.to_string(), "denied by policy");
    }

    #[test]
    fn exit_codes_are_distinct_per_core_kind() {
        let codes = [
            ComponentError::RegistryUnavailable {
                path: PathBuf::from("components"),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            }
            .exit_code(),
            ComponentError::SchemaInvalid { reason: String::new() }.exit_code(),
            ComponentError::MissingDefinition { component: "x".into() }.exit_code(),
            ComponentError::UnknownDependency {
                component: "x".into(),
                missing: "y".into(),
            }
            .exit_code(),
            ComponentError::CyclicDependency { cycle: vec![] }.exit_code(),
            ComponentError::UnknownComponent { name: "x".into() }.exit_code(),
        ];
        let unique: std::collections::BTreeSet<_> = codes.iter().collect();
        assert_eq!(unique.len(), codes.len());
        assert!(codes.iter().all(|c| *c != 0));
    }
}
