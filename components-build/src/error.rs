//! Error types for components-build.

use std::fmt;

use thiserror::Error;

use components_core::error::join_names;
use components_core::{ComponentError, ComponentName};

use crate::process::Outcome;

/// All errors that can arise from component workflows.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// A registry, config, schema or graph failure.
    #[error(transparent)]
    Core(#[from] ComponentError),

    /// The interactive editing session exited unsuccessfully.
    #[error("editing session for '{component}' failed ({outcome})")]
    SessionFailed {
        component: ComponentName,
        outcome: Outcome,
    },

    /// The build tool reported failure for a set of components.
    #[error("build failed for {} ({outcome})", Targets(targets))]
    BuildFailed {
        targets: Vec<ComponentName>,
        outcome: Outcome,
    },

    /// A container started by `run` exited unsuccessfully.
    #[error("container {image} failed ({outcome})")]
    ContainerFailed { image: String, outcome: Outcome },

    /// `edit` needs the component's editor image to be built first.
    #[error("no editor image present for this component: {image}")]
    EditorImageMissing { image: String },

    /// An external program could not be started at all.
    #[error("failed to start '{program}'")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// One or more components failed validation (each is logged separately).
    #[error("validation failed for {}", Targets(components))]
    ValidationFailed { components: Vec<ComponentName> },
}

impl WorkflowError {
    /// Process exit code for this error kind.
    pub fn exit_code(&self) -> u8 {
        match self {
            WorkflowError::Core(err) => err.exit_code(),
            WorkflowError::ValidationFailed { .. } => 13,
            WorkflowError::SessionFailed { .. } => 20,
            WorkflowError::BuildFailed { .. } => 21,
            WorkflowError::ContainerFailed { .. } | WorkflowError::EditorImageMissing { .. } => 22,
            WorkflowError::Spawn { .. } => 23,
        }
    }
}

struct Targets<'a>(&'a [ComponentName]);

impl fmt::Display for Targets<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.len() {
            0 => write!(f, "all components"),
            1 => write!(f, "'{}'", self.0[0]),
            _ => write!(f, "components: {}", join_names(self.0, ", ")),
        }
    }
}
