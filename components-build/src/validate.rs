//! Validation of component definitions.
//!
//! A component is valid when either
//! - its `component.yaml` satisfies the packaged schema, or
//! - it has no `component.yaml` but provides a `Dockerfile`.

use components_core::{config, registry, ComponentError, ComponentName, Registry, SchemaValidator};

use crate::error::WorkflowError;

/// Validate a single component.
pub fn validate_component(
    registry: &Registry,
    validator: &SchemaValidator,
    component: &ComponentName,
) -> Result<(), ComponentError> {
    match config::load_document_at(registry.root(), component)? {
        Some(document) => validator.validate(component, &document),
        None if registry.component_dir(component).join(registry::DOCKERFILE).is_file() => Ok(()),
        None => Err(ComponentError::MissingDefinition {
            component: component.clone(),
        }),
    }
}

/// Validate every component in `components`.
///
/// All components are checked and each failure is logged. Schema and
/// definition failures are reported together as
/// [`WorkflowError::ValidationFailed`]. A config that cannot be read or
/// parsed is returned as its own error kind once every component was checked.
pub fn validate_components(
    registry: &Registry,
    validator: &SchemaValidator,
    components: &[ComponentName],
) -> Result<(), WorkflowError> {
    let mut failed = Vec::new();
    let mut unreadable: Option<ComponentError> = None;
    for component in components {
        match validate_component(registry, validator, component) {
            Ok(()) => tracing::debug!(%component, "component is valid"),
            Err(
                err @ (ComponentError::SchemaViolation { .. }
                | ComponentError::MissingDefinition { .. }),
            ) => {
                tracing::error!("{err}");
                failed.push(component.clone());
            }
            Err(err) => {
                tracing::error!("{err}");
                unreadable.get_or_insert(err);
            }
        }
    }

    if let Some(err) = unreadable {
        return Err(err.into());
    }
    if failed.is_empty() {
        Ok(())
    } else {
        Err(WorkflowError::ValidationFailed { components: failed })
    }
}
