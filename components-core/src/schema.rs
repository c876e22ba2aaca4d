//! Validation of `component.yaml` documents against the packaged schema.
//!
//! The schema ships inside the crate (`etc/component_schema.json`) and is
//! compiled once per process as a Draft 7 validator. Compiling also checks the
//! schema against the Draft 7 meta-schema, so a malformed schema surfaces as
//! [`ComponentError::SchemaInvalid`] before any component is examined.

use std::fmt;

use serde_json::Value;

use crate::error::ComponentError;
use crate::types::ComponentName;

/// The packaged component schema.
pub const COMPONENT_SCHEMA: &str = include_str!("../etc/component_schema.json");

/// A single schema violation inside a component config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// JSON pointer into the offending document (`""` for the root).
    pub path: String,
    pub reason: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.reason)
        } else {
            write!(f, "{}: {}", self.path, self.reason)
        }
    }
}

/// A compiled schema, reused for every component validated in a command.
pub struct SchemaValidator {
    validator: jsonschema::Validator,
}

impl fmt::Debug for SchemaValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaValidator").finish_non_exhaustive()
    }
}

impl SchemaValidator {
    /// Compile the packaged component schema.
    pub fn packaged() -> Result<Self, ComponentError> {
        let schema: Value =
            serde_json::from_str(COMPONENT_SCHEMA).map_err(|e| ComponentError::SchemaInvalid {
                reason: format!("packaged schema is not JSON: {e}"),
            })?;
        Self::from_schema(&schema)
    }

    /// Compile an arbitrary Draft 7 schema.
    pub fn from_schema(schema: &Value) -> Result<Self, ComponentError> {
        let validator =
            jsonschema::draft7::new(schema).map_err(|e| ComponentError::SchemaInvalid {
                reason: e.to_string(),
            })?;
        Ok(Self { validator })
    }

    /// Every violation of `document`, in the order the validator reports them.
    pub fn violations(&self, document: &Value) -> Vec<Violation> {
        self.validator
            .iter_errors(document)
            .map(|e| Violation {
                path: e.instance_path.to_string(),
                reason: e.to_string(),
            })
            .collect()
    }

    /// Validate one component's config document.
    pub fn validate(&self, component: &ComponentName, document: &Value) -> Result<(), ComponentError> {
        let violations = self.violations(document);
        if violations.is_empty() {
            return Ok(());
        }
        Err(ComponentError::SchemaViolation {
            component: component.clone(),
            violations,
        })
    }
}
