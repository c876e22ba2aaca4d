//! Components core library: registry, per-component config, schema
//! validation, dependency graph and lock-file fingerprints.
//!
//! Public API surface:
//! - [`types`]: newtypes and domain structs
//! - [`error`]: [`ComponentError`]
//! - [`registry`]: component discovery under `<project>/components/`
//! - [`config`]: `component.yaml` loading
//! - [`schema`]: packaged JSON schema validation
//! - [`graph`]: [`DependencyGraph`] construction and queries
//! - [`fingerprint`]: `poetry.lock` content digests
//! - [`project`]: `lamp.json` project file

pub mod config;
pub mod error;
pub mod fingerprint;
pub mod graph;
pub mod project;
pub mod registry;
pub mod schema;
pub mod types;

pub use error::ComponentError;
pub use fingerprint::Fingerprint;
pub use graph::DependencyGraph;
pub use project::ProjectFile;
pub use registry::Registry;
pub use schema::{SchemaValidator, Violation};
pub use types::{ComponentConfig, ComponentName, Definition};
