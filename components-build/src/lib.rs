//! # components-build
//!
//! Workflows that drive external tools for project components.
//!
//! - [`validate`]: schema / definition checks across components
//! - [`edit`]: the edit-rebuild protocol: fingerprint, session, rebuild
//!   the component and its dependents in dependency order
//! - [`process`]: collaborator traits and their process-backed
//!   implementations (`aladdin build`, `docker`)

pub mod edit;
pub mod error;
pub mod process;
pub mod validate;

pub use edit::{edit_component, EditOutcome};
pub use error::WorkflowError;
pub use process::{BuildInvoker, BuildTool, ContainerRuntime, EditorSession, Outcome, SessionRunner};
pub use validate::validate_components;
