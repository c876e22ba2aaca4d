//! `components run <component> [-- <command>...]`
//!
//! Runs the component's editor image with the `components/` directory
//! mounted, so the container can be explored without touching the image
//! intended for publishing.

use anyhow::Result;
use clap::Args;

use components_build::{
    process::{DEFAULT_COMMAND, EDITOR_TAG},
    WorkflowError,
};

use crate::settings::Settings;

/// Arguments for `components run`.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// The component container to run.
    pub component: String,

    /// Command to run in the container, defaults to /bin/bash. Prefix with
    /// `--` when it contains flags.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}

impl RunArgs {
    pub fn run(self, settings: &Settings) -> Result<()> {
        let registry = settings.registry()?;
        let component = registry.resolve(&self.component)?;
        let runtime = settings.container_runtime()?;

        let command = if self.command.is_empty() {
            vec![DEFAULT_COMMAND.to_string()]
        } else {
            self.command
        };

        let outcome = runtime.run(&component, EDITOR_TAG, &command, false)?;
        if !outcome.is_success() {
            return Err(WorkflowError::ContainerFailed {
                image: runtime.image(&component, EDITOR_TAG),
                outcome,
            }
            .into());
        }
        Ok(())
    }
}
