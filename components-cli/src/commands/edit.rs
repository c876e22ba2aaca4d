//! `components edit <component>`
//!
//! Opens a shell in the component's editor container, in the component's
//! directory. If `poetry.lock` changed when the shell exits, the component
//! and everything depending on it are rebuilt.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use components_build::{
    edit_component, process::EDITOR_TAG, EditOutcome, EditorSession, WorkflowError,
};
use components_core::error::join_names;

use crate::settings::Settings;

/// Arguments for `components edit`.
#[derive(Args, Debug)]
pub struct EditArgs {
    /// The component whose dependencies you wish to edit.
    pub component: String,
}

impl EditArgs {
    pub fn run(self, settings: &Settings) -> Result<()> {
        let registry = settings.registry()?;
        let component = registry.resolve(&self.component)?;
        let runtime = settings.container_runtime()?;

        let image = runtime.image(&component, EDITOR_TAG);
        if !runtime.image_exists(&image)? {
            return Err(WorkflowError::EditorImageMissing { image }.into());
        }

        let mut session = EditorSession::new(&runtime);
        let mut builder = settings.build_tool();
        let outcome = edit_component(&registry, &component, &mut session, &mut builder)
            .with_context(|| format!("edit failed for '{component}'"))?;

        match outcome {
            EditOutcome::Unchanged => {
                println!("No changes detected for '{component}'; nothing rebuilt.");
            }
            EditOutcome::Rebuilt {
                component,
                dependents,
            } if dependents.is_empty() => {
                println!("{} rebuilt '{component}'", "✓".green().bold());
            }
            EditOutcome::Rebuilt {
                component,
                dependents,
            } => {
                println!(
                    "{} rebuilt '{component}' and dependents: {}",
                    "✓".green().bold(),
                    join_names(&dependents, ", ")
                );
            }
        }
        Ok(())
    }
}
