//! `components build [<component>...]`: validate, order, then build.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use components_build::{validate_components, BuildInvoker, WorkflowError};
use components_core::{error::join_names, SchemaValidator};

use crate::settings::Settings;

/// Arguments for `components build`.
#[derive(Args, Debug)]
pub struct BuildArgs {
    /// The components to build. If none are given, all components are built.
    pub components: Vec<String>,
}

impl BuildArgs {
    pub fn run(self, settings: &Settings) -> Result<()> {
        let registry = settings.registry()?;
        let selected = registry.resolve_all(&self.components)?;

        let validator = SchemaValidator::packaged()?;
        validate_components(&registry, &validator, &selected)?;

        // Graph errors must surface before the build tool is started.
        let graph = settings.graph(&registry)?;
        let order = graph.topological_order(&selected)?;
        // An empty argument list tells the build tool to build everything.
        if order.is_empty() {
            println!("Nothing to build: no components under {}", registry.root().display());
            return Ok(());
        }
        tracing::info!("Building components: {}", join_names(&order, ", "));

        let mut builder = settings.build_tool();
        let outcome = builder
            .build(&order)
            .context("could not run the build tool")?;
        if !outcome.is_success() {
            return Err(WorkflowError::BuildFailed {
                targets: order,
                outcome,
            }
            .into());
        }

        println!(
            "{} built {}",
            "✓".green().bold(),
            join_names(&order, ", ")
        );
        Ok(())
    }
}
