//! `components dependents <component>`: what an edit would rebuild.

use anyhow::Result;
use clap::Args;

use crate::settings::Settings;

/// Arguments for `components dependents`.
#[derive(Args, Debug)]
pub struct DependentsArgs {
    /// The component whose dependents to list.
    pub component: String,
}

impl DependentsArgs {
    pub fn run(self, settings: &Settings) -> Result<()> {
        let registry = settings.registry()?;
        let component = registry.resolve(&self.component)?;
        let graph = settings.graph(&registry)?;

        let dependents = graph.dependents_for(&component)?;
        if dependents.is_empty() {
            tracing::info!("No components depend on '{component}'");
        }
        // One per line, in build order.
        for dependent in dependents {
            println!("{dependent}");
        }
        Ok(())
    }
}
