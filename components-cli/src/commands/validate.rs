//! `components validate [<component>...]`

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use components_build::validate_components;
use components_core::SchemaValidator;

use crate::settings::Settings;

/// Arguments for `components validate`.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// The components to validate, default is all of them.
    pub components: Vec<String>,
}

impl ValidateArgs {
    pub fn run(self, settings: &Settings) -> Result<()> {
        let registry = settings.registry()?;
        let components = registry.resolve_all(&self.components)?;
        let validator = SchemaValidator::packaged()?;

        validate_components(&registry, &validator, &components)?;

        println!(
            "{} {} component(s) valid",
            "✓".green().bold(),
            components.len()
        );
        Ok(())
    }
}
