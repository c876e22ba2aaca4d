//! `components list`: registered components with their definitions.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use components_core::error::join_names;

use crate::settings::Settings;

/// Arguments for `components list`.
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct ComponentJson {
    name: String,
    definition: String,
    dependencies: Vec<String>,
}

#[derive(Tabled)]
struct ComponentRow {
    #[tabled(rename = "component")]
    name: String,
    #[tabled(rename = "definition")]
    definition: String,
    #[tabled(rename = "dependencies")]
    dependencies: String,
}

impl ListArgs {
    pub fn run(self, settings: &Settings) -> Result<()> {
        let registry = settings.registry()?;

        let mut rows = Vec::with_capacity(registry.len());
        for component in registry.list() {
            let config = registry
                .load_config(component)
                .with_context(|| format!("failed to read config for '{component}'"))?;
            rows.push(ComponentJson {
                name: component.to_string(),
                definition: registry.definition(component).to_string(),
                dependencies: config.dependencies.iter().map(|d| d.0.clone()).collect(),
            });
            tracing::debug!(
                %component,
                dependencies = %join_names(&config.dependencies, ", "),
                "listed component"
            );
        }

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&rows).context("failed to serialize component list")?
            );
            return Ok(());
        }

        if rows.is_empty() {
            println!(
                "No components found under {}",
                registry.root().display().to_string().bold()
            );
            return Ok(());
        }

        let table_rows: Vec<ComponentRow> = rows
            .into_iter()
            .map(|row| ComponentRow {
                name: row.name,
                definition: row.definition,
                dependencies: if row.dependencies.is_empty() {
                    "-".to_string()
                } else {
                    row.dependencies.join(", ")
                },
            })
            .collect();
        let mut table = Table::new(table_rows);
        table.with(Style::rounded());
        println!("{table}");
        Ok(())
    }
}
