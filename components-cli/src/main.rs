//! components: work with the project's container components.
//!
//! # Usage
//!
//! ```text
//! components list [--json]
//! components validate [<component>...]
//! components build [<component>...]
//! components run <component> [-- <command>...]
//! components edit <component>
//! components dependents <component>
//! ```
//!
//! Global options: `--project-dir`, `--build-tool`, `--container-cli`,
//! `--log-level` (each also settable through a `COMPONENTS_*` variable).

mod commands;
mod logging;
mod settings;

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;

use commands::{
    build::BuildArgs, dependents::DependentsArgs, edit::EditArgs, list::ListArgs, run::RunArgs,
    validate::ValidateArgs,
};
use components_build::WorkflowError;
use components_core::ComponentError;
use settings::{GlobalArgs, Settings};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "components",
    version,
    about = "Commands for working with the project's components",
    long_about = None,
)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List all of the current components.
    List(ListArgs),

    /// Validate the components' component.yaml files.
    Validate(ValidateArgs),

    /// Validate, then build the docker images for the given components.
    Build(BuildArgs),

    /// Run a command in a component's editor container.
    Run(RunArgs),

    /// Edit a component in its editor container and rebuild what changed.
    Edit(EditArgs),

    /// Show the components that would be rebuilt after editing a component.
    Dependents(DependentsArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.global.log_level);
    let settings = Settings::from_args(cli.global);
    tracing::debug!(project_dir = %settings.project_dir().display(), "resolved settings");

    match run(cli.command, &settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {err:#}", "error:".red().bold());
            ExitCode::from(exit_code(&err))
        }
    }
}

fn run(command: Commands, settings: &Settings) -> Result<()> {
    match command {
        Commands::List(args) => args.run(settings),
        Commands::Validate(args) => args.run(settings),
        Commands::Build(args) => args.run(settings),
        Commands::Run(args) => args.run(settings),
        Commands::Edit(args) => args.run(settings),
        Commands::Dependents(args) => args.run(settings),
    }
}

/// Map the first typed error in the chain to its exit code.
fn exit_code(err: &anyhow::Error) -> u8 {
    for cause in err.chain() {
        if let Some(err) = cause.downcast_ref::<WorkflowError>() {
            return err.exit_code();
        }
        if let Some(err) = cause.downcast_ref::<ComponentError>() {
            return err.exit_code();
        }
    }
    1
}
