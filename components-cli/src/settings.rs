//! Global options, resolved once and passed to every command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use components_build::{BuildTool, ContainerRuntime};
use components_core::{DependencyGraph, ProjectFile, Registry};

use crate::logging::LogLevel;

#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Project root containing lamp.json and the components/ directory.
    #[arg(long, global = true, env = "COMPONENTS_PROJECT_DIR", default_value = ".")]
    pub project_dir: PathBuf,

    /// Program invoked as `<build-tool> build <component>...`.
    #[arg(long, global = true, env = "COMPONENTS_BUILD_TOOL", default_value = "aladdin")]
    pub build_tool: String,

    /// Docker-compatible container CLI.
    #[arg(long, global = true, env = "COMPONENTS_CONTAINER_CLI", default_value = "docker")]
    pub container_cli: String,

    /// Log level for this command.
    #[arg(
        long,
        global = true,
        value_enum,
        env = "COMPONENTS_LOG_LEVEL",
        default_value_t = LogLevel::Info
    )]
    pub log_level: LogLevel,
}

/// Resolved settings for one invocation.
#[derive(Debug, Clone)]
pub struct Settings {
    project_dir: PathBuf,
    build_tool: String,
    container_cli: String,
}

impl Settings {
    pub fn from_args(args: GlobalArgs) -> Self {
        // Relative paths are resolved so container mounts get an absolute host path.
        let project_dir = args
            .project_dir
            .canonicalize()
            .unwrap_or(args.project_dir);
        Self {
            project_dir,
            build_tool: args.build_tool,
            container_cli: args.container_cli,
        }
    }

    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    pub fn registry(&self) -> Result<Registry> {
        Registry::discover(&self.project_dir).with_context(|| {
            format!(
                "failed to discover components in '{}'",
                self.project_dir.display()
            )
        })
    }

    pub fn graph(&self, registry: &Registry) -> Result<DependencyGraph> {
        DependencyGraph::build(registry).context("failed to build the component dependency graph")
    }

    pub fn build_tool(&self) -> BuildTool {
        BuildTool::new(&self.build_tool, &self.project_dir)
    }

    pub fn container_runtime(&self) -> Result<ContainerRuntime> {
        let project = ProjectFile::load_at(&self.project_dir)?;
        Ok(ContainerRuntime::new(
            &self.container_cli,
            &self.project_dir,
            project,
        ))
    }
}
